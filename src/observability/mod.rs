//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//!
//! Observability is read-only: it never changes what the parser or executor
//! return, and a failed write is swallowed.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

impl Logger {
    /// Log a typed event. Degradation events are logged at WARN, the rest at
    /// the given severity.
    pub fn event(&self, event: Event, severity: Severity, fields: &[(&str, &str)]) {
        let severity = if event.is_degradation() {
            severity.max(Severity::Warn)
        } else {
            severity
        };
        self.log(severity, event.as_str(), fields);
    }
}
