//! Observability subsystem for idxsize
//!
//! Structured JSON logging of typed lifecycle events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. The estimator core never logs; only the glue around it does
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use idxsize::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::EstimateComplete, &[("size_mb", "2")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_with_fields() {
        // This just verifies no panic
        log_event_with_fields(Event::CatalogLoaded, &[("path", "/tmp/catalog.json")]);
        log_event_with_fields(Event::EstimateComplete, &[]);
    }
}
