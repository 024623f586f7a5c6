//! Observability events for idxsize
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Catalog snapshot loaded
    CatalogLoaded,

    // Resolution
    /// Metadata resolution started
    ResolveBegin,
    /// Metadata resolution produced facts
    ResolveComplete,
    /// Metadata resolution failed
    ResolveFailed,

    // Estimation
    /// Estimate started
    EstimateBegin,
    /// Estimate produced
    EstimateComplete,
    /// Estimate rejected by input or geometry checks
    EstimateRejected,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CatalogLoaded => "CATALOG_LOADED",

            Event::ResolveBegin => "RESOLVE_BEGIN",
            Event::ResolveComplete => "RESOLVE_COMPLETE",
            Event::ResolveFailed => "RESOLVE_FAILED",

            Event::EstimateBegin => "ESTIMATE_BEGIN",
            Event::EstimateComplete => "ESTIMATE_COMPLETE",
            Event::EstimateRejected => "ESTIMATE_REJECTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ResolveFailed | Event::EstimateRejected => Severity::Error,
            Event::ConfigLoaded | Event::CatalogLoaded => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
