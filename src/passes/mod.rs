//! Pass infrastructure for body transformations.
//!
//! This module defines the [`BodyPass`] trait that all scalar passes
//! implement, the configuration read by the orchestrating code, and the
//! [`EventLog`] diagnostics sink passes record into.
//!
//! # Design
//!
//! There are no process-wide option registries or timers: a pass receives an
//! explicit [`PassContext`] carrying the configuration snapshot and the event
//! log. The log is optional in effect - nothing consumes it unless the caller
//! does - and recording never affects the transformation itself.
//!
//! # Thread Safety
//!
//! Contexts are `Send + Sync`; the event log is mutex-guarded so callers may
//! run passes over distinct bodies in parallel with one shared context.
//! Running two passes over the *same* body concurrently is a caller contract
//! violation, not something this layer guards against.

mod dead_assignment;

pub use dead_assignment::DeadAssignmentElimination;

use std::{sync::Mutex, time::Duration};

use crate::{ir::Body, Result};

/// Configuration consumed by the passes in this crate.
///
/// Exactly three options are recognized; there is no dynamic option map.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassConfig {
    /// Restrict elimination to compiler-generated temporaries and null-typed
    /// locals; source-declared locals are then always kept.
    pub only_temporaries: bool,
    /// Record a human-readable progress event per body.
    pub verbose: bool,
    /// Record a timing event per body.
    pub time: bool,
}

impl PassConfig {
    /// Creates the default configuration: unrestricted, quiet, untimed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts elimination to compiler-generated and null-typed targets.
    #[must_use]
    pub const fn with_only_temporaries(mut self, value: bool) -> Self {
        self.only_temporaries = value;
        self
    }

    /// Enables per-body progress events.
    #[must_use]
    pub const fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enables per-body timing events.
    #[must_use]
    pub const fn with_time(mut self, value: bool) -> Self {
        self.time = value;
        self
    }
}

/// What happened during a pass, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A human-readable progress line.
    Progress {
        /// The message.
        message: String,
    },
    /// Statements were removed from the body.
    StatementsRemoved {
        /// How many statements were dropped.
        count: usize,
    },
    /// An assignment was demoted to a bare call.
    InvokeDemoted {
        /// Index of the rewritten statement, in the committed body.
        stmt: usize,
    },
    /// How long the pass took on one body.
    Timing {
        /// Wall-clock duration of the run.
        elapsed: Duration,
    },
}

/// A single diagnostics record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Name of the pass that recorded the event.
    pub pass: &'static str,
    /// Name of the body being processed.
    pub body: String,
    /// What happened.
    pub kind: EventKind,
}

/// Thread-safe log of pass events.
///
/// Recording is best-effort: a poisoned lock drops the record rather than
/// failing the pass, since diagnostics must never affect correctness.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<Event>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn record(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared state passed into a pass invocation.
#[derive(Debug, Default)]
pub struct PassContext {
    config: PassConfig,
    events: EventLog,
}

impl PassContext {
    /// Creates a context with the given configuration.
    #[must_use]
    pub fn new(config: PassConfig) -> Self {
        Self {
            config,
            events: EventLog::new(),
        }
    }

    /// Returns the configuration snapshot.
    #[must_use]
    pub const fn config(&self) -> &PassConfig {
        &self.config
    }

    /// Returns the event log.
    #[must_use]
    pub const fn events(&self) -> &EventLog {
        &self.events
    }
}

/// A transformation over one method body.
///
/// Passes are stateless between invocations: every call analyzes the body it
/// is handed from scratch and commits its edits before returning.
pub trait BodyPass: Send + Sync {
    /// Unique name for diagnostics.
    fn name(&self) -> &'static str;

    /// Runs the pass on one body.
    ///
    /// Returns `true` if the body was changed.
    ///
    /// # Errors
    ///
    /// Returns an error when the body is malformed and cannot be analyzed;
    /// the body is then left unmodified apart from edits committed before the
    /// inconsistency was detected.
    fn run(&self, body: &mut Body, ctx: &PassContext) -> Result<bool>;

    /// Get a description of what this pass does.
    fn description(&self) -> &'static str {
        "No description available"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = PassConfig::new()
            .with_only_temporaries(true)
            .with_verbose(true)
            .with_time(true);
        assert!(config.only_temporaries);
        assert!(config.verbose);
        assert!(config.time);

        let default = PassConfig::default();
        assert!(!default.only_temporaries);
        assert!(!default.verbose);
        assert!(!default.time);
    }

    #[test]
    fn test_event_log_records() {
        let log = EventLog::new();
        assert!(log.is_empty());

        log.record(Event {
            pass: "test",
            body: "m".to_string(),
            kind: EventKind::StatementsRemoved { count: 2 },
        });

        assert_eq!(log.len(), 1);
        let events = log.snapshot();
        assert_eq!(events[0].kind, EventKind::StatementsRemoved { count: 2 });
    }
}
