//! Failure reporting.
//!
//! Runners never return handler failures to the caller. Every dropped unit is
//! handed to a [`FailureSink`] instead; the default sink logs it through
//! `tracing`, and [`CollectingSink`] keeps the reports for inspection.

use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use fanout_types::{FailureScope, HandlerError};

/// One dropped unit (or chunk) of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureReport {
    /// Name of the handler that failed.
    pub handler: String,
    pub scope: FailureScope,
    pub error: HandlerError,
    /// Successful sibling results discarded along with the failure.
    pub discarded: usize,
}

/// Receives failure reports from runners.
pub trait FailureSink: Send + Sync {
    fn report(&self, report: FailureReport);
}

impl<F> FailureSink for F
where
    F: Fn(FailureReport) + Send + Sync,
{
    fn report(&self, report: FailureReport) {
        self(report);
    }
}

/// Logs each failure at error level with the serialized error payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn report(&self, report: FailureReport) {
        tracing::error!(
            handler = %report.handler,
            scope = %report.scope,
            discarded = report.discarded,
            payload = %report.error.payload(),
            "Function call failed"
        );
    }
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<FailureReport>>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the reports received so far.
    #[must_use]
    pub fn reports(&self) -> Vec<FailureReport> {
        self.lock().clone()
    }

    /// Drain the reports received so far.
    pub fn take(&self) -> Vec<FailureReport> {
        mem::take(&mut *self.lock())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<FailureReport>> {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FailureSink for CollectingSink {
    fn report(&self, report: FailureReport) {
        self.lock().push(report);
    }
}
