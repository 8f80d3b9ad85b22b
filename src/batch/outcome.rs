//! Per-item outcomes and the batch tally.

use crate::types::{EmailState, ValidationResult};
use crate::Error;
use std::time::Duration;

/// What happened to one input item.
#[derive(Debug)]
pub enum ItemOutcome {
    Validated(ValidationResult),
    Failed { email: String, error: Error },
    /// Blank line, blank cell, or a row too short to hold an email.
    Skipped,
}

/// Running counts by verdict. Skipped items are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub valid: usize,
    pub invalid: usize,
    pub risky: usize,
    pub unknown: usize,
    pub failed: usize,
}

impl BatchOutcome {
    pub fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Validated(result) => self.record_state(result.category()),
            ItemOutcome::Failed { .. } => self.failed += 1,
            ItemOutcome::Skipped => {}
        }
    }

    pub fn record_state(&mut self, state: EmailState) {
        match state {
            EmailState::Valid => self.valid += 1,
            EmailState::Invalid => self.invalid += 1,
            EmailState::Risky => self.risky += 1,
            EmailState::Unknown => self.unknown += 1,
        }
    }

    pub fn validated(&self) -> usize {
        self.valid + self.invalid + self.risky + self.unknown
    }

    pub fn total(&self) -> usize {
        self.validated() + self.failed
    }
}

/// A failed item, kept for reporting after the run.
#[derive(Debug, Clone)]
pub struct BatchError {
    pub index: usize,
    pub email: String,
    pub message: String,
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item {} ({}): {}", self.index, self.email, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcome: BatchOutcome,
    pub failures: Vec<BatchError>,
    pub skipped: usize,
    pub execution_time: Duration,
    /// Stopped early because the cancellation token fired.
    pub cancelled: bool,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, index: usize, outcome: &ItemOutcome) {
        self.outcome.record(outcome);
        match outcome {
            ItemOutcome::Failed { email, error } => self.failures.push(BatchError {
                index,
                email: email.clone(),
                message: error.to_string(),
            }),
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Validated(_) => {}
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}
