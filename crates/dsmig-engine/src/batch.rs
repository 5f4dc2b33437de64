use dsmig_core::Operation;
use dsmig_store::{StoreError, TargetStore, TrackingStore};

use crate::{ApplyError, Engine};

#[derive(Debug)]
pub struct BatchOutcome {
    pub operation: Operation,
    pub result: Result<(), ApplyError>,
}

impl BatchOutcome {
    pub fn is_skip(&self) -> bool {
        matches!(self.result, Err(ApplyError::AlreadyApplied(_)))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.result, Err(ref err) if !matches!(err, ApplyError::AlreadyApplied(_)))
    }
}

/// Per-operation results of a batch run, in execution order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    pub fn applied_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skip()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Operation, &ApplyError)> {
        self.outcomes.iter().filter_map(|outcome| {
            match &outcome.result {
                Err(err) if !matches!(err, ApplyError::AlreadyApplied(_)) => {
                    Some((&outcome.operation, err))
                }
                _ => None,
            }
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

impl<T: TargetStore, K: TrackingStore> Engine<T, K> {
    /// Runs every operation in the order given. An individual failure is
    /// accumulated and does not stop the batch: rerunning is the expected
    /// remediation, and idempotence makes already-succeeded entries cheap
    /// skips. Only an unreachable tracking collection aborts up front.
    pub fn run_all(&self, operations: &[Operation]) -> Result<BatchReport, StoreError> {
        self.ensure_tracking_collection()?;

        let mut report = BatchReport::default();
        for operation in operations {
            report.outcomes.push(BatchOutcome {
                operation: operation.clone(),
                result: self.apply(operation),
            });
        }
        Ok(report)
    }
}
