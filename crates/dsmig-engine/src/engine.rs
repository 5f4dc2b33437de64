use dsmig_core::Operation;
use dsmig_store::{StoreError, TargetStore, TrackingStore};

use crate::{ApplyError, RollbackError};

/// Applies and reverses operations against injected store clients. Owns the
/// tracking protocol: nothing else writes to the tracking collection.
#[derive(Debug)]
pub struct Engine<T, K> {
    target: T,
    tracking: K,
}

impl<T: TargetStore, K: TrackingStore> Engine<T, K> {
    pub fn new(target: T, tracking: K) -> Self {
        Self { target, tracking }
    }

    pub fn ensure_tracking_collection(&self) -> Result<(), StoreError> {
        self.tracking.ensure_collection()
    }

    /// Applies one operation. Side effects happen in a fixed order:
    /// existence check, then the primary request, then either the tracking
    /// write (success) or an automatic rollback attempt (failure). No step
    /// is retried.
    pub fn apply(&self, operation: &Operation) -> Result<(), ApplyError> {
        let applied = self
            .tracking
            .is_applied(&operation.id)
            .map_err(|cause| ApplyError::Tracking {
                id: operation.id.clone(),
                cause,
            })?;
        if applied {
            return Err(ApplyError::AlreadyApplied(operation.id.clone()));
        }

        match self
            .target
            .execute(operation.method, &operation.uri, &operation.body)
        {
            Ok(()) => self
                .tracking
                .record_applied(&operation.id)
                .map_err(|cause| ApplyError::RecordFailed {
                    id: operation.id.clone(),
                    cause,
                }),
            Err(cause) => Err(ApplyError::Failed {
                id: operation.id.clone(),
                cause,
                rollback: self.compensate(operation).err(),
            }),
        }
    }

    /// Explicitly reverses a previously applied operation: runs the
    /// compensating request and then clears the tracking record so the
    /// operation becomes eligible to run again.
    pub fn rollback(&self, operation: &Operation) -> Result<(), RollbackError> {
        self.compensate(operation)?;
        self.tracking
            .clear_applied(&operation.id)
            .map_err(|cause| RollbackError::ClearFailed {
                id: operation.id.clone(),
                cause,
            })
    }

    /// Issues only the compensating request. The automatic path after a
    /// failed apply stops here: no tracking record was ever written, so
    /// there is nothing to clear.
    fn compensate(&self, operation: &Operation) -> Result<(), RollbackError> {
        let spec = &operation.rollback;
        let Some(method) = spec.method.filter(|_| spec.has_spec()) else {
            return Err(RollbackError::NoRollbackSpec(operation.id.clone()));
        };

        self.target
            .execute(method, &spec.uri, &spec.body)
            .map_err(|cause| RollbackError::Failed {
                id: operation.id.clone(),
                cause,
            })
    }
}
