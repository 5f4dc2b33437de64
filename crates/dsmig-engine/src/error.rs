use dsmig_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no operation named '{0}'")]
    NotFound(String),

    #[error("could not parse operation '{name}': {reason}")]
    Parse { name: String, reason: String },

    #[error("could not read operations directory '{path}': {reason}")]
    Dir { path: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ApplyError {
    /// Not a true failure: the tracking record already exists, so the
    /// operation is skipped without issuing any request.
    #[error("operation '{0}' has already been applied")]
    AlreadyApplied(String),

    #[error("could not check whether '{id}' was applied: {cause}")]
    Tracking {
        id: String,
        #[source]
        cause: StoreError,
    },

    /// The primary request failed. `rollback` carries the outcome of the
    /// automatic reversal attempt when that also went wrong.
    #[error("operation '{id}' failed: {cause}")]
    Failed {
        id: String,
        #[source]
        cause: StoreError,
        rollback: Option<RollbackError>,
    },

    /// The primary request succeeded but the tracking write did not: the
    /// target store is mutated while still marked not-applied, so the next
    /// run will attempt this operation again.
    #[error("operation '{id}' ran but could not be recorded; rerunning may apply it twice: {cause}")]
    RecordFailed {
        id: String,
        #[source]
        cause: StoreError,
    },
}

#[derive(Debug, Error)]
pub enum RollbackError {
    /// Reported distinctly so callers can present "nothing to undo" rather
    /// than "undo failed".
    #[error("operation '{0}' defines no rollback")]
    NoRollbackSpec(String),

    #[error("rollback of '{id}' failed: {cause}")]
    Failed {
        id: String,
        #[source]
        cause: StoreError,
    },

    /// The compensating request succeeded but the tracking record survived:
    /// the store is reverted while still marked applied. The stale record
    /// must be cleared manually before the operation can run again.
    #[error("rollback of '{id}' succeeded but its tracking record was not removed; clear it manually before rerunning: {cause}")]
    ClearFailed {
        id: String,
        #[source]
        cause: StoreError,
    },
}

#[derive(Debug, Error)]
pub enum SelectorError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Rollback(#[from] RollbackError),
}

impl SelectorError {
    /// A missing rollback spec is informational, not a failure.
    pub fn is_nothing_to_undo(&self) -> bool {
        matches!(self, Self::Rollback(RollbackError::NoRollbackSpec(_)))
    }
}
