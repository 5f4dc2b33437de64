use dsmig_store::{TargetStore, TrackingStore};

use crate::{canonical_filename, operation_id, Engine, Repository, SelectorError};

#[derive(Debug)]
pub struct RollbackOutcome {
    pub id: String,
    pub result: Result<(), SelectorError>,
}

/// Rolls back previously applied operations. With no `from`, exactly the one
/// operation named by `rollback_id` is reversed. With `from`, every
/// descriptor whose filename falls in the inclusive range
/// `[from, rollback_id]` is reversed in ascending order, each independently:
/// one failure never prevents attempting the rest.
pub fn rollback_range<T: TargetStore, K: TrackingStore>(
    engine: &Engine<T, K>,
    repository: &Repository,
    rollback_id: &str,
    from: Option<&str>,
) -> Result<Vec<RollbackOutcome>, SelectorError> {
    let filenames = match from {
        None => vec![canonical_filename(rollback_id)],
        Some(from) => repository.filenames_in_range(from, rollback_id)?,
    };

    let mut outcomes = Vec::with_capacity(filenames.len());
    for filename in filenames {
        let id = operation_id(&filename).to_string();
        let result = repository
            .load(&filename)
            .map_err(SelectorError::from)
            .and_then(|operation| engine.rollback(&operation).map_err(SelectorError::from));
        outcomes.push(RollbackOutcome { id, result });
    }
    Ok(outcomes)
}
