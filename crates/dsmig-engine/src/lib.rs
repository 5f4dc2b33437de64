mod batch;
mod engine;
mod error;
mod repository;
mod selector;

pub use batch::{BatchOutcome, BatchReport};
pub use engine::Engine;
pub use error::{ApplyError, LoadError, RollbackError, SelectorError};
pub use repository::{canonical_filename, operation_id, DirectoryScan, Repository, OPERATION_EXT};
pub use selector::{rollback_range, RollbackOutcome};
