mod error;
mod http;

use dsmig_core::Method;
use serde_json::{Map, Value};

pub use error::StoreError;
pub use http::{HttpStoreClient, TRACKING_COLLECTION};

/// Issues a user-described request against the target store and validates
/// the response status. Success means a status in [200, 300).
pub trait TargetStore {
    fn execute(&self, method: Method, uri: &str, body: &Map<String, Value>)
        -> Result<(), StoreError>;
}

/// Access to the tracking collection. A record's existence is the sole
/// source of truth for "this operation has been applied"; only the execution
/// engine writes through this trait.
pub trait TrackingStore {
    /// Idempotent: probes for the tracking collection and creates it with
    /// the fixed `inserted_at` date mapping when the probe comes back non-2xx.
    fn ensure_collection(&self) -> Result<(), StoreError>;

    fn is_applied(&self, id: &str) -> Result<bool, StoreError>;

    fn record_applied(&self, id: &str) -> Result<(), StoreError>;

    fn clear_applied(&self, id: &str) -> Result<(), StoreError>;
}
