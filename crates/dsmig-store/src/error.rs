use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid connection url '{url}': {reason}")]
    Connection { url: String, reason: String },

    #[error("no response from the target store: {0}")]
    Unavailable(String),

    #[error("target store returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected tracking response: {0}")]
    UnexpectedBody(String),
}
