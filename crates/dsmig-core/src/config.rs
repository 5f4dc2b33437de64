use std::path::PathBuf;

/// Resolved connection settings consumed by the engine and store clients.
/// Resolution (config file, environment selection, flag overrides) happens in
/// the CLI layer; the core only ever sees the final values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub conn: String,
    pub target_dir: PathBuf,
    pub env: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Config {
    pub fn new(conn: impl Into<String>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            conn: conn.into(),
            target_dir: target_dir.into(),
            env: "dev".to_string(),
            username: None,
            password: None,
        }
    }
}
