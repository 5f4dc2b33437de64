use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dsmig_core::Config;
use serde::Deserialize;

pub const DEFAULT_CONN: &str = "http://localhost:9200";
pub const DEFAULT_TARGET_DIR: &str = "es/operations";
pub const DEFAULT_CONFIG_FILE: &str = "es/config.yml";
pub const DEFAULT_ENV: &str = "dev";

/// Values taken from command-line flags. Flags beat the config file, the
/// config file beats the built-in defaults.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub conn: Option<String>,
    pub dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub env: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct ConfigFileEntry {
    conn: Option<String>,
    target_dir: Option<PathBuf>,
    username: Option<String>,
    password: Option<String>,
}

pub fn resolve_config(overrides: &ConfigOverrides) -> Result<Config> {
    let env = overrides
        .env
        .clone()
        .unwrap_or_else(|| DEFAULT_ENV.to_string());
    let path = overrides
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let entry = read_config_entry(&path, &env)?;

    Ok(Config {
        conn: overrides
            .conn
            .clone()
            .or(entry.conn)
            .unwrap_or_else(|| DEFAULT_CONN.to_string()),
        target_dir: overrides
            .dir
            .clone()
            .or(entry.target_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_DIR)),
        env,
        username: overrides.username.clone().or(entry.username),
        password: overrides.password.clone().or(entry.password),
    })
}

/// A missing config file is not an error; the defaults cover it. An
/// unknown environment key falls back to defaults the same way.
fn read_config_entry(path: &Path, env: &str) -> Result<ConfigFileEntry> {
    if !path.exists() {
        return Ok(ConfigFileEntry::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading config file {}", path.display()))?;
    let file: BTreeMap<String, ConfigFileEntry> = serde_yaml::from_str(&raw)
        .with_context(|| format!("failed parsing config file {}", path.display()))?;
    Ok(file.get(env).cloned().unwrap_or_default())
}
