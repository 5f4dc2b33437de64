use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use dsmig_core::{Config, Method};
use serde_json::json;

use crate::config_file::{DEFAULT_CONN, DEFAULT_TARGET_DIR};

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Writes `<timestamp>_<name>.json` into the target directory. The timestamp
/// prefix keeps lexicographic filename order chronological, which is the
/// execution order of `run`.
pub fn generate_operation(
    target_dir: &Path,
    name: &str,
    method: Method,
    uri: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(target_dir).with_context(|| {
        format!(
            "failed creating operations directory {}",
            target_dir.display()
        )
    })?;

    let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let path = target_dir.join(operation_filename(&stamp, name));
    let descriptor = serde_json::to_string_pretty(&starter_descriptor(method, uri))
        .context("failed serializing operation template")?;
    fs::write(&path, descriptor + "\n")
        .with_context(|| format!("failed writing operation file {}", path.display()))?;
    Ok(path)
}

pub fn generate_layout(config: &Config) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();

    fs::create_dir_all(&config.target_dir).with_context(|| {
        format!(
            "failed creating operations directory {}",
            config.target_dir.display()
        )
    })?;
    created.push(config.target_dir.clone());

    let config_path = config
        .target_dir
        .parent()
        .map(|parent| parent.join("config.yml"))
        .unwrap_or_else(|| PathBuf::from("config.yml"));
    if !config_path.exists() {
        fs::write(&config_path, starter_config(&config.env))
            .with_context(|| format!("failed writing config file {}", config_path.display()))?;
        created.push(config_path);
    }

    Ok(created)
}

pub(crate) fn operation_filename(stamp: &str, name: &str) -> String {
    format!("{stamp}_{name}.json")
}

/// The rollback stub reverses the scaffolded method: a DELETE is undone by a
/// POST, a POST or PUT by a DELETE.
pub(crate) fn opposite_method(method: Method) -> Method {
    match method {
        Method::Delete => Method::Post,
        _ => Method::Delete,
    }
}

pub(crate) fn starter_descriptor(method: Method, uri: &str) -> serde_json::Value {
    json!({
        "method": method.as_str(),
        "uri": uri,
        "body": {},
        "rollback": {
            "method": opposite_method(method).as_str(),
            "uri": uri,
            "body": {}
        }
    })
}

pub(crate) fn starter_config(env: &str) -> String {
    format!("{env}:\n  conn: {DEFAULT_CONN}\n  target_dir: {DEFAULT_TARGET_DIR}\n")
}
