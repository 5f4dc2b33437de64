use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use dsmig_core::{Method, Operation};
use dsmig_engine::{ApplyError, BatchOutcome, BatchReport};
use dsmig_store::StoreError;

use crate::config_file::{resolve_config, ConfigOverrides, DEFAULT_CONN, DEFAULT_TARGET_DIR};
use crate::dispatch::{format_run_summary, Cli, Commands};
use crate::render::{render_status_line, OutputStyle};
use crate::scaffold::{
    operation_filename, opposite_method, starter_config, starter_descriptor,
};

fn test_dir() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("dsmig-cli-test-{nanos}"));
    fs::create_dir_all(&dir).expect("must create dirs");
    dir
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn global_flags_parse_after_the_subcommand() {
    let cli = Cli::try_parse_from([
        "dsmig",
        "run",
        "--conn",
        "http://search.internal:9200",
        "--env",
        "prod",
    ])
    .expect("must parse");

    assert!(matches!(cli.command, Commands::Run));
    assert_eq!(cli.conn.as_deref(), Some("http://search.internal:9200"));
    assert_eq!(cli.env.as_deref(), Some("prod"));
}

#[test]
fn rollback_takes_an_id_and_optional_from() {
    let cli = Cli::try_parse_from(["dsmig", "rollback", "20200102_b", "--from", "20200101_a"])
        .expect("must parse");
    match cli.command {
        Commands::Rollback { id, from } => {
            assert_eq!(id, "20200102_b");
            assert_eq!(from.as_deref(), Some("20200101_a"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn render_status_line_plain_is_unadorned() {
    assert_eq!(
        render_status_line(OutputStyle::Plain, "ok", "20200101_a applied"),
        "20200101_a applied"
    );
}

#[test]
fn render_status_line_rich_includes_ascii_badge() {
    assert_eq!(
        render_status_line(OutputStyle::Rich, "ok", "20200101_a applied"),
        "[OK] 20200101_a applied"
    );
    assert_eq!(
        render_status_line(OutputStyle::Rich, "skip", "20200101_a already applied"),
        "[..] 20200101_a already applied"
    );
    assert_eq!(
        render_status_line(OutputStyle::Rich, "error", "operation failed"),
        "[ERR] operation failed"
    );
}

#[test]
fn resolve_config_falls_back_to_defaults() {
    let overrides = ConfigOverrides {
        config: Some(test_dir().join("absent.yml")),
        ..ConfigOverrides::default()
    };
    let config = resolve_config(&overrides).expect("must resolve");

    assert_eq!(config.conn, DEFAULT_CONN);
    assert_eq!(config.target_dir, PathBuf::from(DEFAULT_TARGET_DIR));
    assert_eq!(config.env, "dev");
    assert!(config.username.is_none());
}

#[test]
fn resolve_config_selects_the_environment_block() {
    let dir = test_dir();
    let path = dir.join("config.yml");
    fs::write(
        &path,
        "dev:\n  conn: http://localhost:9200\nprod:\n  conn: http://search.internal:9200\n  target_dir: /srv/es/operations\n  username: elastic\n",
    )
    .expect("must write config");

    let overrides = ConfigOverrides {
        config: Some(path),
        env: Some("prod".to_string()),
        ..ConfigOverrides::default()
    };
    let config = resolve_config(&overrides).expect("must resolve");

    assert_eq!(config.conn, "http://search.internal:9200");
    assert_eq!(config.target_dir, PathBuf::from("/srv/es/operations"));
    assert_eq!(config.username.as_deref(), Some("elastic"));
}

#[test]
fn flags_override_the_config_file() {
    let dir = test_dir();
    let path = dir.join("config.yml");
    fs::write(&path, "dev:\n  conn: http://from-file:9200\n").expect("must write config");

    let overrides = ConfigOverrides {
        config: Some(path),
        conn: Some("http://from-flag:9200".to_string()),
        ..ConfigOverrides::default()
    };
    let config = resolve_config(&overrides).expect("must resolve");
    assert_eq!(config.conn, "http://from-flag:9200");
}

#[test]
fn resolve_config_rejects_malformed_yaml() {
    let dir = test_dir();
    let path = dir.join("config.yml");
    fs::write(&path, "dev: [not, a, mapping").expect("must write config");

    let overrides = ConfigOverrides {
        config: Some(path),
        ..ConfigOverrides::default()
    };
    assert!(resolve_config(&overrides).is_err());
}

#[test]
fn opposite_method_pairs_create_with_delete() {
    assert_eq!(opposite_method(Method::Post), Method::Delete);
    assert_eq!(opposite_method(Method::Put), Method::Delete);
    assert_eq!(opposite_method(Method::Delete), Method::Post);
    assert_eq!(opposite_method(Method::Get), Method::Delete);
}

#[test]
fn starter_descriptor_is_a_valid_operation() {
    let raw = serde_json::to_string(&starter_descriptor(Method::Put, "users")).expect("json");
    let operation = Operation::from_descriptor("scaffolded", &raw).expect("must parse");

    assert_eq!(operation.method, Method::Put);
    assert_eq!(operation.uri, "users");
    assert_eq!(operation.rollback.method, Some(Method::Delete));
    assert!(operation.rollback.has_spec());
}

#[test]
fn operation_filename_embeds_the_timestamp_prefix() {
    assert_eq!(
        operation_filename("20200101120000", "add_users"),
        "20200101120000_add_users.json"
    );
}

#[test]
fn starter_config_parses_back_through_resolution() {
    let dir = test_dir();
    let path = dir.join("config.yml");
    fs::write(&path, starter_config("dev")).expect("must write config");

    let overrides = ConfigOverrides {
        config: Some(path),
        ..ConfigOverrides::default()
    };
    let config = resolve_config(&overrides).expect("must resolve");
    assert_eq!(config.conn, DEFAULT_CONN);
    assert_eq!(config.target_dir, PathBuf::from(DEFAULT_TARGET_DIR));
}

#[test]
fn run_summary_counts_each_outcome_kind() {
    let operation = |id: &str| Operation {
        id: id.to_string(),
        method: Method::Get,
        uri: "users".to_string(),
        body: serde_json::Map::new(),
        rollback: Default::default(),
    };

    let report = BatchReport {
        outcomes: vec![
            BatchOutcome {
                operation: operation("a"),
                result: Ok(()),
            },
            BatchOutcome {
                operation: operation("b"),
                result: Err(ApplyError::AlreadyApplied("b".to_string())),
            },
            BatchOutcome {
                operation: operation("c"),
                result: Err(ApplyError::Failed {
                    id: "c".to_string(),
                    cause: StoreError::Status {
                        status: 400,
                        body: "bad request".to_string(),
                    },
                    rollback: None,
                }),
            },
        ],
    };

    assert_eq!(
        format_run_summary(&report),
        "run summary: applied=1 skipped=1 failed=1"
    );
}
