use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use dsmig_core::{Config, Method};
use dsmig_engine::{rollback_range, ApplyError, BatchReport, Engine, Repository, RollbackError};
use dsmig_store::HttpStoreClient;

use crate::completion::write_completions_script;
use crate::config_file::{resolve_config, ConfigOverrides};
use crate::render::{current_output_style, print_status, OutputStyle};
use crate::scaffold;

#[derive(Parser, Debug)]
#[command(name = "dsmig")]
#[command(about = "Seed and migrate a document store with ordered, rerunnable operations", long_about = None)]
pub struct Cli {
    #[arg(long, global = true)]
    pub conn: Option<String>,
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true)]
    pub env: Option<String>,
    #[arg(long, global = true)]
    pub username: Option<String>,
    #[arg(long, global = true)]
    pub password: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply every operation in the target directory, skipping any that
    /// have already run
    Run,
    /// Reverse a previously applied operation, or a range of them
    Rollback {
        id: String,
        #[arg(long)]
        from: Option<String>,
    },
    /// Scaffold operation files and the directory layout
    #[command(subcommand)]
    Gen(GenCommands),
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    Version,
}

#[derive(Subcommand, Debug)]
pub enum GenCommands {
    /// Create a timestamped operation descriptor with a rollback stub
    Operation {
        name: String,
        #[arg(short, long, default_value = "get")]
        method: String,
        #[arg(short, long)]
        uri: String,
    },
    /// Create the operations directory and a starter config file
    Dir,
}

pub fn run_cli(cli: Cli) -> Result<()> {
    let style = current_output_style();
    let overrides = ConfigOverrides {
        conn: cli.conn,
        dir: cli.dir,
        config: cli.config,
        env: cli.env,
        username: cli.username,
        password: cli.password,
    };

    match cli.command {
        Commands::Run => run_batch(&overrides, style),
        Commands::Rollback { id, from } => run_rollback(&overrides, &id, from.as_deref(), style),
        Commands::Gen(GenCommands::Operation { name, method, uri }) => {
            let method: Method = method.parse().map_err(|reason: String| anyhow!(reason))?;
            let config = resolve_config(&overrides)?;
            let path = scaffold::generate_operation(&config.target_dir, &name, method, &uri)?;
            print_status(style, "ok", &format!("created {}", path.display()));
            Ok(())
        }
        Commands::Gen(GenCommands::Dir) => {
            let config = resolve_config(&overrides)?;
            for path in scaffold::generate_layout(&config)? {
                print_status(style, "ok", &format!("created {}", path.display()));
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            write_completions_script(shell, &mut std::io::stdout())
        }
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn new_engine(config: &Config) -> Result<Engine<HttpStoreClient, HttpStoreClient>> {
    let client = HttpStoreClient::new(config)?;
    Ok(Engine::new(client.clone(), client))
}

fn run_batch(overrides: &ConfigOverrides, style: OutputStyle) -> Result<()> {
    let config = resolve_config(overrides)?;
    let repository = Repository::new(&config.target_dir);
    let scan = repository.load_all().with_context(|| {
        format!(
            "failed scanning operations directory {}",
            config.target_dir.display()
        )
    })?;
    for (filename, err) in &scan.skipped {
        print_status(style, "warn", &format!("ignored {filename}: {err}"));
    }

    let engine = new_engine(&config)?;
    let report = engine
        .run_all(&scan.operations)
        .context("could not reach the tracking collection")?;

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => print_status(style, "ok", &format!("{} applied", outcome.operation.id)),
            Err(ApplyError::AlreadyApplied(_)) => print_status(
                style,
                "skip",
                &format!("{} already applied", outcome.operation.id),
            ),
            Err(err) => {
                print_status(style, "error", &err.to_string());
                if let ApplyError::Failed {
                    rollback: Some(rollback),
                    ..
                } = err
                {
                    match rollback {
                        RollbackError::NoRollbackSpec(id) => print_status(
                            style,
                            "warn",
                            &format!("{id} defines no rollback to undo the failure"),
                        ),
                        other => print_status(style, "error", &other.to_string()),
                    }
                }
            }
        }
    }

    println!("{}", format_run_summary(&report));
    if report.has_failures() {
        bail!("{} operation(s) failed", report.failures().count());
    }
    Ok(())
}

fn run_rollback(
    overrides: &ConfigOverrides,
    id: &str,
    from: Option<&str>,
    style: OutputStyle,
) -> Result<()> {
    let config = resolve_config(overrides)?;
    let repository = Repository::new(&config.target_dir);
    let engine = new_engine(&config)?;

    let outcomes = rollback_range(&engine, &repository, id, from)?;
    let mut failed = 0_usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => print_status(style, "ok", &format!("rolled back {}", outcome.id)),
            Err(err) if err.is_nothing_to_undo() => print_status(
                style,
                "skip",
                &format!("nothing to roll back for {}", outcome.id),
            ),
            Err(err) => {
                failed += 1;
                print_status(style, "error", &err.to_string());
            }
        }
    }

    if failed > 0 {
        bail!("{failed} rollback(s) failed");
    }
    Ok(())
}

pub(crate) fn format_run_summary(report: &BatchReport) -> String {
    format!(
        "run summary: applied={} skipped={} failed={}",
        report.applied_count(),
        report.skipped_count(),
        report.failures().count()
    )
}
