use anyhow::Result;
use clap::Parser;

mod completion;
mod config_file;
mod dispatch;
mod render;
mod scaffold;

#[cfg(test)]
mod tests;

fn main() -> Result<()> {
    dispatch::run_cli(dispatch::Cli::parse())
}
