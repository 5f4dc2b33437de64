use std::io::Write;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;

use crate::dispatch::Cli;

pub fn write_completions_script<W: Write>(shell: Shell, writer: &mut W) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "dsmig", writer);
    Ok(())
}
