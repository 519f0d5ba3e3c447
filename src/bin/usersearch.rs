//! usersearch CLI binary.

use std::io::{self, Write};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;

use usersearch::cli::args::UserSearchArgs;
use usersearch::cli::commands::{run_session, seed_index};
use usersearch::loader::PROGRESS_TARGET;

fn run(args: &UserSearchArgs) -> Result<()> {
    let config = args.to_config().context("Invalid arguments")?;
    let (index, _) = seed_index(&config).context("Failed to seed index")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_session(&index, &config, stdin.lock(), &mut stdout).context("Session aborted")?;

    Ok(())
}

fn main() {
    let args = UserSearchArgs::parse();

    Builder::new()
        .filter_level(args.log_level())
        .filter_module(PROGRESS_TARGET, args.progress_log_level())
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
