//! CLI entry point - the composition root.
//!
//! Settings are loaded before logging starts, since the log location is
//! itself a setting.

use std::io;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;

use madia_cli::{Cli, CliConfig, CliError, Repl, bootstrap, init_tracing, one_shot};

const REPL_BANNER: &str = "MadIA REPL with Autocomplete - Type 'exit' or 'quit' to exit.";

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = CliConfig::from_cli(cli)?;
    let ctx = bootstrap(&config)?;
    let _guard = init_tracing(ctx.log_dir(), ctx.log_prefix(), cli.verbose);

    if let Err(e) = ctx.store().touch_last_run(Utc::now()) {
        tracing::warn!(error = %e, "could not record last run");
    }

    let dispatcher = ctx.dispatcher();

    if cli.is_one_shot() {
        let prefs = &ctx.handlers().prefs;
        return one_shot::run_once(&dispatcher, &cli.command, prefs, &mut io::stdout());
    }

    println!("{REPL_BANNER}");
    tracing::info!(data_root = %config.data_root.display(), "starting REPL");
    Repl::new(dispatcher, ctx.repl_options()).run()?;
    Ok(())
}
