//! grouptap - export comments on a group's posts to CSV
//!
//! Walks the group feed and each post's comments through the Graph API
//! and writes one flat row per comment.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod config;
mod export;

use config::{Config, TOKEN_ENV};
use export::ExportArgs;

#[derive(Parser)]
#[command(name = "grouptap")]
#[command(about = "Export comments on a group's posts to CSV")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    export: ExportArgs,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Config file path (default: ./grouptap.toml or ~/.config/grouptap/config.toml)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logging:
    //   TTY:     quiet (warn) unless --debug: the spinner shows activity
    //   non-TTY: info unless --debug: logs are the only progress indicator
    let progress = grouptap_core::ProgressContext::new();
    let multi = progress.is_tty().then(|| progress.multi());
    grouptap_core::init_logging(cli.debug, multi);

    let config = if let Some(path) = &cli.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    let env_token = std::env::var(TOKEN_ENV).ok();
    let outcome = export::run(&cli.export, &config, env_token.as_deref(), &progress)?;
    outcome.report(&mut std::io::stdout(), &mut std::io::stderr())?;
    Ok(ExitCode::from(outcome.exit_code()))
}
