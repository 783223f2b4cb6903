//! Export command - resolve settings, then run one export

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use grouptap_core::ProgressContext;
use grouptap_graph::{ExportConfig, ExportQuery, ExportStats, GraphClient, PostQuery, run_export};

use crate::config::{Config, TOKEN_ENV, resolve_access_token};

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Target group numeric ID
    #[arg(long)]
    pub group_id: String,

    /// Access token (falls back to FB_ACCESS_TOKEN, then the config file)
    #[arg(long)]
    pub access_token: Option<String>,

    /// Destination CSV file path (default: comments.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Earliest post timestamp (ISO8601 or Unix epoch)
    #[arg(long)]
    pub since: Option<String>,

    /// Latest post timestamp (ISO8601 or Unix epoch)
    #[arg(long)]
    pub until: Option<String>,

    /// Cap on number of posts to fetch from the group feed
    #[arg(long)]
    pub max_posts: Option<usize>,

    /// Records per page for posts and comments (1-100)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub page_size: Option<u32>,

    /// Comment sort order passed to the API (chronological, reverse_chronological)
    #[arg(long)]
    pub order: Option<String>,
}

#[derive(Debug)]
pub enum Outcome {
    Exported(ExportStats),
    MissingCredential,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Exported(_) => 0,
            Self::MissingCredential => 1,
        }
    }

    /// Final status line: success to `out`, missing credential to `err`
    pub fn report(&self, out: &mut impl Write, err: &mut impl Write) -> std::io::Result<()> {
        match self {
            Self::Exported(stats) => {
                writeln!(out, "Comments exported to {}", stats.output.display())
            }
            Self::MissingCredential => writeln!(
                err,
                "Error: Provide an access token via --access-token or {TOKEN_ENV}"
            ),
        }
    }
}

/// Build the export from flags and config, then run it.
///
/// The credential is resolved before anything touches the output path.
pub fn run(
    args: &ExportArgs,
    config: &Config,
    env_token: Option<&str>,
    progress: &ProgressContext,
) -> Result<Outcome> {
    let Some(token) = resolve_access_token(
        args.access_token.as_deref(),
        env_token,
        config.graph.access_token.as_deref(),
    ) else {
        log::debug!("No token from --access-token, {TOKEN_ENV} or config");
        return Ok(Outcome::MissingCredential);
    };

    let client = GraphClient::new(&config.graph.client_settings(), token)
        .context("Cannot build Graph API client")?;

    let page_size = args.page_size.unwrap_or(config.export.page_size);
    let posts = PostQuery {
        limit: page_size,
        since: args.since.clone(),
        until: args.until.clone(),
        max_count: args.max_posts,
        ..PostQuery::new(args.group_id.clone())
    };
    let export = ExportConfig {
        query: ExportQuery {
            comment_limit: page_size,
            order: args
                .order
                .clone()
                .unwrap_or_else(|| config.export.comment_order.clone()),
            ..ExportQuery::new(posts)
        },
        output: args
            .output
            .clone()
            .unwrap_or_else(|| config.export.output.clone()),
    };

    let stats = run_export(&client, &export, progress)?;
    Ok(Outcome::Exported(stats))
}
