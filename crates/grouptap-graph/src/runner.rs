//! Export runner: row walk → CSV sink

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use grouptap_core::{CsvSink, ProgressContext, fmt_num};

use crate::api::GraphTransport;
use crate::schema::COLUMNS;
use crate::transform::{ExportQuery, collect_rows};

/// How often the non-TTY path logs a progress line
const LOG_EVERY_ROWS: usize = 10_000;

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub query: ExportQuery,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportStats {
    pub posts: usize,
    pub rows: usize,
    pub output: PathBuf,
}

/// Run one export. Rows are written as they arrive; the first error aborts
/// the run and leaves whatever was already flushed in the output file.
pub fn run_export<C: GraphTransport + ?Sized>(
    client: &C,
    config: &ExportConfig,
    progress: &ProgressContext,
) -> anyhow::Result<ExportStats> {
    let start = Instant::now();
    let group_id = &config.query.posts.group_id;

    let mut rows = collect_rows(client, &config.query)
        .with_context(|| format!("Cannot start export for group {group_id}"))?;
    let mut sink = CsvSink::create(&config.output, &COLUMNS)
        .with_context(|| format!("Cannot create {}", config.output.display()))?;

    log::info!(
        "Exporting comments of group {group_id} to {}",
        config.output.display()
    );
    let line = progress.stage_line("export");

    while let Some(row) = rows.next() {
        let row = row.with_context(|| format!("Export of group {group_id} failed"))?;
        sink.write_row(&row)
            .with_context(|| format!("Cannot write {}", config.output.display()))?;

        let written = sink.row_count();
        line.set_message(format!(
            "{} comments from {} posts",
            fmt_num(written),
            fmt_num(rows.posts_seen())
        ));
        if !progress.is_tty() && written % LOG_EVERY_ROWS == 0 {
            log::info!(
                "{} comments from {} posts so far",
                fmt_num(written),
                fmt_num(rows.posts_seen())
            );
        }
    }

    let written = sink
        .finalize()
        .with_context(|| format!("Cannot flush {}", config.output.display()))?;
    line.finish_and_clear();

    let stats = ExportStats {
        posts: rows.posts_seen(),
        rows: written,
        output: config.output.clone(),
    };
    log::info!(
        "Exported {} comments from {} posts in {:.1}s",
        fmt_num(stats.rows),
        fmt_num(stats.posts),
        start.elapsed().as_secs_f64()
    );
    Ok(stats)
}
