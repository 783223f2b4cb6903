//! Logging setup: env_logger, routed through indicatif on a TTY

use indicatif::MultiProgress;

/// Padded label for a log level, optionally wrapped in ANSI color.
fn level_label(level: log::Level, color: bool) -> String {
    let label = match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    };
    if !color {
        return label.to_string();
    }
    let ansi = match level {
        log::Level::Error => "\x1b[31m",
        log::Level::Warn => "\x1b[33m",
        log::Level::Info => "\x1b[32m",
        log::Level::Debug => "\x1b[36m",
        log::Level::Trace => "\x1b[35m",
    };
    format!("{ansi}{label}\x1b[0m")
}

/// Default filter when `RUST_LOG` is unset.
///
/// On a TTY the spinner already shows activity, so info is suppressed
/// unless debug output was asked for.
fn default_filter(debug: bool, is_tty: bool) -> &'static str {
    if debug {
        "debug"
    } else if is_tty {
        "warn"
    } else {
        "info"
    }
}

/// Logger that prints through indicatif MultiProgress so lines never tear a spinner.
pub struct IndicatifLogger {
    inner: env_logger::Logger,
    multi: MultiProgress,
}

impl IndicatifLogger {
    pub fn new(inner: env_logger::Logger, multi: MultiProgress) -> Self {
        Self { inner, multi }
    }
}

impl log::Log for IndicatifLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if self.inner.enabled(record.metadata()) {
            let line = format!("[{}] {}", level_label(record.level(), true), record.args());
            self.multi.suspend(|| eprintln!("{line}"));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Initialize logging. Pass the `MultiProgress` when stderr is a TTY.
pub fn init_logging(debug: bool, multi: Option<&MultiProgress>) {
    use std::io::Write;

    let env = env_logger::Env::default().default_filter_or(default_filter(debug, multi.is_some()));

    if let Some(multi) = multi {
        let logger = env_logger::Builder::from_env(env).build();
        let max_level = logger.filter();

        if log::set_boxed_logger(Box::new(IndicatifLogger::new(logger, multi.clone()))).is_ok() {
            log::set_max_level(max_level);
        }
    } else {
        // Non-TTY: plain labels for log aggregation
        let _ = env_logger::Builder::from_env(env)
            .format(|buf, record| {
                writeln!(buf, "[{}] {}", level_label(record.level(), false), record.args())
            })
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_label_has_no_escape_codes() {
        assert_eq!(level_label(log::Level::Warn, false), "WARN ");
        assert!(!level_label(log::Level::Error, false).contains('\x1b'));
    }

    #[test]
    fn colored_label_resets() {
        let label = level_label(log::Level::Info, true);
        assert!(label.starts_with("\x1b[32m"));
        assert!(label.ends_with("\x1b[0m"));
    }

    #[test]
    fn filter_defaults() {
        assert_eq!(default_filter(true, true), "debug");
        assert_eq!(default_filter(false, true), "warn");
        assert_eq!(default_filter(false, false), "info");
    }
}
