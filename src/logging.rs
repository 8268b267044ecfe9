//! Tracing setup shared by the `sentiment` binaries.
//!
//! Events go to stderr (stdout carries only results) and to one log file per run
//! under the app `logs` directory. Only the newest few run files are kept.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Default level when `RUST_LOG` is not set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Warnings and errors only.
    Quiet,
    #[default]
    Normal,
    /// Includes per-iteration training detail and top features.
    Verbose,
}

impl Verbosity {
    fn default_directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
        }
    }
}

/// How one binary wants its logs written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    /// File name prefix; files are `<prefix>_<timestamp>.log`.
    pub file_prefix: &'static str,
    /// Run files kept for this prefix, including the current one.
    pub max_files: usize,
    pub verbosity: Verbosity,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            file_prefix: "sentiment",
            max_files: 10,
            verbosity: Verbosity::Normal,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("No suitable config directory available for logs")]
    NoLogDir,
    #[error("Failed to prepare log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to prune old logs in {path}: {source}")]
    Prune {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format log file timestamp: {0}")]
    FormatTime(time::error::Format),
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(tracing::subscriber::SetGlobalDefaultError),
}

/// Install the global subscriber and return the path of this run's log file.
///
/// A second call keeps the first subscriber and returns `Ok(None)`.
pub fn init(options: &LoggingOptions) -> Result<Option<PathBuf>, LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(None);
    }

    let log_dir = app_dirs::logs_dir().map_err(|err| match err {
        app_dirs::AppDirError::NoBaseDir => LoggingError::NoLogDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            LoggingError::CreateDir { path, source }
        }
    })?;
    let file_name = log_file_name(options.file_prefix, now_local_or_utc())?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(rolling::never(&log_dir, &file_name));
    prune_run_logs(&log_dir, options.file_prefix, options.max_files)?;

    let console_layer = fmt::layer()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr);
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_timer(file_timer())
        .with_writer(file_writer);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.verbosity.default_directive()));

    let subscriber = Registry::default()
        .with(filter)
        .with(console_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber).map_err(LoggingError::SetGlobal)?;
    let _ = LOG_GUARD.set(guard);

    let path = log_dir.join(file_name);
    tracing::debug!("Writing log file {}", path.display());
    Ok(Some(path))
}

/// Delete the oldest `<prefix>_*.log` files so at most `keep` remain.
///
/// Names embed a sortable timestamp, so name order is age order.
fn prune_run_logs(dir: &Path, prefix: &str, keep: usize) -> Result<(), LoggingError> {
    let prune_error = |source| LoggingError::Prune {
        path: dir.to_path_buf(),
        source,
    };
    let run_prefix = format!("{prefix}_");
    let mut runs: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(prune_error)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&run_prefix) && name.ends_with(".log"))
        })
        .collect();
    runs.sort();
    let excess = runs.len().saturating_sub(keep);
    for path in runs.into_iter().take(excess) {
        fs::remove_file(&path).map_err(prune_error)?;
    }
    Ok(())
}

fn log_file_name(prefix: &str, now: OffsetDateTime) -> Result<String, LoggingError> {
    const NAME_FORMAT: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    let stamp = now.format(NAME_FORMAT).map_err(LoggingError::FormatTime)?;
    Ok(format!("{prefix}_{stamp}.log"))
}

fn file_timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>> {
    const LINE_FORMAT: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, LINE_FORMAT.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
