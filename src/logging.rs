//! Logger setup. The TUI draws on stdout, so while it runs log lines go to a
//! file; the plain commands log to stderr.

use std::env;
use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Builder, Target};
use log::LevelFilter;

const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
const LOG_LEVEL_FILTER_DEFAULT: LevelFilter = LevelFilter::Info;

fn parse_log_level_filter(log_level: &str) -> Option<LevelFilter> {
    match log_level.to_lowercase().trim() {
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        "off" => Some(LevelFilter::Off),
        _ => None,
    }
}

fn builder() -> Builder {
    let mut builder = Builder::from_default_env();
    let level = env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|level| parse_log_level_filter(&level))
        .unwrap_or(LOG_LEVEL_FILTER_DEFAULT);
    builder.filter_level(level);
    builder
}

/// Log to stderr. Returns `false` if a logger was already installed, in
/// which case that logger stays in place.
pub fn init_stderr() -> bool {
    installed(builder().target(Target::Stderr).try_init())
}

/// Append log lines to `log_file`, creating its directory if needed.
pub fn init_file(log_file: &Path) -> Result<()> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    installed(builder().target(Target::Pipe(Box::new(file))).try_init());
    Ok(())
}

fn installed(result: Result<(), log::SetLoggerError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            log::debug!("keeping existing logger: {err}");
            false
        }
    }
}
