use anyhow::{Context, Result};
use log::info;
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Environment variable holding the log filter, e.g. `debug` or `dragnotes_core=debug`
pub const LOG_ENV: &str = "DRAGNOTES_LOG";

/// Send log records to `log_file`. The terminal belongs to the UI, so
/// nothing is written to stderr.
pub fn init_logging(log_file: &Path) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "info"))
        .format_timestamp_millis()
        .format_module_path(true)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("Logger already initialized")?;

    info!("Logger initialized");
    Ok(())
}
