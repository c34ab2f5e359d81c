//! Logging bootstrap.
//!
//! Everything logs through the `log` facade; this installs the
//! `flexi_logger` backend writing to stderr. The returned handle must stay
//! alive for the lifetime of the process.

use flexi_logger::{Logger, LoggerHandle};

use crate::error::AppResult;

/// Starts the logger. `filter` is a level (`info`) or a full flexi_logger
/// filter (`info, quill::repositories=debug`).
pub fn init_logging(filter: &str) -> AppResult<LoggerHandle> {
    let handle = Logger::try_with_str(filter)?
        .format(flexi_logger::detailed_format)
        .log_to_stderr()
        .start()?;
    log::info!("Logging initialized at `{}`", filter);
    Ok(handle)
}
