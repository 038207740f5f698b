// File logger setup. The terminal belongs to the TUI, so logs go to disk.
use crate::context::AppContext;
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::OpenOptions;

/// Installs a `simplelog` file logger at `<data_dir>/atelier.log`.
///
/// Returns `false` when the log file cannot be opened or a logger is already
/// installed; the application runs on without logging in that case.
pub fn init(ctx: &dyn AppContext, level: LevelFilter) -> bool {
    let Some(path) = ctx.get_log_path() else {
        return false;
    };
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open log file {}: {}", path.display(), e);
            return false;
        }
    };

    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();

    WriteLogger::init(level, config, file).is_ok()
}
