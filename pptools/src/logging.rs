use log::LevelFilter;
use std::io;
use std::path::Path;

pub const LOG_FILE_NAME: &str = "pokepack.log";
const MAX_LOG_FILE_INDEX: u64 = 2;

pub fn initialize(enable_debug: bool, log_dir: impl AsRef<Path>) -> io::Result<()> {
    let log_level = if enable_debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    rotate(log_dir.as_ref())?;
    let current_log_file_path = log_dir.as_ref().join(LOG_FILE_NAME);
    std::fs::File::create(&current_log_file_path)?;
    simple_logging::log_to_file(&current_log_file_path, log_level)
}

/// Shifts `pokepack.log` to `pokepack.log.0`, `.0` to `.1` and so on, dropping the oldest.
pub fn rotate(log_dir: &Path) -> io::Result<()> {
    let indexed = |idx: u64| log_dir.join(format!("{LOG_FILE_NAME}.{idx}"));

    for idx in (0..MAX_LOG_FILE_INDEX).rev() {
        let log_file_path = indexed(idx);
        if log_file_path.exists() {
            std::fs::rename(&log_file_path, indexed(idx + 1))?;
        }
    }

    let current_log_file_path = log_dir.join(LOG_FILE_NAME);
    if current_log_file_path.exists() {
        std::fs::rename(&current_log_file_path, indexed(0))?;
    }
    Ok(())
}
