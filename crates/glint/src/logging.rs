//! Opt-in debug log. glint runs once per prompt, so nothing is opened
//! unless logging is enabled, and the file is only ever appended to.

#[cfg(debug_assertions)]
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use simplelog::{CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, WriteLogger};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use glint_platform::AppPaths;

pub fn init_logging(debug_enabled: bool, max_log_size: u64) {
    if !debug_enabled {
        set_logging_enabled(false);
        return;
    }

    let Ok(paths) = AppPaths::new() else {
        return;
    };
    let log_path = paths.log_file();

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("glint")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    // stdout carries the prompt itself, so terminal logging goes to stderr.
    #[cfg(debug_assertions)]
    loggers.push(TermLogger::new(
        LevelFilter::Debug,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));

    let file_opened = match open_log_file(&log_path, max_log_size) {
        Ok(file) => {
            loggers.push(WriteLogger::new(LevelFilter::Debug, config, file));
            true
        }
        Err(_) => false,
    };

    if CombinedLogger::init(loggers).is_ok() {
        set_logging_enabled(true);
        if file_opened {
            log::debug!("Logging to {}", log_path.display());
        }
    }
}

fn open_log_file(path: &Path, max_log_size: u64) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    shrink_to_recent(path, max_log_size)?;
    OpenOptions::new().create(true).append(true).open(path)
}

/// Once the log grows past `max_size`, keeps only the newest whole lines
/// that fit in half of it.
fn shrink_to_recent(path: &Path, max_size: u64) -> io::Result<()> {
    let len = match std::fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(error) => return Err(error),
    };
    if len <= max_size {
        return Ok(());
    }

    let contents = std::fs::read(path)?;
    let budget = usize::try_from(max_size / 2).unwrap_or(usize::MAX);
    let cut = contents.len().saturating_sub(budget);
    if cut == 0 {
        return Ok(());
    }

    let from = cut - 1;
    let start = contents[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(contents.len(), |pos| from + pos + 1);
    std::fs::write(path, &contents[start..])
}

pub fn set_logging_enabled(enabled: bool) {
    if enabled {
        log::set_max_level(log::LevelFilter::Debug);
    } else {
        log::set_max_level(log::LevelFilter::Off);
    }
}
