//! Tracing setup.
//!
//! The filter comes from `BACHES_LOG` (same syntax as `RUST_LOG`). While the
//! TUI owns the terminal, log lines go to `<data dir>/baches.log`; every other
//! command logs to stderr.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::data_dir;

pub const ENV_LOG: &str = "BACHES_LOG";

/// Where log lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

pub fn log_file_path() -> PathBuf {
    data_dir().join("baches.log")
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(target: LogTarget) {
    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter("warn"))
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogTarget::File => {
            let path = log_file_path();
            let file = path
                .parent()
                .map(fs::create_dir_all)
                .transpose()
                .and_then(|_| OpenOptions::new().create(true).append(true).open(&path));
            // Nowhere safe to write while the screen is taken over, so a
            // file that cannot be opened leaves logging off
            if let Ok(file) = file {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter("baches=info"))
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
            }
        }
    }
}
