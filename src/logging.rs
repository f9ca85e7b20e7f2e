//! Ambient tracing setup for hosts embedding the plugin.
//!
//! The host owns stdout, so the subscriber writes to a rolling file only.
//! Hosts with their own subscriber skip this entirely and the plugin's
//! `tracing` calls land wherever the host routes them.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "rich_presence.log";

/// Installs a file-backed tracing subscriber. Keep the returned guard alive
/// for the process lifetime or buffered lines are lost.
pub fn init_logging() -> WorkerGuard {
    let log_dir = default_log_dir();

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!(
        "Logging initialized, plugin version {}, log directory: {}",
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );

    // Clean up old log files (keep last 7 days)
    cleanup_old_logs(&log_dir, 7);

    guard
}

fn default_log_dir() -> PathBuf {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rich-presence-plugin")
        .join("logs");

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    log_dir
}

fn cleanup_old_logs(log_dir: &Path, keep_days: u64) {
    let cutoff = SystemTime::now() - Duration::from_secs(keep_days * 24 * 60 * 60);
    remove_logs_older_than(log_dir, cutoff);
}

/// Removes rotated log files modified before `cutoff`. The active file and
/// anything the appender did not write are left alone.
fn remove_logs_older_than(log_dir: &Path, cutoff: SystemTime) {
    let entries = match std::fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to read log directory for cleanup: {}", e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();

        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if name.starts_with(LOG_FILE) => name,
            _ => continue,
        };

        if filename == LOG_FILE {
            continue;
        }

        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => continue,
        };

        if modified < cutoff {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!("Failed to remove old log file {:?}: {}", path, e);
            }
        }
    }
}
