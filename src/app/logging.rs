//! Usage: Tracing/logging initialization (rolling file logs + best-effort cleanup).

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;

const LOG_FILE_PREFIX: &str = "tjimi-console.log";
const CLEANUP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

static TRACING_GUARD: OnceLock<Mutex<Option<WorkerGuard>>> = OnceLock::new();
static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Installs the global subscriber once per process. Later calls are no-ops.
pub fn init(log_dir: &Path, retention_days: u32) {
    TRACING_INIT.get_or_init(|| {
        if let Err(err) = init_impl(log_dir, retention_days) {
            // Last-resort fallback: stderr logger.
            let _ = tracing_subscriber::fmt()
                .with_env_filter(default_env_filter())
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .try_init();
            eprintln!("tracing init failed: {err}");
        }
    });
}

fn init_impl(log_dir: &Path, retention_days: u32) -> Result<(), String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| format!("failed to create log dir {}: {e}", log_dir.display()))?;
    let env_filter = default_env_filter();

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    TRACING_GUARD
        .get_or_init(|| Mutex::new(None))
        .lock()
        .map_err(|_| "logging guard mutex poisoned".to_string())?
        .replace(guard);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    #[cfg(debug_assertions)]
    let subscriber = subscriber.with(stdout_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("failed to set global tracing subscriber: {e}"))?;

    // Another logger may already own the `log` facade; keep going without it.
    let _ = tracing_log::LogTracer::init();

    tracing::info!(log_dir = %log_dir.display(), retention_days, "tracing initialized");

    spawn_cleanup_task(log_dir.to_path_buf(), retention_days);

    Ok(())
}

fn default_env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        #[cfg(debug_assertions)]
        {
            tracing_subscriber::EnvFilter::new("info,tjimi_console_lib=debug")
        }
        #[cfg(not(debug_assertions))]
        {
            tracing_subscriber::EnvFilter::new("info")
        }
    })
}

/// Cleans up once now; repeats daily only when a tokio runtime is available.
fn spawn_cleanup_task(log_dir: PathBuf, retention_days: u32) {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        cleanup_once(&log_dir, retention_days);
        return;
    };
    handle.spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            // The first tick completes immediately.
            interval.tick().await;
            let log_dir_for_cleanup = log_dir.clone();
            std::mem::drop(tokio::task::spawn_blocking(move || {
                cleanup_once(&log_dir_for_cleanup, retention_days);
            }));
        }
    });
}

fn cleanup_once(log_dir: &Path, retention_days: u32) {
    match cleanup_logs(log_dir, retention_days) {
        Ok(deleted) if deleted > 0 => {
            tracing::info!(retention_days, deleted, "cleaned up old log files");
        }
        Ok(_) => {}
        Err(err) => {
            tracing::warn!(retention_days, "log cleanup failed: {}", err);
        }
    }
}

fn cleanup_logs(log_dir: &Path, retention_days: u32) -> Result<usize, String> {
    let retention_days = retention_days.max(1);
    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(
            u64::from(retention_days).saturating_mul(24 * 60 * 60),
        ))
        .unwrap_or(UNIX_EPOCH);

    let mut deleted = 0usize;
    let entries = std::fs::read_dir(log_dir).map_err(|e| format!("read_dir failed: {e}"))?;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_log = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX));
        if !is_log {
            continue;
        }
        let meta = match entry.metadata() {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(path = %path.display(), "log cleanup: metadata error: {}", err);
                continue;
            }
        };
        if !meta.is_file() || meta.modified().unwrap_or(UNIX_EPOCH) >= cutoff {
            continue;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => deleted = deleted.saturating_add(1),
            Err(err) => {
                tracing::warn!(path = %path.display(), "log cleanup: remove failed: {}", err);
            }
        }
    }

    Ok(deleted)
}
