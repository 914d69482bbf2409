//! Gallery Logging & Observability Module
//!
//! Provides structured logging, panic handling, crash reports, and deadlock detection.

mod panic_hook;
mod logging;

pub use panic_hook::init_panic_hook;
pub use logging::{init_logging, cleanup_old_logs, LogGuard};

use std::path::PathBuf;
use directories::ProjectDirs;

/// Get the application log directory
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "ImageGallery", "ImageGallery")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialize all observability features.
///
/// Keep the returned guard alive until exit, or buffered log lines are lost.
pub fn init() -> anyhow::Result<LogGuard> {
    let guard = init_logging()?;
    init_panic_hook();

    #[cfg(debug_assertions)]
    init_deadlock_detector();

    Ok(guard)
}

/// Poll parking_lot for deadlocked threads every 10 seconds (debug builds)
#[cfg(debug_assertions)]
fn init_deadlock_detector() {
    use std::time::Duration;

    let spawned = std::thread::Builder::new()
        .name("deadlock-detector".into())
        .spawn(|| loop {
            std::thread::sleep(Duration::from_secs(10));

            for (cycle, threads) in parking_lot::deadlock::check_deadlock().iter().enumerate() {
                for t in threads {
                    tracing::error!(
                        cycle,
                        thread_id = ?t.thread_id(),
                        "Deadlock detected\n{:?}",
                        t.backtrace()
                    );
                }
            }
        });

    if let Err(e) = spawned {
        tracing::warn!("Failed to start deadlock detector: {}", e);
    }
}
