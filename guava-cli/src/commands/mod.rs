//! CLI command implementations

pub mod config;
pub mod credit;
pub mod gallery;
pub mod logs;
pub mod session;
pub mod upload;
pub mod wallet;

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use guava_core::{GuavaContext, LogEvent, LoggingService, RestoreOutcome};

use crate::output;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let guava_dir = get_guava_dir().ok()?;
    std::fs::create_dir_all(&guava_dir).ok()?;
    LoggingService::new(&guava_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the guava directory from environment or default
pub fn get_guava_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("GUAVA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".guava"))
        .ok_or_else(|| anyhow!("Could not find home directory (set GUAVA_DIR)"))
}

/// Open the guava context, restoring any persisted session
pub fn get_context() -> Result<GuavaContext> {
    let guava_dir = get_guava_dir()?;
    let ctx = GuavaContext::new(&guava_dir).context("Failed to initialize guava context")?;

    if let RestoreOutcome::Discarded { reason } = &ctx.restore_outcome {
        output::warning(&format!(
            "Saved session was unreadable and has been cleared ({}). Run `gv login`.",
            reason
        ));
    }

    Ok(ctx)
}

/// Drive a future to completion on a single-threaded runtime
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

/// Spinner shown while a simulated round trip is in flight
///
/// Hidden when printing JSON so stdout stays machine readable.
pub fn spinner(message: &str, json: bool) -> ProgressBar {
    if json {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
