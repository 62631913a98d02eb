//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration inspection (path, show)
//! - [`daemon`] - Periodic cache population
//! - [`labs`] - Laboratory and language listing
//! - [`reserve`] - Load URL resolution
//! - [`translations`] - Per-laboratory languages and strings
//! - [`warm`] - One-off cache population

pub mod config;
pub mod daemon;
pub mod labs;
pub mod reserve;
pub mod translations;
pub mod warm;

use tracing::info;

/// Run `stop` once on Ctrl+C.
pub fn on_ctrl_c<F>(stop: F)
where
    F: FnOnce() + Send + 'static,
{
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, shutting down");
            println!();
            println!("Stopping...");
            stop();
        }
    });
}
