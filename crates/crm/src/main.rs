//! Copperline CRM daemon.
//!
//! Runs the scheduled jobs (report, cleanup, heartbeat, low-stock restock,
//! order reminders) against the configured store until stopped.
//!
//! # Architecture
//!
//! - `SQLite` store via sqlx, schema applied on startup
//! - Explicit (schedule, job) registry handed to the scheduler
//! - Durable job output in per-job log files, diagnostics via tracing

#![cfg_attr(not(test), forbid(unsafe_code))]

use copperline_crm::config::CrmConfig;
use copperline_crm::db;
use copperline_crm::scheduler::{Scheduler, default_registry};

#[tokio::main]
async fn main() {
    let config = CrmConfig::from_env().expect("Failed to load configuration");

    // Without RUST_LOG, log this crate at info
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "copperline_crm=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    db::init_schema(&pool)
        .await
        .expect("Failed to apply schema");
    tracing::info!(database = %config.database_url, "Store ready");

    let registry = default_registry(&pool, &config);
    tracing::info!(jobs = registry.len(), "Scheduler starting");

    let scheduler = Scheduler::new(registry);
    tokio::select! {
        () = scheduler.run() => {},
        () = shutdown_signal() => {},
    }

    tracing::info!("Scheduler stopped");
}

/// Resolves once the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
