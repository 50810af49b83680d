//! Reminder scheduler worker
//!
//! Long-running dispatcher process: sweeps the reminder store on an
//! interval, delivers due reminders, and advances each to its next
//! occurrence.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use log::info;

use planwise_reminders::core::Config;
use planwise_reminders::database::Database;
use planwise_reminders::features::reminders::{LogNotifier, ReminderScheduler, ReminderService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting reminder scheduler worker...");

    let database = Database::new(&config.database_path).await?;

    let service = ReminderService::new(Arc::new(database));
    let scheduler = ReminderScheduler::new(service, Arc::new(LogNotifier))
        .with_interval(Duration::from_secs(config.sweep_interval_secs));

    tokio::select! {
        _ = scheduler.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping sweep loop");
        }
    }

    Ok(())
}
