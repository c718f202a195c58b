mod api;
mod bootstrap;
mod health;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use jobwatch_core::config::{AppConfig, LoadOptions};
use jobwatch_db::{AlertRepository, SqlAlertRepository};
use jobwatch_telegram::{
    wizard_dispatcher, AlertWizard, HttpUpdateTransport, PollRunner, ReconnectPolicy,
};

fn init_logging(config: &AppConfig) {
    use jobwatch_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    health::spawn(
        &app.config.server.bind_address,
        app.config.server.health_check_port,
        app.db_pool.clone(),
    )
    .await?;

    let repository = Arc::new(SqlAlertRepository::new(app.db_pool.clone()));
    api::spawn(
        &app.config.server.bind_address,
        app.config.server.api_port,
        repository.clone() as Arc<dyn AlertRepository>,
    )
    .await?;

    let wizard = Arc::new(AlertWizard::new(
        repository,
        Duration::from_secs(app.config.session.idle_timeout_secs),
    ));
    let dispatcher = wizard_dispatcher(wizard.clone());

    let transport = HttpUpdateTransport::new(
        app.config.telegram.api_base_url.clone(),
        app.config.telegram.bot_token.clone(),
        app.config.telegram.poll_timeout_secs,
    )?;
    let runner = PollRunner::new(Arc::new(transport), dispatcher, ReconnectPolicy::default());

    let sweep_interval = Duration::from_secs(app.config.session.sweep_interval_secs);
    let sweeper = wizard.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = sweeper.sessions().sweep().await;
            if evicted > 0 {
                tracing::debug!(
                    event_name = "system.session.swept",
                    correlation_id = "sweep",
                    evicted,
                    "idle sessions evicted"
                );
            }
        }
    });

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        "jobwatch-server started"
    );

    tokio::select! {
        result = runner.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {}
    }

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        grace_secs = app.config.server.graceful_shutdown_secs,
        "jobwatch-server stopping"
    );

    Ok(())
}
