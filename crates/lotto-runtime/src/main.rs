//! # Lotto Forge
//!
//! Entry point for the prediction service.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry from the environment, named after the command
//! 2. Load and validate `RuntimeConfig`
//! 3. Build the container (storage, notification, pipeline)
//! 4. Run the selected command: serve the API (with the scheduler), or
//!    generate / check / compare once and exit

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lotto_generation::{Combination, RequesterId};
use lotto_runtime::{serve, AppState, Container, RuntimeConfig, WeeklyScheduler};
use lotto_telemetry::{init_telemetry, TelemetryConfig};
use tracing::{error, info};

/// Secure lotto 6/45 prediction service
#[derive(Parser, Debug)]
#[command(name = "lotto-runtime")]
#[command(about = "Generate, check and announce lotto 6/45 combinations")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API and run the weekly scheduler (default)
    Serve,

    /// Generate one batch, print it and exit
    Generate {
        /// Number of combinations
        #[arg(short, long, default_value = "5")]
        count: usize,

        /// Requester recorded with the batch
        #[arg(short, long)]
        requester: Option<String>,

        /// Also send the batch to the configured notification channel
        #[arg(long)]
        notify: bool,
    },

    /// Check six numbers against the pattern rules and past draws
    Check {
        #[arg(num_args = 6, required = true)]
        numbers: Vec<u8>,
    },

    /// Score the predictions made for a recorded draw
    Compare {
        draw_no: u32,

        /// Only predictions made by this requester
        #[arg(short, long)]
        requester: Option<String>,
    },
}

impl Command {
    /// Service name for log lines, so one-shot runs are told apart from the
    /// long-running server.
    fn service_name(&self, base: &str) -> String {
        match self {
            Command::Serve => base.to_string(),
            Command::Generate { .. } => format!("{}-generate", base),
            Command::Check { .. } => format!("{}-check", base),
            Command::Compare { .. } => format!("{}-compare", base),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let command = Cli::parse().command.unwrap_or(Command::Serve);

    let telemetry = TelemetryConfig::from_env();
    let service_name = command.service_name(&telemetry.service_name);
    let _telemetry = init_telemetry(telemetry.with_service_name(service_name))
        .context("Failed to initialize telemetry")?;

    let mut config = RuntimeConfig::from_env().context("Invalid configuration")?;

    match command {
        Command::Serve => run_server(config).await,
        Command::Generate {
            count,
            requester,
            notify,
        } => {
            if !notify {
                config.notification.telegram_bot_token = None;
                config.notification.telegram_chat_id = None;
            }
            let container = Container::build(config).context("Failed to build services")?;
            let outcome = container
                .api
                .generate_predictions(count, requester.map(RequesterId::new))
                .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Command::Check { numbers } => {
            let combination = Combination::try_from(numbers)?;
            let container = Container::build(config).context("Failed to build services")?;
            let report = container.api.check_combination(&combination).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::Compare { draw_no, requester } => {
            let container = Container::build(config).context("Failed to build services")?;
            let comparison = container
                .api
                .compare_draw(draw_no, requester.map(RequesterId::new))
                .await?;
            println!("{}", serde_json::to_string_pretty(&comparison)?);
            Ok(())
        }
    }
}

async fn run_server(config: RuntimeConfig) -> Result<()> {
    let container = Container::build(config).context("Failed to build services")?;
    let config = container.config.clone();
    info!(
        backend = config.storage.backend.as_str(),
        notification = config.notification.is_enabled(),
        scheduler = config.scheduler.enabled,
        "Lotto Forge starting"
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let scheduler_task = if config.scheduler.enabled {
        let scheduler = WeeklyScheduler::new(container.api.clone(), &config.scheduler)?;
        Some(tokio::spawn(scheduler.run(shutdown_rx.clone())))
    } else {
        None
    };

    let mut server = tokio::spawn(serve(
        AppState::from(&container),
        config.api.bind_addr,
        shutdown_rx,
    ));

    let finished_early = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            info!("Shutdown signal received");
            None
        }
        // Bind failure or an unexpected exit ends the process too.
        finished = &mut server => Some(finished),
    };
    let _ = shutdown_tx.send(true);
    let server_result = match finished_early {
        Some(result) => result,
        None => server.await,
    };

    match server_result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "HTTP API stopped with an error"),
        Err(e) => error!(error = %e, "HTTP API task panicked"),
    }
    if let Some(task) = scheduler_task {
        if let Err(e) = task.await {
            error!(error = %e, "Scheduler task panicked");
        }
    }

    info!("Lotto Forge stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(args: &[&str]) -> Command {
        Cli::try_parse_from(args)
            .unwrap()
            .command
            .unwrap_or(Command::Serve)
    }

    #[test]
    fn test_service_name_follows_command() {
        assert_eq!(parsed(&["lotto-runtime"]).service_name("lotto-forge"), "lotto-forge");
        assert_eq!(
            parsed(&["lotto-runtime", "generate", "-c", "3"]).service_name("lotto-forge"),
            "lotto-forge-generate"
        );
        assert_eq!(
            parsed(&["lotto-runtime", "check", "1", "2", "3", "4", "5", "6"]).service_name("lotto"),
            "lotto-check"
        );
        assert_eq!(
            parsed(&["lotto-runtime", "compare", "1121", "-r", "chat-42"]).service_name("lotto"),
            "lotto-compare"
        );
    }
}
