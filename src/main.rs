use std::process::ExitCode;

use clap::Parser;
use forensic_save::configuration::{CliArgs, Config};
use forensic_save::controller::Controller;
use log::{error, info, warn};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config = Config::from_args(&args);

    // RUST_LOG, when set, takes precedence over the configured level.
    let level = config
        .as_ref()
        .map(Config::log_level_filter)
        .unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_target(false)
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Unable to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Configuration loaded");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping the capture...");
            let _ = shutdown_tx.send(true);
        }
    });

    let controller = match Controller::new(config) {
        Ok(controller) => controller.with_shutdown(shutdown_rx),
        Err(e) => {
            error!("Unable to create a controller instance: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tokens = if args.command.is_empty() {
        vec!["help".to_string()]
    } else {
        args.command
    };

    let status = controller.dispatch(&tokens).await;
    info!("Finished with status {:?}", status);
    ExitCode::from(status.exit_code())
}
