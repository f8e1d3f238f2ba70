use vibewise::cli::{Args, load_config};
use vibewise::console::{ConsoleConfirmation, ConsoleInput, ConsoleNavigator, ConsoleNotifier};
use vibewise::error::VibewiseError;
use vibewise::logger::initialize as LoggerInitialize;
use vibewise::repl::{Reply, Repl};
use vibewise::still_camera::StillImageCamera;

use common::ErrorLocation;

use vibewise_core::ROOT_PATH;
use vibewise_core::api_client::VibewiseClient;
use vibewise_core::platform::Platform;
use vibewise_core::session::SessionCache;

use std::fs::create_dir_all;
use std::panic::Location;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), VibewiseError> {
    let config_dir = args.resolve_config_dir()?;
    let log_dir = args.resolve_log_dir(&config_dir);

    create_dir_all(&log_dir).map_err(|e| VibewiseError::Vibewise {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir)?;

    info!("VibeWise terminal client starting");
    info!("Log directory: {}", log_dir.display());

    let config = load_config(&args, &config_dir)?;
    info!("Server: {}", config.server.base_url);

    let client = VibewiseClient::new(&config.server)?;

    let input = Arc::new(ConsoleInput::stdin());
    let navigator = Arc::new(ConsoleNavigator::new(ROOT_PATH));
    let platform = Platform::new(
        Arc::new(ConsoleConfirmation::new(input.clone())),
        navigator.clone(),
        Arc::new(ConsoleNotifier),
    );

    let session = SessionCache::new(client, platform, &config);
    let camera = Arc::new(StillImageCamera::new(&args.frame));
    info!("Camera frames come from {}", camera.path().display());

    let mut repl = Repl::new(session, navigator, camera, config.camera.clone());

    if let Reply::Text(text) = repl.resume().await? {
        println!("{text}");
    }

    repl.run(&input).await?;

    info!("VibeWise terminal client stopped");
    Ok(())
}
