//! Command-line arguments and how they fold into the loaded config.

use crate::error::VibewiseError;

use common::ErrorLocation;

use vibewise_core::config::{CONFIG_FILE_NAME, ClientConfig};

use std::panic::Location;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;

pub const APP_DIR_NAME: &str = "vibewise";

pub const DEFAULT_FRAME_FILE: &str = "frame.jpg";

/// Mood-based Spotify playlists from your camera, in a terminal.
#[derive(Parser)]
#[command(name = "vibewise")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding config.json (default: <user config dir>/vibewise)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// VibeWise server address, overrides the config file
    #[arg(long)]
    pub base_url: Option<String>,

    /// Image file served as the camera picture
    #[arg(long, default_value = DEFAULT_FRAME_FILE)]
    pub frame: PathBuf,

    /// Cookie header from a logged-in browser, e.g. "sessionid=...; csrftoken=..."
    #[arg(long)]
    pub session_cookie: Option<String>,

    /// Directory for vibewise.log (default: the config directory)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl Args {
    #[track_caller]
    pub fn resolve_config_dir(&self) -> Result<PathBuf, VibewiseError> {
        if let Some(dir) = &self.config_dir {
            return Ok(dir.clone());
        }

        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| VibewiseError::Vibewise {
                message: String::from("Could not determine the user config directory"),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    pub fn resolve_log_dir(&self, config_dir: &Path) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| config_dir.to_path_buf())
    }

    /// Command-line values win over the file. Overrides are not written back.
    pub fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(base_url) = &self.base_url {
            info!("Server address overridden on the command line");
            config.server.base_url = base_url.clone();
        }

        if let Some(cookie) = &self.session_cookie {
            config.server.session_cookie = Some(cookie.clone());
        }
    }
}

/// Loads `config.json`, writing the defaults first if the file does not exist
/// yet, then applies `args` and validates the result.
pub fn load_config(args: &Args, config_dir: &Path) -> Result<ClientConfig, VibewiseError> {
    let mut config = ClientConfig::load(config_dir)?;

    if !config_dir.join(CONFIG_FILE_NAME).exists() {
        info!("Writing default config to {}", config_dir.display());
        config.save(config_dir)?;
    }

    args.apply_overrides(&mut config);
    config.validate()?;

    Ok(config)
}
