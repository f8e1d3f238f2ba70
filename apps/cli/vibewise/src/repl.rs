//! Command loop driving the detection workflow from a terminal.

use crate::console::{ConsoleInput, ConsoleNavigator};
use crate::error::VibewiseError;

use common::{ErrorLocation, RedactedToken};

use vibewise_core::ROOT_PATH;
use vibewise_core::camera::CameraDevice;
use vibewise_core::config::CameraConfig;
use vibewise_core::orchestrator::{
    DetectOutcome, DetectionOrchestrator, OrchestratorHandle, PlaylistOutcome, StartOutcome,
};
use vibewise_core::platform::Navigator;
use vibewise_core::session::{LogoutOutcome, SessionCache};

use std::io::{Write, stdout};
use std::panic::Location;
use std::str::FromStr;
use std::sync::Arc;

use log::{debug, error, info, warn};

pub const PROMPT: &str = "vibewise> ";

pub const HELP_TEXT: &str = "Commands:
  start           turn the camera on (asks to log in if needed)
  detect          capture a frame and analyze the mood
  stop            turn the camera off
  playlist        create a playlist for the detected mood
  login           open the Spotify login page
  cookie <value>  finish login by pasting the session cookie from the browser
  logout          end the Spotify session
  status          show who is logged in
  state           show the workflow state and current page
  help            show this list
  quit            stop the camera and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Detect,
    Stop,
    Playlist,
    Login,
    /// Cookie header copied from the browser after the OAuth callback.
    Cookie(RedactedToken),
    Logout,
    Status,
    State,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = VibewiseError;

    #[track_caller]
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word.to_ascii_lowercase().as_str() {
            "start" => Command::Start,
            "detect" => Command::Detect,
            "stop" => Command::Stop,
            "playlist" => Command::Playlist,
            "login" => Command::Login,
            "cookie" if !rest.is_empty() => Command::Cookie(RedactedToken::new(rest)),
            "logout" => Command::Logout,
            "status" => Command::Status,
            "state" => Command::State,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => {
                return Err(VibewiseError::UnknownCommand {
                    message: format!("'{word}'"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(command)
    }
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// The command already reported through notifications or navigation.
    Silent,
    Quit,
}

pub fn describe_start(outcome: &StartOutcome) -> String {
    match outcome {
        StartOutcome::CameraReady(_) => {
            String::from("Camera is on. Type `detect` to analyze your mood.")
        }
        StartOutcome::Declined => String::from("Login declined. The camera stays off."),
        StartOutcome::Redirecting => String::from("Login required. Type `login` to continue."),
        StartOutcome::Ignored => String::from("Nothing to start right now."),
        StartOutcome::Failed { message } => message.clone(),
    }
}

pub fn describe_detect(outcome: &DetectOutcome) -> String {
    match outcome {
        DetectOutcome::Detected(result) => format!(
            "Mood: {} {} ({}). Type `playlist` for music to match.",
            result.mood_emoji(),
            result.mood_label(),
            result.confidence_display()
        ),
        DetectOutcome::Redirecting => String::from("Session expired. Type `login` to continue."),
        DetectOutcome::Failed { message } => message.clone(),
        DetectOutcome::Ignored => String::from("Start the camera first."),
        DetectOutcome::Discarded => String::from("Detection was cancelled."),
    }
}

pub fn describe_playlist(outcome: &PlaylistOutcome) -> String {
    match outcome {
        PlaylistOutcome::Created(info) => format!(
            "{}\n{}\n{}",
            info.playlist.name,
            info.summary(),
            info.spotify_url
        ),
        PlaylistOutcome::Redirecting => String::from("Session expired. Type `login` to continue."),
        PlaylistOutcome::Failed { message } => message.clone(),
        PlaylistOutcome::Ignored => String::from("Detect a mood first."),
    }
}

/// Terminal session over one page's orchestrator.
///
/// Navigating back to the capture page after a redirect loads a fresh
/// orchestrator, the way a browser reloads the page.
pub struct Repl {
    session: SessionCache,
    navigator: Arc<ConsoleNavigator>,
    camera: Arc<dyn CameraDevice>,
    camera_config: CameraConfig,
    handle: OrchestratorHandle,
}

impl Repl {
    pub fn new(
        session: SessionCache,
        navigator: Arc<ConsoleNavigator>,
        camera: Arc<dyn CameraDevice>,
        camera_config: CameraConfig,
    ) -> Self {
        let handle = spawn_page(&session, &camera, &camera_config);
        Self {
            session,
            navigator,
            camera,
            camera_config,
            handle,
        }
    }

    pub fn handle(&self) -> &OrchestratorHandle {
        &self.handle
    }

    /// Runs the post-login auto-start check for the current page.
    pub async fn resume(&self) -> Result<Reply, VibewiseError> {
        match self.handle.resume_after_login().await? {
            Some(outcome) => Ok(Reply::Text(describe_start(&outcome))),
            None => Ok(Reply::Silent),
        }
    }

    pub async fn execute(&mut self, command: Command) -> Result<Reply, VibewiseError> {
        debug!("Executing {command:?}");

        let reply = match command {
            Command::Start => Reply::Text(describe_start(&self.handle.start().await?)),
            Command::Detect => Reply::Text(describe_detect(&self.handle.detect().await?)),
            Command::Stop => {
                if self.handle.stop().await? {
                    Reply::Silent
                } else {
                    Reply::Text(String::from("The camera is not running."))
                }
            }
            Command::Playlist => {
                Reply::Text(describe_playlist(&self.handle.create_playlist().await?))
            }
            Command::Login => match self.session.begin_login() {
                Ok(_) => Reply::Silent,
                Err(e) => {
                    error!("Could not build login address: {e}");
                    Reply::Text(e.user_message())
                }
            },
            Command::Cookie(cookie_header) => {
                self.session.client().add_cookies(cookie_header.as_str());
                self.return_to_capture_page().await?
            }
            Command::Logout => match self.handle.logout().await? {
                Ok(LogoutOutcome::Cancelled) => Reply::Text(String::from("Still logged in.")),
                Ok(LogoutOutcome::LoggedOut) => Reply::Text(String::from("Logged out.")),
                // Already shown as an error notification.
                Err(_) => Reply::Silent,
            },
            Command::Status => {
                let state = self.session.refresh().await;
                match state.display_name() {
                    Some(name) if state.is_connected() => {
                        Reply::Text(format!("Logged in as {name}."))
                    }
                    _ => Reply::Text(String::from("Not logged in.")),
                }
            }
            Command::State => {
                let state = self.handle.state().await?;
                Reply::Text(format!(
                    "Page: {}\nState: {state}",
                    self.navigator.current_path()
                ))
            }
            Command::Help => Reply::Text(HELP_TEXT.to_string()),
            Command::Quit => {
                self.handle.stop().await?;
                Reply::Quit
            }
        };

        Ok(reply)
    }

    /// Reads commands until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Stops with an error only when input cannot be read or the orchestrator
    /// is gone. Unknown commands are reported and skipped.
    pub async fn run(&mut self, input: &ConsoleInput) -> Result<(), VibewiseError> {
        println!("{HELP_TEXT}");

        loop {
            print!("{PROMPT}");
            if let Err(e) = stdout().flush() {
                warn!("Failed to flush prompt: {e}");
            }

            let Some(line) = input.next_line().await? else {
                info!("Input closed, shutting down");
                self.handle.stop().await?;
                return Ok(());
            };

            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    debug!("{e}");
                    println!("Unknown command. Type `help` for the list.");
                    continue;
                }
            };

            match self.execute(command).await? {
                Reply::Text(text) => println!("{text}"),
                Reply::Silent => {}
                Reply::Quit => return Ok(()),
            }
        }
    }

    async fn return_to_capture_page(&mut self) -> Result<Reply, VibewiseError> {
        self.navigator.set_current(ROOT_PATH);

        if self.handle.state().await?.is_redirecting() {
            info!("Reloading capture page after redirect");
            self.handle = spawn_page(&self.session, &self.camera, &self.camera_config);
        }

        match self.resume().await? {
            Reply::Silent => {
                let state = self.session.refresh().await;
                if state.is_connected() {
                    Ok(Reply::Text(String::from(
                        "Logged in. Type `start` to turn the camera on.",
                    )))
                } else {
                    Ok(Reply::Text(String::from("That cookie did not log you in.")))
                }
            }
            reply => Ok(reply),
        }
    }
}

fn spawn_page(
    session: &SessionCache,
    camera: &Arc<dyn CameraDevice>,
    camera_config: &CameraConfig,
) -> OrchestratorHandle {
    OrchestratorHandle::spawn(DetectionOrchestrator::new(
        session.clone(),
        camera.clone(),
        camera_config,
    ))
}
