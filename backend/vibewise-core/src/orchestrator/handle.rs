//! Actor wrapper around [`DetectionOrchestrator`].
//!
//! # Architecture
//!
//! - Commands are sent via an mpsc channel
//! - A dedicated task owns the orchestrator and processes commands in order
//! - Classification runs in its own task and reports back through the same
//!   channel, tagged with the epoch it started in
//!
//! A `stop` that arrives while a classification is outstanding is therefore
//! handled right away, and the late answer is discarded by epoch.

use crate::error::api::ApiError;
use crate::error::orchestrator::OrchestratorError;
use crate::orchestrator::{
    DetectOutcome, DetectionOrchestrator, DetectionState, PlaylistOutcome, StartOutcome,
};
use crate::session::LogoutOutcome;

use models::DetectionResult;

use log::{debug, info, warn};
use tokio::sync::{mpsc, oneshot};

const COMMAND_CHANNEL_CAPACITY: usize = 32;

enum OrchestratorCommand {
    Start {
        reply: oneshot::Sender<StartOutcome>,
    },
    Detect {
        reply: oneshot::Sender<DetectOutcome>,
    },
    /// Posted by the classification task, never by callers.
    ClassificationDone {
        epoch: u64,
        result: Result<DetectionResult, ApiError>,
        reply: oneshot::Sender<DetectOutcome>,
    },
    Stop {
        reply: oneshot::Sender<bool>,
    },
    CreatePlaylist {
        reply: oneshot::Sender<PlaylistOutcome>,
    },
    ResumeAfterLogin {
        reply: oneshot::Sender<Option<StartOutcome>>,
    },
    Logout {
        reply: oneshot::Sender<Result<LogoutOutcome, ApiError>>,
    },
    State {
        reply: oneshot::Sender<DetectionState>,
    },
}

/// Cloneable handle to a running orchestrator actor.
///
/// The actor stops once every handle is dropped.
#[derive(Clone)]
pub struct OrchestratorHandle {
    command_tx: mpsc::Sender<OrchestratorCommand>,
}

impl OrchestratorHandle {
    /// Spawns the actor task. Must be called from within a tokio runtime.
    pub fn spawn(orchestrator: DetectionOrchestrator) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let self_tx = command_tx.downgrade();

        tokio::spawn(orchestrator_actor(orchestrator, command_rx, self_tx));
        info!("Orchestrator actor spawned");

        Self { command_tx }
    }

    pub async fn start(&self) -> Result<StartOutcome, OrchestratorError> {
        self.request(|reply| OrchestratorCommand::Start { reply })
            .await
    }

    /// Resolves once the classification finished, failed, or was discarded.
    pub async fn detect(&self) -> Result<DetectOutcome, OrchestratorError> {
        self.request(|reply| OrchestratorCommand::Detect { reply })
            .await
    }

    pub async fn stop(&self) -> Result<bool, OrchestratorError> {
        self.request(|reply| OrchestratorCommand::Stop { reply })
            .await
    }

    pub async fn create_playlist(&self) -> Result<PlaylistOutcome, OrchestratorError> {
        self.request(|reply| OrchestratorCommand::CreatePlaylist { reply })
            .await
    }

    pub async fn resume_after_login(&self) -> Result<Option<StartOutcome>, OrchestratorError> {
        self.request(|reply| OrchestratorCommand::ResumeAfterLogin { reply })
            .await
    }

    pub async fn logout(&self) -> Result<Result<LogoutOutcome, ApiError>, OrchestratorError> {
        self.request(|reply| OrchestratorCommand::Logout { reply })
            .await
    }

    pub async fn state(&self) -> Result<DetectionState, OrchestratorError> {
        self.request(|reply| OrchestratorCommand::State { reply })
            .await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> OrchestratorCommand,
    ) -> Result<T, OrchestratorError> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|e| OrchestratorError::actor_stopped(format!("Orchestrator actor died: {e}")))?;

        reply_rx.await.map_err(|e| {
            OrchestratorError::actor_stopped(format!("Orchestrator dropped the reply: {e}"))
        })
    }
}

/// Owns the orchestrator and processes commands sequentially until every
/// [`OrchestratorHandle`] is gone.
async fn orchestrator_actor(
    mut orchestrator: DetectionOrchestrator,
    mut command_rx: mpsc::Receiver<OrchestratorCommand>,
    self_tx: mpsc::WeakSender<OrchestratorCommand>,
) {
    info!("Orchestrator actor started");

    while let Some(command) = command_rx.recv().await {
        match command {
            OrchestratorCommand::Start { reply } => {
                let _ = reply.send(orchestrator.start().await);
            }
            OrchestratorCommand::Detect { reply } => match orchestrator.begin_detect().await {
                Ok(pending) => {
                    let client = orchestrator.session().client().clone();
                    let done_tx = self_tx.clone();

                    tokio::spawn(async move {
                        let epoch = pending.epoch;
                        let result = client.detect_mood(pending.frame).await;

                        match done_tx.upgrade() {
                            Some(tx) => {
                                let done = OrchestratorCommand::ClassificationDone {
                                    epoch,
                                    result,
                                    reply,
                                };
                                if tx.send(done).await.is_err() {
                                    warn!("Orchestrator stopped before classification finished");
                                }
                            }
                            None => {
                                warn!("Orchestrator gone, dropping classification result");
                            }
                        }
                    });
                }
                Err(outcome) => {
                    let _ = reply.send(outcome);
                }
            },
            OrchestratorCommand::ClassificationDone {
                epoch,
                result,
                reply,
            } => {
                let _ = reply.send(orchestrator.complete_detect(epoch, result).await);
            }
            OrchestratorCommand::Stop { reply } => {
                let _ = reply.send(orchestrator.stop());
            }
            OrchestratorCommand::CreatePlaylist { reply } => {
                let _ = reply.send(orchestrator.create_playlist().await);
            }
            OrchestratorCommand::ResumeAfterLogin { reply } => {
                let _ = reply.send(orchestrator.resume_after_login().await);
            }
            OrchestratorCommand::Logout { reply } => {
                let _ = reply.send(orchestrator.logout().await);
            }
            OrchestratorCommand::State { reply } => {
                let _ = reply.send(orchestrator.state().clone());
            }
        }
    }

    debug!("Orchestrator actor stopped, releasing camera");
    orchestrator.stop();
}
