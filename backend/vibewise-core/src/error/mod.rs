pub mod api;
pub mod camera;
pub mod config;
pub mod orchestrator;

pub use api::ApiError;
pub use camera::CameraError;
pub use config::ConfigError;
pub use orchestrator::OrchestratorError;
