mod api_client;
mod camera;
mod handle;
mod helpers;
mod orchestrator;
mod session;
