pub mod api_client;
pub mod camera;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod platform;
pub mod session;

#[cfg(test)]
mod tests;

pub const VIBEWISE_SERVER_HOSTNAME: &str = "127.0.0.1";
pub const VIBEWISE_SERVER_PORT: u16 = 8000;
pub const DEFAULT_SERVER_BASE_URL: &str =
    const_format::concatcp!("http://", VIBEWISE_SERVER_HOSTNAME, ":", VIBEWISE_SERVER_PORT);

/// Site path of the login page.
pub const LOGIN_PATH: &str = "/login/";
/// Site path of the capture page.
pub const ROOT_PATH: &str = "/";
