pub mod cli;
pub mod console;
pub mod error;
pub mod logger;
pub mod repl;
pub mod still_camera;

#[cfg(test)]
mod tests;
