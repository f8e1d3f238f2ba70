mod cli;
mod console;
mod error;
mod logger;
mod repl;
mod still_camera;
