mod config;
mod csrf;
mod error;
mod in_flight;
mod intent_slot;
mod oauth;
mod state;
mod wire;
