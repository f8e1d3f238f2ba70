mod auth_state;
mod detection;
mod playlist;
mod return_intent;
