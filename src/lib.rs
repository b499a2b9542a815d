// Public API for integration tests and potential library usage

pub mod api;
pub mod config;
pub mod guard;
pub mod protocol;
pub mod retirement;
pub mod scoring;
pub mod state;
pub mod store;
pub mod types;
pub mod ws;
