//! Turn orchestration: one user-submit-to-response exchange at a time

pub mod config;
pub mod controller;

pub use config::{TurnConfig, FALLBACK_RESPONSE};
pub use controller::{TurnController, TurnEvent};
