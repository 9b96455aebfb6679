//! # Railwatch Common Library
//!
//! Shared code for the railwatch crates including:
//! - Error type and result alias
//! - Configuration loading (TOML + environment + CLI resolution)
//! - Session event types and the broadcast EventBus
//! - Time-of-day and placeholder display helpers

pub mod config;
pub mod error;
pub mod events;
pub mod human_time;

pub use error::{Error, Result};
pub use events::{EventBus, SessionEvent, SessionStatus};
