//! Session wiring for mapstate
//!
//! - **StateBundle**: the four stores plus the completer, built once per
//!   session and shared with every UI component
//! - **StatesConfig**: store options loaded from `mapstate.toml`
//!
//! The bundle also carries the drivers that move data between the completer
//! and the stores without holding a store lock across a completer call.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bundle;
pub mod config;

pub use bundle::StateBundle;
pub use config::{StatesConfig, CONFIG_FILE_NAME};
