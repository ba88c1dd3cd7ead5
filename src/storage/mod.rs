//! Storage Layer
//!
//! Handles settings persistence in JSON config files.

pub mod config;

pub use config::*;
