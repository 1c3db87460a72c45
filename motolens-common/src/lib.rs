//! # MotoLens Common Library
//!
//! Shared code for MotoLens backend services including:
//! - Error types
//! - TOML configuration loading

pub mod config;
pub mod error;

pub use config::TomlConfig;
pub use error::{Error, Result};
