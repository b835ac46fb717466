//! # Core Module
//!
//! Configuration for the bot process.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with config module

pub mod config;

pub use config::Config;
