//! # Poprako Common Library
//!
//! Shared code for the Poprako interchange tooling:
//! - Error type and result alias
//! - TOML bootstrap configuration and root folder resolution
//! - SQLite pool initialisation, schema creation and migrations
//! - Database row models for comics, pages and units
//! - Id generation

pub mod config;
pub mod db;
pub mod error;
pub mod uuid_utils;

pub use error::{Error, Result};
