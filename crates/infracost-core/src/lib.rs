//! Core types and utilities for infracost-mcp
//!
//! # Modules
//!
//! - `config`: Environment file loading and process-wide settings
//! - `envelope`: The uniform `{success, output?, error?, data?}` result
//! - `error`: Error taxonomy and Result alias
//! - `types`: Typed tool arguments and cloud API request bodies

pub mod config;
pub mod envelope;
pub mod error;
pub mod types;

// Re-exports
pub use config::{InfracostConfig, Settings};
pub use envelope::CommandResult;
pub use error::{Error, ErrorKind, Result};
pub use types::*;
