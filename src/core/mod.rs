//! Core building blocks for gantry operations
//!
//! - **config**: Gantry configuration (gantry.toml) parsing and validation
//! - **error**: Error types with contextual help messages
//! - **vcs**: Git operations abstraction (system git)

pub mod config;
pub mod error;
pub mod vcs;
