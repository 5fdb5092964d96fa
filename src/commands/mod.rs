//! CLI commands for gantry
//!
//! - **release**: run the full release pipeline for one module
//! - **build**: cross-compile one module for a single target
//! - **version**: show the version recorded in module metadata

pub mod build;
pub mod release;
pub mod version;

pub use build::run_build;
pub use release::run_release;
pub use version::run_version;
