//! Release pipeline for the bindings modules
//!
//! # Core Invariants
//!
//! 1. **Versions only move forward**
//!    - A release starts by comparing the proposed version against the
//!      one recorded in the module's metadata file
//!    - An equal or lower version stops the run before any side effect
//!
//! 2. **The release record is the anchor**
//!    - Tag, release name, and asset all derive from `{module}-v{version}`
//!    - Release notes link the upstream tree the artifact was built from
//!
//! 3. **Publishing runs last**
//!    - The Maven publish only starts once the version bump is pushed
//!      and the asset sits on the release record
//!
//! # Architecture
//!
//! - **version**: strict MAJOR.MINOR.PATCH parsing and the forward gate
//! - **metadata**: reads and rewrites the Kotlin version constants
//! - **workflow**: drives one release end to end over pluggable backends

pub mod metadata;
pub mod version;
pub mod workflow;

pub use workflow::{ReleaseOutcome, ReleasePlan, ReleaseWorkflow};
