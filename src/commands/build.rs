//! Build command implementation
//!
//! Cross-compiles one module for a single target against an upstream
//! checkout. Never touches version metadata or remote state.

use crate::build::ScriptBuild;
use crate::commands::release::{print_not_higher, resolve_upstream};
use crate::core::config::{GantryConfig, Module};
use crate::core::error::{GantryError, GantryResult};
use crate::core::vcs::Git;
use crate::release::{metadata, version};
use semver::Version;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Run the build command
pub fn run_build(
  module: Module,
  proposed: Version,
  target: String,
  git_ref: Option<String>,
  sdk_path: Option<PathBuf>,
  skip_clone: bool,
) -> GantryResult<()> {
  let cwd = env::current_dir()?;
  let repo = Git::open(&cwd)?;
  let root = repo.work_tree().to_path_buf();
  let config = GantryConfig::load(&root)?;

  let current = metadata::read_version(&root.join(&config.module(module).metadata))?;
  if !version::is_higher(&proposed, &current) {
    print_not_higher(&proposed, &current);
    println!("Nothing to build.");
    return Ok(());
  }

  let (checkout, _scratch) =
    resolve_build_checkout(&root, &config, git_ref.as_deref(), sdk_path, skip_clone)?;

  println!("🔨 Building {} {} for {}...", module, proposed, target);
  println!("   Upstream: {}", checkout.display());
  ScriptBuild::new(&root, &config.build).build_target(module, &checkout, &target)?;

  println!("✅ Built {} for {}", module, target);
  Ok(())
}

/// Pick or create the upstream checkout to compile from
///
/// Returns the checkout path plus an optional scratch directory guard
/// keeping a temporary clone alive for the duration of the build.
fn resolve_build_checkout(
  root: &Path,
  config: &GantryConfig,
  reference: Option<&str>,
  sdk_path: Option<PathBuf>,
  skip_clone: bool,
) -> GantryResult<(PathBuf, Option<TempDir>)> {
  if skip_clone {
    return match sdk_path {
      Some(path) => Ok((resolve_upstream(root, config, Some(path))?, None)),
      None => Err(GantryError::with_help(
        "--skip-clone requires --sdk-path",
        "Point --sdk-path at an existing checkout of the upstream repository.",
      )),
    };
  }

  match reference {
    Some(reference) => {
      let url = config.remote.upstream_clone_url();
      println!("📦 Cloning {} at {}...", url, reference);

      match sdk_path {
        Some(dest) => {
          let clone = Git::clone_at(&url, reference, &dest)?;
          Ok((clone.work_tree().to_path_buf(), None))
        }
        None => {
          let scratch = TempDir::new()?;
          let dest = scratch.path().join(config.remote.upstream_name());
          let clone = Git::clone_at(&url, reference, &dest)?;
          Ok((clone.work_tree().to_path_buf(), Some(scratch)))
        }
      }
    }
    None => Ok((resolve_upstream(root, config, sdk_path)?, None)),
  }
}
