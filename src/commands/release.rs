//! Release command implementation
//!
//! Drives one module release end to end: version gate, build, metadata
//! bump, push, release record, asset upload, publish.

use crate::build::{GradlePublish, ScriptBuild};
use crate::core::config::{self, GantryConfig, Module};
use crate::core::error::{GantryError, GantryResult, ResultExt};
use crate::core::vcs::Git;
use crate::github::GitHub;
use crate::release::{version, ReleaseOutcome, ReleasePlan, ReleaseWorkflow};
use semver::Version;
use std::env;
use std::path::{Path, PathBuf};

/// Run the release command
pub fn run_release(
  module: Module,
  proposed: Version,
  linkable_ref: Option<String>,
  sdk_path: Option<PathBuf>,
  dry_run: bool,
) -> GantryResult<()> {
  let cwd = env::current_dir()?;
  let repo = Git::open(&cwd)?;
  let root = repo.work_tree().to_path_buf();
  let config = GantryConfig::load(&root)?;

  let upstream = resolve_upstream(&root, &config, sdk_path)?;
  let linkable_ref = match linkable_ref {
    Some(reference) => reference,
    None => upstream_head(&upstream)?,
  };

  let plan = ReleasePlan {
    root: &root,
    module,
    module_config: config.module(module),
    remote: &config.remote,
    upstream: &upstream,
    linkable_ref: &linkable_ref,
  };

  if dry_run {
    return print_plan(&plan, &proposed);
  }

  let token = config::release_token()?;

  let builder = ScriptBuild::new(&root, &config.build);
  let host = GitHub::new(config.remote.releases_url(), token);
  let publisher = GradlePublish::new(&root, &config.build);

  let workflow = ReleaseWorkflow {
    plan: &plan,
    builder: &builder,
    vcs: &repo,
    host: &host,
    publisher: &publisher,
  };

  match workflow.run(&proposed)? {
    ReleaseOutcome::Released { tag, html_url, download_url } => {
      println!();
      println!("✅ Released {}", tag);
      println!("   Release: {}", html_url);
      println!("   Asset:   {}", download_url);
      Ok(())
    }
    ReleaseOutcome::NotHigher { current } => {
      print_not_higher(&proposed, &current);
      Ok(())
    }
  }
}

/// Locate the checkout of the upstream repository the build compiles from
///
/// Defaults to a sibling directory of the bindings repository named after
/// the upstream repository.
pub(crate) fn resolve_upstream(
  root: &Path,
  config: &GantryConfig,
  sdk_path: Option<PathBuf>,
) -> GantryResult<PathBuf> {
  let upstream = match sdk_path {
    Some(path) => path,
    None => {
      let name = config.remote.upstream_name();
      match root.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
      }
    }
  };

  if !upstream.is_dir() {
    return Err(GantryError::with_help(
      format!("Upstream checkout not found at {}", upstream.display()),
      "Pass --sdk-path pointing at a checkout of the upstream repository.",
    ));
  }

  upstream
    .canonicalize()
    .with_context(|| format!("Failed to resolve upstream path {}", upstream.display()))
}

/// HEAD of the upstream checkout, the default ref to link releases to
pub(crate) fn upstream_head(upstream: &Path) -> GantryResult<String> {
  Git::open(upstream)?.head_commit()
}

/// A non-advancing version is a clean no-op, not an error
pub(crate) fn print_not_higher(proposed: &Version, current: &Version) {
  println!(
    "⚠️  The provided version ({}) is not higher than the previous version ({}) so bump the version before retrying.",
    proposed, current
  );
}

fn print_plan(plan: &ReleasePlan<'_>, proposed: &Version) -> GantryResult<()> {
  let current = plan.current_version()?;

  println!("🔍 Release plan for {} {}", plan.module, proposed);
  println!();
  println!("  Current:  {}", current);
  println!("  Proposed: {}", proposed);
  println!();
  println!("  Tag:      {}", plan.tag_name(proposed));
  println!("  Commit:   {}", plan.commit_message(proposed));
  println!("  Notes:    {}", plan.release_notes());
  println!("  Artifact: {}", plan.artifact_path().display());
  println!("  Upstream: {} at {}", plan.upstream.display(), plan.linkable_ref);
  println!("  Publish:  {}", plan.module_config.publish_task);
  println!();

  if version::is_higher(proposed, &current) {
    println!("🔍 Dry-run mode (no changes applied)");
  } else {
    print_not_higher(proposed, &current);
  }

  Ok(())
}
