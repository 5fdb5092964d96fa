//! Release workflow
//!
//! One release drives, in order: version gate, artifact build, metadata
//! rewrite, commit and push, release record creation, asset upload, and
//! finally the Gradle publish. Publishing runs last so a failed upload
//! never leaves a published artifact without a matching release record.

use crate::build::{Builder, Publisher};
use crate::core::config::{Module, ModuleConfig, RemoteConfig};
use crate::core::error::{GantryResult, ResultExt};
use crate::core::vcs::Vcs;
use crate::github::{ReleaseHost, ReleaseRequest};
use crate::release::{metadata, version};
use semver::Version;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a release needs to know before any side effect runs
pub struct ReleasePlan<'a> {
  /// Working tree root of the bindings repository
  pub root: &'a Path,
  pub module: Module,
  pub module_config: &'a ModuleConfig,
  pub remote: &'a RemoteConfig,
  /// Local checkout of the upstream repository the bindings wrap
  pub upstream: &'a Path,
  /// Upstream ref recorded in the commit message and release notes
  pub linkable_ref: &'a str,
}

impl ReleasePlan<'_> {
  pub fn metadata_path(&self) -> PathBuf {
    self.root.join(&self.module_config.metadata)
  }

  pub fn artifact_path(&self) -> PathBuf {
    self.root.join(&self.module_config.artifact)
  }

  /// Version currently recorded in the metadata file
  pub fn current_version(&self) -> GantryResult<Version> {
    metadata::read_version(&self.metadata_path())
  }

  /// Tag and release name, e.g. `sdk-v1.3.0`
  pub fn tag_name(&self, version: &Version) -> String {
    format!("{}-v{}", self.module, version)
  }

  pub fn commit_message(&self, version: &Version) -> String {
    format!(
      "Bump {} version to {} ({} {})",
      self.module.label(),
      version,
      self.remote.upstream_name(),
      self.linkable_ref
    )
  }

  /// Release notes link back to the upstream tree this build came from
  pub fn release_notes(&self) -> String {
    self.remote.upstream_tree_url(self.linkable_ref)
  }

  pub fn release_request(&self, version: &Version) -> ReleaseRequest {
    let tag = self.tag_name(version);
    ReleaseRequest {
      tag_name: tag.clone(),
      name: tag,
      body: self.release_notes(),
      draft: false,
      prerelease: false,
    }
  }
}

/// What a workflow run did
#[derive(Debug)]
pub enum ReleaseOutcome {
  Released {
    tag: String,
    html_url: String,
    download_url: String,
  },
  /// The proposed version does not beat the recorded one; nothing ran
  NotHigher { current: Version },
}

/// Runs one release end to end against pluggable backends
pub struct ReleaseWorkflow<'a> {
  pub plan: &'a ReleasePlan<'a>,
  pub builder: &'a dyn Builder,
  pub vcs: &'a dyn Vcs,
  pub host: &'a dyn ReleaseHost,
  pub publisher: &'a dyn Publisher,
}

impl ReleaseWorkflow<'_> {
  pub fn run(&self, proposed: &Version) -> GantryResult<ReleaseOutcome> {
    let current = self.plan.current_version()?;
    if !version::is_higher(proposed, &current) {
      return Ok(ReleaseOutcome::NotHigher { current });
    }

    println!("🔨 Building {} {}...", self.plan.module, proposed);
    self.builder.build(self.plan.module, self.plan.upstream)?;

    let tag = self.plan.tag_name(proposed);
    println!("📦 Releasing {}...", tag);

    println!("   Recording version {} in {}", proposed, self.plan.module_config.metadata.display());
    metadata::write_version(&self.plan.metadata_path(), proposed)?;

    println!("   Pushing version bump...");
    self.vcs.commit_and_push(&self.plan.commit_message(proposed))?;

    println!("   Creating release record...");
    let release = self.host.create_release(&self.plan.release_request(proposed))?;

    let artifact_path = self.plan.artifact_path();
    let artifact = fs::read(&artifact_path)
      .with_context(|| format!("Failed to read build artifact {}", artifact_path.display()))?;

    let asset_name = &self.plan.module_config.asset;
    println!(
      "   Uploading {} ({} bytes, sha256 {:x})",
      asset_name,
      artifact.len(),
      Sha256::digest(&artifact)
    );
    let asset = self.host.upload_asset(&release.upload_url, asset_name, &artifact)?;

    println!("🚀 Publishing {}...", self.plan.module_config.publish_task);
    self.publisher.publish(&self.plan.module_config.publish_task)?;

    Ok(ReleaseOutcome::Released {
      tag,
      html_url: release.html_url,
      download_url: asset.browser_download_url,
    })
  }
}
