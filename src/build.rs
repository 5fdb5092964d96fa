//! Build and publish process plumbing
//!
//! Build scripts run through bash with inherited stdio so their progress
//! streams straight to the terminal. A failing child process propagates
//! its own exit code.

use crate::core::config::{BuildConfig, Module};
use crate::core::error::{GantryError, GantryResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Builds module artifacts
///
/// The release workflow talks to this seam so tests can fake the build.
pub trait Builder {
  /// Build every target of a module and assemble its release artifact
  fn build(&self, module: Module, upstream: &Path) -> GantryResult<()>;
}

/// Publishes module artifacts to the staging repository
pub trait Publisher {
  fn publish(&self, task: &str) -> GantryResult<()>;
}

/// Runs the repository build scripts through bash
pub struct ScriptBuild {
  root: PathBuf,
  script: PathBuf,
  target_script: PathBuf,
}

impl ScriptBuild {
  pub fn new(root: &Path, build: &BuildConfig) -> Self {
    Self {
      root: root.to_path_buf(),
      script: root.join(&build.script),
      target_script: root.join(&build.target_script),
    }
  }

  /// Cross-compile the native library for one target triple
  pub fn build_target(&self, module: Module, upstream: &Path, target: &str) -> GantryResult<()> {
    let display = format!("bash {}", self.target_script.display());
    run_streamed(self.target_command(module, upstream, target), &display)
  }

  fn build_command(&self, module: Module, upstream: &Path) -> Command {
    let mut cmd = Command::new("/bin/bash");
    cmd
      .current_dir(&self.root)
      .arg(&self.script)
      .args(["-m", module.as_str()])
      .arg("-p")
      .arg(upstream)
      .arg("-r");
    cmd
  }

  fn target_command(&self, module: Module, upstream: &Path, target: &str) -> Command {
    let mut cmd = Command::new("/bin/bash");
    cmd
      .current_dir(&self.root)
      .arg(&self.target_script)
      .arg("-p")
      .arg(upstream)
      .args(["-m", module.as_str(), "-t", target, "-r"]);
    cmd
  }
}

impl Builder for ScriptBuild {
  fn build(&self, module: Module, upstream: &Path) -> GantryResult<()> {
    let display = format!("bash {}", self.script.display());
    run_streamed(self.build_command(module, upstream), &display)
  }
}

/// Publishes modules through the Gradle wrapper
pub struct GradlePublish {
  root: PathBuf,
  gradle: PathBuf,
}

impl GradlePublish {
  pub fn new(root: &Path, build: &BuildConfig) -> Self {
    Self {
      root: root.to_path_buf(),
      gradle: root.join(&build.gradle),
    }
  }

  fn publish_command(&self, task: &str) -> Command {
    let mut cmd = Command::new(&self.gradle);
    cmd.current_dir(&self.root).arg(task).arg("closeAndReleaseStagingRepository");
    cmd
  }
}

impl Publisher for GradlePublish {
  fn publish(&self, task: &str) -> GantryResult<()> {
    let display = format!("{} {}", self.gradle.display(), task);
    run_streamed(self.publish_command(task), &display)
  }
}

/// Run a child process with inherited stdio, propagating its exit code
fn run_streamed(mut cmd: Command, display: &str) -> GantryResult<()> {
  let status = cmd.status().with_context(|| format!("Failed to execute {}", display))?;

  if !status.success() {
    return Err(GantryError::Process {
      command: display.to_string(),
      code: status.code(),
    });
  }

  Ok(())
}
