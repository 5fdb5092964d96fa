//! System git backend - zero crate dependencies
//!
//! Uses the git binary for all operations with an isolated environment
//! so user configuration cannot change command behavior.

use super::Vcs;
use crate::core::error::{GantryError, GantryResult, GitError, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git repository handle backed by system git
#[derive(Debug)]
pub struct Git {
  /// Working tree root
  work_tree: PathBuf,
}

impl Git {
  /// Open the repository containing `path`
  ///
  /// One subprocess call resolves the working tree root, so commands
  /// work the same from any subdirectory.
  pub fn open(path: &Path) -> GantryResult<Self> {
    let output = Self::isolated()
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(GantryError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(GantryError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);

    Ok(Self {
      work_tree: PathBuf::from(stdout.trim()),
    })
  }

  /// Clone a repository and check out a specific ref
  pub fn clone_at(url: &str, reference: &str, dest: &Path) -> GantryResult<Self> {
    let output = Self::isolated()
      .arg("clone")
      .arg(url)
      .arg(dest)
      .output()
      .context("Failed to execute git clone")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(GantryError::Git(GitError::CommandFailed {
        command: format!("git clone {}", url),
        code: output.status.code(),
        stderr: stderr.to_string(),
      }));
    }

    let repo = Self::open(dest)?;
    repo.checkout(reference)?;
    Ok(repo)
  }

  /// Working tree root
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Check out a branch, tag, or commit
  pub fn checkout(&self, reference: &str) -> GantryResult<()> {
    self.run(&["checkout", reference])?;
    Ok(())
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> GantryResult<String> {
    self.run(&["rev-parse", "HEAD"])
  }

  /// Run a git subcommand against the working tree, returning trimmed stdout
  fn run(&self, args: &[&str]) -> GantryResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(GantryError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        code: output.status.code(),
        stderr: stderr.to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Create a safe git command against the working tree
  fn git_cmd(&self) -> Command {
    let mut cmd = Self::isolated();
    cmd.arg("-C").arg(&self.work_tree);
    cmd
  }

  /// Base git command with isolated environment
  ///
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  fn isolated() -> Command {
    let mut cmd = Command::new("git");

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");

    cmd
  }
}

impl Vcs for Git {
  fn commit_and_push(&self, message: &str) -> GantryResult<()> {
    self.run(&["add", "."])?;
    self.run(&["commit", "-m", message])?;

    let output = self.git_cmd().args(["push"]).output().context("Failed to execute git push")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(GantryError::Git(GitError::PushFailed {
        code: output.status.code(),
        stderr: stderr.to_string(),
      }));
    }

    Ok(())
  }
}
