//! Integration tests for the version command

use crate::helpers::{TestRepo, run_gantry};
use anyhow::Result;

#[test]
fn test_version_prints_recorded_version() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_config(None)?;
  repo.commit("Add gantry config")?;

  let output = run_gantry(&repo.path, &["version", "--module", "sdk"])?;
  assert!(
    output.status.success(),
    "version failed: {}",
    String::from_utf8_lossy(&output.stderr)
  );

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert_eq!(stdout.trim(), "1.2.3");

  Ok(())
}

#[test]
fn test_version_json_output() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_config(None)?;
  repo.commit("Add gantry config")?;

  let output = run_gantry(&repo.path, &["version", "--module", "crypto", "--json"])?;
  assert!(
    output.status.success(),
    "version --json failed: {}",
    String::from_utf8_lossy(&output.stderr)
  );

  let stdout = String::from_utf8_lossy(&output.stdout);
  let json: serde_json::Value = serde_json::from_str(stdout.trim())?;
  assert_eq!(json["module"], "crypto");
  assert_eq!(json["version"], "0.5.0");
  assert!(
    json["metadata"]
      .as_str()
      .is_some_and(|path| path.ends_with("BuildVersionsCrypto.kt")),
    "unexpected metadata path: {}",
    json["metadata"]
  );

  Ok(())
}

#[test]
fn test_version_works_from_a_subdirectory() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_config(None)?;
  repo.commit("Add gantry config")?;

  let subdir = repo.path.join("scripts");
  let output = run_gantry(&subdir, &["version", "--module", "sdk"])?;
  assert!(
    output.status.success(),
    "version from subdirectory failed: {}",
    String::from_utf8_lossy(&output.stderr)
  );

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert_eq!(stdout.trim(), "1.2.3");

  Ok(())
}

#[test]
fn test_version_fails_without_config() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_gantry(&repo.path, &["version", "--module", "sdk"])?;
  assert!(!output.status.success(), "expected missing config to fail");
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(
    stderr.contains("No gantry configuration found"),
    "unexpected stderr: {}",
    stderr
  );

  Ok(())
}

#[test]
fn test_version_fails_outside_a_repository() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = run_gantry(dir.path(), &["version", "--module", "sdk"])?;
  assert!(!output.status.success(), "expected bare directory to fail");
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(
    stderr.contains("Git repository not found"),
    "unexpected stderr: {}",
    stderr
  );

  Ok(())
}
