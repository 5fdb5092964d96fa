//! Integration tests for the release command
//!
//! These drive the full pipeline against a bare git remote and a local
//! release API stub, then inspect what each side received.

use crate::helpers::{ReleaseServer, TestRepo, run_gantry, run_gantry_with_token};
use anyhow::Result;

#[test]
fn test_release_end_to_end() -> Result<()> {
  let repo = TestRepo::new()?;
  let server = ReleaseServer::start()?;
  repo.write_config(Some(&server.url))?;
  repo.commit("Add gantry config")?;

  let output = run_gantry_with_token(
    &repo.path,
    &["release", "--module", "sdk", "--version", "1.3.0"],
  )?;
  assert!(
    output.status.success(),
    "release failed\nstdout: {}\nstderr: {}",
    String::from_utf8_lossy(&output.stdout),
    String::from_utf8_lossy(&output.stderr)
  );

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(
    stdout.contains("Released sdk-v1.3.0"),
    "unexpected stdout: {}",
    stdout
  );
  assert!(
    stdout.contains("/releases/tag/sdk-v1.3.0"),
    "expected release link in stdout: {}",
    stdout
  );

  // Metadata was rewritten to the new version
  let metadata = repo.read_file("buildSrc/src/main/kotlin/BuildVersionsSDK.kt")?;
  assert!(metadata.contains("majorVersion = 1"), "metadata: {}", metadata);
  assert!(metadata.contains("minorVersion = 3"), "metadata: {}", metadata);
  assert!(metadata.contains("patchVersion = 0"), "metadata: {}", metadata);

  // The version bump reached the remote
  let head = repo.upstream_head()?;
  assert_eq!(
    repo.remote_head_message()?,
    format!("Bump SDK version to 1.3.0 (app-sdk {})", head)
  );

  // Build script ran with the documented argv contract
  let build_args = repo.read_file("build-args.txt")?;
  assert!(
    build_args.starts_with("build -m sdk -p "),
    "unexpected argv: {}",
    build_args
  );
  assert!(
    build_args.trim_end().ends_with("-r"),
    "unexpected argv: {}",
    build_args
  );

  // Publishing went through gradle, closing the staging repository
  let gradle_args = repo.read_file("gradle-args.txt")?;
  assert_eq!(
    gradle_args.trim(),
    "gradle :sdk:sdk-android:publishToSonatype closeAndReleaseStagingRepository"
  );

  // The API stub saw the release record, then the asset
  let requests = server.finish();
  assert_eq!(requests.len(), 2, "expected create + upload");

  assert_eq!(requests[0].method, "POST");
  assert_eq!(requests[0].path, "/repos/example/app-android/releases");
  let created: serde_json::Value = serde_json::from_slice(&requests[0].body)?;
  assert_eq!(created["tag_name"], "sdk-v1.3.0");
  assert_eq!(created["name"], "sdk-v1.3.0");
  assert_eq!(
    created["body"],
    format!("https://github.com/example/app-sdk/tree/{}", head)
  );
  assert_eq!(created["draft"], false);
  assert_eq!(created["prerelease"], false);

  assert_eq!(requests[1].method, "POST");
  assert_eq!(requests[1].path, "/upload?name=android-sdk.aar");
  assert_eq!(requests[1].body, b"aar-bytes-sdk");

  Ok(())
}

#[test]
fn test_release_crypto_uses_crypto_module_settings() -> Result<()> {
  let repo = TestRepo::new()?;
  let server = ReleaseServer::start()?;
  repo.write_config(Some(&server.url))?;
  repo.commit("Add gantry config")?;

  let output = run_gantry_with_token(
    &repo.path,
    &[
      "release",
      "--module",
      "crypto",
      "--version",
      "0.6.0",
      "--linkable-ref",
      "v2.1.0",
    ],
  )?;
  assert!(
    output.status.success(),
    "release failed\nstdout: {}\nstderr: {}",
    String::from_utf8_lossy(&output.stdout),
    String::from_utf8_lossy(&output.stderr)
  );

  assert_eq!(
    repo.remote_head_message()?,
    "Bump CRYPTO version to 0.6.0 (app-sdk v2.1.0)"
  );

  let gradle_args = repo.read_file("gradle-args.txt")?;
  assert_eq!(
    gradle_args.trim(),
    "gradle :crypto:crypto-android:publishToSonatype closeAndReleaseStagingRepository"
  );

  let requests = server.finish();
  assert_eq!(requests.len(), 2, "expected create + upload");
  let created: serde_json::Value = serde_json::from_slice(&requests[0].body)?;
  assert_eq!(created["tag_name"], "crypto-v0.6.0");
  assert_eq!(created["body"], "https://github.com/example/app-sdk/tree/v2.1.0");
  assert_eq!(requests[1].path, "/upload?name=android-crypto.aar");
  assert_eq!(requests[1].body, b"aar-bytes-crypto");

  Ok(())
}

#[test]
fn test_release_not_higher_is_a_clean_noop() -> Result<()> {
  let repo = TestRepo::new()?;
  let server = ReleaseServer::start()?;
  repo.write_config(Some(&server.url))?;
  repo.commit("Add gantry config")?;

  let output = run_gantry_with_token(
    &repo.path,
    &["release", "--module", "sdk", "--version", "1.2.3"],
  )?;
  assert!(
    output.status.success(),
    "not-higher release should exit cleanly: {}",
    String::from_utf8_lossy(&output.stderr)
  );

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(
    stdout.contains(
      "The provided version (1.2.3) is not higher than the previous version (1.2.3)"
    ),
    "unexpected stdout: {}",
    stdout
  );

  let metadata = repo.read_file("buildSrc/src/main/kotlin/BuildVersionsSDK.kt")?;
  assert!(metadata.contains("patchVersion = 3"), "metadata: {}", metadata);
  assert!(!repo.file_exists("build-args.txt"), "no build should have run");
  assert!(!repo.file_exists("gradle-args.txt"), "no publish should have run");

  assert!(server.finish().is_empty(), "no API calls expected");

  Ok(())
}

#[test]
fn test_release_dry_run_needs_no_token_and_changes_nothing() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_config(None)?;
  repo.commit("Add gantry config")?;

  let output = run_gantry(
    &repo.path,
    &["release", "--module", "sdk", "--version", "1.3.0", "--dry-run"],
  )?;
  assert!(
    output.status.success(),
    "dry run failed: {}",
    String::from_utf8_lossy(&output.stderr)
  );

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(
    stdout.contains("Release plan"),
    "unexpected stdout: {}",
    stdout
  );
  assert!(
    stdout.contains("sdk-v1.3.0"),
    "expected the tag in the plan: {}",
    stdout
  );
  assert!(
    stdout.contains("Dry-run mode (no changes applied)"),
    "unexpected stdout: {}",
    stdout
  );

  let metadata = repo.read_file("buildSrc/src/main/kotlin/BuildVersionsSDK.kt")?;
  assert!(metadata.contains("patchVersion = 3"), "metadata: {}", metadata);
  assert!(!repo.file_exists("build-args.txt"), "no build should have run");

  Ok(())
}

#[test]
fn test_release_requires_a_token() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_config(None)?;
  repo.commit("Add gantry config")?;

  let output = run_gantry(
    &repo.path,
    &["release", "--module", "sdk", "--version", "1.3.0"],
  )?;
  assert!(!output.status.success(), "expected missing token to fail");
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(
    stderr.contains("GITHUB_TOKEN"),
    "unexpected stderr: {}",
    stderr
  );

  Ok(())
}

#[test]
fn test_release_build_failure_propagates_exit_code() -> Result<()> {
  let repo = TestRepo::new()?;
  let server = ReleaseServer::start()?;
  repo.write_config(Some(&server.url))?;
  repo.make_build_script_fail(7)?;
  repo.commit("Add gantry config")?;

  let output = run_gantry_with_token(
    &repo.path,
    &["release", "--module", "sdk", "--version", "1.3.0"],
  )?;
  assert!(!output.status.success(), "expected failing build to fail");
  assert_eq!(output.status.code(), Some(7));

  let metadata = repo.read_file("buildSrc/src/main/kotlin/BuildVersionsSDK.kt")?;
  assert!(
    metadata.contains("patchVersion = 3"),
    "metadata must stay untouched after a failed build: {}",
    metadata
  );
  assert!(server.finish().is_empty(), "no API calls expected");

  Ok(())
}

#[test]
fn test_release_rejected_record_stops_before_publish() -> Result<()> {
  let repo = TestRepo::new()?;
  let server = ReleaseServer::failing(422)?;
  repo.write_config(Some(&server.url))?;
  repo.commit("Add gantry config")?;

  let output = run_gantry_with_token(
    &repo.path,
    &["release", "--module", "sdk", "--version", "1.3.0"],
  )?;
  assert!(!output.status.success(), "expected rejected record to fail");
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("422"), "unexpected stderr: {}", stderr);

  // The version bump lands before the record is created, so it stays
  assert!(
    repo.remote_head_message()?.starts_with("Bump SDK version to 1.3.0"),
    "bump commit should already be pushed"
  );
  assert!(
    !repo.file_exists("gradle-args.txt"),
    "publish must not run after a rejected record"
  );

  let requests = server.finish();
  assert_eq!(requests.len(), 1, "only the create call expected");

  Ok(())
}
