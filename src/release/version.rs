//! Strict three-part version handling
//!
//! Releases only accept plain `MAJOR.MINOR.PATCH` versions. Pre-release
//! and build metadata have no representation in the Kotlin constants,
//! so they are rejected up front.

use semver::Version;

/// Parse a plain `MAJOR.MINOR.PATCH` version
///
/// Used as a clap value parser, so the error side is a plain String.
pub fn parse_version(value: &str) -> Result<Version, String> {
  let version =
    Version::parse(value).map_err(|e| format!("'{}' is not a valid version: {}", value, e))?;

  if !version.pre.is_empty() || !version.build.is_empty() {
    return Err(format!(
      "'{}' carries pre-release or build metadata; use a plain MAJOR.MINOR.PATCH version",
      value
    ));
  }

  Ok(version)
}

/// Whether a proposed version is strictly higher than the current one
pub fn is_higher(proposed: &Version, current: &Version) -> bool {
  proposed > current
}
