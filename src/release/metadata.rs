//! Version metadata stored as Kotlin constants
//!
//! Each module keeps its version in a buildSrc constants file:
//!
//! ```kotlin
//! object BuildVersionsSDK {
//!     const val majorVersion = 1
//!     const val minorVersion = 2
//!     const val patchVersion = 3
//! }
//! ```
//!
//! Reads take the first match per field. Writes update every occurrence
//! of a field and leave the rest of the file byte-identical.

use crate::core::error::{GantryError, GantryResult, ResultExt};
use regex::Regex;
use semver::Version;
use std::fs;
use std::path::Path;

const FIELDS: [&str; 3] = ["majorVersion", "minorVersion", "patchVersion"];

/// Read the stored version from a metadata file
pub fn read_version(path: &Path) -> GantryResult<Version> {
  let content = fs::read_to_string(path)
    .with_context(|| format!("Failed to read version metadata from {}", path.display()))?;

  version_in(&content, path)
}

/// Write a version into a metadata file
pub fn write_version(path: &Path, version: &Version) -> GantryResult<()> {
  let content = fs::read_to_string(path)
    .with_context(|| format!("Failed to read version metadata from {}", path.display()))?;

  let updated = substitute(&content, version, path)?;

  fs::write(path, updated)
    .with_context(|| format!("Failed to write version metadata to {}", path.display()))?;

  Ok(())
}

fn field_pattern(field: &str) -> GantryResult<Regex> {
  Ok(Regex::new(&format!(r"({}\s*=\s*)(\d+)", field))?)
}

fn read_field(content: &str, field: &str) -> GantryResult<Option<u64>> {
  let pattern = field_pattern(field)?;

  Ok(
    pattern
      .captures(content)
      .and_then(|captures| captures.get(2))
      .and_then(|m| m.as_str().parse().ok()),
  )
}

fn version_in(content: &str, path: &Path) -> GantryResult<Version> {
  let mut parts = [0u64; 3];

  for (slot, field) in parts.iter_mut().zip(FIELDS) {
    *slot = read_field(content, field)?.ok_or_else(|| GantryError::Metadata {
      field: field.to_string(),
      path: path.to_path_buf(),
    })?;
  }

  Ok(Version::new(parts[0], parts[1], parts[2]))
}

fn substitute(content: &str, version: &Version, path: &Path) -> GantryResult<String> {
  let values = [version.major, version.minor, version.patch];
  let mut updated = content.to_string();

  for (field, value) in FIELDS.iter().zip(values) {
    let pattern = field_pattern(field)?;

    // Refuse to write a file the read side would not understand
    if !pattern.is_match(&updated) {
      return Err(GantryError::Metadata {
        field: (*field).to_string(),
        path: path.to_path_buf(),
      });
    }

    updated = pattern.replace_all(&updated, format!("${{1}}{}", value).as_str()).into_owned();
  }

  Ok(updated)
}
