pub mod git;

pub use git::Git;

use crate::core::error::GantryResult;

/// Write-side repository operations the release workflow performs
///
/// The workflow talks to this seam instead of a concrete backend.
pub trait Vcs {
  /// Stage all changes, commit with the given message, and push
  /// to the default remote
  fn commit_and_push(&self, message: &str) -> GantryResult<()>;
}
