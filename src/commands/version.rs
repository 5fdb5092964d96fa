//! Version command implementation

use crate::core::config::{GantryConfig, Module};
use crate::core::error::GantryResult;
use crate::core::vcs::Git;
use crate::release::metadata;
use std::env;

/// Run the version command
pub fn run_version(module: Module, json: bool) -> GantryResult<()> {
  let cwd = env::current_dir()?;
  let repo = Git::open(&cwd)?;
  let root = repo.work_tree().to_path_buf();
  let config = GantryConfig::load(&root)?;

  let metadata_path = &config.module(module).metadata;
  let version = metadata::read_version(&root.join(metadata_path))?;

  if json {
    let payload = serde_json::json!({
      "module": module.as_str(),
      "version": version.to_string(),
      "metadata": metadata_path,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
  } else {
    println!("{}", version);
  }

  Ok(())
}
