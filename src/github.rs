//! GitHub release API client
//!
//! Creates release records and uploads assets against any API root,
//! so tests can point `remote.api_root` at a local stub.

use crate::core::error::{ApiError, GantryError, GantryResult};
use serde::{Deserialize, Serialize};
use ureq::Agent;

/// Payload for creating a release record
#[derive(Debug, Serialize)]
pub struct ReleaseRequest {
  pub tag_name: String,
  pub name: String,
  pub body: String,
  pub draft: bool,
  pub prerelease: bool,
}

/// Release record returned by the create call
#[derive(Debug, Deserialize)]
pub struct CreatedRelease {
  /// Hypermedia template for asset uploads, e.g.
  /// `https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}`
  pub upload_url: String,

  /// Browsable release page
  pub html_url: String,
}

/// Asset record returned by the upload call
#[derive(Debug, Deserialize)]
pub struct UploadedAsset {
  pub browser_download_url: String,
}

/// Release record and asset operations
///
/// The workflow talks to this seam so tests can fake the host.
pub trait ReleaseHost {
  fn create_release(&self, request: &ReleaseRequest) -> GantryResult<CreatedRelease>;
  fn upload_asset(&self, upload_url: &str, asset_name: &str, data: &[u8]) -> GantryResult<UploadedAsset>;
}

/// GitHub-compatible release host
pub struct GitHub {
  agent: Agent,
  releases_url: String,
  token: String,
}

impl GitHub {
  pub fn new(releases_url: String, token: String) -> Self {
    // Non-2xx statuses are handled here, not surfaced as transport errors
    let config = Agent::config_builder().http_status_as_error(false).build();

    Self {
      agent: Agent::new_with_config(config),
      releases_url,
      token,
    }
  }

  fn auth(&self) -> String {
    format!("Bearer {}", self.token)
  }
}

impl ReleaseHost for GitHub {
  fn create_release(&self, request: &ReleaseRequest) -> GantryResult<CreatedRelease> {
    let url = self.releases_url.clone();

    let mut response = self
      .agent
      .post(&url)
      .header("Authorization", self.auth())
      .header("Accept", "application/vnd.github+json")
      .send_json(request)
      .map_err(|e| transport_error(&url, e))?;

    if response.status().as_u16() != 201 {
      return Err(status_error(&url, response));
    }

    response.body_mut().read_json::<CreatedRelease>().map_err(|e| transport_error(&url, e))
  }

  fn upload_asset(&self, upload_url: &str, asset_name: &str, data: &[u8]) -> GantryResult<UploadedAsset> {
    let url = asset_upload_url(upload_url, asset_name);

    let mut response = self
      .agent
      .post(&url)
      .header("Authorization", self.auth())
      .header("Accept", "application/vnd.github+json")
      .header("Content-Type", "application/octet-stream")
      .send(data)
      .map_err(|e| transport_error(&url, e))?;

    if response.status().as_u16() != 201 {
      return Err(status_error(&url, response));
    }

    response.body_mut().read_json::<UploadedAsset>().map_err(|e| transport_error(&url, e))
  }
}

/// Expand a hypermedia upload URL template for one asset name
fn asset_upload_url(template: &str, asset_name: &str) -> String {
  let base = template.split('{').next().unwrap_or(template);
  format!("{}?name={}", base, asset_name)
}

fn transport_error(url: &str, error: ureq::Error) -> GantryError {
  GantryError::Api(ApiError::Transport {
    url: url.to_string(),
    reason: error.to_string(),
  })
}

fn status_error(url: &str, mut response: ureq::http::Response<ureq::Body>) -> GantryError {
  let status = response.status().as_u16();
  let body = response.body_mut().read_to_string().unwrap_or_default();

  GantryError::Api(ApiError::Status {
    url: url.to_string(),
    status,
    body,
  })
}
