use crate::core::error::{ConfigError, GantryError, GantryResult, ResultExt};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Releasable modules of the bindings repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Module {
  Sdk,
  Crypto,
}

impl Module {
  /// Lowercase identifier used in tags, asset paths, and build script args
  pub fn as_str(self) -> &'static str {
    match self {
      Module::Sdk => "sdk",
      Module::Crypto => "crypto",
    }
  }

  /// Uppercase label used in commit messages
  pub fn label(self) -> &'static str {
    match self {
      Module::Sdk => "SDK",
      Module::Crypto => "CRYPTO",
    }
  }
}

impl fmt::Display for Module {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Configuration for gantry
/// Searched in order: gantry.toml, .gantry.toml, .config/gantry.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GantryConfig {
  pub remote: RemoteConfig,
  #[serde(default)]
  pub build: BuildConfig,
  #[serde(default)]
  pub modules: ModulesConfig,
}

/// Repositories the release pipeline talks to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
  /// Bindings repository in owner/name form (release records land here)
  pub repo: String,

  /// Upstream source repository in owner/name form (linked from release notes)
  pub upstream: String,

  /// Base URL of the release API
  #[serde(default = "default_api_root")]
  pub api_root: String,
}

fn default_api_root() -> String {
  "https://api.github.com".to_string()
}

impl RemoteConfig {
  /// Repository half of the upstream slug
  pub fn upstream_name(&self) -> &str {
    self.upstream.rsplit('/').next().unwrap_or(&self.upstream)
  }

  /// HTTPS clone URL for the upstream repository
  pub fn upstream_clone_url(&self) -> String {
    format!("https://github.com/{}.git", self.upstream)
  }

  /// Browsable URL of the upstream tree at a ref, used as release notes
  pub fn upstream_tree_url(&self, reference: &str) -> String {
    format!("https://github.com/{}/tree/{}", self.upstream, reference)
  }

  /// Release-creation endpoint for the bindings repository
  pub fn releases_url(&self) -> String {
    format!("{}/repos/{}/releases", self.api_root.trim_end_matches('/'), self.repo)
  }
}

/// Build and publish tooling in the bindings repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  /// Script that builds every target of a module and assembles the release artifact
  #[serde(default = "default_build_script")]
  pub script: PathBuf,

  /// Script that cross-compiles the native library for a single target
  #[serde(default = "default_target_script")]
  pub target_script: PathBuf,

  /// Gradle wrapper used for publish tasks
  #[serde(default = "default_gradle")]
  pub gradle: PathBuf,
}

fn default_build_script() -> PathBuf {
  PathBuf::from("scripts/build-aar.sh")
}

fn default_target_script() -> PathBuf {
  PathBuf::from("scripts/build-rust-for-target.sh")
}

fn default_gradle() -> PathBuf {
  PathBuf::from("./gradlew")
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      script: default_build_script(),
      target_script: default_target_script(),
      gradle: default_gradle(),
    }
  }
}

/// Per-module tables, both optional with conventional defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulesConfig {
  #[serde(default = "ModuleConfig::sdk")]
  pub sdk: ModuleConfig,
  #[serde(default = "ModuleConfig::crypto")]
  pub crypto: ModuleConfig,
}

impl Default for ModulesConfig {
  fn default() -> Self {
    Self {
      sdk: ModuleConfig::sdk(),
      crypto: ModuleConfig::crypto(),
    }
  }
}

/// Paths and names for one releasable module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
  /// Kotlin constants file holding majorVersion/minorVersion/patchVersion
  pub metadata: PathBuf,

  /// Artifact the build script leaves behind, relative to the repository root
  pub artifact: PathBuf,

  /// Asset name the artifact is uploaded under
  pub asset: String,

  /// Gradle task that publishes the module to the staging repository
  pub publish_task: String,
}

impl ModuleConfig {
  fn sdk() -> Self {
    Self {
      metadata: PathBuf::from("buildSrc/src/main/kotlin/BuildVersionsSDK.kt"),
      artifact: PathBuf::from("sdk/sdk-android/build/outputs/aar/sdk-android-release.aar"),
      asset: "android-sdk.aar".to_string(),
      publish_task: ":sdk:sdk-android:publishToSonatype".to_string(),
    }
  }

  fn crypto() -> Self {
    Self {
      metadata: PathBuf::from("buildSrc/src/main/kotlin/BuildVersionsCrypto.kt"),
      artifact: PathBuf::from("crypto/crypto-android/build/outputs/aar/crypto-android-release.aar"),
      asset: "android-crypto.aar".to_string(),
      publish_task: ":crypto:crypto-android:publishToSonatype".to_string(),
    }
  }
}

impl GantryConfig {
  /// Find config file in search order: gantry.toml, .gantry.toml, .config/gantry.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("gantry.toml"),
      path.join(".gantry.toml"),
      path.join(".config").join("gantry.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from gantry.toml (searches multiple locations)
  pub fn load(root: &Path) -> GantryResult<Self> {
    let config_path = Self::find_config_path(root)
      .ok_or_else(|| GantryError::Config(ConfigError::NotFound { root: root.to_path_buf() }))?;

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: GantryConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config.validate()?;

    Ok(config)
  }

  /// Check remote entries before any git or network work
  pub fn validate(&self) -> GantryResult<()> {
    validate_slug("remote.repo", &self.remote.repo)?;
    validate_slug("remote.upstream", &self.remote.upstream)?;

    if self.remote.api_root.is_empty() {
      return Err(GantryError::Config(ConfigError::MissingField {
        field: "remote.api_root".to_string(),
      }));
    }

    Ok(())
  }

  /// Paths and names for one module
  pub fn module(&self, module: Module) -> &ModuleConfig {
    match module {
      Module::Sdk => &self.modules.sdk,
      Module::Crypto => &self.modules.crypto,
    }
  }
}

fn validate_slug(field: &str, value: &str) -> GantryResult<()> {
  let mut parts = value.split('/');
  match (parts.next(), parts.next(), parts.next()) {
    (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(()),
    _ => Err(GantryError::Config(ConfigError::InvalidSlug {
      field: field.to_string(),
      value: value.to_string(),
    })),
  }
}

/// Read the release API token from the environment
pub fn release_token() -> GantryResult<String> {
  match env::var("GITHUB_TOKEN") {
    Ok(token) if !token.is_empty() => Ok(token),
    _ => Err(GantryError::Config(ConfigError::TokenMissing)),
  }
}
