//! Error types for gantry with contextual messages and exit codes
//!
//! Every failure funnels into a single error type so the binary can print
//! one message, one optional hint, and exit with the right code. External
//! processes keep their own exit codes; everything else exits 1.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Main error type for gantry
#[derive(Debug)]
pub enum GantryError {
  /// Configuration errors (gantry.toml, environment)
  Config(ConfigError),

  /// Version field missing from a build metadata file
  Metadata { field: String, path: PathBuf },

  /// Git operation errors
  Git(GitError),

  /// Release API errors
  Api(ApiError),

  /// External process failed (build script, gradle)
  Process { command: String, code: Option<i32> },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl GantryError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    GantryError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    GantryError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      GantryError::Message { message, context, help } => GantryError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      GantryError::Io(e) => GantryError::Message {
        message: format!("I/O error: {}", e),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Process exit code for this error
  ///
  /// External processes (git, build scripts, gradle) propagate their own
  /// exit codes; configuration, metadata, and API failures exit 1.
  pub fn exit_code(&self) -> i32 {
    match self {
      GantryError::Git(e) => e.exit_code(),
      GantryError::Process { code, .. } => code.unwrap_or(1),
      _ => 1,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      GantryError::Config(e) => e.help_message(),
      GantryError::Metadata { .. } => {
        Some("Check that the module's metadata path in gantry.toml points at the version constants file.".to_string())
      }
      GantryError::Git(e) => e.help_message(),
      GantryError::Api(e) => e.help_message(),
      GantryError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for GantryError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GantryError::Config(e) => write!(f, "{}", e),
      GantryError::Metadata { field, path } => {
        write!(f, "No {} entry found in {}", field, path.display())
      }
      GantryError::Git(e) => write!(f, "{}", e),
      GantryError::Api(e) => write!(f, "{}", e),
      GantryError::Process { command, code } => match code {
        Some(code) => write!(f, "Command failed with exit code {}: {}", code, command),
        None => write!(f, "Command terminated by signal: {}", command),
      },
      GantryError::Io(e) => write!(f, "I/O error: {}", e),
      GantryError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for GantryError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      GantryError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for GantryError {
  fn from(err: io::Error) -> Self {
    GantryError::Io(err)
  }
}

impl From<String> for GantryError {
  fn from(msg: String) -> Self {
    GantryError::message(msg)
  }
}

impl From<&str> for GantryError {
  fn from(msg: &str) -> Self {
    GantryError::message(msg)
  }
}

impl From<toml_edit::TomlError> for GantryError {
  fn from(err: toml_edit::TomlError) -> Self {
    GantryError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for GantryError {
  fn from(err: toml_edit::de::Error) -> Self {
    GantryError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for GantryError {
  fn from(err: serde_json::Error) -> Self {
    GantryError::message(format!("JSON error: {}", err))
  }
}

impl From<regex::Error> for GantryError {
  fn from(err: regex::Error) -> Self {
    GantryError::message(format!("Regex error: {}", err))
  }
}

impl From<std::num::ParseIntError> for GantryError {
  fn from(err: std::num::ParseIntError) -> Self {
    GantryError::message(format!("Parse error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// gantry.toml not found
  NotFound { root: PathBuf },

  /// Missing required field
  MissingField { field: String },

  /// Repository reference is not in owner/name form
  InvalidSlug { field: String, value: String },

  /// Release API token not present in the environment
  TokenMissing,
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Create gantry.toml in the repository root with [remote] repo and upstream entries.".to_string())
      }
      ConfigError::InvalidSlug { .. } => Some("Use the owner/name form, e.g. \"example/app-android\".".to_string()),
      ConfigError::TokenMissing => Some("Export a release API token: export GITHUB_TOKEN=<token>".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { root } => {
        write!(
          f,
          "No gantry configuration found.\nExpected file: {}/gantry.toml",
          root.display()
        )
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::InvalidSlug { field, value } => {
        write!(f, "Invalid {} '{}' in config", field, value)
      }
      ConfigError::TokenMissing => {
        write!(f, "GITHUB_TOKEN environment variable is not set")
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed {
    command: String,
    code: Option<i32>,
    stderr: String,
  },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed { code: Option<i32>, stderr: String },
}

impl GitError {
  fn exit_code(&self) -> i32 {
    match self {
      GitError::CommandFailed { code, .. } => code.unwrap_or(1),
      GitError::RepoNotFound { .. } => 1,
      GitError::PushFailed { code, .. } => code.unwrap_or(1),
    }
  }

  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { stderr, .. } => {
        if stderr.contains("non-fast-forward") || stderr.contains("fetch first") {
          Some("The remote has commits you don't have. Pull first, then re-run the release.".to_string())
        } else if stderr.contains("Authentication") || stderr.contains("Permission denied") || stderr.contains("403") {
          Some("Check your git credentials for the bindings repository remote.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run gantry from inside the bindings repository, or check the path: {}",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr, .. } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::PushFailed { stderr, .. } => {
        write!(f, "git push failed: {}", stderr)
      }
    }
  }
}

/// Release API errors
#[derive(Debug)]
pub enum ApiError {
  /// Server answered with an unexpected status
  Status { url: String, status: u16, body: String },

  /// Request never completed
  Transport { url: String, reason: String },
}

impl ApiError {
  fn help_message(&self) -> Option<String> {
    match self {
      ApiError::Status { status, .. } => match status {
        401 | 403 => Some("Check that GITHUB_TOKEN is valid and has repo scope.".to_string()),
        404 => Some("Check the [remote] repo entry in gantry.toml.".to_string()),
        422 => Some("A release with this tag may already exist.".to_string()),
        _ => None,
      },
      ApiError::Transport { .. } => Some("Check network connectivity and the [remote] api_root entry.".to_string()),
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Status { url, status, body } => {
        write!(f, "Release API request to {} failed with status {}\n{}", url, status, body)
      }
      ApiError::Transport { url, reason } => {
        write!(f, "Release API request to {} failed: {}", url, reason)
      }
    }
  }
}

/// Result type alias for gantry
pub type GantryResult<T> = Result<T, GantryError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> GantryResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> GantryResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<GantryError>,
{
  fn context(self, ctx: impl Into<String>) -> GantryResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> GantryResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &GantryError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
