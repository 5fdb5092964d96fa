mod build;
mod commands;
mod core;
mod github;
mod release;

use crate::core::config::Module;
use crate::core::error::{GantryError, print_error};
use crate::release::version::parse_version;
use clap::{Parser, Subcommand};
use semver::Version;
use std::path::PathBuf;

/// Version, release, and publish automation for multi-module Android bindings
#[derive(Parser)]
#[command(name = "gantry")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct GantryCli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Release a module: build, bump metadata, push, create the release
  /// record, upload the artifact, publish to the staging repository
  Release {
    /// Module to release
    #[arg(long, value_enum)]
    module: Module,

    /// Version to release (plain MAJOR.MINOR.PATCH, must beat the recorded one)
    #[arg(long, value_parser = parse_version)]
    version: Version,

    /// Upstream ref recorded in the commit message and release notes
    /// (default: HEAD of the upstream checkout)
    #[arg(long)]
    linkable_ref: Option<String>,

    /// Path to the upstream checkout (default: sibling directory named
    /// after the upstream repository)
    #[arg(long)]
    sdk_path: Option<PathBuf>,

    /// Show the release plan without making changes
    #[arg(long)]
    dry_run: bool,
  },

  /// Build one module for a single target without releasing anything
  Build {
    /// Module to build
    #[arg(long, value_enum)]
    module: Module,

    /// Version being prepared (must beat the recorded one)
    #[arg(long, value_parser = parse_version)]
    version: Version,

    /// Target triple to cross-compile for, e.g. aarch64-linux-android
    #[arg(long)]
    target: String,

    /// Clone the upstream repository fresh at this ref before building
    #[arg(long = "ref", conflicts_with = "skip_clone")]
    git_ref: Option<String>,

    /// Path to the upstream checkout (default: sibling directory named
    /// after the upstream repository)
    #[arg(long)]
    sdk_path: Option<PathBuf>,

    /// Use the checkout at --sdk-path as-is instead of cloning
    #[arg(long)]
    skip_clone: bool,
  },

  /// Show the version recorded in a module's metadata
  Version {
    /// Module to inspect
    #[arg(long, value_enum)]
    module: Module,

    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = GantryCli::parse();

  let result = match cli.command {
    Commands::Release {
      module,
      version,
      linkable_ref,
      sdk_path,
      dry_run,
    } => commands::run_release(module, version, linkable_ref, sdk_path, dry_run),
    Commands::Build {
      module,
      version,
      target,
      git_ref,
      sdk_path,
      skip_clone,
    } => commands::run_build(module, version, target, git_ref, sdk_path, skip_clone),
    Commands::Version { module, json } => commands::run_version(module, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: GantryError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code());
}
