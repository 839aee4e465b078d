mod commands;
mod core;
mod ledger;
mod release;
mod versions;

use clap::{Parser, Subcommand};
use core::context::StoreContext;
use core::error::{StoreError, print_error};
use std::path::PathBuf;

/// Keep the llpkg version ledger and gate releases against it
#[derive(Parser)]
#[command(name = "llpkgstore")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Ledger file (default: from llpkgstore.toml, else ./llpkgstore.json)
  #[arg(long, global = true)]
  ledger: Option<PathBuf>,

  /// Show debug diagnostics on stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Check a package submission against the ledger history
  Verify {
    /// Directory containing llpkg.cfg and llcppg.cfg
    package_dir: PathBuf,
    /// Proposed mapped version: clib/vX.Y.Z or vX.Y.Z
    #[arg(long)]
    mapped: Option<String>,
    /// Base branch of the submission (default: main)
    #[arg(long)]
    base: Option<String>,
    /// Commit message to search for a Release-as directive (repeatable)
    #[arg(long = "message")]
    messages: Vec<String>,
    /// Output the result in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Record a released mapped version in the ledger
  Record {
    /// Released version: clib/vX.Y.Z
    mapped: String,
    /// Upstream C version it was released from
    #[arg(long, conflicts_with = "package_dir")]
    c_version: Option<String>,
    /// Read the C version from this package directory's llpkg.cfg
    #[arg(long)]
    package_dir: Option<PathBuf>,
  },

  /// Show recorded versions of a library
  Show {
    /// C library name
    library: String,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Validate a maintenance-branch label and print the branch name
  Branch {
    /// Label, e.g. branch:release-branch.cjson/v1.0.0
    label: String,
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
  let cli = Cli::parse();
  core::logging::init(cli.verbose);

  let root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(StoreError::from(e).context("Failed to get current directory")),
  };

  let ctx = match StoreContext::build(&root, cli.ledger.as_deref()) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Verify {
      package_dir,
      mapped,
      base,
      messages,
      json,
    } => commands::run_verify(&ctx, &package_dir, mapped, base, messages, json),
    Commands::Record {
      mapped,
      c_version,
      package_dir,
    } => commands::run_record(&ctx, mapped, c_version, package_dir),
    Commands::Show { library, json } => commands::run_show(&ctx, library, json),
    Commands::Branch { label } => commands::run_branch(&ctx, label),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: StoreError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
