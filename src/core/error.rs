//! Error types for llpkgstore with contextual messages and exit codes
//!
//! Every failure the tool can report is a distinguishable value. Policy
//! violations (a submission breaks the branch maintenance strategy) are kept
//! apart from ledger faults (the ledger itself is inconsistent or could not be
//! persisted), so callers and tests can assert on the exact rule that fired.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for llpkgstore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, malformed directives)
  User = 1,
  /// System error (I/O, ledger corruption)
  System = 2,
  /// Validation failure (a release policy was violated)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for llpkgstore
#[derive(Debug)]
pub enum StoreError {
  /// Package or tool configuration errors
  Config(ConfigError),

  /// Version ledger errors
  Ledger(LedgerError),

  /// Release policy violations
  Policy(PolicyError),

  /// Malformed release directives, mapped versions or branch labels
  Directive(DirectiveError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl StoreError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    StoreError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    StoreError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// Typed variants are returned untouched so callers can still match on them.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      StoreError::Message { message, context, help } => StoreError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      StoreError::Io(e) => StoreError::Message {
        message: format!("I/O error: {}", e),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      StoreError::Config(_) => ExitCode::User,
      StoreError::Ledger(_) => ExitCode::System,
      StoreError::Policy(_) => ExitCode::Validation,
      StoreError::Directive(_) => ExitCode::User,
      StoreError::Io(_) => ExitCode::System,
      StoreError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      StoreError::Config(e) => e.help_message(),
      StoreError::Ledger(e) => e.help_message(),
      StoreError::Policy(e) => e.help_message(),
      StoreError::Directive(e) => e.help_message(),
      StoreError::Message { help, .. } => help.clone(),
      StoreError::Io(_) => None,
    }
  }
}

impl fmt::Display for StoreError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StoreError::Config(e) => write!(f, "{}", e),
      StoreError::Ledger(e) => write!(f, "{}", e),
      StoreError::Policy(e) => write!(f, "{}", e),
      StoreError::Directive(e) => write!(f, "{}", e),
      StoreError::Io(e) => write!(f, "I/O error: {}", e),
      StoreError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for StoreError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      StoreError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for StoreError {
  fn from(err: io::Error) -> Self {
    StoreError::Io(err)
  }
}

impl From<String> for StoreError {
  fn from(msg: String) -> Self {
    StoreError::message(msg)
  }
}

impl From<&str> for StoreError {
  fn from(msg: &str) -> Self {
    StoreError::message(msg)
  }
}

impl From<ConfigError> for StoreError {
  fn from(err: ConfigError) -> Self {
    StoreError::Config(err)
  }
}

impl From<LedgerError> for StoreError {
  fn from(err: LedgerError) -> Self {
    StoreError::Ledger(err)
  }
}

impl From<PolicyError> for StoreError {
  fn from(err: PolicyError) -> Self {
    StoreError::Policy(err)
  }
}

impl From<DirectiveError> for StoreError {
  fn from(err: DirectiveError) -> Self {
    StoreError::Directive(err)
  }
}

impl From<serde_json::Error> for StoreError {
  fn from(err: serde_json::Error) -> Self {
    StoreError::message(format!("JSON error: {}", err))
  }
}

impl From<toml_edit::de::Error> for StoreError {
  fn from(err: toml_edit::de::Error) -> Self {
    StoreError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<regex::Error> for StoreError {
  fn from(err: regex::Error) -> Self {
    StoreError::message(format!("Regex error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// llpkg.cfg not found
  NotFound { path: PathBuf },

  /// Missing required field
  MissingField { field: String },

  /// Installer named in llpkg.cfg is not supported
  UnsupportedInstaller { name: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Every package directory must contain both llpkg.cfg and llcppg.cfg.".to_string())
      }
      ConfigError::UnsupportedInstaller { .. } => Some(format!(
        "Supported installers: {}",
        crate::core::config::VALID_INSTALLERS.join(", ")
      )),
      ConfigError::MissingField { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "Package configuration not found: {}", path.display())
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::UnsupportedInstaller { name } => {
        write!(f, "Unsupported upstream installer: {}", name)
      }
    }
  }
}

/// Version ledger errors
#[derive(Debug)]
pub enum LedgerError {
  /// Ledger file is not valid JSON of the expected shape
  Parse { path: PathBuf, message: String },

  /// The mapped version was already released for this library
  DuplicateMappedVersion {
    library: String,
    c_version: String,
    mapped_version: String,
  },

  /// The mapped version is not a valid semantic version
  InvalidMappedVersion { version: String },

  /// A new C version canonicalizes to the same semver as a recorded one
  AmbiguousCVersion {
    library: String,
    c_version: String,
    existing: String,
  },

  /// The ledger file changed on disk after it was loaded
  ConcurrentModification { path: PathBuf },

  /// An index lookup that the ledger invariants guarantee came back empty
  Corrupted { library: String, reason: String },
}

impl LedgerError {
  fn help_message(&self) -> Option<String> {
    match self {
      LedgerError::Parse { .. } => Some("Fix or restore the ledger file from version control.".to_string()),
      LedgerError::DuplicateMappedVersion { .. } => {
        Some("A mapped version can only be released once. Was this release already recorded?".to_string())
      }
      LedgerError::InvalidMappedVersion { .. } => {
        Some("Mapped versions must be semantic versions with a `v` prefix, e.g. v1.2.3".to_string())
      }
      LedgerError::ConcurrentModification { .. } => {
        Some("Another run updated the ledger. Re-run to apply on top of the latest content.".to_string())
      }
      LedgerError::AmbiguousCVersion { .. } | LedgerError::Corrupted { .. } => None,
    }
  }
}

impl fmt::Display for LedgerError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LedgerError::Parse { path, message } => {
        write!(f, "Failed to parse ledger {}: {}", path.display(), message)
      }
      LedgerError::DuplicateMappedVersion {
        library,
        c_version,
        mapped_version,
      } => write!(
        f,
        "Version {} has already existed for {} (released from C version {})",
        mapped_version, library, c_version
      ),
      LedgerError::InvalidMappedVersion { version } => {
        write!(f, "Mapped version '{}' is not a valid semantic version", version)
      }
      LedgerError::AmbiguousCVersion {
        library,
        c_version,
        existing,
      } => write!(
        f,
        "C version '{}' of {} has the same semantic version as recorded version '{}'",
        c_version, library, existing
      ),
      LedgerError::ConcurrentModification { path } => {
        write!(f, "Ledger {} was modified since it was loaded", path.display())
      }
      LedgerError::Corrupted { library, reason } => {
        write!(f, "Ledger is inconsistent for {}: {}", library, reason)
      }
    }
  }
}

/// Release policy violations raised by the legacy compatibility checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
  /// The mapped version was already used by some C version of this library
  DuplicateMappedVersion { library: String, mapped_version: String },

  /// A C version that is not the newest was submitted to the main branch
  LegacyOnMainBranch { library: String, c_version: String },

  /// The newest C version maps to a version lower than the latest release
  RegressionFromLatest {
    library: String,
    mapped_version: String,
    latest: String,
  },

  /// A legacy C version maps lower than its closest recorded predecessor
  RegressionFromPredecessor {
    library: String,
    mapped_version: String,
    predecessor: String,
    predecessor_mapped: String,
  },

  /// A larger patch of the same major.minor line was already released
  HistoricalLegacyVersion {
    library: String,
    c_version: String,
    superseded_by: String,
  },
}

impl PolicyError {
  fn help_message(&self) -> Option<String> {
    match self {
      PolicyError::DuplicateMappedVersion { .. } => {
        Some("Pick a mapped version that has never been released for this library.".to_string())
      }
      PolicyError::LegacyOnMainBranch { .. } => Some(
        "Submit older C versions against a maintenance branch (release-branch.<clib>/<version>).".to_string(),
      ),
      PolicyError::RegressionFromLatest { latest, .. } => {
        Some(format!("Use a mapped version greater than or equal to {}.", latest))
      }
      PolicyError::RegressionFromPredecessor { predecessor_mapped, .. } => {
        Some(format!("Use a mapped version greater than or equal to {}.", predecessor_mapped))
      }
      PolicyError::HistoricalLegacyVersion { .. } => {
        Some("Only the latest patch of a major.minor line can be maintained.".to_string())
      }
    }
  }
}

impl fmt::Display for PolicyError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PolicyError::DuplicateMappedVersion {
        library,
        mapped_version,
      } => write!(f, "Repeat semver: {} was already released for {}", mapped_version, library),
      PolicyError::LegacyOnMainBranch { library, c_version } => write!(
        f,
        "Legacy version {} of {} must not be submitted to the main branch",
        c_version, library
      ),
      PolicyError::RegressionFromLatest {
        library,
        mapped_version,
        latest,
      } => write!(
        f,
        "Mapped version {} of {} must not be less than the latest one ({})",
        mapped_version, library, latest
      ),
      PolicyError::RegressionFromPredecessor {
        library,
        mapped_version,
        predecessor,
        predecessor_mapped,
      } => write!(
        f,
        "Mapped version {} of {} must not be less than the legacy one ({} from C version {})",
        mapped_version, library, predecessor_mapped, predecessor
      ),
      PolicyError::HistoricalLegacyVersion {
        library,
        c_version,
        superseded_by,
      } => write!(
        f,
        "Cannot submit a historical legacy version: {} of {} is superseded by {}",
        c_version, library, superseded_by
      ),
    }
  }
}

/// Errors in release directives, mapped versions and branch labels
#[derive(Debug)]
pub enum DirectiveError {
  /// Expected `clib/vX.Y.Z`
  InvalidMappedVersion { input: String, reason: String },

  /// No `Release-as:` directive in the commit message
  ReleaseAsNotFound { package: Option<String> },

  /// Expected `branch:release-branch.clib/vX.Y.Z`
  InvalidLabel { label: String },

  /// The library cannot get a maintenance branch
  NotMaintainable { library: String, reason: String },

  /// Base ref is neither the main branch nor a maintenance branch
  UnknownBaseBranch { base_ref: String, main_branch: String, legacy_prefix: String },
}

impl DirectiveError {
  fn help_message(&self) -> Option<String> {
    match self {
      DirectiveError::InvalidMappedVersion { .. } | DirectiveError::ReleaseAsNotFound { .. } => {
        Some("Add a line like `Release-as: cjson/v1.0.0` to the commit message.".to_string())
      }
      DirectiveError::InvalidLabel { .. } => {
        Some("Labels must look like `branch:release-branch.cjson/v1.0.0`.".to_string())
      }
      DirectiveError::NotMaintainable { .. } => None,
      DirectiveError::UnknownBaseBranch {
        main_branch,
        legacy_prefix,
        ..
      } => Some(format!(
        "Submit against {} or a {}<clib>/<mapped version> branch.",
        main_branch, legacy_prefix
      )),
    }
  }
}

impl fmt::Display for DirectiveError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DirectiveError::InvalidMappedVersion { input, reason } => {
        write!(f, "Invalid mapped version format '{}': {}", input, reason)
      }
      DirectiveError::ReleaseAsNotFound { package: Some(package) } => {
        write!(f, "No Release-as directive found for {}", package)
      }
      DirectiveError::ReleaseAsNotFound { package: None } => {
        write!(f, "No Release-as directive found")
      }
      DirectiveError::InvalidLabel { label } => write!(f, "Invalid label name format: {}", label),
      DirectiveError::NotMaintainable { library, reason } => {
        write!(f, "Cannot maintain {}: {}", library, reason)
      }
      DirectiveError::UnknownBaseBranch { base_ref, .. } => {
        write!(f, "Unknown base branch: {}", base_ref)
      }
    }
  }
}

/// Result type alias for llpkgstore
pub type StoreResult<T> = Result<T, StoreError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> StoreResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> StoreResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<StoreError>,
{
  fn context(self, ctx: impl Into<String>) -> StoreResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> StoreResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &StoreError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
