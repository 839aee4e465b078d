use crate::core::error::{ConfigError, ResultExt, StoreError, StoreResult};
use crate::ledger::DEFAULT_LEDGER_FILE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Upstream installers llpkg knows how to drive
pub const VALID_INSTALLERS: &[&str] = &["conan"];

/// Package description file inside every package directory
pub const PACKAGE_CONFIG_FILE: &str = "llpkg.cfg";

/// Binding generator config; must sit next to llpkg.cfg
pub const GENERATOR_CONFIG_FILE: &str = "llcppg.cfg";

/// Contents of `llpkg.cfg`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
  #[serde(default)]
  pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamConfig {
  #[serde(default)]
  pub installer: InstallerConfig,
  #[serde(default)]
  pub package: PackageInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerConfig {
  /// Installer name (default: "conan")
  #[serde(default)]
  pub name: String,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub config: BTreeMap<String, String>,
}

/// Upstream C library name and version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub version: String,
}

impl PackageConfig {
  /// Parse llpkg.cfg content and fill defaults
  pub fn parse(content: &str) -> StoreResult<Self> {
    let mut config: PackageConfig = serde_json::from_str(content)?;
    if config.upstream.installer.name.is_empty() {
      config.upstream.installer.name = VALID_INSTALLERS[0].to_string();
    }
    Ok(config)
  }

  /// Load and validate llpkg.cfg from a file
  pub fn load(path: &Path) -> StoreResult<Self> {
    if !path.is_file() {
      return Err(ConfigError::NotFound { path: path.to_path_buf() }.into());
    }

    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    config.validate()?;

    tracing::debug!(
      path = %path.display(),
      library = %config.upstream.package.name,
      version = %config.upstream.package.version,
      "loaded package config"
    );
    Ok(config)
  }

  /// Load a package directory
  ///
  /// A directory only counts as a package when it has both llpkg.cfg and llcppg.cfg.
  pub fn load_from_dir(dir: &Path) -> StoreResult<Self> {
    for file in [PACKAGE_CONFIG_FILE, GENERATOR_CONFIG_FILE] {
      let path = dir.join(file);
      if !path.is_file() {
        return Err(ConfigError::NotFound { path }.into());
      }
    }
    Self::load(&dir.join(PACKAGE_CONFIG_FILE))
  }

  pub fn validate(&self) -> StoreResult<()> {
    let installer = &self.upstream.installer.name;
    if installer.is_empty() {
      return Err(missing("upstream.installer.name"));
    }
    if !VALID_INSTALLERS.contains(&installer.as_str()) {
      return Err(ConfigError::UnsupportedInstaller { name: installer.clone() }.into());
    }
    if self.upstream.package.name.is_empty() {
      return Err(missing("upstream.package.name"));
    }
    if self.upstream.package.version.is_empty() {
      return Err(missing("upstream.package.version"));
    }
    Ok(())
  }

  /// Library name used as the ledger key
  pub fn library(&self) -> &str {
    &self.upstream.package.name
  }

  /// Raw upstream C version
  pub fn c_version(&self) -> &str {
    &self.upstream.package.version
  }
}

fn missing(field: &str) -> StoreError {
  ConfigError::MissingField {
    field: field.to_string(),
  }
  .into()
}

/// Repository-level settings
/// Searched in order: llpkgstore.toml, .llpkgstore.toml. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  /// Ledger file, relative to the config file's directory
  pub ledger: PathBuf,
  /// Maintenance branch prefix (default: "release-branch.")
  pub legacy_branch_prefix: String,
  /// Label prefix requesting a maintenance branch (default: "branch:")
  pub label_prefix: String,
  /// The only non-maintenance branch submissions may target (default: "main")
  pub main_branch: String,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      ledger: PathBuf::from(DEFAULT_LEDGER_FILE),
      legacy_branch_prefix: "release-branch.".to_string(),
      label_prefix: "branch:".to_string(),
      main_branch: "main".to_string(),
    }
  }
}

impl StoreConfig {
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [path.join("llpkgstore.toml"), path.join(".llpkgstore.toml")];
    candidates.into_iter().find(|p| p.is_file())
  }

  /// Load settings for a repository root, falling back to defaults
  pub fn load(root: &Path) -> StoreResult<Self> {
    let Some(config_path) = Self::find_config_path(root) else {
      tracing::debug!(root = %root.display(), "no llpkgstore.toml, using defaults");
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: StoreConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;
    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded store config");
    Ok(config)
  }

  pub fn validate(&self) -> StoreResult<()> {
    if self.ledger.as_os_str().is_empty() {
      return Err(missing("ledger"));
    }
    if self.legacy_branch_prefix.is_empty() {
      return Err(missing("legacy_branch_prefix"));
    }
    if self.label_prefix.is_empty() {
      return Err(missing("label_prefix"));
    }
    if self.main_branch.is_empty() {
      return Err(missing("main_branch"));
    }
    Ok(())
  }

  /// Ledger path resolved against the repository root
  pub fn ledger_path(&self, root: &Path) -> PathBuf {
    if self.ledger.is_absolute() {
      self.ledger.clone()
    } else {
      root.join(&self.ledger)
    }
  }
}
