//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Ledger used by most scenarios
pub const CJSON_HISTORY: &str = r#"{"cjson":{"versions":[{"c":"1.8.18","go":["v0.2.0","v0.2.1"]},{"c":"1.7.18","go":["v0.1.1","v0.1.2"]},{"c":"1.7.16","go":["v0.1.0"]}]}}"#;

/// A scratch repository root holding a ledger and package directories
pub struct TestStore {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestStore {
  /// Create an empty store (no ledger file yet)
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// Create a store with the given ledger content
  pub fn with_ledger(json: &str) -> Result<Self> {
    let store = Self::new()?;
    store.write_file("llpkgstore.json", json)?;
    Ok(store)
  }

  /// Add a package directory with llpkg.cfg and llcppg.cfg
  pub fn add_package(&self, dir: &str, name: &str, version: &str) -> Result<PathBuf> {
    let package_path = self.path.join(dir);
    std::fs::create_dir_all(&package_path)?;

    std::fs::write(
      package_path.join("llpkg.cfg"),
      format!(
        r#"{{
  "upstream": {{
    "installer": {{ "name": "conan" }},
    "package": {{ "name": "{}", "version": "{}" }}
  }}
}}
"#,
        name, version
      ),
    )?;
    std::fs::write(
      package_path.join("llcppg.cfg"),
      format!(r#"{{"name": "{}", "include": ["{}.h"]}}"#, name, name),
    )?;

    Ok(package_path)
  }

  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let full = self.path.join(path);
    if let Some(parent) = full.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(full, content)?;
    Ok(())
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }
}

/// Run llpkgstore and return its output whatever the exit status
pub fn llpkgstore(cwd: &Path, args: &[&str]) -> Result<Output> {
  Command::new(env!("CARGO_BIN_EXE_llpkgstore"))
    .current_dir(cwd)
    .env_remove("RUST_LOG")
    .args(args)
    .output()
    .context("Failed to run llpkgstore")
}

/// Run llpkgstore and fail unless it succeeds
pub fn run_llpkgstore(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = llpkgstore(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "llpkgstore command failed: llpkgstore {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run llpkgstore expecting failure, returning (exit code, stderr)
pub fn run_llpkgstore_failing(cwd: &Path, args: &[&str]) -> Result<(i32, String)> {
  let output = llpkgstore(cwd, args)?;

  if output.status.success() {
    anyhow::bail!(
      "llpkgstore command unexpectedly succeeded: llpkgstore {}\nstdout: {}",
      args.join(" "),
      String::from_utf8_lossy(&output.stdout)
    );
  }

  let code = output.status.code().context("llpkgstore was killed by a signal")?;
  Ok((code, String::from_utf8_lossy(&output.stderr).into_owned()))
}
