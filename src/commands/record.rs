use std::path::PathBuf;

use crate::core::config::PackageConfig;
use crate::core::context::StoreContext;
use crate::core::error::{DirectiveError, LedgerError, StoreError, StoreResult};
use crate::ledger::Ledger;
use crate::release::MappedVersion;

/// Append a released mapping to the ledger
///
/// The C version is taken from `--c-version`, or from llpkg.cfg in
/// `--package-dir`.
pub fn run_record(
  ctx: &StoreContext,
  mapped: String,
  c_version: Option<String>,
  package_dir: Option<PathBuf>,
) -> StoreResult<()> {
  let mapped = MappedVersion::parse(&mapped)?;

  let c_version = match (c_version, package_dir) {
    (Some(c_version), _) => c_version,
    (None, Some(dir)) => {
      let package = PackageConfig::load_from_dir(&dir)?;
      if package.library() != mapped.library {
        return Err(
          DirectiveError::InvalidMappedVersion {
            input: mapped.to_string(),
            reason: format!("library does not match llpkg.cfg ({})", package.library()),
          }
          .into(),
        );
      }
      package.c_version().to_string()
    }
    (None, None) => {
      return Err(StoreError::with_help(
        "No C version given",
        "Pass --c-version <version> or --package-dir <dir>",
      ));
    }
  };

  let mut ledger = ctx.load_ledger()?;
  append(&mut ledger, &mapped, &c_version)?;

  println!(
    "✅ Recorded {} {} -> {} in {}",
    mapped.library,
    c_version,
    mapped.version,
    ledger.path().display()
  );

  Ok(())
}

/// Write once, and once more on a fresh copy if another run appended in between
fn append(ledger: &mut Ledger, mapped: &MappedVersion, c_version: &str) -> StoreResult<()> {
  match ledger.write(&mapped.library, c_version, &mapped.version) {
    Err(StoreError::Ledger(LedgerError::ConcurrentModification { .. })) => {
      tracing::warn!(path = %ledger.path().display(), "Ledger changed on disk, reloading");
      ledger.reload()?;
      ledger.write(&mapped.library, c_version, &mapped.version)
    }
    result => result,
  }
}
