use serde::Serialize;

use crate::core::context::StoreContext;
use crate::core::error::{StoreError, StoreResult};
use crate::ledger::{Ledger, VersionMapping};

/// Everything the ledger knows about one library
#[derive(Debug, Clone, Serialize)]
pub struct LibraryReport<'a> {
  pub library: &'a str,
  pub latest_c_version: Option<&'a str>,
  pub latest_go_version: Option<&'a str>,
  pub versions: &'a [VersionMapping],
}

impl<'a> LibraryReport<'a> {
  fn new(ledger: &'a Ledger, library: &'a str) -> Self {
    Self {
      library,
      latest_c_version: ledger.latest_c_version(library),
      latest_go_version: ledger.latest_go_version(library),
      versions: ledger.version_mappings(library),
    }
  }
}

/// Print the recorded history of a library
pub fn run_show(ctx: &StoreContext, library: String, json: bool) -> StoreResult<()> {
  let ledger = ctx.load_ledger()?;

  if !ledger.contains(&library) {
    let known: Vec<&str> = ledger.libraries().collect();
    let help = if known.is_empty() {
      "The ledger is empty".to_string()
    } else {
      format!("Known libraries: {}", known.join(", "))
    };
    return Err(StoreError::with_help(
      format!("Library '{}' not found in {}", library, ledger.path().display()),
      help,
    ));
  }

  let report = LibraryReport::new(&ledger, &library);

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  println!("📦 {}", report.library);
  for mapping in report.versions {
    println!("   {} -> {}", mapping.c_version, mapping.go_versions.join(", "));
  }
  if let Some(latest) = report.latest_go_version {
    println!("   latest: {}", latest);
  }

  Ok(())
}
