use serde::Serialize;
use std::path::Path;

use crate::core::config::PackageConfig;
use crate::core::context::StoreContext;
use crate::core::error::{DirectiveError, StoreError, StoreResult};
use crate::release::{Acceptance, BranchTarget, MappedVersion, Submission, check_legacy_version, find_release_as};

/// Outcome of an accepted verification
#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
  pub library: String,
  pub c_version: String,
  pub mapped_version: String,
  pub target: BranchTarget,
  pub acceptance: Acceptance,
}

/// Check a package submission against the ledger
///
/// The mapped version comes from `--mapped` (`clib/vX.Y.Z` or just `vX.Y.Z`)
/// or from the first `Release-as` directive in `messages`.
pub fn run_verify(
  ctx: &StoreContext,
  package_dir: &Path,
  mapped: Option<String>,
  base: Option<String>,
  messages: Vec<String>,
  json: bool,
) -> StoreResult<()> {
  let package = PackageConfig::load_from_dir(package_dir)?;
  let library = package.library();
  let mapped = resolve_mapped_version(library, mapped.as_deref(), &messages)?;
  let target = ctx.branch_target(base.as_deref())?;

  let ledger = ctx.load_ledger()?;
  let submission = Submission {
    library,
    c_version: package.c_version(),
    mapped_version: &mapped.version,
    target,
  };

  let acceptance = match check_legacy_version(&ledger, &submission) {
    Ok(acceptance) => acceptance,
    Err(err) => {
      tracing::warn!(library, mapped_version = %mapped.version, "Submission rejected");
      return Err(err);
    }
  };
  tracing::info!(library, mapped_version = %mapped.version, ?acceptance, "Submission accepted");

  let report = VerifyReport {
    library: library.to_string(),
    c_version: package.c_version().to_string(),
    mapped_version: mapped.version,
    target,
    acceptance,
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_report(&report);
  }

  Ok(())
}

fn resolve_mapped_version(library: &str, mapped: Option<&str>, messages: &[String]) -> StoreResult<MappedVersion> {
  match mapped {
    Some(input) if input.contains('/') => {
      let parsed = MappedVersion::parse(input)?;
      if parsed.library != library {
        return Err(
          DirectiveError::InvalidMappedVersion {
            input: input.to_string(),
            reason: format!("library does not match llpkg.cfg ({})", library),
          }
          .into(),
        );
      }
      Ok(parsed)
    }
    Some(version) => MappedVersion::parse(&format!("{}/{}", library, version)),
    None if !messages.is_empty() => find_release_as(messages.iter().map(String::as_str), Some(library)),
    None => Err(StoreError::with_help(
      "No mapped version given",
      format!("Pass --mapped {}/vX.Y.Z or a --message containing 'Release-as: {}/vX.Y.Z'", library, library),
    )),
  }
}

fn print_report(report: &VerifyReport) {
  let branch = match report.target {
    BranchTarget::Main => "main",
    BranchTarget::Legacy => "maintenance branch",
  };
  let reason = match report.acceptance {
    Acceptance::FirstRelease => "first release of this library",
    Acceptance::NotSemver => "C version is not semver, ordering not enforced",
    Acceptance::Newest => "newest C version",
    Acceptance::Oldest => "older than every recorded C version",
    Acceptance::FollowsPredecessor => "follows its closest recorded predecessor",
  };

  println!(
    "✅ {} {} -> {} accepted on {}",
    report.library, report.c_version, report.mapped_version, branch
  );
  println!("   {}", reason);
}
