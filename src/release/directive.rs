//! Mapped version directives
//!
//! A submission announces its mapped version with a `Release-as: <clib>/<semver>`
//! line in one of its commit messages. The same `<clib>/<semver>` form names
//! maintenance branches.

use crate::core::error::{DirectiveError, StoreResult};
use crate::versions::semver;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Followed by exactly one whitespace character (space, tab or newline)
const RELEASE_AS: &str = "Release-as:";

const SEMVER_BODY: &str = r"(?:0|[1-9]\d*)\.(?:0|[1-9]\d*)\.(?:0|[1-9]\d*)(?:-(?:(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+(?:[0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?";

/// A library name paired with one of its mapped versions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MappedVersion {
  pub library: String,
  /// Always carries the `v` prefix
  pub version: String,
}

impl MappedVersion {
  /// Parse `clib/vX.Y.Z`
  pub fn parse(input: &str) -> StoreResult<Self> {
    let invalid = |reason: &str| DirectiveError::InvalidMappedVersion {
      input: input.to_string(),
      reason: reason.to_string(),
    };

    let parts: Vec<&str> = input.trim().split('/').collect();
    let [library, version] = parts.as_slice() else {
      return Err(invalid("expected <clib>/<version>").into());
    };
    if library.is_empty() {
      return Err(invalid("library name is empty").into());
    }
    if !semver::is_valid(version) {
      return Err(invalid("mapped version is not a semver").into());
    }

    Ok(Self {
      library: library.to_string(),
      version: version.to_string(),
    })
  }
}

impl fmt::Display for MappedVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.library, self.version)
  }
}

fn release_as_regex(package: Option<&str>) -> StoreResult<Regex> {
  let library = match package {
    Some(name) => regex::escape(name),
    None => r"[^\s/]+".to_string(),
  };
  let pattern = format!(r"{}\s({})/(v{})", regex::escape(RELEASE_AS), library, SEMVER_BODY);
  Ok(Regex::new(&pattern)?)
}

/// Find the first `Release-as` directive across commit messages
///
/// With a package name only directives for that library match. Messages are
/// scanned in the order given.
pub fn find_release_as<'a, I>(messages: I, package: Option<&str>) -> StoreResult<MappedVersion>
where
  I: IntoIterator<Item = &'a str>,
{
  let re = release_as_regex(package)?;

  for message in messages {
    if let Some(caps) = re.captures(message) {
      let library = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
      let version = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
      tracing::debug!(library, version, "found Release-as directive");
      return MappedVersion::parse(&format!("{}/{}", library, version));
    }
  }

  Err(
    DirectiveError::ReleaseAsNotFound {
      package: package.map(str::to_string),
    }
    .into(),
  )
}
