//! TOML manifests of entries and aliases.
//!
//! ```toml
//! [entries]
//! alpha = 42
//! beta = { kind = "handler", weight = 2 }
//!
//! [aliases]
//! a = "alpha"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::ConfigError;
use crate::error::RegistrationError;
use crate::guard::RegistrationGuard;

/// Parsed manifest contents.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
	#[serde(default)]
	pub entries: toml::Table,
	/// Alias → target key.
	#[serde(default)]
	pub aliases: BTreeMap<String, String>,
}

impl Manifest {
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(content)?)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}

	/// Registers entries, then aliases, through `guard`.
	///
	/// Failures do not stop the remaining registrations; they are returned in order.
	pub fn apply(self, guard: &mut RegistrationGuard<toml::Value>) -> Vec<RegistrationError> {
		let mut errors = Vec::new();
		for (key, value) in self.entries {
			if let Err(error) = guard.register(key, value) {
				errors.push(error);
			}
		}
		for (alias, target) in self.aliases {
			if let Err(error) = guard.alias(alias, &target) {
				errors.push(error);
			}
		}
		errors
	}
}

/// Aggregate result of loading manifest files.
#[derive(Debug, Default)]
pub struct LoadReport {
	/// Files that were read and parsed, in load order.
	pub loaded: Vec<PathBuf>,
	/// Read, parse and registration errors keyed by source file path.
	pub errors: Vec<(PathBuf, String)>,
}

impl LoadReport {
	pub fn is_clean(&self) -> bool {
		self.errors.is_empty()
	}
}

/// Loads manifests in order into `guard`.
///
/// Later files see the entries of earlier ones, so cross-file duplicates are handled by the
/// guard's policy. A broken file is reported and skipped.
pub fn load_manifests<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>, guard: &mut RegistrationGuard<toml::Value>) -> LoadReport {
	let mut report = LoadReport::default();

	for path in paths {
		let path = path.as_ref();
		let manifest = match Manifest::load(path) {
			Ok(manifest) => manifest,
			Err(error) => {
				tracing::warn!(path = %path.display(), %error, "manifest skipped");
				report.errors.push((path.to_path_buf(), error.to_string()));
				continue;
			}
		};

		let count = manifest.entries.len();
		for error in manifest.apply(guard) {
			report.errors.push((path.to_path_buf(), error.to_string()));
		}
		tracing::debug!(path = %path.display(), entries = count, "manifest loaded");
		report.loaded.push(path.to_path_buf());
	}

	report
}

#[cfg(test)]
mod tests {
	use std::path::Path;

	use pretty_assertions::assert_eq;

	use super::*;
	use crate::policy::DuplicatePolicy;
	use crate::store::KeyedStore;

	fn write_file(path: &Path, content: &str) {
		std::fs::write(path, content).expect("file should be writable");
	}

	fn guard(policy: DuplicatePolicy) -> RegistrationGuard<toml::Value> {
		RegistrationGuard::new(KeyedStore::strict().with_label("manifest"), policy)
	}

	#[test]
	fn parses_entries_and_aliases() {
		let manifest = Manifest::from_toml_str("[entries]\nalpha = 42\nbeta = \"two\"\n\n[aliases]\na = \"alpha\"\n").unwrap();
		assert_eq!(manifest.entries.get("alpha"), Some(&toml::Value::Integer(42)));
		assert_eq!(manifest.aliases.get("a").map(String::as_str), Some("alpha"));
	}

	#[test]
	fn rejects_unknown_sections() {
		assert!(Manifest::from_toml_str("[extras]\nx = 1").is_err());
	}

	#[test]
	fn apply_registers_everything() {
		let manifest = Manifest::from_toml_str("[entries]\nalpha = 42\n[aliases]\na = \"alpha\"\n").unwrap();
		let mut guard = guard(DuplicatePolicy::Reject);
		assert!(manifest.apply(&mut guard).is_empty());
		assert_eq!(guard.get("a").unwrap(), Some(&toml::Value::Integer(42)));
	}

	#[test]
	fn apply_collects_alias_errors() {
		let manifest = Manifest::from_toml_str("[aliases]\na = \"missing\"\n").unwrap();
		let mut guard = guard(DuplicatePolicy::Reject);
		let errors = manifest.apply(&mut guard);
		assert_eq!(errors.len(), 1);
		assert!(matches!(errors[0], RegistrationError::Store(_)));
	}

	#[test]
	fn load_continues_past_broken_file() {
		let dir = tempfile::tempdir().expect("create tempdir");
		let first = dir.path().join("first.toml");
		let broken = dir.path().join("broken.toml");
		let last = dir.path().join("last.toml");
		write_file(&first, "[entries]\nalpha = 1\n");
		write_file(&broken, "[entries\n");
		write_file(&last, "[entries]\nbeta = 2\n");

		let mut guard = guard(DuplicatePolicy::Reject);
		let report = load_manifests([&first, &broken, &last], &mut guard);

		assert_eq!(report.loaded, vec![first, last]);
		assert_eq!(report.errors.len(), 1);
		assert_eq!(report.errors[0].0, broken);
		assert_eq!(guard.store().keys(), vec!["alpha", "beta"]);
	}

	#[test]
	fn cross_file_duplicates_follow_policy() {
		let dir = tempfile::tempdir().expect("create tempdir");
		let base = dir.path().join("base.toml");
		let over = dir.path().join("override.toml");
		write_file(&base, "[entries]\nalpha = 1\n");
		write_file(&over, "[entries]\nalpha = 2\n");

		let mut strict = guard(DuplicatePolicy::Reject);
		let report = load_manifests([&base, &over], &mut strict);
		assert!(!report.is_clean());
		assert_eq!(report.errors[0].0, over);
		assert_eq!(strict.get("alpha").unwrap(), Some(&toml::Value::Integer(1)));

		let mut lenient = guard(DuplicatePolicy::Replace);
		let report = load_manifests([&base, &over], &mut lenient);
		assert!(report.is_clean());
		assert_eq!(lenient.get("alpha").unwrap(), Some(&toml::Value::Integer(2)));
		assert_eq!(lenient.collisions().len(), 1);
	}

	#[test]
	fn cross_file_alias_redefinition_follows_policy() {
		let dir = tempfile::tempdir().expect("create tempdir");
		let base = dir.path().join("base.toml");
		let over = dir.path().join("override.toml");
		write_file(&base, "[entries]\nalpha = 1\nbeta = 2\n[aliases]\nx = \"alpha\"\n");
		write_file(&over, "[aliases]\nx = \"beta\"\n");

		let mut strict = guard(DuplicatePolicy::Reject);
		let report = load_manifests([&base, &over], &mut strict);
		assert_eq!(report.errors.len(), 1);
		assert_eq!(report.errors[0].0, over);
		assert_eq!(strict.get("x").unwrap(), Some(&toml::Value::Integer(1)));
		assert_eq!(strict.collisions().len(), 1);

		let mut lenient = guard(DuplicatePolicy::Replace);
		let report = load_manifests([&base, &over], &mut lenient);
		assert!(report.is_clean());
		assert_eq!(lenient.get("x").unwrap(), Some(&toml::Value::Integer(2)));
	}

	#[test]
	fn missing_file_is_reported() {
		let dir = tempfile::tempdir().expect("create tempdir");
		let mut guard = guard(DuplicatePolicy::Reject);
		let report = load_manifests([dir.path().join("absent.toml")], &mut guard);
		assert!(report.loaded.is_empty());
		assert_eq!(report.errors.len(), 1);
	}
}
