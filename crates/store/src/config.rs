//! Policy selection from TOML.
//!
//! ```toml
//! [store]
//! label = "handlers"
//! miss = "lenient"
//! warn-on-miss = false
//! duplicates = "keep-existing"
//! suggest-distance = 2
//! ```
//!
//! Every field is optional. A lenient store built from config always defaults to `None`;
//! typed defaults are set in code with [`MissPolicy::lenient_with`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::guard::RegistrationGuard;
use crate::policy::{DuplicatePolicy, MissPolicy};
use crate::shared::SharedStore;
use crate::store::{DEFAULT_LABEL, KeyedStore};
use crate::suggest::DEFAULT_SUGGEST_DISTANCE;

/// Errors reading or parsing a TOML file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Miss handling as named in config files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissMode {
	#[default]
	Strict,
	Lenient,
}

/// The `[store]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct StoreConfig {
	pub label: String,
	pub miss: MissMode,
	/// Only consulted for [`MissMode::Lenient`].
	pub warn_on_miss: bool,
	pub duplicates: DuplicatePolicy,
	pub suggest_distance: usize,
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self {
			label: DEFAULT_LABEL.to_string(),
			miss: MissMode::Strict,
			warn_on_miss: true,
			duplicates: DuplicatePolicy::Reject,
			suggest_distance: DEFAULT_SUGGEST_DISTANCE,
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
	#[serde(default)]
	store: StoreConfig,
}

impl StoreConfig {
	/// Parses a config document.
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		let file: ConfigFile = toml::from_str(content)?;
		Ok(file.store)
	}

	/// Reads and parses a config file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let config = Self::from_toml_str(&content)?;
		tracing::debug!(path = %path.display(), label = %config.label, "store config loaded");
		Ok(config)
	}

	pub fn miss_policy<V>(&self) -> MissPolicy<V> {
		match self.miss {
			MissMode::Strict => MissPolicy::Strict,
			MissMode::Lenient => MissPolicy::Lenient {
				default: None,
				warn: self.warn_on_miss,
			},
		}
	}

	pub fn build_store<V>(&self) -> KeyedStore<V> {
		KeyedStore::new(self.miss_policy())
			.with_label(self.label.clone())
			.with_suggest_distance(self.suggest_distance)
	}

	pub fn build_guard<V>(&self) -> RegistrationGuard<V> {
		RegistrationGuard::new(self.build_store(), self.duplicates)
	}

	pub fn build_shared<V>(&self) -> SharedStore<V> {
		SharedStore::new(self.miss_policy(), self.duplicates)
			.with_label(self.label.clone())
			.with_suggest_distance(self.suggest_distance)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_document_uses_defaults() {
		assert_eq!(StoreConfig::from_toml_str("").unwrap(), StoreConfig::default());
		assert_eq!(StoreConfig::from_toml_str("[store]").unwrap(), StoreConfig::default());
	}

	#[test]
	fn parses_every_field() {
		let config = StoreConfig::from_toml_str(
			r#"
			[store]
			label = "handlers"
			miss = "lenient"
			warn-on-miss = false
			duplicates = "keep-existing"
			suggest-distance = 1
			"#,
		)
		.unwrap();

		assert_eq!(
			config,
			StoreConfig {
				label: "handlers".into(),
				miss: MissMode::Lenient,
				warn_on_miss: false,
				duplicates: DuplicatePolicy::KeepExisting,
				suggest_distance: 1,
			}
		);
		assert_eq!(config.miss_policy::<u8>(), MissPolicy::silent());
	}

	#[test]
	fn rejects_unknown_fields() {
		assert!(matches!(StoreConfig::from_toml_str("[store]\ncolor = 1"), Err(ConfigError::Toml(_))));
		assert!(matches!(StoreConfig::from_toml_str("[other]"), Err(ConfigError::Toml(_))));
	}

	#[test]
	fn rejects_unknown_policy_names() {
		assert!(StoreConfig::from_toml_str("[store]\nduplicates = \"explode\"").is_err());
		assert!(StoreConfig::from_toml_str("[store]\nmiss = \"loose\"").is_err());
	}

	#[test]
	fn built_store_carries_settings() {
		let config = StoreConfig {
			label: "cfg".into(),
			miss: MissMode::Lenient,
			..StoreConfig::default()
		};
		let store = config.build_store::<u8>();
		assert_eq!(store.label(), "cfg");
		assert_eq!(store.get("missing"), Ok(None));

		let guard = config.build_guard::<u8>();
		assert_eq!(guard.policy(), DuplicatePolicy::Reject);

		let shared = config.build_shared::<u8>();
		assert_eq!(shared.label(), "cfg");
	}

	#[test]
	fn load_reads_file() {
		let dir = tempfile::tempdir().expect("create tempdir");
		let path = dir.path().join("keyreg.toml");
		std::fs::write(&path, "[store]\nlabel = \"from-file\"\n").expect("write config");
		assert_eq!(StoreConfig::load(&path).unwrap().label, "from-file");
	}

	#[test]
	fn load_reports_missing_file() {
		let dir = tempfile::tempdir().expect("create tempdir");
		let err = StoreConfig::load(&dir.path().join("absent.toml")).unwrap_err();
		assert!(matches!(err, ConfigError::Io { .. }));
	}
}
