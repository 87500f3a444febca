//! Miss and duplicate handling strategies.
//!
//! Both are chosen when a store is constructed; a store never switches policy per call.

use serde::Deserialize;

use crate::error::KeyNotFound;

/// What a lookup does when the key is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissPolicy<V> {
	/// Fail with [`KeyNotFound`].
	Strict,
	/// Return `default`, logging a warning when `warn` is set.
	Lenient { default: Option<V>, warn: bool },
}

impl<V> Default for MissPolicy<V> {
	fn default() -> Self {
		Self::Strict
	}
}

impl<V> MissPolicy<V> {
	/// Lenient policy returning `None` with a warning.
	pub const fn lenient() -> Self {
		Self::Lenient { default: None, warn: true }
	}

	/// Lenient policy returning `default` with a warning.
	pub fn lenient_with(default: V) -> Self {
		Self::Lenient {
			default: Some(default),
			warn: true,
		}
	}

	/// Lenient policy returning `None` without logging.
	pub const fn silent() -> Self {
		Self::Lenient { default: None, warn: false }
	}

	pub fn is_strict(&self) -> bool {
		matches!(self, Self::Strict)
	}

	/// Converts the configured default, keeping the variant.
	pub fn map<U>(self, f: impl FnOnce(V) -> U) -> MissPolicy<U> {
		match self {
			Self::Strict => MissPolicy::Strict,
			Self::Lenient { default, warn } => MissPolicy::Lenient {
				default: default.map(f),
				warn,
			},
		}
	}

	/// Resolves a miss for `key` in the store labelled `store`.
	///
	/// `suggest` is only evaluated when its result is reported.
	pub fn on_miss<'a>(&'a self, store: &str, key: &str, suggest: impl FnOnce() -> Option<String>) -> Result<Option<&'a V>, KeyNotFound> {
		match self {
			Self::Strict => Err(KeyNotFound {
				store: store.to_string(),
				key: key.to_string(),
				suggestion: suggest(),
			}),
			Self::Lenient { default, warn } => {
				if *warn {
					let suggestion = suggest();
					tracing::warn!(store, key, suggestion = suggestion.as_deref(), "lookup missed, returning default");
				}
				Ok(default.as_ref())
			}
		}
	}
}

/// What a guarded registration does when the key already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
	/// Fail with [`crate::DuplicateKey`], leaving the existing value in place.
	#[default]
	Reject,
	/// Overwrite the existing value and log a warning.
	Replace,
	/// Keep the existing value, drop the incoming one and log a warning.
	KeepExisting,
}

impl std::fmt::Display for DuplicatePolicy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Reject => write!(f, "reject"),
			Self::Replace => write!(f, "replace"),
			Self::KeepExisting => write!(f, "keep-existing"),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;

	#[test]
	fn strict_miss_errors_with_suggestion() {
		let policy = MissPolicy::<u32>::Strict;
		let err = policy.on_miss("s", "alpah", || Some("alpha".into())).unwrap_err();
		assert_eq!(err.key, "alpah");
		assert_eq!(err.store, "s");
		assert_eq!(err.suggestion.as_deref(), Some("alpha"));
	}

	#[test]
	fn lenient_miss_returns_default() {
		let policy = MissPolicy::lenient_with(7u32);
		assert_eq!(policy.on_miss("s", "missing", || None), Ok(Some(&7)));

		let policy = MissPolicy::<u32>::lenient();
		assert_eq!(policy.on_miss("s", "missing", || None), Ok(None));
	}

	#[test]
	fn silent_policy_skips_suggestion() {
		let called = Cell::new(false);
		let policy = MissPolicy::<u32>::silent();
		let result = policy.on_miss("s", "missing", || {
			called.set(true);
			None
		});
		assert_eq!(result, Ok(None));
		assert!(!called.get());
	}

	#[test]
	fn map_keeps_variant() {
		let mapped = MissPolicy::lenient_with(2u32).map(|v| v * 10);
		assert_eq!(
			mapped,
			MissPolicy::Lenient {
				default: Some(20),
				warn: true
			}
		);
		assert!(MissPolicy::<u32>::Strict.map(|v| v + 1).is_strict());
	}

	#[test]
	fn duplicate_policy_names() {
		assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::Reject);
		assert_eq!(DuplicatePolicy::KeepExisting.to_string(), "keep-existing");
	}
}
