//! Single-owner name-keyed store.
//!
//! # Role
//!
//! [`KeyedStore`] owns its entries exclusively and resolves lookups by canonical key first,
//! then by alias. Misses are handed to the store's [`MissPolicy`].
//!
//! # Invariants
//!
//! - Keys and aliases are non-empty.
//! - A value is only ever replaced wholesale by [`KeyedStore::add`]; there is no mutable access.
//! - Alias targets are always canonical keys, never other aliases.
//! - Removing a key drops every alias pointing at it.
//! - Adding a key drops any alias of the same name.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::error::{KeyNotFound, StoreError};
use crate::policy::MissPolicy;
use crate::suggest::{self, DEFAULT_SUGGEST_DISTANCE};

pub(crate) const DEFAULT_LABEL: &str = "store";

/// Mapping from string keys to owned values with an explicit miss policy.
#[derive(Debug, Clone)]
pub struct KeyedStore<V> {
	pub(crate) label: String,
	pub(crate) entries: FxHashMap<String, V>,
	/// Alias → canonical key.
	pub(crate) aliases: FxHashMap<String, String>,
	pub(crate) miss: MissPolicy<V>,
	pub(crate) suggest_distance: usize,
}

impl<V> Default for KeyedStore<V> {
	fn default() -> Self {
		Self::new(MissPolicy::Strict)
	}
}

impl<V> KeyedStore<V> {
	/// Creates an empty store with the given miss policy.
	pub fn new(miss: MissPolicy<V>) -> Self {
		Self {
			label: DEFAULT_LABEL.to_string(),
			entries: FxHashMap::default(),
			aliases: FxHashMap::default(),
			miss,
			suggest_distance: DEFAULT_SUGGEST_DISTANCE,
		}
	}

	/// Creates an empty store whose misses fail with [`KeyNotFound`].
	pub fn strict() -> Self {
		Self::new(MissPolicy::Strict)
	}

	/// Creates an empty store whose misses return `default` with a warning.
	pub fn lenient(default: Option<V>) -> Self {
		Self::new(MissPolicy::Lenient { default, warn: true })
	}

	/// Sets the label used in errors and log fields.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	/// Sets the maximum edit distance for miss suggestions (0 disables them).
	pub fn with_suggest_distance(mut self, distance: usize) -> Self {
		self.suggest_distance = distance;
		self
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn miss_policy(&self) -> &MissPolicy<V> {
		&self.miss
	}

	/// Inserts or overwrites the entry for `key`, returning the replaced value.
	///
	/// An alias of the same name is dropped, so removing the entry later leaves a miss.
	///
	/// Overwriting is never an error; use [`crate::RegistrationGuard`] to police duplicates.
	pub fn add(&mut self, key: impl Into<String>, value: V) -> Result<Option<V>, StoreError> {
		let key = key.into();
		if key.is_empty() {
			return Err(StoreError::EmptyKey { store: self.label.clone() });
		}

		match self.entries.entry(key) {
			Entry::Occupied(mut slot) => {
				tracing::debug!(store = %self.label, key = %slot.key(), "entry replaced");
				Ok(Some(slot.insert(value)))
			}
			Entry::Vacant(slot) => {
				if let Some(canonical) = self.aliases.remove(slot.key()) {
					tracing::debug!(store = %self.label, key = %slot.key(), %canonical, "alias replaced by entry");
				}
				tracing::debug!(store = %self.label, key = %slot.key(), "entry added");
				slot.insert(value);
				Ok(None)
			}
		}
	}

	/// Looks up `key`, applying the miss policy when it is absent.
	///
	/// Returns `Ok(Some(value))` on a hit. On a miss, a strict store returns [`KeyNotFound`] and a
	/// lenient store returns its configured default (`Ok(None)` when none is configured).
	pub fn get(&self, key: &str) -> Result<Option<&V>, KeyNotFound> {
		if let Some(value) = self.lookup(key) {
			return Ok(Some(value));
		}
		self.miss.on_miss(&self.label, key, || self.suggest(key))
	}

	/// Looks up `key` by canonical key or alias, ignoring the miss policy.
	pub fn lookup(&self, key: &str) -> Option<&V> {
		self.resolve_key(key).and_then(|canonical| self.entries.get(canonical))
	}

	/// Returns the canonical key `key` resolves to.
	pub fn resolve_key<'a>(&'a self, key: &'a str) -> Option<&'a str> {
		if self.entries.contains_key(key) {
			return Some(key);
		}
		self.aliases.get(key).map(String::as_str)
	}

	/// Returns true if `key` resolves, either directly or through an alias.
	pub fn contains(&self, key: &str) -> bool {
		self.resolve_key(key).is_some()
	}

	/// Returns true if `key` is a canonical key of this store.
	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Returns true if `key` is an alias of this store.
	pub fn contains_alias(&self, key: &str) -> bool {
		self.aliases.contains_key(key)
	}

	/// Removes the canonical entry for `key` together with its aliases.
	pub fn remove(&mut self, key: &str) -> Option<V> {
		let value = self.entries.remove(key)?;
		self.aliases.retain(|_, target| target != key);
		tracing::debug!(store = %self.label, key, "entry removed");
		Some(value)
	}

	/// Makes `alias` resolve to the canonical key behind `target`.
	///
	/// `target` may itself be an alias; the new alias points at its canonical key. Returns the
	/// canonical key the alias previously pointed at, if any.
	pub fn alias(&mut self, alias: impl Into<String>, target: &str) -> Result<Option<String>, StoreError> {
		let alias = alias.into();
		if alias.is_empty() {
			return Err(StoreError::EmptyKey { store: self.label.clone() });
		}
		if self.entries.contains_key(&alias) {
			return Err(StoreError::AliasShadowsKey {
				store: self.label.clone(),
				alias,
			});
		}
		let Some(canonical) = self.resolve_key(target).map(str::to_string) else {
			return Err(StoreError::UnknownAliasTarget {
				store: self.label.clone(),
				alias,
				target: target.to_string(),
			});
		};

		tracing::debug!(store = %self.label, alias = %alias, target = %canonical, "alias added");
		Ok(self.aliases.insert(alias, canonical))
	}

	/// Closest known key or alias to `key`, within the store's suggestion distance.
	pub fn suggest(&self, key: &str) -> Option<String> {
		let candidates = self.entries.keys().chain(self.aliases.keys()).map(String::as_str);
		suggest::closest(key, candidates, self.suggest_distance)
	}

	/// Canonical keys in sorted order.
	pub fn keys(&self) -> Vec<&str> {
		let mut keys: Vec<_> = self.entries.keys().map(String::as_str).collect();
		keys.sort_unstable();
		keys
	}

	/// Entries in sorted key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
		let mut entries: Vec<_> = self.entries.iter().map(|(k, v)| (k.as_str(), v)).collect();
		entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
		entries.into_iter()
	}

	/// `(alias, canonical key)` pairs in sorted alias order.
	pub fn aliases(&self) -> Vec<(&str, &str)> {
		let mut aliases: Vec<_> = self.aliases.iter().map(|(a, k)| (a.as_str(), k.as_str())).collect();
		aliases.sort_unstable();
		aliases
	}

	/// Returns the number of canonical entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
