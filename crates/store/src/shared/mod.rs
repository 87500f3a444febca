//! Thread-safe store with atomic snapshot publication.
//!
//! # Role
//!
//! [`SharedStore`] is the concurrent counterpart of [`KeyedStore`] + [`RegistrationGuard`].
//! Readers load the current [`Snapshot`] and never block. Writers clone the snapshot, apply
//! their change, and publish it with a compare-and-swap, retrying against the newer snapshot
//! when another writer got there first.
//!
//! # Invariants
//!
//! - Concurrent registrations are linearizable; none is lost.
//! - A loaded snapshot is immutable and stays valid after later writes.
//!
//! [`RegistrationGuard`]: crate::RegistrationGuard

use std::sync::Arc;

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;

use crate::error::{DuplicateKey, KeyNotFound, RegistrationError, StoreError};
use crate::guard::InsertAction;
use crate::policy::{DuplicatePolicy, MissPolicy};
use crate::store::{DEFAULT_LABEL, KeyedStore};
use crate::suggest::{self, DEFAULT_SUGGEST_DISTANCE};

/// Immutable view of a [`SharedStore`] at one point in time.
pub struct Snapshot<V> {
	entries: FxHashMap<String, Arc<V>>,
}

impl<V> Clone for Snapshot<V> {
	fn clone(&self) -> Self {
		Self {
			entries: self.entries.clone(),
		}
	}
}

impl<V> Snapshot<V> {
	fn empty() -> Self {
		Self {
			entries: FxHashMap::default(),
		}
	}

	pub fn get(&self, key: &str) -> Option<&Arc<V>> {
		self.entries.get(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Keys in sorted order.
	pub fn keys(&self) -> Vec<&str> {
		let mut keys: Vec<_> = self.entries.keys().map(String::as_str).collect();
		keys.sort_unstable();
		keys
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Concurrent name-keyed store with wait-free reads.
pub struct SharedStore<V> {
	label: String,
	snap: ArcSwap<Snapshot<V>>,
	miss: MissPolicy<Arc<V>>,
	duplicates: DuplicatePolicy,
	suggest_distance: usize,
}

impl<V> SharedStore<V> {
	/// Creates an empty shared store.
	pub fn new(miss: MissPolicy<V>, duplicates: DuplicatePolicy) -> Self {
		Self {
			label: DEFAULT_LABEL.to_string(),
			snap: ArcSwap::from_pointee(Snapshot::empty()),
			miss: miss.map(Arc::new),
			duplicates,
			suggest_distance: DEFAULT_SUGGEST_DISTANCE,
		}
	}

	/// Publishes the entries of `store`, keeping its label, miss policy and suggestion distance.
	///
	/// Aliases are dropped; the shared store only keeps canonical keys.
	pub fn from_store(store: KeyedStore<V>, duplicates: DuplicatePolicy) -> Self {
		let entries = store.entries.into_iter().map(|(k, v)| (k, Arc::new(v))).collect();
		Self {
			label: store.label,
			snap: ArcSwap::from_pointee(Snapshot { entries }),
			miss: store.miss.map(Arc::new),
			duplicates,
			suggest_distance: store.suggest_distance,
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	pub fn with_suggest_distance(mut self, distance: usize) -> Self {
		self.suggest_distance = distance;
		self
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn duplicate_policy(&self) -> DuplicatePolicy {
		self.duplicates
	}

	/// Looks up `key` in the current snapshot, applying the miss policy when it is absent.
	pub fn get(&self, key: &str) -> Result<Option<Arc<V>>, KeyNotFound> {
		let snap = self.snap.load();
		if let Some(value) = snap.get(key) {
			return Ok(Some(Arc::clone(value)));
		}
		let nearest = || suggest::closest(key, snap.entries.keys().map(String::as_str), self.suggest_distance);
		self.miss.on_miss(&self.label, key, nearest).map(|default| default.cloned())
	}

	/// Registers `value` under `key` with linearizable semantics.
	pub fn register(&self, key: impl Into<String>, value: V) -> Result<InsertAction, RegistrationError> {
		let key = key.into();
		if key.is_empty() {
			return Err(StoreError::EmptyKey { store: self.label.clone() }.into());
		}
		let value = Arc::new(value);

		loop {
			let old = self.snap.load_full();

			let action = if old.contains_key(&key) {
				match self.duplicates {
					DuplicatePolicy::Reject => {
						tracing::debug!(store = %self.label, key = %key, "duplicate registration rejected");
						return Err(DuplicateKey {
							store: self.label.clone(),
							key,
						}
						.into());
					}
					DuplicatePolicy::KeepExisting => {
						tracing::warn!(store = %self.label, key = %key, "duplicate registration ignored, keeping existing value");
						return Ok(InsertAction::KeptExisting);
					}
					DuplicatePolicy::Replace => InsertAction::ReplacedExisting,
				}
			} else {
				InsertAction::InsertedNew
			};

			let mut next = Snapshot::clone(&old);
			next.entries.insert(key.clone(), Arc::clone(&value));

			let prev = self.snap.compare_and_swap(&old, Arc::new(next));
			if Arc::ptr_eq(&prev, &old) {
				if action == InsertAction::ReplacedExisting {
					tracing::warn!(store = %self.label, key = %key, "duplicate registration replaces existing value");
				}
				return Ok(action);
			}
			// Lost the race; retry against the newer snapshot.
		}
	}

	/// Removes `key`, returning the value it held.
	pub fn remove(&self, key: &str) -> Option<Arc<V>> {
		loop {
			let old = self.snap.load_full();
			let removed = Arc::clone(old.get(key)?);

			let mut next = Snapshot::clone(&old);
			next.entries.remove(key);

			let prev = self.snap.compare_and_swap(&old, Arc::new(next));
			if Arc::ptr_eq(&prev, &old) {
				return Some(removed);
			}
		}
	}

	/// Returns the current snapshot; it is unaffected by later writes.
	pub fn snapshot(&self) -> Arc<Snapshot<V>> {
		self.snap.load_full()
	}

	/// Keys of the current snapshot in sorted order.
	pub fn keys(&self) -> Vec<String> {
		self.snap.load().keys().into_iter().map(str::to_string).collect()
	}

	pub fn len(&self) -> usize {
		self.snap.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
