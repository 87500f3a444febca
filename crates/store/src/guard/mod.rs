//! Duplicate-aware registration.
//!
//! # Role
//!
//! [`RegistrationGuard`] sits in front of [`KeyedStore::add`] and decides, per its
//! [`DuplicatePolicy`], what happens when a key is registered twice. Every such attempt is
//! recorded as a [`Collision`] for diagnostics, including rejected ones.
//!
//! Alias names are policed the same way: redefining an existing alias is a collision, while
//! registering a canonical key under an alias's name is not (the key replaces the alias).

use crate::error::{DuplicateKey, KeyNotFound, RegistrationError};
use crate::policy::DuplicatePolicy;
use crate::store::KeyedStore;

/// Result of a successful registration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertAction {
	/// Key was new; value inserted.
	InsertedNew,
	/// Key existed; kept the existing value.
	KeptExisting,
	/// Key existed; replaced with the incoming value.
	ReplacedExisting,
}

/// How a collision was settled.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Resolution {
	Rejected,
	KeptExisting,
	ReplacedExisting,
}

impl std::fmt::Display for Resolution {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Rejected => write!(f, "rejected"),
			Self::KeptExisting => write!(f, "kept existing"),
			Self::ReplacedExisting => write!(f, "replaced existing"),
		}
	}
}

/// A registration attempt under an already-present key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Collision {
	pub key: String,
	pub policy: DuplicatePolicy,
	pub resolution: Resolution,
}

impl std::fmt::Display for Collision {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "duplicate key {:?}: {} (policy {})", self.key, self.resolution, self.policy)
	}
}

/// Registration front for a [`KeyedStore`] that polices duplicate keys.
#[derive(Debug, Clone)]
pub struct RegistrationGuard<V> {
	store: KeyedStore<V>,
	policy: DuplicatePolicy,
	collisions: Vec<Collision>,
}

impl<V> RegistrationGuard<V> {
	pub fn new(store: KeyedStore<V>, policy: DuplicatePolicy) -> Self {
		Self {
			store,
			policy,
			collisions: Vec::new(),
		}
	}

	/// Guard that fails duplicate registrations with [`DuplicateKey`].
	pub fn strict(store: KeyedStore<V>) -> Self {
		Self::new(store, DuplicatePolicy::Reject)
	}

	/// Guard that overwrites duplicates with a logged warning.
	pub fn lenient(store: KeyedStore<V>) -> Self {
		Self::new(store, DuplicatePolicy::Replace)
	}

	/// Registers `value` under `key`, applying the duplicate policy if `key` exists.
	pub fn register(&mut self, key: impl Into<String>, value: V) -> Result<InsertAction, RegistrationError> {
		let key = key.into();
		if !self.store.contains_key(&key) {
			self.store.add(key, value)?;
			return Ok(InsertAction::InsertedNew);
		}

		let label = self.store.label().to_string();
		match self.policy {
			DuplicatePolicy::Reject => {
				tracing::debug!(store = %label, key = %key, "duplicate registration rejected");
				self.record(&key, Resolution::Rejected);
				Err(DuplicateKey { store: label, key }.into())
			}
			DuplicatePolicy::Replace => {
				tracing::warn!(store = %label, key = %key, "duplicate registration replaces existing value");
				self.record(&key, Resolution::ReplacedExisting);
				self.store.add(key, value)?;
				Ok(InsertAction::ReplacedExisting)
			}
			DuplicatePolicy::KeepExisting => {
				tracing::warn!(store = %label, key = %key, "duplicate registration ignored, keeping existing value");
				self.record(&key, Resolution::KeptExisting);
				Ok(InsertAction::KeptExisting)
			}
		}
	}

	/// Adds an alias on the wrapped store, applying the duplicate policy if `alias` exists.
	///
	/// Returns the canonical key a replaced alias pointed at.
	pub fn alias(&mut self, alias: impl Into<String>, target: &str) -> Result<Option<String>, RegistrationError> {
		let alias = alias.into();
		if !self.store.contains_alias(&alias) {
			return Ok(self.store.alias(alias, target)?);
		}

		let label = self.store.label().to_string();
		match self.policy {
			DuplicatePolicy::Reject => {
				tracing::debug!(store = %label, alias = %alias, requested = target, "duplicate alias rejected");
				self.record(&alias, Resolution::Rejected);
				Err(DuplicateKey { store: label, key: alias }.into())
			}
			DuplicatePolicy::Replace => {
				let previous = self.store.alias(alias.clone(), target)?;
				tracing::warn!(store = %label, alias = %alias, requested = target, "duplicate alias replaces existing target");
				self.record(&alias, Resolution::ReplacedExisting);
				Ok(previous)
			}
			DuplicatePolicy::KeepExisting => {
				tracing::warn!(store = %label, alias = %alias, requested = target, "duplicate alias ignored, keeping existing target");
				self.record(&alias, Resolution::KeptExisting);
				Ok(None)
			}
		}
	}

	/// Looks up `key` on the wrapped store.
	pub fn get(&self, key: &str) -> Result<Option<&V>, KeyNotFound> {
		self.store.get(key)
	}

	pub fn store(&self) -> &KeyedStore<V> {
		&self.store
	}

	pub fn into_inner(self) -> KeyedStore<V> {
		self.store
	}

	pub fn policy(&self) -> DuplicatePolicy {
		self.policy
	}

	/// Returns recorded collisions in the order they occurred.
	pub fn collisions(&self) -> &[Collision] {
		&self.collisions
	}

	fn record(&mut self, key: &str, resolution: Resolution) {
		self.collisions.push(Collision {
			key: key.to_string(),
			policy: self.policy,
			resolution,
		});
	}
}
