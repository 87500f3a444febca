//! Error types for lookups and registrations.

/// A lookup missed under [`crate::MissPolicy::Strict`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("key not found in {store}: {key:?}{}", did_you_mean(.suggestion))]
pub struct KeyNotFound {
	/// Label of the store that was searched.
	pub store: String,
	/// The missing key.
	pub key: String,
	/// Closest known key, if one is within the store's suggestion distance.
	pub suggestion: Option<String>,
}

/// A registration hit an existing key under [`crate::DuplicatePolicy::Reject`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate key in {store}: {key:?}")]
pub struct DuplicateKey {
	pub store: String,
	pub key: String,
}

/// Structural errors raised by store writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
	#[error("empty key rejected by {store}")]
	EmptyKey { store: String },

	/// An alias would hide a canonical key of the same name.
	#[error("alias {alias:?} shadows a key in {store}")]
	AliasShadowsKey { store: String, alias: String },

	#[error("alias {alias:?} targets unknown key {target:?} in {store}")]
	UnknownAliasTarget {
		store: String,
		alias: String,
		target: String,
	},
}

/// Errors returned by guarded registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
	#[error(transparent)]
	Duplicate(#[from] DuplicateKey),

	#[error(transparent)]
	Store(#[from] StoreError),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
	match suggestion {
		Some(s) => format!(" (did you mean {s:?}?)"),
		None => String::new(),
	}
}
