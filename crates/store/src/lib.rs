//! Name-keyed stores with explicit lookup and registration policies.
//!
//! # Mental Model
//!
//! 1. **Lookup:** [`KeyedStore`] maps string keys (and optional aliases) to owned values.
//!    What happens on a miss is decided by the store's [`MissPolicy`], chosen at construction.
//! 2. **Registration:** [`RegistrationGuard`] wraps a store and applies a [`DuplicatePolicy`]
//!    before delegating to [`KeyedStore::add`], recording every [`Collision`].
//! 3. **Sharing:** [`SharedStore`] publishes immutable snapshots through an atomic pointer so
//!    readers on other threads never block writers.
//! 4. **Loading:** [`StoreConfig`] selects policies from TOML, and [`Manifest`] files populate
//!    a guarded store of [`toml::Value`]s.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`KeyedStore`] | Single-owner name→value map with a miss policy. |
//! | [`MissPolicy`] | Strict (error) or lenient (default plus warning) miss handling. |
//! | [`RegistrationGuard`] | Duplicate-aware registration front for a [`KeyedStore`]. |
//! | [`SharedStore`] | Thread-safe store with wait-free reads. |
//! | [`StoreConfig`] | Deserialized policy selection. |
//! | [`Manifest`] | TOML entries and aliases to register. |
//!
//! # Invariants
//!
//! - A stored value is never mutated by the store, only replaced wholesale by a later write
//!   under the same key.
//! - Keys are non-empty.
//! - An alias never shadows a canonical key; canonical keys are resolved first.

pub mod config;
pub mod error;
pub mod guard;
pub mod manifest;
pub mod policy;
pub mod shared;
pub mod store;
mod suggest;
#[cfg(test)]
mod test_log;

pub use config::{ConfigError, MissMode, StoreConfig};
pub use error::{DuplicateKey, KeyNotFound, RegistrationError, StoreError};
pub use guard::{Collision, InsertAction, RegistrationGuard, Resolution};
pub use manifest::{LoadReport, Manifest, load_manifests};
pub use policy::{DuplicatePolicy, MissPolicy};
pub use shared::{SharedStore, Snapshot};
pub use store::KeyedStore;
pub use suggest::DEFAULT_SUGGEST_DISTANCE;
