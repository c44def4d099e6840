//! Provide hash containers, re-exports *hashbrown* and *foldhash*.
//!
//! - [`FixedHashState`]: stable results for a given input, used for persisted identifiers.
//! - [`NoOpHashState`]: for keys which are already hashes (type tags, `TypeId`).

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};
pub use hasher::{NoOpHashState, NoOpHasher};

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashMap`] whose keys are already well distributed `u64`s.
pub type NoOpHashMap<K, V> = hashbrown::HashMap<K, V, NoOpHashState>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
