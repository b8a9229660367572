//! Core runtime for Slugline: slug configuration, candidate building, the
//! save-path lifecycle trigger, atomic persistence operations, and slug
//! lookup, plus the ergonomics exported via the `prelude`.
//!
//! The uniqueness search, the storage engine, and text transliteration are
//! external collaborators consumed through the traits in [`traits`].
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod adapter;
pub mod candidate;
pub mod config;
pub mod engine;
pub mod error;
pub mod fields;
pub mod lifecycle;
pub mod lookup;
pub mod obs;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Largest key the backing store's indexes accept, in bytes.
pub const INDEX_KEY_LIMIT: usize = 1024;

/// Fixed per-key overhead the store adds to indexed slug values
/// (type tag, scope prefix, length framing).
pub const INDEX_KEY_OVERHEAD: usize = 32;

/// Default cap on resolved slug length.
///
/// Sits safely under [`INDEX_KEY_LIMIT`] so a slug at the cap still fits an
/// index entry after the store's fixed overhead.
pub const MAX_SLUG_LENGTH: usize = INDEX_KEY_LIMIT - INDEX_KEY_OVERHEAD;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, stores, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        config::{RebuildPolicy, SlugConfig, SlugConfigBuilder},
        engine::SlugEngine,
        fields::SlugFields,
        lifecycle::{RebuildOutcome, SaveEvent},
        traits::{ScopeProvider, SlugDocument, SlugStore, UniquenessResolver},
        value::Value,
    };
}
