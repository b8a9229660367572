use crate::{error::SlugError, fields::SlugFields, value::Value};
use std::{collections::BTreeSet, fmt, fmt::Debug, hash::Hash};

// ============================================================================
// DOCUMENT BOUNDARY
// ============================================================================
//
// These traits describe what the host's documents must expose,
// not how they are stored or saved.
//

///
/// SlugDocument
///
/// A persisted record bearing slug fields.
///
/// ## Semantics
/// - `Key` is the primary identifier; lookup deduplicates by it and the URL
///   token falls back to its rendering.
/// - Dirty-field inspection reflects changes since the document was loaded,
///   per the host's own change tracking.
/// - `slug_fields` is the single embedded slug state; all slug mutation
///   flows through it.
///

pub trait SlugDocument {
    type Key: Copy + Debug + Eq + Hash + fmt::Display;

    fn key(&self) -> Self::Key;

    /// Stable declared type name, used for shared slug namespaces.
    fn model_type(&self) -> &'static str;

    /// True until the document has been persisted for the first time.
    fn is_new(&self) -> bool;

    /// Whether `field` has been modified since the document was loaded.
    fn is_field_changed(&self, field: &str) -> bool;

    /// Current text rendering of a source field, `None` when absent.
    fn field_text(&self, field: &str) -> Option<String>;

    /// Current scalar value of a field, for scope partitioning.
    fn field_value(&self, field: &str) -> Option<Value>;

    fn slug_fields(&self) -> &SlugFields;
    fn slug_fields_mut(&mut self) -> &mut SlugFields;
}

// ============================================================================
// PERSISTENCE / QUERY BOUNDARY
// ============================================================================

///
/// SlugStore
///
/// Primitive operations this core needs from the persistence engine.
///
/// ## Atomicity
/// Each write is a single atomic partial update: a failure must leave the
/// stored document unchanged. `write_slug` persists the pair and the history
/// array together so the sparse uniqueness index never disagrees with the
/// stored history.
///

pub trait SlugStore<D: SlugDocument> {
    /// Atomically set the stored slug fields for `key`.
    fn write_slug(&mut self, key: D::Key, fields: &SlugFields) -> Result<(), SlugError>;

    /// Atomically remove the stored slug pair for `key`.
    ///
    /// Removal (not an empty write) is required: the sparse uniqueness index
    /// over the slug field must not contain an entry for documents without
    /// a slug.
    fn unset_slug(&mut self, key: D::Key) -> Result<(), SlugError>;

    /// Read the last-persisted slug state for `key`.
    fn load_slug(&self, key: D::Key) -> Result<SlugFields, SlugError>;

    /// "Slug equals any of `tokens`" over current values and, when
    /// `include_history` is set, historical values, filtered by the declared
    /// type namespace when `model_type` is present.
    ///
    /// May return a document more than once when several tokens hit it;
    /// deduplication is the lookup coordinator's job.
    fn find_any_slug_in(
        &self,
        tokens: &[String],
        model_type: Option<&str>,
        include_history: bool,
    ) -> Result<Vec<D>, SlugError>;
}

// ============================================================================
// UNIQUENESS BOUNDARY
// ============================================================================

///
/// ResolveRequest
///
/// Arguments handed to the uniqueness resolver for one candidate.
///

#[derive(Debug)]
pub struct ResolveRequest<'a> {
    /// Raw candidate, not yet transliterated or collision-checked.
    pub candidate: &'a str,
    /// Partition within which uniqueness is evaluated, when configured.
    pub scope: Option<&'a Value>,
    /// Declared type namespace, when the configuration partitions by type.
    pub model_type: Option<&'a str>,
    /// Values that may never be accepted as a final slug.
    pub reserved_words: &'a BTreeSet<String>,
    /// Cap on the resolved slug's length.
    pub max_length: usize,
}

///
/// UniquenessResolver
///
/// External candidate-uniqueness search: transliterates the candidate and
/// finds a collision-free variant within the requested partition.
///
/// Serialization/retry under concurrent colliding creates is the resolver's
/// responsibility; this core only guarantees accurate request arguments.
///

pub trait UniquenessResolver {
    /// Resolve a collision-free slug. An empty string signals "no candidate
    /// to assign" and is treated as a no-op by the lifecycle trigger.
    fn resolve_unique(&mut self, request: &ResolveRequest<'_>) -> Result<String, SlugError>;
}

// ============================================================================
// AMBIENT SCOPE
// ============================================================================

///
/// ScopeProvider
///
/// Injected capability that reads the current scope partition value off a
/// document, keeping this core independent of how the host materializes
/// associations.
///

pub trait ScopeProvider<D: SlugDocument> {
    fn scope_value(&self, doc: &D, scope_key: &str) -> Option<Value>;
}

///
/// FieldScope
///
/// Default scope provider: the scope key is a plain sibling field.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct FieldScope;

impl<D: SlugDocument> ScopeProvider<D> for FieldScope {
    fn scope_value(&self, doc: &D, scope_key: &str) -> Option<Value> {
        doc.field_value(scope_key)
    }
}
