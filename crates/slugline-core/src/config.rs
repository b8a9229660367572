use crate::{MAX_SLUG_LENGTH, error::SlugError};
use derive_more::Display;
use std::{collections::BTreeSet, fmt};

///
/// CONSTANTS
///

/// Storage field holding the current slug.
pub const SLUG_FIELD: &str = "slug";

/// Storage field holding the case-folded comparison value.
pub const SLUG_LOWER_FIELD: &str = "_slug_lower";

/// Storage field holding the append-only slug history.
pub const SLUG_HISTORY_FIELD: &str = "_slug_history";

/// Built-in reserved words; route verbs that must never win a slug.
pub const DEFAULT_RESERVED_WORDS: &[&str] = &["new", "edit"];

///
/// RebuildPolicy
///
/// Permanent   : computed once at creation, never recomputed
/// Rebuildable : recomputed on any save that touches slug-affecting fields
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum RebuildPolicy {
    Permanent,
    #[default]
    Rebuildable,
}

/// Custom candidate builder supplied at configuration time.
pub type CandidateFn<D> = dyn Fn(&D) -> String + Send + Sync;

///
/// SlugConfig
///
/// Per-model-type slug settings. Built once at model-type declaration time
/// via [`SlugConfigBuilder`], read-only thereafter, and passed by reference
/// to every document operation.
///

pub struct SlugConfig<D> {
    model_type: &'static str,
    source_fields: Vec<String>,
    scope_key: Option<String>,
    reserved_words: BTreeSet<String>,
    max_length: usize,
    history: bool,
    by_model_type: bool,
    policy: RebuildPolicy,
    custom_builder: Option<Box<CandidateFn<D>>>,
}

impl<D> SlugConfig<D> {
    /// Start building a configuration for one model type.
    pub fn builder(
        model_type: &'static str,
        source_fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> SlugConfigBuilder<D> {
        SlugConfigBuilder::new(model_type, source_fields)
    }

    #[must_use]
    pub const fn model_type(&self) -> &'static str {
        self.model_type
    }

    #[must_use]
    pub fn source_fields(&self) -> &[String] {
        &self.source_fields
    }

    #[must_use]
    pub fn scope_key(&self) -> Option<&str> {
        self.scope_key.as_deref()
    }

    #[must_use]
    pub const fn reserved_words(&self) -> &BTreeSet<String> {
        &self.reserved_words
    }

    #[must_use]
    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    #[must_use]
    pub const fn history(&self) -> bool {
        self.history
    }

    #[must_use]
    pub const fn by_model_type(&self) -> bool {
        self.by_model_type
    }

    #[must_use]
    pub const fn policy(&self) -> RebuildPolicy {
        self.policy
    }

    #[must_use]
    pub fn custom_builder(&self) -> Option<&CandidateFn<D>> {
        self.custom_builder.as_deref()
    }

    /// Declared type namespace for uniqueness/lookup partitioning, when
    /// type partitioning is on.
    #[must_use]
    pub const fn type_discriminator(&self) -> Option<&'static str> {
        if self.by_model_type {
            Some(self.model_type)
        } else {
            None
        }
    }

    /// Storage fields this configuration registers on the model type.
    #[must_use]
    pub const fn storage_fields(&self) -> [&'static str; 3] {
        [SLUG_FIELD, SLUG_LOWER_FIELD, SLUG_HISTORY_FIELD]
    }
}

impl<D> fmt::Debug for SlugConfig<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlugConfig")
            .field("model_type", &self.model_type)
            .field("source_fields", &self.source_fields)
            .field("scope_key", &self.scope_key)
            .field("reserved_words", &self.reserved_words)
            .field("max_length", &self.max_length)
            .field("history", &self.history)
            .field("by_model_type", &self.by_model_type)
            .field("policy", &self.policy)
            .field("custom_builder", &self.custom_builder.is_some())
            .finish()
    }
}

///
/// SlugConfigBuilder
///
/// Option chaining for [`SlugConfig`]. Validation here is structural only;
/// semantic checks (field existence on the host type) are deferred to
/// candidate build time.
///

pub struct SlugConfigBuilder<D> {
    model_type: &'static str,
    source_fields: Vec<String>,
    scope_key: Option<String>,
    reserved_words: BTreeSet<String>,
    max_length: usize,
    history: bool,
    by_model_type: bool,
    policy: RebuildPolicy,
    custom_builder: Option<Box<CandidateFn<D>>>,
}

impl<D> SlugConfigBuilder<D> {
    #[must_use]
    pub fn new(
        model_type: &'static str,
        source_fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            model_type,
            source_fields: source_fields.into_iter().map(Into::into).collect(),
            scope_key: None,
            reserved_words: DEFAULT_RESERVED_WORDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            max_length: MAX_SLUG_LENGTH,
            history: false,
            by_model_type: false,
            policy: RebuildPolicy::default(),
            custom_builder: None,
        }
    }

    /// Evaluate uniqueness only among documents sharing this field's value.
    #[must_use]
    pub fn scope(mut self, scope_key: impl Into<String>) -> Self {
        self.scope_key = Some(scope_key.into());
        self
    }

    /// Add reserved words on top of the built-in set.
    #[must_use]
    pub fn reserve(mut self, words: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.reserved_words.extend(words.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Retain superseded slugs as valid lookup keys.
    #[must_use]
    pub const fn history(mut self, history: bool) -> Self {
        self.history = history;
        self
    }

    /// Partition uniqueness and lookup by the declared type.
    #[must_use]
    pub const fn by_model_type(mut self, by_model_type: bool) -> Self {
        self.by_model_type = by_model_type;
        self
    }

    /// Compute the slug once at creation and never recompute it.
    #[must_use]
    pub const fn permanent(mut self) -> Self {
        self.policy = RebuildPolicy::Permanent;
        self
    }

    /// Override field concatenation with a custom candidate builder.
    #[must_use]
    pub fn candidate_with(mut self, builder: impl Fn(&D) -> String + Send + Sync + 'static) -> Self {
        self.custom_builder = Some(Box::new(builder));
        self
    }

    /// Finalize the configuration.
    pub fn build(self) -> Result<SlugConfig<D>, SlugError> {
        if self.model_type.is_empty() {
            return Err(SlugError::configuration("model type name must not be empty"));
        }

        if self.source_fields.is_empty() && self.custom_builder.is_none() {
            return Err(SlugError::configuration(
                "at least one source field or a custom candidate builder is required",
            ));
        }

        if self.source_fields.iter().any(String::is_empty) {
            return Err(SlugError::configuration("source field names must not be empty"));
        }

        if let Some(scope_key) = &self.scope_key
            && scope_key.is_empty()
        {
            return Err(SlugError::configuration("scope key must not be empty"));
        }

        if self.max_length == 0 || self.max_length > MAX_SLUG_LENGTH {
            return Err(SlugError::configuration(format!(
                "max length must be between 1 and {MAX_SLUG_LENGTH}, got {}",
                self.max_length
            )));
        }

        Ok(SlugConfig {
            model_type: self.model_type,
            source_fields: self.source_fields,
            scope_key: self.scope_key,
            reserved_words: self.reserved_words,
            max_length: self.max_length,
            history: self.history,
            by_model_type: self.by_model_type,
            policy: self.policy,
            custom_builder: self.custom_builder,
        })
    }
}
