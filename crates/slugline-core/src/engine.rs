use crate::{
    adapter, candidate,
    config::SlugConfig,
    error::SlugError,
    lifecycle::{self, RebuildOutcome, SaveEvent},
    lookup,
    traits::{FieldScope, ScopeProvider, SlugDocument, SlugStore, UniquenessResolver},
};

///
/// SlugEngine
///
/// Session facade bundling one model type's configuration with its
/// collaborators. Owns orchestration routing only; all slug state lives on
/// the documents and in the store.
///

pub struct SlugEngine<'a, D, S, R, P = FieldScope>
where
    D: SlugDocument,
    S: SlugStore<D>,
    R: UniquenessResolver,
    P: ScopeProvider<D>,
{
    config: &'a SlugConfig<D>,
    store: &'a mut S,
    resolver: &'a mut R,
    scope_provider: P,
}

impl<'a, D, S, R> SlugEngine<'a, D, S, R>
where
    D: SlugDocument,
    S: SlugStore<D>,
    R: UniquenessResolver,
{
    #[must_use]
    pub fn new(config: &'a SlugConfig<D>, store: &'a mut S, resolver: &'a mut R) -> Self {
        Self {
            config,
            store,
            resolver,
            scope_provider: FieldScope,
        }
    }
}

impl<'a, D, S, R, P> SlugEngine<'a, D, S, R, P>
where
    D: SlugDocument,
    S: SlugStore<D>,
    R: UniquenessResolver,
    P: ScopeProvider<D>,
{
    /// Swap in a custom ambient-scope capability.
    #[must_use]
    pub fn with_scope_provider<P2: ScopeProvider<D>>(
        self,
        scope_provider: P2,
    ) -> SlugEngine<'a, D, S, R, P2> {
        SlugEngine {
            config: self.config,
            store: self.store,
            resolver: self.resolver,
            scope_provider,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SlugConfig<D> {
        self.config
    }

    // ------------------------------------------------------------------
    // Save-path operations
    // ------------------------------------------------------------------

    /// Guarded pre-save step: recompute the slug in memory when the
    /// lifecycle trigger fires. Hosts call this from their save pipeline
    /// before persisting the document.
    pub fn build_slug(&mut self, doc: &mut D, event: SaveEvent) -> Result<RebuildOutcome, SlugError> {
        lifecycle::on_save(self.config, doc, event, self.resolver, &self.scope_provider)
    }

    /// Recompute and persist the slug with a direct field-level update,
    /// independent of other pending changes on the document.
    pub fn set_slug_now(&mut self, doc: &mut D) -> Result<RebuildOutcome, SlugError> {
        adapter::commit_slug(self.config, doc, self.store, self.resolver, &self.scope_provider)
    }

    /// Remove the stored slug pair and reset the in-memory value.
    pub fn unset_slug(&mut self, doc: &mut D) -> Result<(), SlugError> {
        adapter::clear_slug_field(doc, self.store)
    }

    /// Discard uncommitted in-memory slug changes, restoring the
    /// last-persisted state.
    pub fn revert_slug(&mut self, doc: &mut D) -> Result<(), SlugError> {
        adapter::revert_slug_field(doc, self.store)
    }

    /// Reset the in-memory slug pair without touching the store.
    pub fn clear_slug(&self, doc: &mut D) {
        doc.slug_fields_mut().clear();
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// The raw candidate the next rebuild would hand to the resolver.
    #[must_use]
    pub fn candidate(&self, doc: &D) -> String {
        candidate::build_candidate(self.config, doc)
    }

    /// URL token for a document: the slug when present, else the primary
    /// identifier's rendering.
    #[must_use]
    pub fn url_token(&self, doc: &D) -> String {
        match doc.slug_fields().slug() {
            Some(slug) => slug.to_string(),
            None => doc.key().to_string(),
        }
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Resolve slug tokens to documents, failing fast on any unmatched
    /// token. See [`lookup::find_by_slug`] for the policy.
    pub fn find_by_slug_or_fail<T: AsRef<str>>(&self, tokens: &[T]) -> Result<Vec<D>, SlugError> {
        let tokens: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();

        lookup::find_by_slug(self.config, &*self.store, &tokens)
    }
}
