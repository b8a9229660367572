use crate::{
    config::SlugConfig,
    error::SlugError,
    lifecycle::{self, RebuildOutcome},
    traits::{ScopeProvider, SlugDocument, SlugStore, UniquenessResolver},
};

///
/// Persistence adapter
///
/// Direct field-level store operations for the slug fields, independent of
/// the host's full save pipeline. Each operation applies the store write
/// first and only then updates the in-memory state, so a store failure
/// never leaves the two observably inconsistent.
///

///
/// commit_slug
///
/// Recompute the slug and persist it with a direct field-level update.
/// The pair and the history array are written in one atomic partial
/// update. Returns `NoCandidate` without touching the store when the
/// resolver has nothing to assign.
///

pub fn commit_slug<D, S, R, P>(
    config: &SlugConfig<D>,
    doc: &mut D,
    store: &mut S,
    resolver: &mut R,
    scope_provider: &P,
) -> Result<RebuildOutcome, SlugError>
where
    D: SlugDocument,
    S: SlugStore<D>,
    R: UniquenessResolver,
    P: ScopeProvider<D>,
{
    let Some(resolved) = lifecycle::resolve(config, doc, resolver, scope_provider)? else {
        return Ok(RebuildOutcome::NoCandidate);
    };

    // Stage the assignment, write it, then make it visible in memory.
    let mut staged = doc.slug_fields().clone();
    staged.assign(&resolved, config.history());

    store.write_slug(doc.key(), &staged)?;
    *doc.slug_fields_mut() = staged;

    Ok(RebuildOutcome::Assigned(resolved))
}

///
/// clear_slug_field
///
/// Remove the slug pair from the stored document and reset the in-memory
/// value to its unset default. Removal keeps the sparse uniqueness index
/// free of entries for slug-less documents.
///

pub fn clear_slug_field<D, S>(doc: &mut D, store: &mut S) -> Result<(), SlugError>
where
    D: SlugDocument,
    S: SlugStore<D>,
{
    store.unset_slug(doc.key())?;
    doc.slug_fields_mut().clear();

    Ok(())
}

///
/// revert_slug_field
///
/// Discard any uncommitted in-memory modification to the slug fields,
/// restoring the last-persisted state.
///

pub fn revert_slug_field<D, S>(doc: &mut D, store: &S) -> Result<(), SlugError>
where
    D: SlugDocument,
    S: SlugStore<D>,
{
    let persisted = store.load_slug(doc.key())?;
    doc.slug_fields_mut().restore(&persisted);

    Ok(())
}
