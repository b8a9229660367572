use crate::{
    candidate::build_candidate,
    config::{RebuildPolicy, SLUG_FIELD, SlugConfig},
    error::SlugError,
    obs::{self, SlugEvent},
    traits::{ResolveRequest, ScopeProvider, SlugDocument, UniquenessResolver},
};
use derive_more::Display;

///
/// SaveEvent
///
/// Create : the document is being persisted for the first time
/// Update : any subsequent save
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum SaveEvent {
    Create,
    Update,
}

///
/// RebuildOutcome
///
/// Assigned    : a resolved slug was committed to the in-memory fields
/// NoCandidate : the resolver returned empty; prior fields left untouched
/// Skipped     : the trigger matrix required no rebuild; no resolver call
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RebuildOutcome {
    Assigned(String),
    NoCandidate,
    Skipped,
}

impl RebuildOutcome {
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }
}

///
/// needs_rebuild
///
/// The trigger matrix. Permanent slugs are computed exactly once, on
/// create; rebuildable slugs recompute when the document is new, the slug
/// field itself was modified, or any source field changed since load.
///

#[must_use]
pub fn needs_rebuild<D: SlugDocument>(
    config: &SlugConfig<D>,
    doc: &D,
    event: SaveEvent,
) -> bool {
    match config.policy() {
        RebuildPolicy::Permanent => event == SaveEvent::Create,
        RebuildPolicy::Rebuildable => {
            event == SaveEvent::Create
                || doc.is_new()
                || doc.is_field_changed(SLUG_FIELD)
                || config
                    .source_fields()
                    .iter()
                    .any(|field| doc.is_field_changed(field))
        }
    }
}

///
/// resolve
///
/// Compute the candidate and run it through the uniqueness resolver with
/// the document's current scope/type arguments. Returns `None` when the
/// resolver signals "no candidate to assign". Does not mutate the document.
///

pub fn resolve<D, R, P>(
    config: &SlugConfig<D>,
    doc: &D,
    resolver: &mut R,
    scope_provider: &P,
) -> Result<Option<String>, SlugError>
where
    D: SlugDocument,
    R: UniquenessResolver,
    P: ScopeProvider<D>,
{
    let candidate = build_candidate(config, doc);
    let scope = config
        .scope_key()
        .and_then(|key| scope_provider.scope_value(doc, key));
    let model_type = config.by_model_type().then(|| doc.model_type());

    let resolved = resolver.resolve_unique(&ResolveRequest {
        candidate: &candidate,
        scope: scope.as_ref(),
        model_type,
        reserved_words: config.reserved_words(),
        max_length: config.max_length(),
    })?;

    if resolved.is_empty() {
        obs::record(SlugEvent::ResolverEmpty {
            model_type: config.model_type(),
        });
        return Ok(None);
    }

    Ok(Some(resolved))
}

///
/// on_save
///
/// The guarded pre-save step. Hosts call this from their save pipeline with
/// the event kind; when the trigger matrix fires, the resolved slug is
/// committed to the document's in-memory fields for the host to persist
/// with the rest of the save. Resolver and store errors abort the save by
/// propagating to the caller.
///

pub fn on_save<D, R, P>(
    config: &SlugConfig<D>,
    doc: &mut D,
    event: SaveEvent,
    resolver: &mut R,
    scope_provider: &P,
) -> Result<RebuildOutcome, SlugError>
where
    D: SlugDocument,
    R: UniquenessResolver,
    P: ScopeProvider<D>,
{
    if !needs_rebuild(config, doc, event) {
        obs::record(SlugEvent::RebuildSkipped {
            model_type: config.model_type(),
        });
        return Ok(RebuildOutcome::Skipped);
    }

    obs::record(SlugEvent::RebuildStart {
        model_type: config.model_type(),
    });

    let Some(resolved) = resolve(config, doc, resolver, scope_provider)? else {
        return Ok(RebuildOutcome::NoCandidate);
    };

    doc.slug_fields_mut().assign(&resolved, config.history());
    obs::record(SlugEvent::RebuildCommitted {
        model_type: config.model_type(),
    });

    Ok(RebuildOutcome::Assigned(resolved))
}
