use crate::{
    config::SlugConfig,
    error::SlugError,
    obs::{self, SlugEvent},
    traits::{SlugDocument, SlugStore},
};
use std::collections::HashSet;

///
/// find_by_slug
///
/// Resolve one or more slug tokens to documents. A document matches when
/// any token equals its current slug or, with history enabled, any of its
/// superseded slugs. A document hit by several tokens appears exactly once,
/// at its first match position.
///
/// ## Fail-fast policy
/// Strict: if any supplied token matches no document, the whole call fails
/// with [`SlugError::NotFound`] listing every unmatched token. Callers that
/// want best-effort semantics can retry with the tokens the error excludes.
///

pub fn find_by_slug<D, S>(
    config: &SlugConfig<D>,
    store: &S,
    tokens: &[String],
) -> Result<Vec<D>, SlugError>
where
    D: SlugDocument,
    S: SlugStore<D>,
{
    if tokens.is_empty() {
        return Err(SlugError::configuration("at least one slug token is required"));
    }

    obs::record(SlugEvent::Lookup {
        model_type: config.model_type(),
        tokens: tokens.len() as u64,
    });

    let matched = store.find_any_slug_in(tokens, config.type_discriminator(), config.history())?;

    // Dedup by identity, preserving first-match order.
    let mut seen: HashSet<D::Key> = HashSet::with_capacity(matched.len());
    let mut docs = Vec::with_capacity(matched.len());
    for doc in matched {
        if seen.insert(doc.key()) {
            docs.push(doc);
        }
    }

    let unmatched: Vec<String> = tokens
        .iter()
        .filter(|token| {
            !docs
                .iter()
                .any(|doc| doc.slug_fields().matches_token(token, config.history()))
        })
        .cloned()
        .collect();

    if !unmatched.is_empty() {
        obs::record(SlugEvent::LookupMiss {
            model_type: config.model_type(),
            unmatched: unmatched.len() as u64,
        });
        return Err(SlugError::not_found(unmatched));
    }

    Ok(docs)
}
