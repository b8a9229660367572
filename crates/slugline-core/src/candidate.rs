use crate::{
    config::{SLUG_FIELD, SlugConfig},
    traits::SlugDocument,
};

///
/// build_candidate
///
/// Produce the raw candidate string for one document. Pure with respect to
/// document state at call time; performs no writes.
///
/// Precedence:
/// 1. A non-empty user-supplied slug on a not-yet-persisted document wins
///    over derivation.
/// 2. On a persisted document whose slug field was explicitly modified
///    since load, the modified value (possibly empty) is the candidate.
/// 3. Otherwise the candidate is derived: the custom builder when supplied,
///    else the source field values joined by single spaces in declared
///    order.
///

#[must_use]
pub fn build_candidate<D: SlugDocument>(config: &SlugConfig<D>, doc: &D) -> String {
    if doc.is_new() {
        if let Some(slug) = doc.slug_fields().slug()
            && !slug.is_empty()
        {
            return slug.to_string();
        }
    } else if doc.is_field_changed(SLUG_FIELD) {
        return doc.slug_fields().slug().unwrap_or_default().to_string();
    }

    derive_candidate(config, doc)
}

fn derive_candidate<D: SlugDocument>(config: &SlugConfig<D>, doc: &D) -> String {
    if let Some(builder) = config.custom_builder() {
        return builder(doc);
    }

    let mut parts = Vec::with_capacity(config.source_fields().len());
    for field in config.source_fields() {
        if let Some(text) = doc.field_text(field) {
            let text = text.trim().to_string();
            if !text.is_empty() {
                parts.push(text);
            }
        }
    }

    parts.join(" ")
}
