use serde::{Deserialize, Serialize};

///
/// SlugFields
///
/// Per-document slug state: the current slug, its case-folded comparison
/// form, and the append-only history of superseded values.
///
/// ## Invariants
/// - `slug` and `slug_lower` are set and cleared together; `slug_lower` is
///   always the case-folded form of `slug`.
/// - History is append-only: a superseded slug is never removed once pushed.
///
/// Construction of arbitrary states is intentionally restricted; mutation
/// flows through [`assign`](Self::assign), [`clear`](Self::clear), and
/// [`restore`](Self::restore) so the pairing invariant cannot be broken by
/// callers.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SlugFields {
    slug: Option<String>,
    slug_lower: Option<String>,
    history: Vec<String>,
}

impl SlugFields {
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    #[must_use]
    pub fn slug_lower(&self) -> Option<&str> {
        self.slug_lower.as_deref()
    }

    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.slug.is_some()
    }

    /// Assign a resolved slug, deriving the case-folded pair member.
    ///
    /// When `keep_history` is set, the superseded current value is appended
    /// to history (skipping a value already at the tail).
    pub fn assign(&mut self, slug: &str, keep_history: bool) {
        if keep_history
            && let Some(previous) = self.slug.take()
            && previous != slug
            && self.history.last() != Some(&previous)
        {
            self.history.push(previous);
        }

        self.slug_lower = Some(slug.to_lowercase());
        self.slug = Some(slug.to_string());
    }

    /// Reset the slug pair to the unset default. History is retained:
    /// superseded values stay valid lookup keys.
    pub fn clear(&mut self) {
        self.slug = None;
        self.slug_lower = None;
    }

    /// Replace this state wholesale with a persisted snapshot.
    pub fn restore(&mut self, persisted: &Self) {
        *self = persisted.clone();
    }

    /// Whether `token` equals the current slug (either case form) or, when
    /// `include_history` is set, any superseded value.
    #[must_use]
    pub fn matches_token(&self, token: &str, include_history: bool) -> bool {
        if self.slug.as_deref() == Some(token) || self.slug_lower.as_deref() == Some(token) {
            return true;
        }

        include_history && self.history.iter().any(|past| past == token)
    }
}
