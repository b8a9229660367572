use thiserror::Error as ThisError;

///
/// SlugError
///
/// Runtime error taxonomy for slug orchestration.
///
/// Nothing here is recovered locally: collaborator failures (resolver,
/// store) are surfaced verbatim to the caller of the triggering operation.
///

#[derive(Debug, ThisError)]
pub enum SlugError {
    /// Malformed field/option list, raised at configuration build time.
    /// Fatal to model-type setup.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The uniqueness resolver cannot produce a value within its own
    /// constraints. Propagated, never retried.
    #[error("slug resolution failed: {message}")]
    Resolution { message: String },

    /// Lookup token(s) matched no document.
    #[error("no document found for slug(s): {}", tokens.join(", "))]
    NotFound { tokens: Vec<String> },

    /// An atomic store operation failed. Propagated unchanged.
    #[error("persistence error: {message}")]
    Persistence { message: String },
}

impl SlugError {
    /// Construct a configuration-time error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Construct a resolver-origin failure.
    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution {
            message: message.into(),
        }
    }

    /// Construct a lookup not-found error carrying the unmatched tokens.
    #[must_use]
    pub fn not_found(tokens: Vec<String>) -> Self {
        Self::NotFound { tokens }
    }

    /// Construct a store-origin failure.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Tokens that failed to resolve, when this is a lookup failure.
    #[must_use]
    pub fn unmatched_tokens(&self) -> &[String] {
        match self {
            Self::NotFound { tokens } => tokens,
            _ => &[],
        }
    }
}
