/// Crate-wide result alias.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors surfaced synchronously from graph mutations, placement and setup.
///
/// Per-frame work (force ticks, interpolation, focus resolution) never produces these; it clamps
/// degenerate numeric input instead.
#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    /// Invalid settings, detected before any frame runs.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A vertex or edge key is already taken.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// A vertex or edge lookup by key failed in a mutating call.
    #[error("not found: {0}")]
    NotFound(String),

    /// An edge references a vertex that does not exist.
    #[error("unknown vertex: {0}")]
    UnknownVertex(String),

    /// Tree placement could not pick a single root for a component.
    #[error("ambiguous root: {0}")]
    AmbiguousRoot(String),

    /// The graph was touched from inside one of its own notifications.
    #[error("reentrancy error: {0}")]
    Reentrancy(String),

    /// JSON input could not be decoded.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Opaque host-side failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GraphError {
    /// Build a [`GraphError::Configuration`].
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`GraphError::DuplicateKey`].
    pub fn duplicate_key(msg: impl Into<String>) -> Self {
        Self::DuplicateKey(msg.into())
    }

    /// Build a [`GraphError::NotFound`].
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`GraphError::UnknownVertex`].
    pub fn unknown_vertex(msg: impl Into<String>) -> Self {
        Self::UnknownVertex(msg.into())
    }

    /// Build a [`GraphError::AmbiguousRoot`].
    pub fn ambiguous_root(msg: impl Into<String>) -> Self {
        Self::AmbiguousRoot(msg.into())
    }

    /// Build a [`GraphError::Reentrancy`].
    pub fn reentrancy(msg: impl Into<String>) -> Self {
        Self::Reentrancy(msg.into())
    }

    /// Build a [`GraphError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
