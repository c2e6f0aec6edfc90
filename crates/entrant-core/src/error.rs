use thiserror::Error;

/// Failures surfaced by a [`crate::backend::Backend`] implementation.
///
/// Transport and session problems only. Plain absence of an element is not
/// an error for the bounded-wait operations; those report `Ok(false)`.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend not launched")]
    NotReady,

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("element not found: {0}")]
    NotFound(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not supported: {0}")]
    NotSupported(String),

    #[error("{0}")]
    Other(String),
}

/// Failures that terminate a run.
///
/// Only two component failures are allowed to escape into this type from
/// the form filler: the form container never attaching, and a required
/// field that cannot be set. Everything else either stays a boolean inside
/// the interaction layer or arrives here via [`RunError::Backend`] from the
/// run boundary.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("entry form never appeared")]
    FormUnavailable,

    #[error("failed to fill required field '{field}': {source}")]
    RequiredField { field: String, source: BackendError },

    #[error("interrupted")]
    Interrupted,
}
