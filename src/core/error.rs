use thiserror::Error;

/// Errors surfaced by the starfield core.
///
/// A filter or pick that matches nothing is not an error; see `FilterOutcome` and
/// `SceneState::pick`.
#[derive(Debug, Error)]
pub enum StarfieldError {
    /// Every journey record must carry at least one problem (the primary one).
    #[error("journey record {index} has no problems")]
    EmptyProblems { index: u32 },

    /// A journey with no records would render an empty scene.
    #[error("journey data has no records")]
    NoRecords,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed journey data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("collaborator error: {message}")]
    Collaborator { message: String },

    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),
}

pub type Result<T> = std::result::Result<T, StarfieldError>;
