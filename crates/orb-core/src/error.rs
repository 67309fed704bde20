use thiserror::Error;

/// Errors from turning remote input into visual state. Stepping never fails.
#[derive(Debug, Error)]
pub enum OrbError {
    #[error("invalid color `{0}`")]
    InvalidColor(String),
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("unknown tool `{0}`")]
    UnknownTool(String),
    #[error("unknown effect `{0}`")]
    UnknownEffect(String),
    #[error("missing argument `{0}`")]
    MissingArgument(&'static str),
    #[error("orb is stopped")]
    Stopped,
    #[error("malformed tool arguments: {0}")]
    MalformedArguments(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OrbError>;
