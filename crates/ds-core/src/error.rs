use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The query was empty or whitespace only.
    EmptyQuery,
    /// A run is already in flight on this session.
    RunInProgress,
    /// The run id does not match the active run.
    UnknownRun(uuid::Uuid),
    /// `start` was called on an engine that is already running.
    AlreadyRunning,
    /// An image could not be obtained from its source.
    AssetLoad(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::EmptyQuery => write!(f, "query is required"),
            CoreError::RunInProgress => write!(f, "a search run is already in progress"),
            CoreError::UnknownRun(id) => write!(f, "no active run with id {id}"),
            CoreError::AlreadyRunning => write!(f, "animation engine is already running"),
            CoreError::AssetLoad(url) => write!(f, "failed to load image: {url}"),
        }
    }
}

impl std::error::Error for CoreError {}

pub type Result<T> = std::result::Result<T, CoreError>;
