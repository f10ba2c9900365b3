use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("yt-dlp binary not executable: {0}")]
    BinaryNotExecutable(PathBuf),

    #[error("failed to execute yt-dlp: {0}")]
    ExecutionFailed(#[source] std::io::Error),

    #[error("failed waiting for yt-dlp to exit: {0}")]
    WaitFailed(#[source] std::io::Error),

    #[error("yt-dlp command failed with exit code {code}: {stderr}")]
    CommandFailed { code: i32, stderr: String },

    #[error("failed to parse JSON output: {0}")]
    JsonParseFailed(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("yt-dlp task failed: {0}")]
    TaskFailed(String)
}

impl Error {
    /// Captured stderr of a run that exited with a non-zero code.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Error::CommandFailed { stderr, .. } => Some(stderr),
            _ => None
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
