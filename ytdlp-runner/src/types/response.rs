use std::path::PathBuf;

use super::request::Options;

/// Result of a yt-dlp run that exited successfully.
#[derive(Debug, Clone)]
pub struct Response {
    pub command: String,
    pub options: Options,
    pub directory: Option<PathBuf>,
    pub exit_code: i32,
    pub elapsed_ms: u64,
    pub stdout: String,
    pub stderr: String
}
