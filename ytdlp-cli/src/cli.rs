use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ytdlp_runner::{Executor, Request, YtDlp};

/// Run yt-dlp and report typed outcomes
#[derive(Parser, Debug)]
#[command(name = "ytdlp-cli")]
#[command(version)]
pub struct Cli {
    /// Path to the yt-dlp executable
    #[arg(long, env = "YTDLP_BINARY", default_value = "yt-dlp", global = true)]
    pub binary: PathBuf,

    /// Interpreter used when launching through Python
    #[arg(long, env = "YTDLP_PYTHON", default_value = "python3", global = true)]
    pub python_interpreter: PathBuf,

    /// Launch yt-dlp as a script through the Python interpreter
    #[arg(long, env = "YTDLP_PYTHON_EXECUTOR", global = true)]
    pub python: bool,

    /// Directory prepended to PATH for the child (e.g. where ffmpeg or deno live)
    #[arg(long, env = "YTDLP_PATH_PREPEND", global = true)]
    pub path_prepend: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "ytdlp_cli=info,ytdlp_runner=info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run yt-dlp against a URL with arbitrary options
    Exec {
        url: String,

        /// Option as FLAG or FLAG=VALUE, repeatable and kept in order
        #[arg(short = 'o', long = "option", value_name = "FLAG[=VALUE]", allow_hyphen_values = true)]
        options: Vec<String>,

        /// Working directory for yt-dlp
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Print lines as an event stream instead of collecting the run
        #[arg(long)]
        stream: bool
    },

    /// Print metadata for a single video
    Info {
        url: String,

        /// Print the decoded metadata as JSON
        #[arg(long)]
        json: bool
    },

    /// Update yt-dlp in place
    Update,

    /// Print the yt-dlp version
    Version
}

impl Cli {
    pub fn executor(&self) -> Executor {
        Executor::from(self.python)
    }

    pub fn client(&self) -> YtDlp {
        let mut client = YtDlp::with_binary(&self.binary);
        client.set_python_interpreter(&self.python_interpreter);

        if let Some(dir) = self.path_prepend.as_ref().filter(|dir| !dir.is_empty()) {
            client.set_env("PATH_PREPEND".to_string(), dir.clone());
        }

        client
    }
}

/// Builds a request from `FLAG` / `FLAG=VALUE` arguments in the order given.
pub fn build_request(url: &str, options: &[String], dir: Option<PathBuf>) -> Request {
    let mut request = Request::new(url);
    request.set_directory(dir);

    for option in options {
        match option.split_once('=') {
            Some((flag, value)) => request.set_option_value(flag, value),
            None => request.set_option(option.as_str())
        };
    }

    request
}
