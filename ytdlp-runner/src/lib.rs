//! Rust wrapper that runs the yt-dlp CLI as a subprocess.
//!
//! Every call launches one `yt-dlp` child, drains its stdout and stderr on
//! two concurrent workers, waits for it to exit and maps the result into a
//! typed [`Result`]. Blocking calls have `*_async` counterparts that run on
//! tokio's blocking pool, and [`YtDlp::stream`] yields lines as they arrive.
//!
//! # Example
//!
//! ```no_run
//! use ytdlp_runner::{Executor, Request, YtDlp};
//!
//! fn main() -> ytdlp_runner::Result<()> {
//!     let client = YtDlp::new();
//!
//!     // Get video info without downloading
//!     let info = client.get_video_data("https://www.youtube.com/watch?v=dQw4w9WgXcQ", Executor::Native)?;
//!     println!("Title: {}", info.title);
//!
//!     // Download into a directory, printing each line as it is produced
//!     let mut request = Request::new("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
//!         .with_directory("/tmp/videos");
//!     request.set_option_value("-f", "best").set_option("--no-playlist");
//!
//!     let response = client.execute_with(&request, Executor::Native, |line| println!("{line}"))?;
//!     println!("finished in {} ms", response.elapsed_ms);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod collector;
mod command;
pub mod error;
mod task;
pub mod types;
mod update;

pub use client::YtDlp;
pub use error::{Error, Result};
pub use task::Task;
pub use types::{
    Executor, Format, Options, OutputEvent, Progress, Request, Response, Source, Thumbnail,
    VideoInfo
};
pub use update::is_update_running;
