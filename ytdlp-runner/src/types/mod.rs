mod event;
mod executor;
mod progress;
mod request;
mod response;
mod video_info;

pub use event::{OutputEvent, Source};
pub use executor::Executor;
pub use progress::Progress;
pub use request::{Options, Request};
pub use response::Response;
pub use video_info::{Format, Thumbnail, VideoInfo};
