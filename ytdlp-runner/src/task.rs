use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};

/// Handle to a yt-dlp run executing on tokio's blocking pool.
///
/// The run starts as soon as the handle is created; awaiting it yields the
/// same outcome the blocking call would have returned. Created outside of a
/// tokio runtime, nothing runs and the handle resolves to [`Error::TaskFailed`].
#[must_use = "the outcome is only observable by awaiting the task"]
pub struct Task<T> {
    state: State<T>
}

enum State<T> {
    Running(JoinHandle<Result<T>>),
    Rejected(Option<Error>)
}

impl<T: Send + 'static> Task<T> {
    pub(crate) fn spawn<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static
    {
        let state = match Handle::try_current() {
            Ok(handle) => State::Running(handle.spawn_blocking(f)),
            Err(e) => {
                tracing::warn!(error = %e, "yt-dlp task started outside of a tokio runtime");
                State::Rejected(Some(Error::TaskFailed(e.to_string())))
            }
        };

        Self { state }
    }
}

impl<T> Future for Task<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            State::Running(handle) => Pin::new(handle).poll(cx).map(|joined| match joined {
                Ok(outcome) => outcome,
                Err(e) => Err(Error::TaskFailed(e.to_string()))
            }),
            State::Rejected(error) => Poll::Ready(Err(error
                .take()
                .unwrap_or_else(|| Error::TaskFailed("task polled after completion".to_string()))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_outside_runtime_fails() {
        let task = Task::spawn(|| Ok(1));

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let result = runtime.block_on(task);

        assert!(matches!(result, Err(Error::TaskFailed(_))));
    }

    #[tokio::test]
    async fn test_spawn_inside_runtime() {
        assert_eq!(Task::spawn(|| Ok("done")).await.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_panicking_worker_fails() {
        let result: Result<()> = Task::spawn(|| panic!("worker blew up")).await;
        assert!(matches!(result, Err(Error::TaskFailed(_))));
    }
}
