use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::ExitStatus;
use std::thread;
use std::time::Instant;

use futures_core::Stream;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::SplitStream;

use crate::collector::collect;
use crate::command::CommandBuilder;
use crate::error::{Error, Result};
use crate::task::Task;
use crate::types::{Executor, OutputEvent, Request, Response, Source, VideoInfo};
use crate::update::UpdateGuard;

#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    python: PathBuf,
    env_vars: HashMap<String, String>
}

struct Captured {
    exit_code: i32,
    elapsed_ms: u64,
    stdout: String,
    stderr: String
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlp {
    pub fn new() -> Self {
        Self::with_binary("yt-dlp")
    }

    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        Self {
            binary: path.into(),
            python: PathBuf::from("python3"),
            env_vars: HashMap::new()
        }
    }

    pub fn set_binary(&mut self, path: PathBuf) {
        self.binary = path;
    }

    /// Interpreter used for [`Executor::Python`].
    pub fn set_python_interpreter(&mut self, path: impl Into<PathBuf>) {
        self.python = path.into();
    }

    /// Sets an environment variable for the child. `PATH_PREPEND` is prepended
    /// to the inherited `PATH` instead of being passed through.
    pub fn set_env(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn python_interpreter(&self) -> &Path {
        &self.python
    }

    /// Runs `yt-dlp --version` and returns the trimmed version string.
    pub fn version(&self, executor: Executor) -> Result<String> {
        let builder = self.command(executor).version();

        match self.run(&builder, None, &|_: &str| {}) {
            Ok(captured) => Ok(captured.stdout.trim().to_string()),
            Err(Error::ExecutionFailed(_) | Error::CommandFailed { .. }) => {
                Err(Error::BinaryNotExecutable(self.binary.clone()))
            }
            Err(e) => Err(e)
        }
    }

    /// Executes `request`, blocking the current thread until yt-dlp exits.
    pub fn execute(&self, request: &Request, executor: Executor) -> Result<Response> {
        self.execute_with(request, executor, |_| {})
    }

    /// Like [`YtDlp::execute`], calling `on_line` for every line printed on
    /// stdout or stderr. Lines from the two streams may interleave in any order.
    pub fn execute_with<F>(&self, request: &Request, executor: Executor, on_line: F) -> Result<Response>
    where
        F: Fn(&str) + Sync
    {
        request.validate()?;

        let builder = self.command(executor).args(request.args());
        let captured = self.run(&builder, request.directory(), &on_line)?;

        Ok(Response {
            command: builder.command_line(),
            options: request.options().clone(),
            directory: request.directory().map(Path::to_path_buf),
            exit_code: captured.exit_code,
            elapsed_ms: captured.elapsed_ms,
            stdout: captured.stdout,
            stderr: captured.stderr
        })
    }

    /// Runs [`YtDlp::execute_with`] on tokio's blocking pool. Outside of a tokio
    /// runtime the task resolves to [`Error::TaskFailed`] without spawning.
    pub fn execute_async<F>(&self, request: Request, executor: Executor, on_line: F) -> Task<Response>
    where
        F: Fn(&str) + Send + Sync + 'static
    {
        let client = self.clone();
        Task::spawn(move || client.execute_with(&request, executor, on_line))
    }

    /// Runs `yt-dlp -U`. Returns immediately with `Ok(())` when another
    /// update is already in progress in this process.
    pub fn update(&self, executor: Executor) -> Result<()> {
        let Some(_guard) = UpdateGuard::acquire() else {
            tracing::debug!("yt-dlp update already running, skipping");
            return Ok(());
        };

        tracing::info!(binary = %self.binary.display(), "updating yt-dlp");

        let builder = self.command(executor).self_update();
        self.run(&builder, None, &|line: &str| tracing::info!(line = %line, "yt-dlp update"))
            .inspect_err(|e| tracing::warn!(error = %e, "yt-dlp update failed"))?;

        Ok(())
    }

    pub fn update_async(&self, executor: Executor) -> Task<()> {
        let client = self.clone();
        Task::spawn(move || client.update(executor))
    }

    pub fn get_video_data(&self, url: &str, executor: Executor) -> Result<VideoInfo> {
        self.get_video_data_with(url, executor, |_| {})
    }

    /// Fetches metadata for a single video with `--dump-json --no-playlist`.
    pub fn get_video_data_with<F>(&self, url: &str, executor: Executor, on_line: F) -> Result<VideoInfo>
    where
        F: Fn(&str) + Sync
    {
        let mut request = Request::new(url);
        request.set_option("--dump-json").set_option("--no-playlist");

        let response = self.execute_with(&request, executor, on_line)?;
        VideoInfo::from_json(&response.stdout)
    }

    pub fn get_video_data_async(&self, url: impl Into<String>, executor: Executor) -> Task<VideoInfo> {
        let client = self.clone();
        let url = url.into();
        Task::spawn(move || client.get_video_data(&url, executor))
    }

    /// Streams output lines as yt-dlp prints them, ending with
    /// [`OutputEvent::Exited`] or a [`Error::CommandFailed`] item.
    ///
    /// Lines are split on `\n` with a trailing `\r` dropped, and decoded lossily.
    /// The child is killed if the stream is dropped early.
    pub fn stream(
        &self,
        request: &Request,
        executor: Executor
    ) -> Pin<Box<dyn Stream<Item = Result<OutputEvent>> + Send + 'static>> {
        let validation = request.validate();
        let builder = self.command(executor).args(request.args());
        let directory = request.directory().map(Path::to_path_buf);
        let env_vars = self.env_vars.clone();

        Box::pin(async_stream::try_stream! {
            validation?;

            tracing::debug!(
                program = %builder.program().display(),
                args = ?builder.get_args(),
                "spawning yt-dlp"
            );

            let mut cmd = tokio::process::Command::from(builder.build_with_env(&env_vars, directory.as_deref()));
            cmd.kill_on_drop(true);

            let started = Instant::now();
            let mut child = cmd.spawn().map_err(Error::ExecutionFailed)?;

            let stdout = child.stdout.take().ok_or_else(|| missing_pipe(Source::Stdout))?;
            let stderr = child.stderr.take().ok_or_else(|| missing_pipe(Source::Stderr))?;

            let merged = lines(stdout, Source::Stdout).merge(lines(stderr, Source::Stderr));
            tokio::pin!(merged);

            let mut stderr_text = String::new();

            while let Some((source, text)) = merged.next().await {
                tracing::trace!(stream = source.as_str(), line = %text, "yt-dlp output");
                if source == Source::Stderr {
                    stderr_text.push_str(&text);
                }
                yield OutputEvent::Line { source, text };
            }

            let status = child.wait().await.map_err(Error::WaitFailed)?;
            let elapsed_ms = elapsed_millis(started);
            let exit_code = exit_code(status);

            if exit_code > 0 {
                Err(Error::CommandFailed { code: exit_code, stderr: stderr_text })?;
            }

            yield OutputEvent::Exited { exit_code, elapsed_ms };
        })
    }

    fn command(&self, executor: Executor) -> CommandBuilder {
        CommandBuilder::for_executor(&self.binary, &self.python, executor)
    }

    /// Spawns the command, drains both pipes on scoped threads and waits for
    /// exit. Buffers are only read after their collector has been joined.
    fn run(
        &self,
        builder: &CommandBuilder,
        directory: Option<&Path>,
        on_line: &(dyn Fn(&str) + Sync)
    ) -> Result<Captured> {
        tracing::debug!(
            program = %builder.program().display(),
            args = ?builder.get_args(),
            directory = ?directory,
            "spawning yt-dlp"
        );

        let mut cmd = builder.build_with_env(&self.env_vars, directory);

        let started = Instant::now();
        let mut child = cmd.spawn().map_err(Error::ExecutionFailed)?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            reap(&mut child);
            return Err(missing_pipe(Source::Stdout));
        };

        let (status, elapsed_ms, stdout, stderr) = thread::scope(|scope| {
            let out = scope.spawn(move || collect(stdout, Source::Stdout, on_line));
            let err = scope.spawn(move || collect(stderr, Source::Stderr, on_line));

            let status = child.wait();
            let elapsed_ms = elapsed_millis(started);

            if status.is_err() {
                reap(&mut child);
            }

            (status, elapsed_ms, out.join(), err.join())
        });

        let status = status.map_err(Error::WaitFailed)?;

        let (Ok(stdout), Ok(stderr)) = (stdout, stderr) else {
            return Err(Error::TaskFailed("output collector panicked".to_string()));
        };

        let exit_code = exit_code(status);
        tracing::debug!(exit_code, elapsed_ms, "yt-dlp exited");

        if exit_code > 0 {
            return Err(Error::CommandFailed {
                code: exit_code,
                stderr
            });
        }

        Ok(Captured {
            exit_code,
            elapsed_ms,
            stdout,
            stderr
        })
    }
}

fn lines<R>(reader: R, source: Source) -> impl Stream<Item = (Source, String)> + Send
where
    R: AsyncRead + Unpin + Send + 'static
{
    SplitStream::new(BufReader::new(reader).split(b'\n'))
        .take_while(move |line| match line {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(stream = source.as_str(), error = %e, "stopped reading yt-dlp output");
                false
            }
        })
        .filter_map(std::result::Result::ok)
        .map(move |bytes| (source, decode_line(&bytes)))
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Kills the child and waits on it so no zombie is left behind.
fn reap(child: &mut std::process::Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn missing_pipe(source: Source) -> Error {
    Error::ExecutionFailed(io::Error::other(format!("yt-dlp {} not captured", source.as_str())))
}

fn elapsed_millis(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Exit code of the child. A signal-terminated child reports `128 + signal`,
/// as a shell would.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}
