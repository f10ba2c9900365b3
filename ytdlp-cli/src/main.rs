mod cli;

use anyhow::Context;
use clap::Parser;
use tokio_stream::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ytdlp_runner::{Executor, OutputEvent, Progress, Request, Source, YtDlp};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.as_str().into())
        )
        .init();

    let client = cli.client();
    let executor = cli.executor();

    match cli.command {
        Commands::Exec { url, options, dir, stream } => {
            let request = cli::build_request(&url, &options, dir);
            if stream {
                exec_stream(&client, &request, executor).await
            } else {
                exec(&client, request, executor).await
            }
        }
        Commands::Info { url, json } => info(&client, url, executor, json).await,
        Commands::Update => {
            client.update_async(executor).await.context("yt-dlp update failed")?;
            tracing::info!("yt-dlp update finished");
            Ok(())
        }
        Commands::Version => {
            let version = client.version(executor)?;
            println!("{version}");
            Ok(())
        }
    }
}

/// Where an output line ends up.
#[derive(Debug, PartialEq)]
enum Route {
    Progress(Progress),
    Stdout,
    Stderr,
    /// The line's pipe is unknown, so it goes to the log only.
    Log
}

fn route(source: Option<Source>, line: &str) -> Route {
    if let Some(progress) = Progress::parse(line) {
        return Route::Progress(progress);
    }

    match source {
        Some(Source::Stdout) => Route::Stdout,
        Some(Source::Stderr) => Route::Stderr,
        None => Route::Log
    }
}

fn print_line(source: Option<Source>, line: &str) {
    match route(source, line) {
        Route::Progress(progress) => tracing::info!(
            percent = progress.percent,
            total_bytes = ?progress.total_bytes,
            eta = ?progress.eta,
            "download progress"
        ),
        Route::Stdout => println!("{line}"),
        Route::Stderr => eprintln!("{line}"),
        Route::Log => tracing::info!(line = %line, "yt-dlp output")
    }
}

async fn exec(client: &YtDlp, request: Request, executor: Executor) -> anyhow::Result<()> {
    tracing::info!(url = request.url(), "running yt-dlp");

    // Collected runs share one callback for both pipes, so lines are not tagged.
    let response = client
        .execute_async(request, executor, |line| print_line(None, line))
        .await?;

    tracing::info!(
        command = %response.command,
        exit_code = response.exit_code,
        elapsed_ms = response.elapsed_ms,
        "yt-dlp finished"
    );
    Ok(())
}

async fn exec_stream(client: &YtDlp, request: &Request, executor: Executor) -> anyhow::Result<()> {
    tracing::info!(url = request.url(), "streaming yt-dlp output");

    let mut events = client.stream(request, executor);

    while let Some(event) = events.next().await {
        match event? {
            OutputEvent::Line { source, text } => print_line(Some(source), &text),
            OutputEvent::Exited { exit_code, elapsed_ms } => {
                tracing::info!(exit_code, elapsed_ms, "yt-dlp finished");
            }
        }
    }

    Ok(())
}

async fn info(client: &YtDlp, url: String, executor: Executor, json: bool) -> anyhow::Result<()> {
    let info = client
        .get_video_data_async(url.as_str(), executor)
        .await
        .with_context(|| format!("failed to fetch metadata for {url}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("id:       {}", info.id);
    println!("title:    {}", info.title);
    println!("filename: {}", info.file_name_without_ext);
    if let Some(ref ext) = info.ext {
        println!("ext:      {ext}");
    }
    if let Some(duration) = info.duration {
        println!("duration: {duration:.0}s");
    }
    if let Some(ref uploader) = info.uploader {
        println!("uploader: {uploader}");
    }
    if let Some(thumbnail) = info.best_thumbnail() {
        println!("thumb:    {thumbnail}");
    }
    println!("formats:  {}", info.formats.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_untagged_line_goes_to_log() {
        assert_eq!(route(None, "ERROR: Video unavailable"), Route::Log);
    }

    #[test]
    fn test_route_keeps_stream_source() {
        assert_eq!(route(Some(Source::Stdout), "{\"id\":\"abc\"}"), Route::Stdout);
        assert_eq!(route(Some(Source::Stderr), "WARNING: slow"), Route::Stderr);
    }

    #[test]
    fn test_route_progress_line() {
        let line = "[download]  42.0% of 10.00MiB at 1.00MiB/s ETA 00:06";
        assert!(matches!(route(None, line), Route::Progress(p) if p.percent == 42.0));
    }
}
