//! CLI entry point for figma-images.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use figma_images::{DownloadRequest, RunReport, download_images};
use tracing::{debug, info};

mod cli;
mod config;
mod output;

use cli::Args;
use config::Settings;

/// Exit status when at least one image failed.
const EXIT_TASK_FAILURES: u8 = 1;
/// Exit status when the run could not start or the API failed.
const EXIT_FATAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr so `--json` output on stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&args).await {
        Ok(report) if report.snapshot.failed > 0 => ExitCode::from(EXIT_TASK_FAILURES),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

async fn run(args: &Args) -> Result<RunReport> {
    let file_config = config::load_file_config(args.config.as_deref())?;
    let settings = Settings::resolve(args, file_config.as_ref());
    debug!(?settings, "effective settings");

    let progress = output::progress_reporter(!args.quiet && !args.no_progress && !args.json);

    let mut request = DownloadRequest::new(&args.token, &args.file_key)
        .with_output_dir(settings.output_dir)
        .with_concurrency(settings.concurrency)
        .with_timeouts(settings.timeouts);
    if let Some(api_base) = settings.api_base {
        request = request.with_api_base(api_base);
    }
    if let Some((_, reporter)) = &progress {
        request = request.with_progress(reporter.clone());
    }

    info!(file = %args.file_key, "figma-images starting");
    let result = download_images(request).await;
    if let Some((bar, _)) = &progress {
        bar.finish_and_clear();
    }
    let report = result
        .with_context(|| format!("Failed to download images for file '{}'", args.file_key))?;

    let mut stdout = io::stdout().lock();
    if args.json {
        output::write_json(&mut stdout, &report.snapshot)?;
    } else if !args.quiet {
        output::write_summary(&mut stdout, &report)?;
    }

    Ok(report)
}
