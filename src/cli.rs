//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Download every image fill of a Figma file into a mirrored directory tree.
///
/// Images already on disk (under any known extension) are skipped, so
/// re-running against the same output directory only fetches what is new.
#[derive(Parser, Debug)]
#[command(name = "figma-images")]
#[command(author, version, about)]
pub struct Args {
    /// Figma file key (the `<KEY>` in `figma.com/file/<KEY>/...`)
    #[arg(short = 'f', long = "file", value_name = "KEY")]
    pub file_key: String,

    /// Figma personal access token
    #[arg(long, env = "FIGMA_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Output directory [default: dist/images]
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Maximum concurrent downloads (1-100) [default: 10]
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: Option<u8>,

    /// Figma API base URL [default: https://api.figma.com/v1]
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Image download connect timeout in seconds (1-3600) [default: 30]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: Option<u64>,

    /// Image download total timeout in seconds (1-3600) [default: 300]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: Option<u64>,

    /// Config file path [default: $XDG_CONFIG_HOME/figma-images/config.toml]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not draw the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Print the final totals as JSON on stdout
    #[arg(long)]
    pub json: bool,
}
