//! Haze CLI - BlurHash placeholders for images.
//!
//! Haze computes a short hash for each image once, stores it, and renders
//! blurred PNG data URIs from stored hashes on demand.
//!
//! # Usage
//!
//! ```bash
//! # Hash a single image (file, URL, or data: URL)
//! haze encode photo.jpg
//!
//! # Render a placeholder from a hash
//! haze render 'LEHV6nWB2yk8pyo0adR*.7kCMdnj' --width 300 --height 150
//!
//! # Hash every image in a directory that has no hash yet
//! haze backfill ./uploads --store hashes.json
//!
//! # View configuration
//! haze config show
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Haze - BlurHash placeholders for images.
#[derive(Parser, Debug)]
#[command(name = "haze")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "HAZE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the hash of one image
    Encode(cli::encode::EncodeArgs),

    /// Render a placeholder data URI (or PNG) from a hash
    Render(cli::render::RenderArgs),

    /// Hash existing images in bulk
    Backfill(cli::backfill::BackfillArgs),

    /// Look up the stored hash of an image
    Show(cli::show::ShowArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config_path = cli.config.as_deref().map(cli::expand_path);
    let config = match &config_path {
        Some(path) if path.exists() => haze_core::Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        // `config init` creates it
        Some(_) => haze_core::Config::default(),
        None => match haze_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `haze config path`."
                );
                haze_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Haze v{}", haze_core::VERSION);

    match cli.command {
        Commands::Encode(args) => cli::encode::execute(args, &config).await,
        Commands::Render(args) => cli::render::execute(args, &config).await,
        Commands::Backfill(args) => cli::backfill::execute(args, &config).await,
        Commands::Show(args) => cli::show::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args, &config, config_path).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "haze", "render", "LEHV6nWB2yk8pyo0adR*.7kCMdnj", "--width", "300", "--height", "150",
        ])
        .unwrap();
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.width, 300);
        assert_eq!(args.height, 150);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["haze", "encode", "a.jpg", "-x", "3", "--verbose"]).unwrap();
        assert!(cli.verbose);
        let Commands::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(args.components_x, Some(3));
    }

    #[test]
    fn test_encode_rejects_out_of_range_components() {
        assert!(Cli::try_parse_from(["haze", "encode", "a.jpg", "-x", "10"]).is_err());
        assert!(Cli::try_parse_from(["haze", "encode", "a.jpg", "-y", "0"]).is_err());
    }

    #[test]
    fn test_backfill_needs_dirs_or_manifest() {
        assert!(Cli::try_parse_from(["haze", "backfill"]).is_err());
        assert!(Cli::try_parse_from(["haze", "backfill", "--manifest", "m.json"]).is_ok());
        assert!(Cli::try_parse_from(["haze", "backfill", "./a", "./b", "--regenerate"]).is_ok());
    }
}
