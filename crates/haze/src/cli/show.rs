//! The `haze show` command.

use clap::Args;
use haze_core::{Config, HashStore, ImageId, PlaceholderRenderer};
use std::path::PathBuf;

/// Arguments for the `show` command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Image id, e.g. `gallery/2024/sunset.jpg`
    pub id: String,

    /// Also render a placeholder of this width
    #[arg(long, requires = "height", allow_negative_numbers = true)]
    pub width: Option<i64>,

    /// Height paired with --width
    #[arg(long, requires = "width", allow_negative_numbers = true)]
    pub height: Option<i64>,

    /// Hash store file (defaults to `store.path`)
    #[arg(long)]
    pub store: Option<PathBuf>,
}

/// Execute the show command.
pub async fn execute(args: ShowArgs, config: &Config) -> anyhow::Result<()> {
    let store = super::open_store(args.store.as_deref(), config)?;
    let id = ImageId::from(args.id);
    let hash = store.get(&id)?;

    match (&hash, args.width.zip(args.height)) {
        (None, None) => anyhow::bail!("No hash stored for {id}"),
        (Some(hash), _) => println!("{hash}"),
        (None, Some(_)) => tracing::warn!("No hash stored for {}", id),
    }

    if let Some((width, height)) = args.width.zip(args.height) {
        let renderer = PlaceholderRenderer::from_config(config);
        println!("{}", renderer.render(hash.as_deref(), width, height));
    }
    Ok(())
}
