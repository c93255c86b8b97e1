//! The `haze render` command.

use clap::Args;
use haze_core::{Config, PlaceholderRenderer};
use std::path::PathBuf;

/// Arguments for the `render` command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Stored hash
    pub hash: String,

    /// Target width in pixels
    #[arg(long, allow_negative_numbers = true)]
    pub width: i64,

    /// Target height in pixels (sets the aspect ratio)
    #[arg(long, allow_negative_numbers = true)]
    pub height: i64,

    /// Write the PNG here instead of printing a data URI
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the render command.
///
/// Without `--output` this prints exactly what a page would embed, including
/// the fallback GIF for unusable input. With `--output` errors are reported.
pub async fn execute(args: RenderArgs, config: &Config) -> anyhow::Result<()> {
    let renderer = PlaceholderRenderer::from_config(config);

    let Some(output) = &args.output else {
        println!("{}", renderer.render(Some(&args.hash), args.width, args.height));
        return Ok(());
    };

    let (width, height) = match (u32::try_from(args.width), u32::try_from(args.height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => anyhow::bail!(
            "Invalid size {}x{}: width and height must be positive",
            args.width,
            args.height
        ),
    };

    let png = renderer.render_png(&args.hash, width, height)?;
    std::fs::write(output, &png)?;
    tracing::info!("Wrote {} bytes to {:?}", png.len(), output);
    Ok(())
}
