//! The `haze encode` command.

use clap::Args;
use haze_core::{ComponentCounts, Config, Locator, PlaceholderEncoder};

/// Arguments for the `encode` command.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Image file, http(s) URL, or base64 data: URL
    pub input: String,

    /// Horizontal components (defaults to `placeholder.components_x`)
    #[arg(short = 'x', long, value_parser = clap::value_parser!(u32).range(1..=9))]
    pub components_x: Option<u32>,

    /// Vertical components (defaults to `placeholder.components_y`)
    #[arg(short = 'y', long, value_parser = clap::value_parser!(u32).range(1..=9))]
    pub components_y: Option<u32>,
}

impl EncodeArgs {
    fn components(&self, config: &Config) -> ComponentCounts {
        let defaults = config.placeholder.components();
        ComponentCounts::new(
            self.components_x.unwrap_or(defaults.x),
            self.components_y.unwrap_or(defaults.y),
        )
    }
}

/// Execute the encode command: print the hash on stdout.
pub async fn execute(args: EncodeArgs, config: &Config) -> anyhow::Result<()> {
    let locator = Locator::parse(&args.input)?;
    if let Locator::Path(path) = &locator {
        if !path.exists() {
            anyhow::bail!(
                "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
                path
            );
        }
    }

    let encoder = PlaceholderEncoder::from_config(config);
    let hash = encoder
        .encode_with(&locator, args.components(config))
        .await?;
    println!("{hash}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_fall_back_to_config() {
        let args = EncodeArgs {
            input: "a.jpg".to_string(),
            components_x: Some(6),
            components_y: None,
        };
        assert_eq!(args.components(&Config::default()), ComponentCounts::new(6, 3));
    }
}
