use anyhow::{Context, Result};
use clap::Parser;
use icns2png::config::ConvertConfig;
use icns2png::{IconDescriptor, IconSetBuilder, ResampleFilter};
use std::path::PathBuf;

/// Convert an ICNS icon container into a sorted set of PNG files.
#[derive(Parser, Debug)]
#[command(name = "icns2png")]
#[command(about = "🖼️ Convert an .icns file into a complete PNG iconset")]
#[command(long_about = "Convert an .icns file into a complete PNG iconset.
Every native ICNS size plus 24px and 96px is produced, missing sizes are derived
from the largest embedded image. The iconset directory is left in place.")]
struct Args {
    /// Input ICNS file
    #[arg(help = "Path to the .icns container")]
    input: PathBuf,

    /// Use the built-in decoder even where iconutil is available
    #[arg(long, help = "Force the built-in ICNS decoder (same as setting FORCE_ICNS2PNG)")]
    decoder: bool,

    /// Concurrent resize units
    #[arg(short = 'j', long, help = "Maximum resize jobs in flight (default: number of CPUs)")]
    jobs: Option<usize>,

    /// Parent directory for the iconset workspace
    #[arg(long, help = "Create the .iconset directory here instead of the system temp dir")]
    temp_dir: Option<PathBuf>,

    /// Resampling kernel
    #[arg(long, value_enum, default_value_t = ResampleFilter::Lanczos3)]
    filter: ResampleFilter,

    /// Print a JSON array instead of one line per icon
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    icns2png::logging::init_logging(args.verbose)?;

    let mut config = ConvertConfig::from_env();
    if args.decoder {
        config.use_native_tool = false;
    }
    if let Some(jobs) = args.jobs {
        config.max_parallelism = jobs;
    }
    config.temp_root = args.temp_dir;
    config.filter = args.filter;

    let builder = IconSetBuilder::new(config)?;
    let icons = builder
        .build(&args.input)
        .await
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    if args.json {
        println!("{}", render_json(&icons)?);
    } else {
        for icon in &icons {
            println!("{}\t{}", icon.size, icon.path.display());
        }
    }
    Ok(())
}

fn render_json(icons: &[IconDescriptor]) -> Result<String> {
    let entries: Vec<serde_json::Value> = icons
        .iter()
        .map(|icon| {
            serde_json::json!({
                "path": icon.path.display().to_string(),
                "size": icon.size,
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["icns2png", "app.icns", "--decoder", "-j", "2", "--filter", "mitchell", "-vv"]);
        assert_eq!(args.input, PathBuf::from("app.icns"));
        assert!(args.decoder);
        assert_eq!(args.jobs, Some(2));
        assert_eq!(args.filter, ResampleFilter::Mitchell);
        assert_eq!(args.verbose, 2);
        assert!(!args.json);
    }

    #[test]
    fn test_render_json() {
        let icons = vec![IconDescriptor::new("/w/icon_16x16.png", 16)];
        let value: serde_json::Value = serde_json::from_str(&render_json(&icons).unwrap()).unwrap();
        assert_eq!(value[0]["size"], 16);
        assert_eq!(value[0]["path"], "/w/icon_16x16.png");
    }
}
