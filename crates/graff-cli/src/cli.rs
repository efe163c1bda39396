//! CLI argument definitions using Clap v4

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Graff - graffiti lettering from hand-drawn glyphs
#[derive(Parser, Debug)]
#[command(name = "graff")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log stage-by-stage progress (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the letter catalog and the default style configuration
    #[command(alias = "i")]
    Info(InfoArgs),

    /// Lay out text and write the stacked SVG and/or a JSON report
    #[command(alias = "r")]
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// List every asset in the catalog
    #[arg(long)]
    pub catalog: bool,

    /// Print the default style configuration as JSON
    #[arg(long = "style-defaults")]
    pub style_defaults: bool,
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Text to letter
    pub text: String,

    /// Letter style; "straight" disables first/last-position drawings
    #[arg(short = 's', long = "style", default_value = "curved")]
    pub style: String,

    /// Directory holding the letter SVGs
    #[arg(short = 'a', long = "assets", default_value = "assets/letters")]
    pub assets: PathBuf,

    /// Style configuration JSON (camelCase keys, missing keys keep defaults)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Write the assembled SVG here (stdout if neither this nor --json is given)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Write a JSON layout report here ("-" for stdout)
    #[arg(short = 'j', long = "json")]
    pub json: Option<PathBuf>,

    /// Side of the square raster box used for kerning
    #[arg(long = "resolution", default_value = "200")]
    pub resolution: u32,

    /// Sample every n-th pixel when rasterizing
    #[arg(long = "stride", default_value = "2")]
    pub stride: u32,

    /// Viewport the suggested scale is fitted to, as <width>x<height>
    #[arg(long = "viewport", default_value = "800x300", value_parser = parse_viewport)]
    pub viewport: (f32, f32),

    /// Silent mode (no progress info)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

fn parse_viewport(s: &str) -> Result<(f32, f32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected <width>x<height>, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f32>()
            .ok()
            .filter(|n| *n > 0.0 && n.is_finite())
            .ok_or_else(|| format!("invalid viewport dimension '{v}'"))
    };
    Ok((parse(w)?, parse(h)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_parsing() {
        assert_eq!(parse_viewport("800x300"), Ok((800.0, 300.0)));
        assert_eq!(parse_viewport("1024X768"), Ok((1024.0, 768.0)));
        assert!(parse_viewport("800").is_err());
        assert!(parse_viewport("0x300").is_err());
        assert!(parse_viewport("axb").is_err());
    }

    #[test]
    fn render_defaults() {
        let cli = Cli::parse_from(["graff", "render", "hello"]);
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.text, "hello");
        assert_eq!(args.style, "curved");
        assert_eq!(args.resolution, 200);
        assert_eq!(args.viewport, (800.0, 300.0));
        assert!(!cli.verbose);
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::parse_from(["graff", "render", "x", "-v"]);
        assert!(cli.verbose);
    }
}
