//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use glyphline::{Color, HintingMode, RenderRequest};

/// glyphline - render one line of text from a TrueType font to PNG
#[derive(Parser, Debug)]
#[command(name = "glyphline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Text to render; backslash escapes such as \n or \u00e9 are decoded
    pub text: String,

    /// Font file (.ttf, .ttc)
    #[arg(short = 'f', long = "font", value_name = "SOURCE")]
    pub font: PathBuf,

    /// Face index for TTC collections
    #[arg(short = 'y', long = "face-index", default_value_t = 0)]
    pub face_index: u32,

    /// PNG file to write
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILENAME",
        required_unless_present = "dry_run"
    )]
    pub output: Option<PathBuf>,

    /// Font size in points
    #[arg(
        short = 'p',
        long = "points",
        value_name = "PTS",
        default_value_t = RenderRequest::DEFAULT_POINT_SIZE,
        allow_negative_numbers = true
    )]
    pub points: f32,

    /// Padding around the text in pixels
    #[arg(long = "pad", value_name = "INT", default_value_t = RenderRequest::DEFAULT_PADDING)]
    pub pad: u32,

    /// Turn full grid-fitting on
    #[arg(long = "full")]
    pub full: bool,

    /// Print the computed dimensions instead of writing a file
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Text color as RRGGBB or RRGGBBAA
    #[arg(short = 'c', long = "foreground", value_name = "COLOR", default_value = "000000FF")]
    pub foreground: Color,

    /// Background color as RRGGBB or RRGGBBAA
    #[arg(short = 'b', long = "background", value_name = "COLOR", default_value = "00000000")]
    pub background: Color,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Cli {
    pub fn hinting(&self) -> HintingMode {
        if self.full {
            HintingMode::Full
        } else {
            HintingMode::None
        }
    }

    /// The render request described by the flags, for already-decoded `text`
    pub fn request(&self, text: String) -> RenderRequest {
        RenderRequest::new(text)
            .with_point_size(self.points)
            .with_padding(self.pad)
            .with_hinting(self.hinting())
            .with_foreground(self.foreground)
            .with_background(self.background)
    }

    /// Log filter used when `RUST_LOG` is not set
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("glyphline").chain(args.iter().copied()))
    }

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_render_request() {
        let cli = parse(&["-f", "font.ttf", "-o", "out.png", "A"]).unwrap();
        let request = cli.request("A".into());
        assert_eq!(request, RenderRequest::new("A"));
        assert_eq!(cli.face_index, 0);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn all_flags() {
        let cli = parse(&[
            "--font", "f.ttc", "-y", "2", "-p", "24.5", "--pad", "3", "--full", "-c",
            "ff000080", "-b", "#FFFFFF", "-vv", "-n", "Hi",
        ])
        .unwrap();
        assert_eq!(cli.face_index, 2);
        assert!(cli.dry_run);
        assert_eq!(cli.output, None);
        assert_eq!(cli.log_level(), "trace");

        let request = cli.request("Hi".into());
        assert_eq!(request.point_size, 24.5);
        assert_eq!(request.padding, 3);
        assert_eq!(request.hinting, HintingMode::Full);
        assert_eq!(request.foreground, Color::rgba(255, 0, 0, 128));
        assert_eq!(request.background, Color::white());
    }

    #[test]
    fn output_required_unless_dry_run() {
        assert!(parse(&["-f", "font.ttf", "A"]).is_err());
        assert!(parse(&["-f", "font.ttf", "-n", "A"]).is_ok());
    }

    #[test]
    fn exactly_one_text_argument() {
        assert!(parse(&["-f", "font.ttf", "-n"]).is_err());
        assert!(parse(&["-f", "font.ttf", "-n", "A", "B"]).is_err());
    }

    #[test]
    fn rejects_bad_colors_and_sizes() {
        assert!(parse(&["-f", "f.ttf", "-n", "-c", "red", "A"]).is_err());
        assert!(parse(&["-f", "f.ttf", "-n", "-p", "big", "A"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(parse(&["-f", "f.ttf", "-n", "-q", "-v", "A"]).is_err());
        let quiet = parse(&["-f", "f.ttf", "-n", "-q", "A"]).unwrap();
        assert_eq!(quiet.log_level(), "error");
    }
}
