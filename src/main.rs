//! Binary entrypoint for qrframe.
//!
//! Parses arguments, merges them over the optional YAML options file and hands off to the
//! library crate.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use qrframe::{Category, Color, Frame, QrCodeEcc, RenderOptions};
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Generate a QR code image for a website, PDF, social media profile or local PDF.
#[derive(Debug, Parser)]
#[command(name = "qrframe", version, about)]
struct Cli {
    /// Data type: website, pdf, social_media or local_pdf
    category: String,

    /// URL or local file path to encode
    data: String,

    /// Output image; the format follows the extension (png, jpg, bmp, svg, ...)
    #[arg(short, long, value_name = "FILE", default_value = "qr_code_with_frame.png")]
    output: PathBuf,

    /// YAML file with render options; flags below override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pixels per module [default: 10]
    #[arg(long, value_name = "PIXELS")]
    module_size: Option<u32>,

    /// Quiet zone width in modules [default: 4]
    #[arg(long, value_name = "MODULES")]
    border: Option<u32>,

    /// Error correction level: low, medium, quartile or high [default: low]
    #[arg(long, value_name = "LEVEL")]
    ecc: Option<QrCodeEcc>,

    /// Color of dark modules [default: black]
    #[arg(long, value_name = "COLOR")]
    fill: Option<Color>,

    /// Color of light modules and the quiet zone [default: white]
    #[arg(long, value_name = "COLOR")]
    background: Option<Color>,

    /// Do not draw a frame around the code
    #[arg(long, conflicts_with_all = ["frame_thickness", "frame_color"])]
    no_frame: bool,

    /// Frame thickness in pixels [default: 20]
    #[arg(long, value_name = "PIXELS")]
    frame_thickness: Option<u32>,

    /// Frame color [default: black]
    #[arg(long, value_name = "COLOR")]
    frame_color: Option<Color>,

    /// Also print the code to the terminal
    #[arg(long)]
    print: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn render_options(&self) -> Result<RenderOptions> {
        let mut options = match &self.config {
            Some(path) => RenderOptions::from_yaml_file(path)
                .with_context(|| format!("loading render options from {}", path.display()))?,
            None => RenderOptions::default(),
        };
        if let Some(v) = self.module_size {
            options.module_size = v;
        }
        if let Some(v) = self.border {
            options.border = v;
        }
        if let Some(v) = self.ecc {
            options.ecc = v;
        }
        if let Some(v) = self.fill {
            options.fill = v;
        }
        if let Some(v) = self.background {
            options.background = v;
        }
        if self.no_frame {
            options.frame = None;
        } else if self.frame_thickness.is_some() || self.frame_color.is_some() {
            let base = options.frame.unwrap_or_default();
            options.frame = Some(Frame {
                thickness: self.frame_thickness.unwrap_or(base.thickness),
                color: self.frame_color.unwrap_or(base.color),
            });
        }
        options.validate().context("validating render options")?;
        Ok(options)
    }
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(
        format!("qrframe={level}")
            .parse()
            .context("building log filter")?,
    );
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let category: Category = cli.category.parse()?;
    let options = cli.render_options()?;
    debug!(?options, "resolved render options");

    if cli.print {
        let payload = qrframe::build_payload(category, &cli.data)?;
        let qr = qrframe::symbol::encode(&payload, options.ecc)?;
        print!("{}", qrframe::render::to_terminal_string(&qr, options.border));
    }

    let path = qrframe::generate_qr_code(category, &cli.data, &cli.output, &options)
        .with_context(|| format!("generating {category} QR code for '{}'", cli.data))?;
    println!("QR code saved as {}", path.display());
    Ok(())
}
