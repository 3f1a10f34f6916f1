//! # qrframe
//!
//! Generate QR code images for websites, PDF links, social media profiles and local PDF files,
//! optionally surrounded by a solid-color frame.
//!
//! `qrframe` turns a category and a raw value into the payload to embed, encodes it with the
//! [`qrcode`] crate at the smallest version that fits, rasterizes the module matrix with the
//! [`image`] crate and writes the result in the format implied by the output file's extension
//! (PNG, JPEG, BMP, … or SVG).
//!
//! ## Example
//!
//! ```no_run
//! use qrframe::{generate_qr_code, payload::Category, render::RenderOptions};
//!
//! let path = generate_qr_code(
//!     Category::LocalPdf,
//!     "/content/marina-samprovalaki.pdf",
//!     "qr_code_with_frame.png",
//!     &RenderOptions::default(),
//! )
//! .expect("failed to generate QR code");
//! println!("QR code saved as {}", path.display());
//! ```
//!
//! Render to an in-memory image buffer instead:
//!
//! ```rust
//! use qrframe::render::{render, RenderOptions};
//!
//! let img = render("Hello, World!", &RenderOptions { frame: None, ..Default::default() }).unwrap();
//! assert_eq!(img.dimensions(), (290, 290));
//! ```
//!
//! ## Modules
//!
//! - [`payload`]: Category dispatch and payload formatting.
//! - [`symbol`]: QR encoding and error correction levels.
//! - [`render`]: Rasterization, framing and output.
//! - [`color`]: Color parsing.

use std::path::{Path, PathBuf};

use tracing::info;

pub mod color;
pub mod error;
pub mod payload;
pub mod render;
pub mod symbol;

pub use crate::color::Color;
pub use crate::error::{Error, Result};
pub use crate::payload::{build_payload, Category};
pub use crate::render::{Frame, RenderOptions};
pub use crate::symbol::{QrCodeEcc, QrSymbol};

/// Builds the payload for `category`, renders it and writes it to `output_path`.
///
/// Returns the path that was written. Nothing is written when the category data is empty, the
/// payload does not fit in a QR code, the options are invalid or the extension is unknown.
pub fn generate_qr_code(
    category: Category,
    data: &str,
    output_path: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<PathBuf> {
    let output_path = output_path.as_ref();
    let payload = build_payload(category, data)?;
    options.validate()?;
    let qr = symbol::encode(&payload, options.ecc)?;

    if is_svg(output_path) {
        render::save_svg(&qr, options, output_path)?;
    } else {
        let img = render::render_symbol(&qr, options)?;
        render::save(&img, output_path)?;
    }

    info!(%category, version = qr.version(), path = %output_path.display(), "generated QR code");
    Ok(output_path.to_path_buf())
}

/// Same as [`generate_qr_code`], taking the category as its string tag.
pub fn generate_qr_code_for_tag(
    tag: &str,
    data: &str,
    output_path: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<PathBuf> {
    generate_qr_code(tag.parse()?, data, output_path, options)
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}
