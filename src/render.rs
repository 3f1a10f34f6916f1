use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{imageops, ImageBuffer, ImageError, ImageFormat, RgbImage};
use serde::Deserialize;
use tracing::{debug, info};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::symbol::{self, QrCodeEcc, QrSymbol};

/// Largest raster, in pixels, that will be allocated (16384 × 16384).
pub const MAX_PIXELS: u64 = 1 << 28;

/// Fails if a `width` × `height` raster is larger than [`MAX_PIXELS`].
fn check_dimensions(width: u32, height: u32) -> Result<()> {
    let pixels = u64::from(width) * u64::from(height);
    if pixels > MAX_PIXELS {
        return Err(Error::InvalidOptions(format!(
            "image of {width}x{height} pixels exceeds the limit of {MAX_PIXELS} pixels"
        )));
    }
    Ok(())
}

/// A solid-color frame composited around the rendered QR code.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Frame {
    /// Width of the frame in pixels on each side.
    pub thickness: u32,
    pub color: Color,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            thickness: 20,
            color: Color::BLACK,
        }
    }
}

/// Options controlling how a payload is turned into an image.
///
/// Missing keys in a YAML options file fall back to [`RenderOptions::default`]; `frame: ~`
/// disables the frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RenderOptions {
    /// Pixels per module along each axis.
    pub module_size: u32,
    /// Width of the light quiet zone, in modules.
    pub border: u32,
    pub ecc: QrCodeEcc,
    /// Color of dark modules.
    pub fill: Color,
    /// Color of light modules and the quiet zone.
    pub background: Color,
    pub frame: Option<Frame>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            module_size: 10,
            border: 4,
            ecc: QrCodeEcc::Low,
            fill: Color::BLACK,
            background: Color::WHITE,
            frame: Some(Frame::default()),
        }
    }
}

impl RenderOptions {
    /// Reads options from a YAML file, e.g.
    ///
    /// ```yaml
    /// module-size: 8
    /// ecc: high
    /// fill: "#1a237e"
    /// frame:
    ///   thickness: 12
    ///   color: navy
    /// ```
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Parses options from YAML text and validates them.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let options: RenderOptions = serde_yaml::from_str(yaml)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.module_size == 0 {
            return Err(Error::InvalidOptions("module size must be at least 1 pixel".into()));
        }
        Ok(())
    }

    /// Side length in pixels of the unframed image for a symbol `modules` wide.
    fn raster_side(&self, modules: usize) -> Result<u32> {
        let overflow = || Error::InvalidOptions("image dimensions overflow".into());
        let modules = u32::try_from(modules).map_err(|_| overflow())?;
        let side = self
            .border
            .checked_mul(2)
            .and_then(|b| b.checked_add(modules))
            .and_then(|cells| cells.checked_mul(self.module_size))
            .ok_or_else(overflow)?;
        check_dimensions(side, side)?;
        Ok(side)
    }
}

/// Encodes `payload` and renders it to an RGB image, framed if the options ask for it.
///
/// # Example
///
/// ```
/// use qrframe::render::{render, RenderOptions};
///
/// let img = render("https://example.com", &RenderOptions::default()).unwrap();
/// // Version 2 is 25 modules wide: (25 + 2 * 4) * 10 + 2 * 20.
/// assert_eq!(img.dimensions(), (370, 370));
/// ```
pub fn render(payload: &str, options: &RenderOptions) -> Result<RgbImage> {
    options.validate()?;
    let qr = symbol::encode(payload, options.ecc)?;
    render_symbol(&qr, options)
}

/// Renders an already encoded symbol.
pub fn render_symbol(qr: &QrSymbol, options: &RenderOptions) -> Result<RgbImage> {
    let img = rasterize(qr, options)?;
    match options.frame {
        Some(frame) => add_frame(&img, frame),
        None => Ok(img),
    }
}

/// Converts a symbol to an image without a frame.
///
/// Every module becomes a `module_size` square block, and `border` light modules surround the
/// symbol on all four sides.
pub fn rasterize(qr: &QrSymbol, options: &RenderOptions) -> Result<RgbImage> {
    options.validate()?;
    let size = options.raster_side(qr.width())?;
    let module = options.module_size;
    let border = i64::from(options.border);
    let (fill, background) = (options.fill.to_rgb(), options.background.to_rgb());

    let mut img = ImageBuffer::new(size, size);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let qr_x = i64::from(x / module) - border;
        let qr_y = i64::from(y / module) - border;
        *pixel = if qr.is_dark(qr_x, qr_y) { fill } else { background };
    }

    debug!(size, module, border, "rasterized QR symbol");
    Ok(img)
}

/// Returns a copy of `img` surrounded by `frame.thickness` pixels of `frame.color` on every side.
pub fn add_frame(img: &RgbImage, frame: Frame) -> Result<RgbImage> {
    let t = frame.thickness;
    let grow = |side: u32| {
        t.checked_mul(2)
            .and_then(|d| d.checked_add(side))
            .ok_or_else(|| Error::InvalidOptions("image dimensions overflow".into()))
    };
    let (w, h) = img.dimensions();
    let (fw, fh) = (grow(w)?, grow(h)?);
    check_dimensions(fw, fh)?;
    let mut framed = ImageBuffer::from_pixel(fw, fh, frame.color.to_rgb());
    imageops::replace(&mut framed, img, i64::from(t), i64::from(t));
    Ok(framed)
}

/// Encodes `img` in `format` into memory.
pub fn encode_image(img: &RgbImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format)?;
    Ok(buf.into_inner())
}

/// Encodes `img` as PNG into memory.
pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    encode_image(img, ImageFormat::Png)
}

/// Saves `img` to `path`, inferring the format from the extension.
///
/// The image is fully encoded before the file is touched, so a failed encode leaves nothing on
/// disk. An existing file is overwritten. The parent directory must already exist.
pub fn save(img: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format =
        ImageFormat::from_path(path).map_err(|_| Error::UnsupportedFormat(path.to_path_buf()))?;
    let bytes = encode_image(img, format).map_err(|e| match e {
        Error::Image(ImageError::Unsupported(_)) => Error::UnsupportedFormat(path.to_path_buf()),
        other => other,
    })?;
    write_file(path, &bytes)?;
    info!(path = %path.display(), ?format, width = img.width(), height = img.height(), "saved QR image");
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns an SVG document depicting the symbol with the same geometry as [`render_symbol`].
///
/// Coordinates are in pixels. The string always uses Unix newlines (\n), regardless of the
/// platform.
pub fn to_svg_string(qr: &QrSymbol, options: &RenderOptions) -> Result<String> {
    options.validate()?;
    let side = options.raster_side(qr.width())?;
    let (offset, total) = match options.frame {
        Some(frame) => {
            let total = frame
                .thickness
                .checked_mul(2)
                .and_then(|d| d.checked_add(side))
                .ok_or_else(|| Error::InvalidOptions("image dimensions overflow".into()))?;
            (frame.thickness, total)
        }
        None => (0, side),
    };
    let m = u64::from(options.module_size);
    let origin = u64::from(offset) + u64::from(options.border) * m;

    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
        total
    );
    if let Some(frame) = options.frame {
        result += &format!("\t<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n", frame.color.to_hex());
    }
    result += &format!(
        "\t<rect x=\"{0}\" y=\"{0}\" width=\"{1}\" height=\"{1}\" fill=\"{2}\"/>\n",
        offset,
        side,
        options.background.to_hex()
    );
    result += "\t<path d=\"";
    let w = qr.width() as i64;
    for y in 0..w {
        for x in 0..w {
            if qr.is_dark(x, y) {
                if x != 0 || y != 0 {
                    result += " ";
                }
                let px = origin + x as u64 * m;
                let py = origin + y as u64 * m;
                result += &format!("M{px},{py}h{m}v{m}h-{m}z");
            }
        }
    }
    result += &format!("\" fill=\"{}\"/>\n", options.fill.to_hex());
    result += "</svg>\n";
    Ok(result)
}

/// Writes an SVG rendering of the symbol to `path`.
pub fn save_svg(qr: &QrSymbol, options: &RenderOptions, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let svg = to_svg_string(qr, options)?;
    write_file(path, svg.as_bytes())?;
    info!(path = %path.display(), "saved QR svg");
    Ok(())
}

/// Returns a text preview of the symbol, two characters per module so it looks square in a
/// terminal.
pub fn to_terminal_string(qr: &QrSymbol, border: u32) -> String {
    let border = i64::from(border);
    let w = qr.width() as i64;
    let mut out = String::new();
    for y in -border..w + border {
        for x in -border..w + border {
            let c = if qr.is_dark(x, y) { '█' } else { ' ' };
            out.push(c);
            out.push(c);
        }
        out.push('\n');
    }
    out
}
