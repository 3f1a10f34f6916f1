use std::path::PathBuf;

use thiserror::Error;

use crate::payload::Category;
use crate::symbol::QrCodeEcc;

/// Library error type for payload building, encoding and rendering.
#[derive(Debug, Error)]
pub enum Error {
    /// The category tag is not one of `website`, `pdf`, `social_media` or `local_pdf`.
    #[error("unsupported data type '{0}' (expected one of: website, pdf, social_media, local_pdf)")]
    UnsupportedCategory(String),

    /// No data was given for the category.
    #[error("no data given for data type '{0}'")]
    EmptyData(Category),

    /// The payload does not fit in any QR version at the requested level.
    #[error("payload of {len} bytes does not fit in a QR code at error correction level {ecc}")]
    EncodingCapacityExceeded { len: usize, ecc: QrCodeEcc },

    /// A color string could not be parsed.
    #[error("invalid color '{0}'")]
    InvalidColor(String),

    /// Render options that cannot produce an image.
    #[error("invalid render options: {0}")]
    InvalidOptions(String),

    /// The output path has no extension or one that maps to no known image format.
    #[error("cannot infer an image format from '{}'", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The output file could not be written, or an options file could not be read.
    #[error("i/o failure on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image encoder failure other than I/O.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// YAML render options could not be parsed.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
