//! Payload construction.
//!
//! Turns a category and the caller's raw value into the exact string embedded in the QR symbol.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Scheme prefixed to local file paths.
pub const FILE_SCHEME: &str = "file://";

/// The kind of data a QR code points at.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Category {
    /// A website URL.
    Website,
    /// A link to a PDF hosted somewhere.
    Pdf,
    /// A social media profile URL.
    SocialMedia,
    /// A PDF on the local filesystem, encoded as a `file://` URL.
    LocalPdf,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 4] = [
        Category::Website,
        Category::Pdf,
        Category::SocialMedia,
        Category::LocalPdf,
    ];

    /// Returns the tag used on the command line and in error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Website => "website",
            Category::Pdf => "pdf",
            Category::SocialMedia => "social_media",
            Category::LocalPdf => "local_pdf",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::UnsupportedCategory(s.to_string()))
    }
}

/// Builds the string to embed for `raw_value`.
///
/// URLs pass through unchanged; local paths get the `file://` scheme.
///
/// # Example
///
/// ```
/// use qrframe::payload::{build_payload, Category};
///
/// let payload = build_payload(Category::LocalPdf, "/content/report.pdf").unwrap();
/// assert_eq!(payload, "file:///content/report.pdf");
/// ```
pub fn build_payload(category: Category, raw_value: &str) -> Result<String> {
    if raw_value.is_empty() {
        return Err(Error::EmptyData(category));
    }
    let payload = match category {
        Category::Website | Category::Pdf | Category::SocialMedia => raw_value.to_string(),
        Category::LocalPdf => format!("{FILE_SCHEME}{raw_value}"),
    };
    Ok(payload)
}

/// Parses `tag` into a [`Category`] and builds the payload.
pub fn build_payload_for_tag(tag: &str, raw_value: &str) -> Result<String> {
    build_payload(tag.parse()?, raw_value)
}
