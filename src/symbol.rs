#![forbid(unsafe_code)]
//! QR symbol encoding.
//!
//! Encoding itself (segment selection, Reed–Solomon codewords, module placement, masking) is done by
//! the [`qrcode`] crate. This module picks the error correction level, lets the encoder choose the
//! smallest QR Code Model 2 version (1–40) that holds the payload, and exposes the finished module
//! matrix to the renderer.

use std::fmt;
use std::str::FromStr;

use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    #[default]
    #[serde(alias = "l")]
    Low,
    /// Tolerates ~15% erroneous codewords.
    #[serde(alias = "m")]
    Medium,
    /// Tolerates ~25% erroneous codewords.
    #[serde(alias = "q")]
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    #[serde(alias = "h")]
    High,
}

impl QrCodeEcc {
    /// Every level, from least to most redundancy.
    pub const ALL: [QrCodeEcc; 4] = [
        QrCodeEcc::Low,
        QrCodeEcc::Medium,
        QrCodeEcc::Quartile,
        QrCodeEcc::High,
    ];

    fn ec_level(self) -> EcLevel {
        use QrCodeEcc::*;
        match self {
            Low => EcLevel::L,
            Medium => EcLevel::M,
            Quartile => EcLevel::Q,
            High => EcLevel::H,
        }
    }
}

impl fmt::Display for QrCodeEcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QrCodeEcc::Low => "low",
            QrCodeEcc::Medium => "medium",
            QrCodeEcc::Quartile => "quartile",
            QrCodeEcc::High => "high",
        };
        f.write_str(name)
    }
}

impl FromStr for QrCodeEcc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(QrCodeEcc::Low),
            "m" | "medium" => Ok(QrCodeEcc::Medium),
            "q" | "quartile" => Ok(QrCodeEcc::Quartile),
            "h" | "high" => Ok(QrCodeEcc::High),
            _ => Err(Error::InvalidOptions(format!(
                "unknown error correction level '{s}' (expected low, medium, quartile or high)"
            ))),
        }
    }
}

/// An encoded QR symbol: a square grid of dark and light modules.
///
/// Instances are immutable after creation and own their module matrix.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrSymbol {
    width: usize,
    version: u8,
    ecc: QrCodeEcc,
    modules: Vec<bool>,
}

impl QrSymbol {
    /// Number of modules along each side, excluding the quiet zone.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The QR version chosen by the encoder, in the range [1, 40].
    pub fn version(&self) -> u8 {
        self.version
    }

    /// The error correction level the symbol was encoded with.
    pub fn ecc(&self) -> QrCodeEcc {
        self.ecc
    }

    /// Returns `true` if the module at (x, y) is dark.
    ///
    /// The top left corner is (0, 0). Coordinates outside the symbol are light, so callers can walk
    /// the quiet zone with negative or oversized coordinates.
    pub fn is_dark(&self, x: i64, y: i64) -> bool {
        let w = self.width as i64;
        if !(0..w).contains(&x) || !(0..w).contains(&y) {
            return false;
        }
        self.modules[(y * w + x) as usize]
    }
}

/// Encodes `payload` at the given error correction level, choosing the smallest version that fits.
///
/// # Errors
///
/// Returns [`Error::EncodingCapacityExceeded`] if the payload does not fit even in version 40.
pub fn encode(payload: &str, ecc: QrCodeEcc) -> Result<QrSymbol> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), ecc.ec_level()).map_err(|e| {
        match e {
            QrError::DataTooLong => Error::EncodingCapacityExceeded { len: payload.len(), ecc },
            other => Error::InvalidOptions(format!("QR encoding failed: {other}")),
        }
    })?;

    let version = match code.version() {
        qrcode::Version::Normal(v) | qrcode::Version::Micro(v) => v as u8,
    };
    let modules = code
        .to_colors()
        .into_iter()
        .map(|c| c == qrcode::Color::Dark)
        .collect();

    debug!(version, width = code.width(), %ecc, bytes = payload.len(), "encoded QR symbol");
    Ok(QrSymbol {
        width: code.width(),
        version,
        ecc,
        modules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_payload_uses_version_1() {
        let qr = encode("Hello, world!", QrCodeEcc::Low).unwrap();
        assert_eq!(qr.version(), 1);
        assert_eq!(qr.width(), 21);
        assert_eq!(qr.ecc(), QrCodeEcc::Low);
    }

    #[test]
    fn test_width_matches_version() {
        let qr = encode(&"x".repeat(300), QrCodeEcc::Medium).unwrap();
        assert_eq!(qr.width(), qr.version() as usize * 4 + 17);
    }

    #[test]
    fn test_higher_ecc_never_shrinks_version() {
        let payload = "https://example.com/some/longer/path?with=query&and=more";
        let low = encode(payload, QrCodeEcc::Low).unwrap();
        let high = encode(payload, QrCodeEcc::High).unwrap();
        assert!(high.version() >= low.version());
    }

    #[test]
    fn test_finder_pattern_corners() {
        let qr = encode("HELLO WORLD", QrCodeEcc::Quartile).unwrap();
        let last = qr.width() as i64 - 1;
        assert!(qr.is_dark(0, 0));
        assert!(qr.is_dark(last, 0));
        assert!(qr.is_dark(0, last));
        // Separator ring around the top-left finder.
        assert!(!qr.is_dark(7, 0));
    }

    #[test]
    fn test_outside_is_light() {
        let qr = encode("HELLO WORLD", QrCodeEcc::Low).unwrap();
        let w = qr.width() as i64;
        assert!(!qr.is_dark(-1, 0));
        assert!(!qr.is_dark(0, -1));
        assert!(!qr.is_dark(w, 0));
        assert!(!qr.is_dark(0, w));
    }

    #[test]
    fn test_capacity_exceeded() {
        // Version 40-H holds 1273 bytes.
        let payload = "a".repeat(1274);
        match encode(&payload, QrCodeEcc::High) {
            Err(Error::EncodingCapacityExceeded { len, ecc }) => {
                assert_eq!(len, 1274);
                assert_eq!(ecc, QrCodeEcc::High);
            }
            other => panic!("expected EncodingCapacityExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_ecc() {
        assert_eq!("L".parse::<QrCodeEcc>().unwrap(), QrCodeEcc::Low);
        assert_eq!("quartile".parse::<QrCodeEcc>().unwrap(), QrCodeEcc::Quartile);
        assert_eq!("High".parse::<QrCodeEcc>().unwrap(), QrCodeEcc::High);
        assert!("x".parse::<QrCodeEcc>().is_err());
    }
}
