//! # QR Encode
//!
//! [`MatrixSource`] implementation over the `qrcode` crate.
//!
//! Versions are tried from the requested minimum up to 40 until the data
//! fits. The returned matrix has no quiet-zone border; the backing plate
//! margin takes its place.
//!
//! ## Example
//!
//! ```rust
//! use qr_encode::QrEncoder;
//! use qr_solid::{EncodeRequest, ErrorCorrection, MatrixSource};
//!
//! let request = EncodeRequest::new("https://example.com")
//!     .with_error_correction(ErrorCorrection::Low);
//! let rows = QrEncoder::new().encode(&request).unwrap();
//!
//! assert_eq!(rows.len(), 25); // version 2
//! assert!(rows.iter().all(|row| row.len() == 25));
//! ```

use config::constants::{qr_width_for_version, MAX_QR_VERSION};
use qr_solid::{EncodeRequest, ErrorCorrection, MatrixSource, SourceError};
use qrcode::types::{Color, EcLevel, QrError, Version};
use qrcode::QrCode;
use tracing::debug;

/// QR encoder with version fitting.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrEncoder;

/// Encoded symbol: chosen version plus module rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSymbol {
    pub version: u8,
    pub rows: Vec<Vec<bool>>,
}

impl QrEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encodes with the smallest fitting version and reports which one was
    /// used.
    pub fn encode_symbol(&self, request: &EncodeRequest<'_>) -> Result<EncodedSymbol, SourceError> {
        if !(1..=MAX_QR_VERSION).contains(&request.min_version) {
            return Err(SourceError::InvalidVersion(request.min_version));
        }

        let level = ec_level(request.error_correction);
        for version in request.min_version..=MAX_QR_VERSION {
            match QrCode::with_version(request.data.as_bytes(), Version::Normal(i16::from(version)), level) {
                Ok(code) => {
                    let width = code.width();
                    debug_assert_eq!(width, qr_width_for_version(version));
                    let rows = code
                        .to_colors()
                        .chunks(width)
                        .map(|row| row.iter().map(|&c| c == Color::Dark).collect())
                        .collect();
                    debug!(version, width, data_len = request.data.len(), "encoded QR symbol");
                    return Ok(EncodedSymbol { version, rows });
                }
                Err(QrError::DataTooLong) => continue,
                Err(err) => return Err(SourceError::Encoder(err.to_string())),
            }
        }

        Err(SourceError::DataTooLong {
            len: request.data.len(),
            min_version: request.min_version,
        })
    }
}

impl MatrixSource for QrEncoder {
    fn encode(&self, request: &EncodeRequest<'_>) -> Result<Vec<Vec<bool>>, SourceError> {
        self.encode_symbol(request).map(|symbol| symbol.rows)
    }
}

fn ec_level(level: ErrorCorrection) -> EcLevel {
    match level {
        ErrorCorrection::Low => EcLevel::L,
        ErrorCorrection::Medium => EcLevel::M,
        ErrorCorrection::Quartile => EcLevel::Q,
        ErrorCorrection::High => EcLevel::H,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(data: &str, level: ErrorCorrection, min_version: u8) -> Result<EncodedSymbol, SourceError> {
        let request = EncodeRequest::new(data)
            .with_error_correction(level)
            .with_min_version(min_version);
        QrEncoder::new().encode_symbol(&request)
    }

    #[test]
    fn test_short_text_fits_version_one() {
        let symbol = encode("hello", ErrorCorrection::Low, 1).unwrap();
        assert_eq!(symbol.version, 1);
        assert_eq!(symbol.rows.len(), 21);
        assert!(symbol.rows.iter().all(|row| row.len() == 21));
    }

    #[test]
    fn test_width_follows_version() {
        for version in [1u8, 3, 7, 10] {
            let symbol = encode("x", ErrorCorrection::Medium, version).unwrap();
            assert_eq!(symbol.version, version);
            assert_eq!(symbol.rows.len(), qr_width_for_version(version));
        }
    }

    #[test]
    fn test_minimum_version_is_honoured() {
        let symbol = encode("hello", ErrorCorrection::Low, 5).unwrap();
        assert_eq!(symbol.version, 5);
        assert_eq!(symbol.rows.len(), 37);
    }

    #[test]
    fn test_long_text_grows_version() {
        let text = "a".repeat(200);
        let symbol = encode(&text, ErrorCorrection::High, 1).unwrap();
        assert!(symbol.version > 1);
        assert_eq!(symbol.rows.len(), qr_width_for_version(symbol.version));
    }

    #[test]
    fn test_finder_pattern_at_top_left() {
        let symbol = encode("hello", ErrorCorrection::Low, 1).unwrap();
        // 7x7 finder: dark border, light ring, dark 3x3 core.
        assert!(symbol.rows[0][..7].iter().all(|&dark| dark));
        assert!(symbol.rows[6][..7].iter().all(|&dark| dark));
        assert!(!symbol.rows[1][1]);
        assert!(symbol.rows[3][3]);
        // Separator column right of the finder is light.
        assert!(!symbol.rows[0][7]);
    }

    #[test]
    fn test_invalid_versions() {
        assert_eq!(
            encode("x", ErrorCorrection::Low, 0),
            Err(SourceError::InvalidVersion(0))
        );
        assert_eq!(
            encode("x", ErrorCorrection::Low, 41),
            Err(SourceError::InvalidVersion(41))
        );
    }

    #[test]
    fn test_data_too_long() {
        let text = "a".repeat(8000);
        let err = encode(&text, ErrorCorrection::High, 1).unwrap_err();
        assert_eq!(
            err,
            SourceError::DataTooLong {
                len: 8000,
                min_version: 1
            }
        );
    }
}
