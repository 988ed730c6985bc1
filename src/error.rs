use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ── FontError ────────────────────────────────────────────────────────────────

/// Why building a [`GlyphAtlas`](crate::atlas::GlyphAtlas) failed.
///
/// All variants are construction-time: once an atlas exists, lookup,
/// measurement, wrapping and rendering cannot fail. Batch loaders keep the
/// failing path in the variant so callers can report which asset broke.
#[derive(Debug)]
pub enum FontError {
    /// The metrics header does not have the `name, image, count` shape,
    /// or the count field is not an integer.
    InvalidMetricsHeader { reason: String },
    /// A glyph row could not be parsed. `line` is 1-based within the
    /// metrics file.
    InvalidMetricsRow { line: usize, reason: String },
    /// The metrics file or the pixel source it references does not exist.
    AssetNotFound { path: PathBuf },
    /// The pixel source exists but could not be decoded.
    ImageDecodeFailure {
        path: PathBuf,
        source: image::ImageError,
    },
    /// The glyph table has no entry for code 255, so unmapped characters
    /// would have nothing to fall back to.
    MissingFallbackGlyph,
    /// An I/O failure other than a missing file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMetricsHeader { reason } => {
                write!(f, "invalid metrics header: {reason}")
            }
            Self::InvalidMetricsRow { line, reason } => {
                write!(f, "invalid glyph row at line {line}: {reason}")
            }
            Self::AssetNotFound { path } => {
                write!(f, "font asset not found: {}", path.display())
            }
            Self::ImageDecodeFailure { path, source } => {
                write!(f, "could not decode {}: {source}", path.display())
            }
            Self::MissingFallbackGlyph => {
                write!(f, "glyph table has no fallback entry (code 255)")
            }
            Self::Io { path, source } => {
                write!(f, "i/o error on {}: {source}", path.display())
            }
        }
    }
}

impl Error for FontError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ImageDecodeFailure { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
