use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::atlas::{GlyphAtlas, GlyphRect};
use crate::error::FontError;

// ── FontMetrics ──────────────────────────────────────────────────────────────

/// Parsed contents of a glyph-metrics file, before the pixel source is
/// decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontMetrics {
    /// Display name from the header.
    pub name: String,
    /// Pixel-source path from the header, possibly relative to the
    /// metrics file.
    pub image: PathBuf,
    /// Character code → horizontal extent.
    pub letters: HashMap<u8, GlyphRect>,
}

impl FontMetrics {
    /// Parse the native `.fnt` table: a `name, image, count` header line
    /// followed by one `code, left, width` row per glyph. Fields are
    /// comma-separated and may be padded with spaces or tabs; blank lines
    /// are skipped. The header count is a capacity hint only.
    pub fn parse(text: &str) -> Result<Self, FontError> {
        let mut rows = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = rows.next().ok_or_else(|| FontError::InvalidMetricsHeader {
            reason: "empty metrics file".into(),
        })?;
        let fields = split_fields(header);
        if fields.len() != 3 {
            return Err(FontError::InvalidMetricsHeader {
                reason: format!("expected 3 header fields, got {}", fields.len()),
            });
        }
        let declared: usize =
            fields[2]
                .parse()
                .map_err(|_| FontError::InvalidMetricsHeader {
                    reason: format!("glyph count '{}' is not an integer", fields[2]),
                })?;

        let name = fields[0].to_string();
        let image = PathBuf::from(fields[1]);

        let mut letters = HashMap::with_capacity(declared);
        for (index, line) in rows {
            let lineno = index + 1;
            let fields = split_fields(line);
            if fields.len() != 3 {
                return Err(row_error(lineno, format!("expected 3 fields, got {}", fields.len())));
            }
            let code: u8 = fields[0]
                .parse()
                .map_err(|_| row_error(lineno, format!("bad character code '{}'", fields[0])))?;
            let left: u32 = fields[1]
                .parse()
                .map_err(|_| row_error(lineno, format!("bad left offset '{}'", fields[1])))?;
            let width: u32 = fields[2]
                .parse()
                .map_err(|_| row_error(lineno, format!("bad width '{}'", fields[2])))?;
            if width == 0 {
                return Err(row_error(lineno, "glyph width must be positive".into()));
            }
            letters.insert(code, GlyphRect { left, width });
        }

        Ok(Self { name, image, letters })
    }

    /// Parse the JSON descriptor form of the same table:
    ///
    /// ```json
    /// { "name": "tiny", "image": "tiny_font.png",
    ///   "glyphs": [ { "code": 65, "left": 0, "width": 4 } ] }
    /// ```
    pub fn from_json(text: &str) -> Result<Self, FontError> {
        #[derive(Deserialize)]
        struct RawGlyph {
            code: u8,
            left: u32,
            width: u32,
        }
        #[derive(Deserialize)]
        struct RawMetrics {
            name: String,
            image: PathBuf,
            glyphs: Vec<RawGlyph>,
        }

        let raw: RawMetrics =
            serde_json::from_str(text).map_err(|err| FontError::InvalidMetricsHeader {
                reason: err.to_string(),
            })?;

        let mut letters = HashMap::with_capacity(raw.glyphs.len());
        for (index, glyph) in raw.glyphs.into_iter().enumerate() {
            if glyph.width == 0 {
                return Err(row_error(index + 1, "glyph width must be positive".into()));
            }
            letters.insert(glyph.code, GlyphRect { left: glyph.left, width: glyph.width });
        }

        Ok(Self { name: raw.name, image: raw.image, letters })
    }
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').map(|f| f.trim_matches([' ', '\t'])).collect()
}

fn row_error(line: usize, reason: String) -> FontError {
    FontError::InvalidMetricsRow { line, reason }
}

// ── load ─────────────────────────────────────────────────────────────────────

/// Load a font from a metrics file (`.json` descriptors are detected by
/// extension; anything else parses as the native `.fnt` table), decode the
/// pixel source it references, and build the atlas.
///
/// A relative image path resolves against the metrics file's directory.
pub fn load(path: impl AsRef<Path>) -> Result<GlyphAtlas, FontError> {
    let path = path.as_ref();
    let text = read_text(path)?;

    let metrics = if path.extension().is_some_and(|ext| ext == "json") {
        FontMetrics::from_json(&text)?
    } else {
        FontMetrics::parse(&text)?
    };

    let image_path = if metrics.image.is_absolute() {
        metrics.image.clone()
    } else {
        path.parent().unwrap_or(Path::new("")).join(&metrics.image)
    };

    let bytes = read_bytes(&image_path)?;
    let decoded =
        image::load_from_memory(&bytes).map_err(|source| FontError::ImageDecodeFailure {
            path: image_path.clone(),
            source,
        })?;

    let atlas = GlyphAtlas::from_image(metrics.name, &decoded, metrics.letters)?;
    debug!(
        "loaded font '{}': {} glyphs, {}px tall, avg width {:.1}px",
        atlas.name(),
        atlas.letters().len(),
        atlas.height(),
        atlas.avg_width(),
    );
    Ok(atlas)
}

/// Attempt to load every `.fnt` / `.json` metrics file under `path`
/// (recursively), returning one result per file so callers can report
/// exactly which assets failed and why. Failures are also logged.
pub fn load_folder(path: impl AsRef<Path>) -> Vec<(PathBuf, Result<GlyphAtlas, FontError>)> {
    let mut results = Vec::new();

    for entry in WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let ext = entry.path().extension().and_then(|e| e.to_str());
        if !matches!(ext, Some("fnt") | Some("json")) {
            continue;
        }

        let result = load(entry.path());
        match &result {
            Ok(atlas) => debug!("load_folder: {} -> '{}'", entry.path().display(), atlas.name()),
            Err(err) => warn!("load_folder: {} failed: {err}", entry.path().display()),
        }
        results.push((entry.path().to_path_buf(), result));
    }

    results
}

fn read_text(path: &Path) -> Result<String, FontError> {
    fs::read_to_string(path).map_err(|source| io_error(path, source))
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, FontError> {
    fs::read(path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: io::Error) -> FontError {
    if source.kind() == io::ErrorKind::NotFound {
        FontError::AssetNotFound { path: path.to_path_buf() }
    } else {
        FontError::Io { path: path.to_path_buf(), source }
    }
}
