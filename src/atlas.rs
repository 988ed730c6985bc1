use std::collections::HashMap;

use image::{DynamicImage, GrayImage, Luma};

use crate::error::FontError;

/// Code unit substituted for any character the glyph table does not map.
/// Every atlas is required to carry an entry for it.
pub const FALLBACK_CODE: u8 = 255;

// ── GlyphRect ────────────────────────────────────────────────────────────────

/// One glyph's horizontal extent inside the shared coverage mask.
///
/// Glyph cells span the full mask height, so the complete rectangle is
/// `(left, 0, left + width, atlas.height())`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphRect {
    /// Leftmost pixel column of the glyph in the mask.
    pub left: u32,
    /// Pixel width of the glyph.
    pub width: u32,
}

// ── GlyphAtlas ───────────────────────────────────────────────────────────────

/// A single-strip bitmap font: a shared alpha/coverage mask plus a table of
/// per-character sub-rectangles.
///
/// Immutable once built: every method takes `&self`, so an atlas can be
/// shared read-only across threads without locking.
pub struct GlyphAtlas {
    name: String,
    mask: GrayImage,
    letters: HashMap<u8, GlyphRect>,
    avg_width: f32,
    height: u32,
}

impl GlyphAtlas {
    /// Build an atlas from an already-decoded coverage mask and a glyph
    /// table keyed by character code.
    ///
    /// Fails with [`FontError::MissingFallbackGlyph`] unless the table maps
    /// [`FALLBACK_CODE`]; nothing else is checked here, so no per-call
    /// fallibility remains afterwards.
    pub fn new(
        name: impl Into<String>,
        mask: GrayImage,
        letters: HashMap<u8, GlyphRect>,
    ) -> Result<Self, FontError> {
        if !letters.contains_key(&FALLBACK_CODE) {
            return Err(FontError::MissingFallbackGlyph);
        }

        let mut avg_width = 0.0f32;
        for rect in letters.values() {
            avg_width += rect.width as f32;
        }
        avg_width /= letters.len() as f32;

        let height = mask.height();

        Ok(Self { name: name.into(), mask, letters, avg_width, height })
    }

    /// Build an atlas from any decoded image by extracting its alpha
    /// channel as the coverage mask.
    ///
    /// Fully opaque sources (no alpha channel) produce an all-255 mask,
    /// which renders every glyph cell as a solid block; glyph sheets are
    /// expected to carry their shapes in the alpha channel.
    pub fn from_image(
        name: impl Into<String>,
        image: &DynamicImage,
        letters: HashMap<u8, GlyphRect>,
    ) -> Result<Self, FontError> {
        let rgba = image.to_rgba8();
        let mask = GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            Luma([rgba.get_pixel(x, y)[3]])
        });
        Self::new(name, mask, letters)
    }

    /// Display name from the font's metrics header.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fixed glyph cell height in pixels (the mask's full height).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Mean glyph width across the table. Heuristic seed for the wrap
    /// split-point search; never used for exact measurement.
    pub fn avg_width(&self) -> f32 {
        self.avg_width
    }

    /// The glyph table, keyed by character code.
    pub fn letters(&self) -> &HashMap<u8, GlyphRect> {
        &self.letters
    }

    /// The shared coverage mask backing every glyph rectangle.
    pub fn mask(&self) -> &GrayImage {
        &self.mask
    }

    /// Rectangle for `code`, or the fallback rectangle when unmapped.
    pub fn lookup(&self, code: u8) -> GlyphRect {
        match self.letters.get(&code) {
            Some(rect) => *rect,
            None => self.letters[&FALLBACK_CODE],
        }
    }

    /// Pixel width of `code`'s glyph (fallback width when unmapped).
    pub fn width(&self, code: u8) -> u32 {
        self.lookup(code).width
    }

    /// Pixel width of `text`: the sum of its glyph widths, in order.
    ///
    /// The sole width oracle: wrapping and rendering both size through
    /// this, never through character counts, since glyphs are
    /// variable-width. The empty string measures 0.
    pub fn measure(&self, text: &str) -> u32 {
        let mut length = 0;
        for ch in text.chars() {
            length += self.width(glyph_code(ch));
        }
        length
    }
}

/// Map a `char` to its single-unit glyph code. Code points past U+00FF have
/// no slot in a 256-entry table and resolve to the fallback.
pub(crate) fn glyph_code(ch: char) -> u8 {
    let cp = ch as u32;
    if cp < 256 { cp as u8 } else { FALLBACK_CODE }
}
