use image::{Rgba, RgbaImage};

use crate::atlas::{GlyphAtlas, glyph_code};

// ── PalettedBitmap ───────────────────────────────────────────────────────────

/// Indexed-color render output: a two-entry palette plus one palette index
/// per pixel, row-major. Index 0 is the background, 1 the foreground.
///
/// Freshly allocated by every render call: the bitmap owns its pixels and
/// borrows nothing from the atlas that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalettedBitmap {
    palette: [Rgba<u8>; 2],
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PalettedBitmap {
    fn new(width: u32, height: u32, palette: [Rgba<u8>; 2]) -> Self {
        Self {
            palette,
            pixels: vec![0; (width * height) as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn palette(&self) -> [Rgba<u8>; 2] {
        self.palette
    }

    /// Palette index at `(x, y)`. Panics outside the bitmap bounds.
    pub fn index_at(&self, x: u32, y: u32) -> u8 {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixels[(y * self.width + x) as usize]
    }

    /// Resolved palette color at `(x, y)`.
    pub fn color_at(&self, x: u32, y: u32) -> Rgba<u8> {
        self.palette[self.index_at(x, y) as usize]
    }

    /// Expand the indexed pixels into a standalone RGBA image.
    pub fn to_rgba(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| self.color_at(x, y))
    }
}

// ── render_text ──────────────────────────────────────────────────────────────

/// Composite `text` into a fresh [`PalettedBitmap`] sized
/// `font.measure(text) × font.height()`.
///
/// Glyph sub-regions of the atlas mask are blitted left-to-right, each mask
/// value acting as a stencil: `fg` is source-over composited onto `bg` and
/// the result snaps to the nearest palette entry. Characters without a
/// glyph render the fallback, exactly as they measure. Glyph columns lying
/// outside the mask clip to nothing.
pub fn render_text(text: &str, font: &GlyphAtlas, bg: Rgba<u8>, fg: Rgba<u8>) -> PalettedBitmap {
    let mut out = PalettedBitmap::new(font.measure(text), font.height(), [bg, fg]);
    let mask = font.mask();

    let mut left = 0u32;
    for ch in text.chars() {
        let rect = font.lookup(glyph_code(ch));

        for y in 0..out.height {
            for x in 0..rect.width {
                let src_x = rect.left + x;
                if src_x >= mask.width() {
                    continue;
                }
                let coverage = mask.get_pixel(src_x, y)[0];
                if coverage == 0 {
                    continue; // destination already holds the background
                }
                let blended = over(fg, bg, coverage);
                let index = nearest(&out.palette, blended);
                out.pixels[(y * out.width + left + x) as usize] = index;
            }
        }

        left += rect.width;
    }

    out
}

/// [`render_text`] with the classic defaults: black glyphs on white.
pub fn render_text_bw(text: &str, font: &GlyphAtlas) -> PalettedBitmap {
    render_text(
        text,
        font,
        Rgba([255, 255, 255, 255]),
        Rgba([0, 0, 0, 255]),
    )
}

// ── Compositing helpers ──────────────────────────────────────────────────────

/// Source-over of `fg` onto `bg`, with `fg`'s alpha scaled by `coverage`.
fn over(fg: Rgba<u8>, bg: Rgba<u8>, coverage: u8) -> Rgba<u8> {
    let alpha = u32::from(fg[3]) * u32::from(coverage) / 255;
    let inv = 255 - alpha;
    let channel = |f: u8, b: u8| ((u32::from(f) * alpha + u32::from(b) * inv) / 255) as u8;
    Rgba([
        channel(fg[0], bg[0]),
        channel(fg[1], bg[1]),
        channel(fg[2], bg[2]),
        (alpha + u32::from(bg[3]) * inv / 255) as u8,
    ])
}

/// Index of the palette entry closest to `color` (squared RGBA distance,
/// ties to the lower index).
fn nearest(palette: &[Rgba<u8>; 2], color: Rgba<u8>) -> u8 {
    let dist = |p: Rgba<u8>| -> u32 {
        (0..4)
            .map(|c| {
                let d = i32::from(p[c]) - i32::from(color[c]);
                (d * d) as u32
            })
            .sum()
    };
    if dist(palette[1]) < dist(palette[0]) { 1 } else { 0 }
}
