// ── Tests ─────────────────────────────────────────────────────────────────────

use std::collections::HashMap;

use bitfont::atlas::*;
use bitfont::error::FontError;
use image::{DynamicImage, GrayImage, Rgba, RgbaImage};

// ── helpers ───────────────────────────────────────────────────────────────

/// Build a small five-glyph atlas:
///
/// 'a': left=0,  width=4    'b': left=4,  width=6    ' ': left=10, width=3
/// '-': left=13, width=5    fallback (255): left=18, width=7
/// mask 25×9, fully covered
fn make_atlas() -> GlyphAtlas {
    let mask = GrayImage::from_pixel(25, 9, image::Luma([255]));
    GlyphAtlas::new("five", mask, make_letters()).unwrap()
}

fn make_letters() -> HashMap<u8, GlyphRect> {
    HashMap::from([
        (b'a', GlyphRect { left: 0, width: 4 }),
        (b'b', GlyphRect { left: 4, width: 6 }),
        (b' ', GlyphRect { left: 10, width: 3 }),
        (b'-', GlyphRect { left: 13, width: 5 }),
        (FALLBACK_CODE, GlyphRect { left: 18, width: 7 }),
    ])
}

// ── construction ──────────────────────────────────────────────────────────

#[test]
fn new_requires_fallback_entry() {
    let mut letters = make_letters();
    letters.remove(&FALLBACK_CODE);
    let result = GlyphAtlas::new("broken", GrayImage::new(25, 9), letters);
    assert!(matches!(result, Err(FontError::MissingFallbackGlyph)));
}

#[test]
fn new_populates_metadata() {
    let atlas = make_atlas();
    assert_eq!(atlas.name(), "five");
    assert_eq!(atlas.height(), 9);
    assert_eq!(atlas.letters().len(), 5);
}

#[test]
fn height_and_fallback_width_are_positive() {
    let atlas = make_atlas();
    assert!(atlas.height() > 0);
    assert!(atlas.width(FALLBACK_CODE) > 0);
}

#[test]
fn avg_width_is_arithmetic_mean() {
    // (4 + 6 + 3 + 5 + 7) / 5 = 5.0
    let atlas = make_atlas();
    assert!((atlas.avg_width() - 5.0).abs() < 1e-6);
}

#[test]
fn from_image_extracts_alpha_channel() {
    // Pixel alpha varies per column; the mask must mirror it exactly.
    let rgba = RgbaImage::from_fn(4, 2, |x, _| Rgba([10, 20, 30, (x * 60) as u8]));
    let letters = HashMap::from([(FALLBACK_CODE, GlyphRect { left: 0, width: 4 })]);
    let atlas = GlyphAtlas::from_image("alpha", &DynamicImage::ImageRgba8(rgba), letters).unwrap();
    for x in 0..4 {
        assert_eq!(atlas.mask().get_pixel(x, 0)[0], (x * 60) as u8);
        assert_eq!(atlas.mask().get_pixel(x, 1)[0], (x * 60) as u8);
    }
}

#[test]
fn atlas_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GlyphAtlas>();
}

// ── lookup / width ────────────────────────────────────────────────────────

#[test]
fn lookup_returns_table_entry() {
    let atlas = make_atlas();
    assert_eq!(atlas.lookup(b'a'), GlyphRect { left: 0, width: 4 });
    assert_eq!(atlas.lookup(b'b'), GlyphRect { left: 4, width: 6 });
}

#[test]
fn lookup_unknown_code_returns_fallback_rect() {
    let atlas = make_atlas();
    assert_eq!(atlas.lookup(b'z'), GlyphRect { left: 18, width: 7 });
}

#[test]
fn width_matches_lookup() {
    let atlas = make_atlas();
    assert_eq!(atlas.width(b'a'), 4);
    assert_eq!(atlas.width(b'z'), 7);
}

// ── measure ───────────────────────────────────────────────────────────────

#[test]
fn measure_empty_string_is_zero() {
    assert_eq!(make_atlas().measure(""), 0);
}

#[test]
fn measure_sums_glyph_widths_in_order() {
    let atlas = make_atlas();
    assert_eq!(atlas.measure("ab"), 10);
    assert_eq!(atlas.measure("a b"), 13);
    assert_eq!(atlas.measure("aba-"), 19);
}

#[test]
fn measure_unmapped_char_equals_fallback_width() {
    let atlas = make_atlas();
    assert_eq!(atlas.measure("z"), atlas.width(FALLBACK_CODE));
}

#[test]
fn measure_non_latin1_char_equals_fallback_width() {
    // U+2603 has no slot in a 256-entry table.
    let atlas = make_atlas();
    assert_eq!(atlas.measure("☃"), atlas.width(FALLBACK_CODE));
}
