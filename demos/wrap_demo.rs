//! Wraps a paragraph with a synthetic block-glyph font and saves the
//! rendered lines as a single PNG sheet.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example wrap-demo [output.png]
//! ```

use std::collections::HashMap;

use bitfont::atlas::{FALLBACK_CODE, GlyphAtlas, GlyphRect};
use bitfont::render::render_text_bw;
use bitfont::wrap::wrap_text;
use image::{GrayImage, Luma, Rgba, RgbaImage};

/// Placeholder font: printable ASCII mapped to solid blocks 3-7 px wide
/// (width keyed off the character code so the text has visible rhythm).
fn block_font() -> GlyphAtlas {
    const HEIGHT: u32 = 12;

    let mut letters = HashMap::new();
    let mut left = 0u32;
    for code in (0x20..0x7f).chain([FALLBACK_CODE]) {
        let width = 3 + u32::from(code) % 5;
        letters.insert(code, GlyphRect { left, width });
        left += width;
    }

    let mut mask = GrayImage::new(left, HEIGHT);
    for (&code, rect) in &letters {
        if code == b' ' {
            continue;
        }
        for y in 1..HEIGHT - 1 {
            for x in rect.left + 1..rect.left + rect.width - 1 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }

    GlyphAtlas::new("blocks", mask, letters).expect("block font table has a fallback")
}

fn main() {
    env_logger::init();

    let font = block_font();
    let text = "The quick brown fox jumps over 100,000,000 lazy dogs while \
                pondering the finer points of hyphenation";
    let max_width: u32 = 160;

    let lines = wrap_text(text, &font, max_width);
    for line in &lines {
        println!("{:>4}px  {line}", font.measure(line));
    }

    // Stack the rendered lines into one sheet, 2 px apart.
    let line_gap = 2;
    let sheet_h = lines.len() as u32 * (font.height() + line_gap);
    let mut sheet = RgbaImage::from_pixel(max_width, sheet_h.max(1), Rgba([255, 255, 255, 255]));
    for (row, line) in lines.iter().enumerate() {
        let rendered = render_text_bw(line, &font).to_rgba();
        let top = row as u32 * (font.height() + line_gap);
        for (x, y, px) in rendered.enumerate_pixels() {
            if x < max_width {
                sheet.put_pixel(x, top + y, *px);
            }
        }
    }

    let out = std::env::args().nth(1).unwrap_or_else(|| "wrapped.png".into());
    sheet.save(&out).expect("failed to save output image");
    println!("wrote {out} ({} lines)", lines.len());
}
