use crate::atlas::GlyphAtlas;

/// Minimum pixel budget left on a line before a split is attempted.
/// Below this, hyphenating would produce confetti; the token moves to the
/// next line whole instead.
pub const WRAP_THRESH: u32 = 10;

// ── wrap_text ────────────────────────────────────────────────────────────────

/// Split `sentence` into lines that fit `max_width` pixels, measured with
/// `font`.
///
/// Whitespace-delimited tokens are accumulated greedily. A token that does
/// not fit is cut at the widest prefix that does ([`find_split`]), with a
/// hyphen appended when the cut lands inside a word, i.e. when the
/// character after the break is alphabetic. Cuts after digits or
/// punctuation get no hyphen; they instead try to take one extra character
/// when it still fits. The remainder of a cut token starts the next line
/// and may be cut again.
///
/// Every returned line measures at most `max_width`, except when a single
/// glyph or an unsplittable token is wider than the whole budget; that
/// line is emitted over-wide rather than dropped. Tokens reappear in input
/// order, joined by single spaces; original whitespace runs are not
/// preserved.
pub fn wrap_text(sentence: &str, font: &GlyphAtlas, max_width: u32) -> Vec<String> {
    // Fast path: no tokenization when the whole sentence already fits.
    if font.measure(sentence) < max_width {
        return vec![sentence.to_string()];
    }

    let tokens: Vec<&str> = sentence.split_whitespace().collect();

    let space_width = font.measure(" ");
    let hyphen_width = font.measure("-");

    let mut lines: Vec<String> = Vec::with_capacity(tokens.len());
    let mut thisline: Vec<String> = Vec::new();

    // Cursor state: `pos` is the pixel position inside the line being
    // built; `pending` holds the unconsumed remainder of a token that was
    // cut, re-evaluated before `tokens[i]` advances.
    let mut pos: u32 = 0;
    let mut pending: Option<String> = None;
    let mut i = 0;

    while i < tokens.len() {
        let token = match &pending {
            Some(rest) => rest.clone(),
            None => tokens[i].to_string(),
        };
        let token_width = font.measure(&token);

        let end = pos + token_width;
        if end < max_width {
            // Token fits: commit it and reserve a following space.
            pos = end + space_width;
            thisline.push(token);
            pending = None;
            i += 1;
        } else {
            let remaining = i64::from(max_width) - i64::from(pos);
            // `pos` includes a trailing space reservation, so `remaining`
            // can go negative; it then just falls through to a line break.

            if remaining >= i64::from(WRAP_THRESH) {
                let budget = (remaining - i64::from(hyphen_width)).max(0) as u32;
                let mut split = find_split(&token, font, budget);

                if split == 0 && pos == 0 {
                    // First glyph alone overflows an empty line. Consume it
                    // anyway so the remainder strictly shrinks.
                    split = token.chars().next().map_or(token.len(), char::len_utf8);
                }

                let piece = match token[split..].chars().next() {
                    Some(c) if c.is_alphabetic() => {
                        // Cut mid-word: hyphenate.
                        format!("{}-", &token[..split])
                    }
                    Some(c) => {
                        // Digit or punctuation after the break: no hyphen,
                        // but take one more character when it still fits.
                        let extended = split + c.len_utf8();
                        if i64::from(font.measure(&token[..extended])) <= remaining {
                            split = extended;
                        }
                        token[..split].to_string()
                    }
                    None => token[..split].to_string(),
                };
                thisline.push(piece);

                let rest = &token[split..];
                if rest.is_empty() {
                    pending = None;
                    i += 1;
                } else {
                    pending = Some(rest.to_string());
                }
            } else if pos == 0 {
                // The whole budget is below the wrap threshold, so this
                // token can never be placed; emit it over-wide instead of
                // looping forever.
                thisline.push(token);
                pending = None;
                i += 1;
            }

            pos = 0;
        }

        // A closed line, or the end of the sentence: join and flush.
        if pos == 0 || (i == tokens.len() && pending.is_none()) {
            lines.push(thisline.join(" "));
            thisline.clear();
        }
    }

    lines
}

// ── find_split ───────────────────────────────────────────────────────────────

/// Byte offset of the widest prefix of `s` measuring at most `budget`.
///
/// Returns `s.len()` when the whole string fits. Otherwise the character
/// count is seeded from the font's average glyph width, then corrected by
/// two monotone passes: grow while under budget (stopping one short of the
/// full string), shrink while over. Costs O(seed error) measurements
/// instead of one per prefix. Offsets land on `char` boundaries, so
/// multi-byte input is never cut mid-character.
fn find_split(s: &str, font: &GlyphAtlas, budget: u32) -> usize {
    if font.measure(s) <= budget {
        return s.len();
    }

    // cuts[n] is the byte length of the n-character prefix.
    let mut cuts: Vec<usize> = s.char_indices().map(|(i, _)| i).collect();
    cuts.push(s.len());
    let nchars = cuts.len() - 1;

    // Approximate character count; the seed may overshoot the string when
    // the average is small, so clamp before indexing.
    let mut n = (budget as f32 / font.avg_width()) as usize;
    if n > nchars {
        n = nchars;
    }

    let mut w = font.measure(&s[..cuts[n]]);
    while w < budget && n < nchars - 1 {
        n += 1;
        w = font.measure(&s[..cuts[n]]);
    }
    while w > budget && n > 0 {
        n -= 1;
        w = font.measure(&s[..cuts[n]]);
    }

    cuts[n]
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use image::GrayImage;

    use super::*;
    use crate::atlas::{FALLBACK_CODE, GlyphRect};

    /// Font mapping printable ASCII and the fallback, every glyph `width`
    /// pixels wide.
    fn uniform_font(width: u32) -> GlyphAtlas {
        let mut letters = HashMap::new();
        let mut left = 0;
        for code in (0x20..0x7f).chain([FALLBACK_CODE]) {
            letters.insert(code, GlyphRect { left, width });
            left += width;
        }
        let mask = GrayImage::new(left, 8);
        GlyphAtlas::new("uniform", mask, letters).unwrap()
    }

    #[test]
    fn find_split_returns_len_when_string_fits() {
        let font = uniform_font(10);
        assert_eq!(find_split("abc", &font, 30), 3);
        assert_eq!(find_split("", &font, 0), 0);
    }

    #[test]
    fn find_split_picks_widest_fitting_prefix() {
        let font = uniform_font(10);
        // "abcdef" is 60px; 35px fits exactly three glyphs.
        assert_eq!(find_split("abcdef", &font, 35), 3);
        assert_eq!(find_split("abcdef", &font, 40), 4);
        assert_eq!(find_split("abcdef", &font, 9), 0);
    }

    #[test]
    fn find_split_grow_phase_stops_short_of_whole_string() {
        let font = uniform_font(10);
        // 19px cannot hold both glyphs, and the grow phase must not hand
        // back the full string even though n starts below it.
        assert_eq!(find_split("ab", &font, 19), 1);
    }

    #[test]
    fn find_split_single_wide_glyph_returns_zero() {
        let font = uniform_font(10);
        assert_eq!(find_split("m", &font, 5), 0);
    }

    #[test]
    fn find_split_seed_overshoot_is_clamped() {
        // Two wide glyphs against a table whose average is dragged far
        // down, so the seed estimate lands past the end of the string.
        let mut letters = HashMap::new();
        let mut left = 0;
        for code in b'a'..=b'j' {
            letters.insert(code, GlyphRect { left, width: 2 });
            left += 2;
        }
        letters.insert(b'W', GlyphRect { left, width: 40 });
        left += 40;
        letters.insert(FALLBACK_CODE, GlyphRect { left, width: 2 });
        left += 2;
        let font = GlyphAtlas::new("skewed", GrayImage::new(left, 8), letters).unwrap();

        assert_eq!(find_split("WW", &font, 30), 0);
        assert_eq!(find_split("WW", &font, 41), 1);
    }

    #[test]
    fn find_split_lands_on_char_boundaries() {
        let font = uniform_font(10);
        // 'é' is two bytes; the 1-character prefix ends at byte 2.
        assert_eq!(find_split("éé", &font, 10), 2);
    }
}
