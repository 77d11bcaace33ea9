//! Glyph alphabets for the glyphfall screensaver.

use std::ops::RangeInclusive;

use glyphfall_core::GlyphSet;
use rand::Rng;

/// Uppercase Latin letters.
pub const UPPERCASE: RangeInclusive<char> = 'A'..='Z';

/// Printable ASCII, space through `}`.
pub const PRINTABLE_ASCII: RangeInclusive<char> = ' '..='}';

/// CJK unified ideographs.
pub const CJK_IDEOGRAPHS: RangeInclusive<u32> = 0x4E00..=0x9FFF;

/// Katakana.
pub const KATAKANA: RangeInclusive<u32> = 0x30A0..=0x30FF;

/// Hangul syllables.
pub const HANGUL_SYLLABLES: RangeInclusive<u32> = 0xAC00..=0xD7AF;

/// Code point ranges the Unicode glyph set draws from.
pub const UNICODE_RANGES: [RangeInclusive<u32>; 3] = [CJK_IDEOGRAPHS, KATAKANA, HANGUL_SYLLABLES];

/// Draw a random glyph from the given set.
///
/// For [`GlyphSet::Cjk`] one of the three ranges is chosen uniformly first,
/// then a code point uniformly within it, so the smaller Katakana block shows
/// up as often as the large ideograph block.
pub fn random_glyph<R: Rng>(set: GlyphSet, rng: &mut R) -> char {
    match set {
        GlyphSet::Uppercase => rng.random_range(UPPERCASE),
        GlyphSet::PrintableAscii => rng.random_range(PRINTABLE_ASCII),
        GlyphSet::Cjk => {
            let range = &UNICODE_RANGES[rng.random_range(0..UNICODE_RANGES.len())];
            let cp = rng.random_range(range.clone());
            // None of the ranges touch the surrogate block.
            char::from_u32(cp).unwrap_or('\u{30A2}')
        }
    }
}

/// Whether `ch` belongs to the given set.
pub fn contains(set: GlyphSet, ch: char) -> bool {
    match set {
        GlyphSet::Uppercase => UPPERCASE.contains(&ch),
        GlyphSet::PrintableAscii => PRINTABLE_ASCII.contains(&ch),
        GlyphSet::Cjk => UNICODE_RANGES.iter().any(|r| r.contains(&(ch as u32))),
    }
}
