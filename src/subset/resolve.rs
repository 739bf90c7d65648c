use crate::font::GlyphTable;

use super::SubsetError;

/// The cmap subtable a code point is looked up in, chosen by it's magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    /// Format 4, for codes that fit in 16 bits
    Segment(u16),
    /// Format 12, for the supplementary planes
    Sequential(u32),
}

impl LookupStrategy {
    pub fn for_code(code: u32) -> Self {
        match u16::try_from(code) {
            Ok(code) => Self::Segment(code),
            Err(_) => Self::Sequential(code),
        }
    }

    /// Runs the lookup, `None` when the font cannot map the code.
    ///
    /// A code inside the BMP the font doesn't cover maps to glyph 0, the
    /// format 4 table always has an answer for it.
    pub fn glyph_index<T: GlyphTable + ?Sized>(self, table: &T) -> Option<u32> {
        match self {
            Self::Segment(code) => table.segment_map()?.glyph_index(code),
            Self::Sequential(code) => table.sequential_map()?.glyph_index(code),
        }
    }
}

/// Resolves a single code point to a glyph index.
///
/// # Errors
///
/// `SubsetError::GlyphNotFound` if no format 12 group covers a supplementary
/// plane code, or the font's tables cannot answer for it.
pub fn glyph_index<T: GlyphTable + ?Sized>(table: &T, code: u32) -> Result<u32, SubsetError> {
    LookupStrategy::for_code(code)
        .glyph_index(table)
        .ok_or(SubsetError::GlyphNotFound(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::fixtures::MemoryFont;

    #[test]
    fn strategy_follows_code_magnitude() {
        assert_eq!(LookupStrategy::for_code(0x41), LookupStrategy::Segment(0x41));
        assert_eq!(LookupStrategy::for_code(0xFFFF), LookupStrategy::Segment(0xFFFF));
        assert_eq!(
            LookupStrategy::for_code(0x10000),
            LookupStrategy::Sequential(0x10000)
        );
    }

    #[test]
    fn resolves_both_planes() {
        let font = MemoryFont::latin();

        assert_eq!(glyph_index(&font, 'A' as u32), Ok(1));
        assert_eq!(glyph_index(&font, 'Z' as u32), Ok(26));
        assert_eq!(glyph_index(&font, 0x10050), Ok(0x550));
    }

    #[test]
    fn unmapped_bmp_code_is_the_missing_glyph() {
        let font = MemoryFont::latin();
        assert_eq!(glyph_index(&font, 'a' as u32), Ok(0));
    }

    #[test]
    fn unmapped_supplementary_code_is_an_error() {
        let font = MemoryFont::latin();
        assert_eq!(
            glyph_index(&font, 0x1F600),
            Err(SubsetError::GlyphNotFound(0x1F600))
        );
    }

    #[test]
    fn missing_subtable_is_an_error() {
        let font = MemoryFont {
            sequential_map: None,
            ..MemoryFont::latin()
        };
        assert_eq!(
            glyph_index(&font, 0x10050),
            Err(SubsetError::GlyphNotFound(0x10050))
        );
    }
}
