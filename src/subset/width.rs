use crate::font::GlyphTable;

/// Glyph space units per em in PDF
const PDF_UNITS_PER_EM: u32 = 1000;

/// The advance width of a glyph in PDF glyph space.
///
/// Glyphs past the last horizontal metric take it's width, fonts only store
/// metrics for a prefix of their glyphs when the rest share one width.
/// Scaling truncates.
pub fn pdf_width<T: GlyphTable + ?Sized>(table: &T, glyph_index: u32) -> u32 {
    let widths = table.advance_widths();
    let metrics = usize::from(table.number_of_h_metrics()).min(widths.len());
    let Some(last) = metrics.checked_sub(1) else {
        return 0;
    };

    let index = usize::try_from(glyph_index).map_or(last, |index| index.min(last));
    let width = u32::from(widths[index]);

    match u32::from(table.units_per_em()) {
        PDF_UNITS_PER_EM => width,
        // A zero em can't come out of the parser, leave the width unscaled
        units_per_em => (width * PDF_UNITS_PER_EM)
            .checked_div(units_per_em)
            .unwrap_or(width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::fixtures::MemoryFont;

    #[test]
    fn scales_to_a_thousand_units() {
        let font = MemoryFont {
            advance_widths: vec![1024],
            units_per_em: 2048,
            ..MemoryFont::latin()
        };
        assert_eq!(pdf_width(&font, 0), 500);
    }

    #[test]
    fn scaling_truncates() {
        let font = MemoryFont {
            advance_widths: vec![1],
            units_per_em: 3,
            ..MemoryFont::latin()
        };
        assert_eq!(pdf_width(&font, 0), 333);
    }

    #[test]
    fn thousand_unit_fonts_are_unscaled() {
        let font = MemoryFont {
            advance_widths: vec![600, 722],
            units_per_em: 1000,
            ..MemoryFont::latin()
        };
        assert_eq!(pdf_width(&font, 1), 722);
    }

    #[test]
    fn glyphs_past_the_metrics_take_the_last_width() {
        let font = MemoryFont::latin();
        let last = u32::from(font.number_of_h_metrics()) - 1;

        assert_eq!(pdf_width(&font, last + 1), pdf_width(&font, last));
        assert_eq!(pdf_width(&font, u32::MAX), pdf_width(&font, last));
    }

    #[test]
    fn no_metrics_is_zero_width() {
        let font = MemoryFont {
            advance_widths: Vec::new(),
            ..MemoryFont::latin()
        };
        assert_eq!(pdf_width(&font, 3), 0);
    }
}
