use std::io::{Read, Seek};

use crate::{
    VeroTypeError,
    buffer::VeroBufReader,
    options::SubsetOptions,
    tables::{
        TableTag, Tables,
        cmap::{Cmap, SegmentMap, SequentialMap},
        head::Head,
        hhea::Hhea,
        hmtx::Hmtx,
        kern::Kerning,
        post::Post,
    },
};

/// Read-only access to the parsed tables a font subset is built from.
///
/// [`TrueTypeFont`] is the implementation backed by a real font file.
pub trait GlyphTable {
    /// The format 4 cmap subtable, if the font has one
    fn segment_map(&self) -> Option<&SegmentMap>;

    /// The format 12 cmap subtable, if the font has one
    fn sequential_map(&self) -> Option<&SequentialMap>;

    /// Advance widths in font units, indexed by glyph index
    fn advance_widths(&self) -> &[u16];

    fn number_of_h_metrics(&self) -> u16;

    fn units_per_em(&self) -> u16;

    /// Pair kerning, `None` when the font has none or it wasn't read
    fn kerning(&self) -> Option<&Kerning>;

    fn underline_thickness(&self) -> i16;
}

impl<T: GlyphTable + ?Sized> GlyphTable for &T {
    fn segment_map(&self) -> Option<&SegmentMap> {
        (**self).segment_map()
    }

    fn sequential_map(&self) -> Option<&SequentialMap> {
        (**self).sequential_map()
    }

    fn advance_widths(&self) -> &[u16] {
        (**self).advance_widths()
    }

    fn number_of_h_metrics(&self) -> u16 {
        (**self).number_of_h_metrics()
    }

    fn units_per_em(&self) -> u16 {
        (**self).units_per_em()
    }

    fn kerning(&self) -> Option<&Kerning> {
        (**self).kerning()
    }

    fn underline_thickness(&self) -> i16 {
        (**self).underline_thickness()
    }
}

/// The tables of a TrueType font needed to embed a subset of it.
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    head: Head,
    hhea: Hhea,
    hmtx: Hmtx,
    post: Post,
    cmap: Cmap,
    kern: Option<Kerning>,
}

impl TrueTypeFont {
    /// Parses a font from anything readable and seekable.
    ///
    /// The 'kern' table is only read when `options.use_kerning` is set.
    ///
    /// # Errors
    ///
    /// * `TableEncodingError::MissingTable` if cmap, head, hhea, hmtx or post is absent.
    /// * `TableEncodingError::NoSupportedCmap` if the cmap has no unicode format 4 or 12 subtable.
    /// * `TableEncodingError::InvalidBufferLength` if hmtx is shorter than hhea's metric count.
    /// * `VeroBufReaderError` if a table is cut short.
    pub fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        options: &SubsetOptions,
    ) -> Result<Self, VeroTypeError> {
        let tables = Tables::from_reader(reader)?;
        let headers = &tables.headers;

        let head = Head::from_reader(reader, headers.require(TableTag::Head)?)?;
        let hhea = Hhea::from_reader(reader, headers.require(TableTag::Hhea)?)?;
        let hmtx = Hmtx::from_reader(
            reader,
            headers.require(TableTag::Hmtx)?,
            hhea.number_of_h_metrics(),
        )?;
        let post = Post::from_reader(reader, headers.require(TableTag::Post)?)?;
        let cmap = Cmap::from_reader(reader, headers.require(TableTag::Cmap)?)?;

        let kern = match headers.get(TableTag::Kern) {
            Some(metadata) if options.use_kerning => Some(Kerning::from_reader(reader, metadata)?),
            _ => None,
        };

        log::debug!(
            "parsed font: {} units per em, {} horizontal metrics, kerning {}",
            head.units_per_em(),
            hhea.number_of_h_metrics(),
            if kern.is_some() { "loaded" } else { "not loaded" }
        );

        Ok(Self {
            head,
            hhea,
            hmtx,
            post,
            cmap,
            kern,
        })
    }

    /// Parses a font held in memory.
    pub fn from_bytes(bytes: Vec<u8>, options: &SubsetOptions) -> Result<Self, VeroTypeError> {
        Self::from_reader(&mut VeroBufReader::from_bytes(bytes), options)
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    pub fn hhea(&self) -> &Hhea {
        &self.hhea
    }

    pub fn post(&self) -> &Post {
        &self.post
    }

    pub fn cmap(&self) -> &Cmap {
        &self.cmap
    }
}

impl GlyphTable for TrueTypeFont {
    fn segment_map(&self) -> Option<&SegmentMap> {
        self.cmap.segment_map()
    }

    fn sequential_map(&self) -> Option<&SequentialMap> {
        self.cmap.sequential_map()
    }

    fn advance_widths(&self) -> &[u16] {
        self.hmtx.advance_widths()
    }

    fn number_of_h_metrics(&self) -> u16 {
        self.hhea.number_of_h_metrics()
    }

    fn units_per_em(&self) -> u16 {
        self.head.units_per_em()
    }

    fn kerning(&self) -> Option<&Kerning> {
        self.kern.as_ref()
    }

    fn underline_thickness(&self) -> i16 {
        self.post.underline_thickness()
    }
}

/// In-memory tables for exercising the subset logic without a font file
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::tables::cmap::{Segment, SequentialGroup};

    #[derive(Debug, Clone)]
    pub(crate) struct MemoryFont {
        pub segment_map: Option<SegmentMap>,
        pub sequential_map: Option<SequentialMap>,
        pub advance_widths: Vec<u16>,
        pub units_per_em: u16,
        pub kerning: Option<Kerning>,
    }

    impl MemoryFont {
        /// Maps A-Z onto glyphs 1-26 and U+10000..=U+100FF onto glyphs 0x500..
        pub(crate) fn latin() -> Self {
            let mut kerning = Kerning::default();
            kerning.insert(1, 22, -80);

            Self {
                segment_map: Some(SegmentMap::new(
                    vec![
                        Segment {
                            start_code: 0x41,
                            end_code: 0x5A,
                            id_delta: (-0x40i16) as u16,
                            id_range_offset: 0,
                        },
                        Segment {
                            start_code: 0xFFFF,
                            end_code: 0xFFFF,
                            id_delta: 1,
                            id_range_offset: 0,
                        },
                    ],
                    Vec::new(),
                )),
                sequential_map: Some(SequentialMap::new(vec![SequentialGroup {
                    start_code: 0x10000,
                    end_code: 0x10100,
                    start_glyph_id: 0x500,
                }])),
                // glyph 0 and A-Z, later glyphs reuse the last width
                advance_widths: (0..27).map(|glyph| 1000 + glyph * 10).collect(),
                units_per_em: 2048,
                kerning: Some(kerning),
            }
        }
    }

    impl GlyphTable for MemoryFont {
        fn segment_map(&self) -> Option<&SegmentMap> {
            self.segment_map.as_ref()
        }

        fn sequential_map(&self) -> Option<&SequentialMap> {
            self.sequential_map.as_ref()
        }

        fn advance_widths(&self) -> &[u16] {
            &self.advance_widths
        }

        fn number_of_h_metrics(&self) -> u16 {
            self.advance_widths.len() as u16
        }

        fn units_per_em(&self) -> u16 {
            self.units_per_em
        }

        fn kerning(&self) -> Option<&Kerning> {
            self.kerning.as_ref()
        }

        fn underline_thickness(&self) -> i16 {
            50
        }
    }
}
