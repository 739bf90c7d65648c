use std::io::{Read, Seek};

use crate::{VeroTypeError, buffer::VeroBufReader};

use super::TableMetadata;

/// A representation of the [hhea table](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6hhea.html)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hhea {
    /// Distance from baseline of highest ascender
    ascent: i16,

    /// Distance from baseline of lowest descender
    descent: i16,

    /// Number of advance widths in the 'hmtx' table,
    /// glyphs past this count share the last advance width
    number_of_h_metrics: u16,
}

impl Hhea {
    pub(crate) fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        metadata: &TableMetadata,
    ) -> Result<Self, VeroTypeError> {
        // skip the version
        reader.seek_to(u64::from(metadata.offset()) + 4)?;

        let ascent = reader.read_i16()?;
        let descent = reader.read_i16()?;

        // lineGap through metricDataFormat
        reader.skip(26)?;
        let number_of_h_metrics = reader.read_u16()?;

        Ok(Self {
            ascent,
            descent,
            number_of_h_metrics,
        })
    }

    pub fn ascent(&self) -> i16 {
        self.ascent
    }

    pub fn descent(&self) -> i16 {
        self.descent
    }

    pub fn number_of_h_metrics(&self) -> u16 {
        self.number_of_h_metrics
    }
}
