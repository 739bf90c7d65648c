use std::io::{Read, Seek};

use crate::{VeroTypeError, buffer::VeroBufReader};

use super::{TableEncodingError, TableMetadata};

/// A representation of the [head table](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6head.html)
/// keeping the fields that affect how glyph metrics are interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Head {
    /// Units per em (ranges from 16 to 16384)
    units_per_em: u16,

    /// The minimum x value for all glyph bounding boxes
    x_min: i16,

    /// The minimum y value for all glyph bounding boxes
    y_min: i16,

    /// The maximum x value for all glyph bounding boxes
    x_max: i16,

    /// The maximum y value for all glyph bounding boxes
    y_max: i16,
}

impl Head {
    /// Reads the 'head' table located by `metadata`.
    ///
    /// # Errors
    ///
    /// * The table is shorter than the fields read from it.
    /// * `unitsPerEm` lies outside of 16..=16384, every width computation
    ///   divides by it so such a font is refused up front.
    pub(crate) fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        metadata: &TableMetadata,
    ) -> Result<Self, VeroTypeError> {
        // version, fontRevision, checksumAdjustment, magicNumber and flags
        reader.seek_to(u64::from(metadata.offset()) + 18)?;
        let units_per_em = reader.read_u16()?;
        // created and modified dates
        reader.skip(16)?;
        let x_min = reader.read_i16()?;
        let y_min = reader.read_i16()?;
        let x_max = reader.read_i16()?;
        let y_max = reader.read_i16()?;

        if !(16..=16384).contains(&units_per_em) {
            return Err(TableEncodingError::InvalidUnitsPerEm(units_per_em).into());
        }

        Ok(Self {
            units_per_em,
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// The size of the em square every other metric is expressed in
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// The font wide bounding box as (x_min, y_min, x_max, y_max)
    pub fn bounding_box(&self) -> (i16, i16, i16, i16) {
        (self.x_min, self.y_min, self.x_max, self.y_max)
    }
}
