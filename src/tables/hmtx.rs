use std::io::{Read, Seek};

use crate::{VeroTypeError, buffer::VeroBufReader};

use super::{TableEncodingError, TableMetadata};

/// The advance widths of the [hmtx table](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6hmtx.html)
///
/// Left side bearings are skipped, nothing downstream of a PDF width
/// array needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hmtx {
    /// One advance width per long horizontal metric, indexed by glyph index
    advance_widths: Vec<u16>,
}

impl Hmtx {
    /// Reads `number_of_h_metrics` records, the count comes from the 'hhea' table.
    ///
    /// # Errors
    ///
    /// `TableEncodingError::InvalidBufferLength` if the records don't fit in
    /// the table, the count would otherwise read into whatever table follows.
    pub(crate) fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        metadata: &TableMetadata,
        number_of_h_metrics: u16,
    ) -> Result<Self, VeroTypeError> {
        let required = usize::from(number_of_h_metrics) * 4;
        let length = metadata.length() as usize;
        if required > length {
            return Err(TableEncodingError::InvalidBufferLength(required, length).into());
        }

        reader.seek_to(metadata.offset().into())?;

        let mut advance_widths = Vec::with_capacity(number_of_h_metrics.into());
        for _ in 0..number_of_h_metrics {
            advance_widths.push(reader.read_u16()?);
            // left side bearing
            reader.skip(2)?;
        }

        Ok(Self { advance_widths })
    }

    pub fn advance_widths(&self) -> &[u16] {
        &self.advance_widths
    }
}
