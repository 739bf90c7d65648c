use std::io::{Read, Seek};

use crate::{VeroTypeError, buffer::VeroBufReader};

use super::TableMetadata;

/// The underline metrics of the [post table](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6post.html),
/// glyph names are not read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Suggested thickness of the underline
    underline_thickness: i16,
}

impl Post {
    pub(crate) fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        metadata: &TableMetadata,
    ) -> Result<Self, VeroTypeError> {
        // format, italicAngle and underlinePosition
        reader.seek_to(u64::from(metadata.offset()) + 10)?;

        Ok(Self {
            underline_thickness: reader.read_i16()?,
        })
    }

    pub fn underline_thickness(&self) -> i16 {
        self.underline_thickness
    }
}
