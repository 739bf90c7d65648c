use std::io::{Read, Seek};

use crate::{VeroTypeError, buffer::VeroBufReader};

use super::{TableEncodingError, TableMetadata};

/// A single format 4 segment covering the codes `start_code..=end_code`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start_code: u16,
    pub end_code: u16,
    /// Added to the code (or to the glyph array entry) modulo 65536.
    /// Stored unsigned, the signed value and the wrapping add agree.
    pub id_delta: u16,
    /// Offset in bytes from this segment's own idRangeOffset slot into
    /// the glyph id array, zero when the delta alone maps the segment
    pub id_range_offset: u16,
}

/// The format 4 subtable, segment mapping to delta values.
///
/// Covers the Basic Multilingual Plane, segments are sorted by end code
/// and fonts close the list with a 0xFFFF catch-all segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentMap {
    segments: Vec<Segment>,
    glyph_ids: Vec<u16>,
}

impl SegmentMap {
    pub fn new(segments: Vec<Segment>, glyph_ids: Vec<u16>) -> Self {
        Self {
            segments,
            glyph_ids,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Maps `code` to a glyph index.
    ///
    /// Codes the font leaves unmapped resolve to glyph 0, the missing glyph,
    /// including codes past the last segment. `None` is only returned when
    /// the range offset points outside of the glyph id array.
    ///
    /// # Examples
    ///
    /// ```
    /// use vero_subset::tables::cmap::{Segment, SegmentMap};
    ///
    /// let map = SegmentMap::new(
    ///     vec![Segment { start_code: 0x41, end_code: 0x5A, id_delta: 0, id_range_offset: 0 }],
    ///     Vec::new(),
    /// );
    ///
    /// assert_eq!(map.glyph_index(0x41), Some(0x41));
    /// assert_eq!(map.glyph_index(0x20), Some(0));
    /// assert_eq!(map.glyph_index(0x5B), Some(0));
    /// ```
    pub fn glyph_index(&self, code: u16) -> Option<u32> {
        let Some((position, segment)) = self
            .segments
            .iter()
            .enumerate()
            .find(|(_, segment)| code <= segment.end_code)
        else {
            return Some(0);
        };

        if code < segment.start_code {
            return Some(0);
        }

        if segment.id_range_offset == 0 {
            return Some(code.wrapping_add(segment.id_delta).into());
        }

        // The offset is relative to the segment's slot in the idRangeOffset
        // array, which sits (segment count - position) words before the
        // glyph id array
        let index = (usize::from(segment.id_range_offset / 2)
            + usize::from(code - segment.start_code))
        .checked_sub(self.segments.len() - position)?;

        match *self.glyph_ids.get(index)? {
            0 => Some(0),
            glyph => Some(glyph.wrapping_add(segment.id_delta).into()),
        }
    }

    fn from_reader<B: Read + Seek>(reader: &mut VeroBufReader<B>) -> Result<Self, VeroTypeError> {
        let length = reader.read_u16()?;
        // language
        reader.skip(2)?;
        let segment_count = usize::from(reader.read_u16()? / 2);
        // searchRange, entrySelector and rangeShift
        reader.skip(6)?;

        let end_codes = reader.read_u16_array(segment_count)?;
        // reservedPad
        reader.skip(2)?;
        let start_codes = reader.read_u16_array(segment_count)?;
        let id_deltas = reader.read_u16_array(segment_count)?;
        let id_range_offsets = reader.read_u16_array(segment_count)?;

        // Whatever the header and the four arrays leave of the declared length
        let glyph_count = usize::from(length).saturating_sub(16 + 8 * segment_count) / 2;
        let glyph_ids = reader.read_u16_array(glyph_count)?;

        let segments = end_codes
            .into_iter()
            .zip(start_codes)
            .zip(id_deltas.into_iter().zip(id_range_offsets))
            .map(
                |((end_code, start_code), (id_delta, id_range_offset))| Segment {
                    start_code,
                    end_code,
                    id_delta,
                    id_range_offset,
                },
            )
            .collect();

        Ok(Self::new(segments, glyph_ids))
    }
}

/// A format 12 group mapping a run of consecutive codes onto
/// consecutive glyph indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialGroup {
    pub start_code: u32,
    /// Exclusive, one past the group's last code.
    /// The table stores the last code itself, `Cmap` adds one when reading it.
    pub end_code: u32,
    pub start_glyph_id: u32,
}

/// The format 12 subtable, segmented coverage,
/// used for the supplementary planes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequentialMap {
    groups: Vec<SequentialGroup>,
}

impl SequentialMap {
    pub fn new(groups: Vec<SequentialGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[SequentialGroup] {
        &self.groups
    }

    /// Maps `code` to a glyph index, `None` if no group covers it.
    pub fn glyph_index(&self, code: u32) -> Option<u32> {
        let group = self
            .groups
            .iter()
            .find(|group| group.start_code <= code && code < group.end_code)?;

        (code - group.start_code).checked_add(group.start_glyph_id)
    }

    fn from_reader<B: Read + Seek>(reader: &mut VeroBufReader<B>) -> Result<Self, VeroTypeError> {
        // reserved, length and language
        reader.skip(10)?;
        let group_count = reader.read_u32()?;

        let mut groups = Vec::new();
        for _ in 0..group_count {
            let start_code = reader.read_u32()?;
            let last_code = reader.read_u32()?;
            let start_glyph_id = reader.read_u32()?;

            groups.push(SequentialGroup {
                start_code,
                end_code: last_code.saturating_add(1),
                start_glyph_id,
            });
        }

        Ok(Self::new(groups))
    }
}

/// A representation of the [cmap table](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6cmap.html)
/// supporting only formats 4 and 12 as these are the most used formats while other
/// are either for specialized uses or just never got materialized as the reference manual suggests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cmap {
    /// The first unicode format 4 subtable
    segment_map: Option<SegmentMap>,

    /// The first unicode format 12 subtable
    sequential_map: Option<SequentialMap>,
}

impl Cmap {
    pub fn new(segment_map: Option<SegmentMap>, sequential_map: Option<SequentialMap>) -> Self {
        Self {
            segment_map,
            sequential_map,
        }
    }

    /// Reads the encoding records and keeps the first format 4 and the first
    /// format 12 subtable that encode unicode.
    ///
    /// # Errors
    ///
    /// `TableEncodingError::NoSupportedCmap` if neither format is present,
    /// the font could not map a single character.
    pub(crate) fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        metadata: &TableMetadata,
    ) -> Result<Self, VeroTypeError> {
        let table_start = u64::from(metadata.offset());
        // skip the version
        reader.seek_to(table_start + 2)?;
        let subtable_count = reader.read_u16()?;

        let mut records = Vec::with_capacity(subtable_count.into());
        for _ in 0..subtable_count {
            let platform_id = reader.read_u16()?;
            let platform_specific_id = reader.read_u16()?;
            let offset = reader.read_u32()?;
            records.push((platform_id, platform_specific_id, offset));
        }

        let mut cmap = Self::default();

        for (platform_id, platform_specific_id, offset) in records {
            if !encodes_unicode(platform_id, platform_specific_id) {
                continue;
            }

            reader.seek_to(table_start + u64::from(offset))?;
            match reader.read_u16()? {
                4 if cmap.segment_map.is_none() => {
                    let map = SegmentMap::from_reader(reader)?;
                    log::debug!(
                        "cmap format 4 ({platform_id}, {platform_specific_id}) with {} segments",
                        map.segments.len()
                    );
                    cmap.segment_map = Some(map);
                }
                12 if cmap.sequential_map.is_none() => {
                    let map = SequentialMap::from_reader(reader)?;
                    log::debug!(
                        "cmap format 12 ({platform_id}, {platform_specific_id}) with {} groups",
                        map.groups.len()
                    );
                    cmap.sequential_map = Some(map);
                }
                _ => {}
            }
        }

        if cmap.segment_map.is_none() && cmap.sequential_map.is_none() {
            return Err(TableEncodingError::NoSupportedCmap.into());
        }

        Ok(cmap)
    }

    pub fn segment_map(&self) -> Option<&SegmentMap> {
        self.segment_map.as_ref()
    }

    pub fn sequential_map(&self) -> Option<&SequentialMap> {
        self.sequential_map.as_ref()
    }
}

/// Unicode platform, or the Windows BMP and full repertoire encodings
fn encodes_unicode(platform_id: u16, platform_specific_id: u16) -> bool {
    match platform_id {
        0 => true,
        3 => matches!(platform_specific_id, 1 | 10),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start_code: u16, end_code: u16, id_delta: i16, id_range_offset: u16) -> Segment {
        Segment {
            start_code,
            end_code,
            id_delta: id_delta as u16,
            id_range_offset,
        }
    }

    #[test]
    fn delta_segments() {
        let map = SegmentMap::new(
            vec![segment(0x41, 0x5A, 0, 0), segment(0xFFFF, 0xFFFF, 1, 0)],
            Vec::new(),
        );

        assert_eq!(map.glyph_index(0x41), Some(0x41));
        assert_eq!(map.glyph_index(0x5A), Some(0x5A));
        // between the two segments
        assert_eq!(map.glyph_index(0x5B), Some(0));
        // 0xFFFF + 1 wraps to the missing glyph
        assert_eq!(map.glyph_index(0xFFFF), Some(0));
    }

    #[test]
    fn negative_delta_wraps() {
        let map = SegmentMap::new(vec![segment(0x20, 0x7E, -29, 0)], Vec::new());
        assert_eq!(map.glyph_index(0x41), Some(0x41 - 29));
    }

    #[test]
    fn code_past_every_segment_is_the_missing_glyph() {
        let map = SegmentMap::new(vec![segment(0x41, 0x5A, 0, 0)], Vec::new());
        assert_eq!(map.glyph_index(0x41), Some(0x41));
        assert_eq!(map.glyph_index(0x5B), Some(0));
    }

    #[test]
    fn range_offset_indirection() {
        // Two segments, the first indexes into the glyph array which starts
        // right after its own slot and the second segment's slot
        let map = SegmentMap::new(
            vec![segment(0x61, 0x63, 0, 4), segment(0xFFFF, 0xFFFF, 1, 0)],
            vec![7, 0, 9],
        );

        assert_eq!(map.glyph_index(0x61), Some(7));
        assert_eq!(map.glyph_index(0x62), Some(0));
        assert_eq!(map.glyph_index(0x63), Some(9));
    }

    #[test]
    fn range_offset_delta_applies_to_array_entries() {
        let map = SegmentMap::new(vec![segment(0x61, 0x61, 100, 2)], vec![7]);
        assert_eq!(map.glyph_index(0x61), Some(107));
    }

    #[test]
    fn range_offset_out_of_bounds_is_unresolvable() {
        let map = SegmentMap::new(vec![segment(0x61, 0x70, 0, 2)], vec![7]);

        assert_eq!(map.glyph_index(0x61), Some(7));
        assert_eq!(map.glyph_index(0x62), None);
    }

    #[test]
    fn range_offset_before_the_array_is_unresolvable() {
        // An offset which points back into the idRangeOffset array itself
        let map = SegmentMap::new(
            vec![segment(0x61, 0x61, 0, 0), segment(0x62, 0x62, 0, 0), segment(0x63, 0x63, 0, 2)],
            vec![1, 2, 3],
        );
        assert_eq!(map.glyph_index(0x63), Some(1));

        let map = SegmentMap::new(
            vec![segment(0x61, 0x61, 0, 2), segment(0x62, 0x62, 0, 0)],
            vec![1],
        );
        assert_eq!(map.glyph_index(0x61), None);
    }

    #[test]
    fn sequential_groups() {
        let map = SequentialMap::new(vec![SequentialGroup {
            start_code: 0x10000,
            end_code: 0x10100,
            start_glyph_id: 0x500,
        }]);

        assert_eq!(map.glyph_index(0x10050), Some(0x550));
        assert_eq!(map.glyph_index(0x10000), Some(0x500));
        assert_eq!(map.glyph_index(0x100FF), Some(0x500 + 0xFF));
        assert_eq!(map.glyph_index(0x10100), None);
        assert_eq!(map.glyph_index(0xFFFF), None);
    }

    #[test]
    fn sequential_glyph_overflow_is_unresolvable() {
        let map = SequentialMap::new(vec![SequentialGroup {
            start_code: 0x10000,
            end_code: 0x10100,
            start_glyph_id: u32::MAX,
        }]);

        assert_eq!(map.glyph_index(0x10000), Some(u32::MAX));
        assert_eq!(map.glyph_index(0x10001), None);
    }
}
