use std::{
    collections::BTreeMap,
    io::{Read, Seek},
};

use crate::{VeroTypeError, buffer::VeroBufReader};

use super::TableMetadata;

/// Coverage bit marking a subtable as horizontal kerning
const COVERAGE_HORIZONTAL: u16 = 0x0001;

/// Coverage bit marking a subtable as holding minimum values instead of adjustments
const COVERAGE_MINIMUM: u16 = 0x0002;

/// Coverage bit marking a subtable as perpendicular to the text flow
const COVERAGE_CROSS_STREAM: u16 = 0x0004;

/// The adjustments kerning one left glyph against every right glyph
/// it has a pair with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KernValue {
    /// Maps a right glyph index to an adjustment in font units
    pairs: BTreeMap<u32, i16>,
}

impl KernValue {
    /// The adjustment to apply between this left glyph and `right`, if any
    pub fn value_by_right(&self, right: u32) -> Option<i16> {
        self.pairs.get(&right).copied()
    }

    /// Every (right glyph, adjustment) pair, ordered by right glyph
    pub fn pairs(&self) -> impl Iterator<Item = (u32, i16)> + '_ {
        self.pairs.iter().map(|(right, value)| (*right, *value))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Horizontal pair kerning gathered from the [kern table](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6kern.html)
///
/// Only the Windows flavoured version 0 table with format 0 subtables is
/// understood, which covers what fonts ship for pair kerning in practice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kerning {
    /// Maps a left glyph index to all of it's pairs
    by_left: BTreeMap<u32, KernValue>,
}

impl Kerning {
    pub(crate) fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        metadata: &TableMetadata,
    ) -> Result<Self, VeroTypeError> {
        let table_start = u64::from(metadata.offset());
        reader.seek_to(table_start)?;

        let mut kerning = Self::default();

        let version = reader.read_u16()?;
        if version != 0 {
            log::debug!("kern table version {version} is not supported, ignoring it");
            return Ok(kerning);
        }

        let subtables = reader.read_u16()?;
        let mut subtable_start = table_start + 4;

        for _ in 0..subtables {
            reader.seek_to(subtable_start)?;

            // subtable version
            reader.skip(2)?;
            let length = reader.read_u16()?;
            let coverage = reader.read_u16()?;
            let format = coverage >> 8;

            let usable = format == 0
                && coverage & COVERAGE_HORIZONTAL != 0
                && coverage & (COVERAGE_MINIMUM | COVERAGE_CROSS_STREAM) == 0;

            if format != 0 {
                subtable_start += u64::from(length);
                continue;
            }

            let pair_count = reader.read_u16()?;
            // searchRange, entrySelector and rangeShift
            reader.skip(6)?;

            // The u16 length overflows for large format 0 subtables,
            // the pair count is authoritative
            subtable_start += 14 + u64::from(pair_count) * 6;

            if !usable {
                continue;
            }

            for _ in 0..pair_count {
                let left = reader.read_u16()?;
                let right = reader.read_u16()?;
                let value = reader.read_i16()?;
                kerning.insert(left.into(), right.into(), value);
            }
        }

        log::debug!(
            "kern table holds pairs for {} left glyphs",
            kerning.by_left.len()
        );

        Ok(kerning)
    }

    /// Adds a pair, a later pair for the same glyphs replaces the earlier one
    pub fn insert(&mut self, left: u32, right: u32, value: i16) {
        self.by_left
            .entry(left)
            .or_default()
            .pairs
            .insert(right, value);
    }

    /// Every pair whose left glyph is `left`
    pub fn by_left(&self, left: u32) -> Option<&KernValue> {
        self.by_left.get(&left)
    }

    pub fn is_empty(&self) -> bool {
        self.by_left.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kern_table(coverage: u16, pairs: &[(u16, u16, i16)]) -> Vec<u8> {
        let mut table = vec![0, 0, 0, 1];
        let length = 14 + pairs.len() as u16 * 6;
        for word in [0u16, length, coverage, pairs.len() as u16, 0, 0, 0] {
            table.extend_from_slice(&word.to_be_bytes());
        }
        for (left, right, value) in pairs {
            table.extend_from_slice(&left.to_be_bytes());
            table.extend_from_slice(&right.to_be_bytes());
            table.extend_from_slice(&value.to_be_bytes());
        }
        table
    }

    fn parse(table: Vec<u8>) -> Kerning {
        let mut directory_entry = [0u8; 16];
        directory_entry[12..16].copy_from_slice(&(table.len() as u32).to_be_bytes());
        let metadata = TableMetadata::from_buffer(&directory_entry).unwrap();

        let mut reader = VeroBufReader::from_bytes(table);
        Kerning::from_reader(&mut reader, &metadata).unwrap()
    }

    #[test]
    fn groups_pairs_by_left_glyph() {
        let kerning = parse(kern_table(0x0001, &[(36, 57, -80), (36, 58, -40), (45, 36, 12)]));

        let a = kerning.by_left(36).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a.value_by_right(57), Some(-80));
        assert_eq!(a.value_by_right(45), None);
        assert_eq!(kerning.by_left(45).unwrap().value_by_right(36), Some(12));
        assert!(kerning.by_left(57).is_none());
    }

    #[test]
    fn skips_minimum_value_subtables() {
        let kerning = parse(kern_table(0x0003, &[(36, 57, -80)]));
        assert!(kerning.is_empty());
    }

    #[test]
    fn steps_over_class_based_subtables() {
        let mut table = vec![0, 0, 0, 2];
        // format 2 subtable, horizontal, 10 bytes long
        for word in [0u16, 10, 0x0201, 0, 0] {
            table.extend_from_slice(&word.to_be_bytes());
        }
        table.extend_from_slice(&kern_table(0x0001, &[(1, 2, -120)])[4..]);

        let kerning = parse(table);

        let pairs = kerning.by_left(1).unwrap();
        assert_eq!(pairs.pairs().collect::<Vec<_>>(), vec![(2, -120)]);
        assert!(kerning.by_left(0).is_none());
    }

    #[test]
    fn ignores_apple_kern_tables() {
        let kerning = parse(vec![0, 1, 0, 0, 0, 0, 0, 0]);
        assert!(kerning.is_empty());
    }
}
