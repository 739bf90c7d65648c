use std::{
    collections::BTreeMap,
    fmt,
    io::{Read, Seek},
};

use thiserror::Error;

use crate::{VeroTypeError, buffer::VeroBufReader};

pub mod cmap;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod kern;
pub mod post;

/// The tables this crate knows how to locate in a font's table directory.
/// For more information, see the [Apple Documentation Table 2](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6.html)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TableTag {
    Cmap,
    Glyf,
    Head,
    Hhea,
    Hmtx,
    Kern,
    Loca,
    Maxp,
    Name,
    Post,
}

impl TableTag {
    /// The four byte tag as it appears in the table directory
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cmap => "cmap",
            Self::Glyf => "glyf",
            Self::Head => "head",
            Self::Hhea => "hhea",
            Self::Hmtx => "hmtx",
            Self::Kern => "kern",
            Self::Loca => "loca",
            Self::Maxp => "maxp",
            Self::Name => "name",
            Self::Post => "post",
        }
    }
}

impl fmt::Display for TableTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&[u8]> for TableTag {
    type Error = ();

    fn try_from(value: &[u8]) -> Result<Self, ()> {
        Ok(match value {
            b"cmap" => Self::Cmap,
            b"glyf" => Self::Glyf,
            b"head" => Self::Head,
            b"hhea" => Self::Hhea,
            b"hmtx" => Self::Hmtx,
            b"kern" => Self::Kern,
            b"loca" => Self::Loca,
            b"maxp" => Self::Maxp,
            b"name" => Self::Name,
            b"post" => Self::Post,
            _ => Err(())?,
        })
    }
}

/// Represents the error messages which may occur when trying
/// to parse tables from raw binary buffers
#[derive(Error, Debug)]
pub enum TableEncodingError {
    #[error("The required buffer length for this table is {0} bytes, got {1} bytes")]
    InvalidBufferLength(usize, usize),

    #[error("The font is missing the required '{0}' table")]
    MissingTable(TableTag),

    #[error("unitsPerEm must be within 16..=16384, got {0}")]
    InvalidUnitsPerEm(u16),

    #[error("The cmap table has neither a format 4 nor a format 12 unicode subtable")]
    NoSupportedCmap,
}

/// Represents the offset subtable directory and it's metadata
/// providing us with a important info such as the number of tables
#[derive(Debug)]
pub struct OffsetTable {
    num_tables: u16,
}

impl OffsetTable {
    /// Constructs the offset sub table from a raw buffer
    /// the offset sub table buffer size must be 12 per the reference manual.
    pub fn from_buffer(buf: &[u8]) -> Result<Self, TableEncodingError> {
        let buf: &[u8; 12] = buf
            .try_into()
            .map_err(|_| TableEncodingError::InvalidBufferLength(12, buf.len()))?;

        // The sfnt version is not checked. searchRange, entrySelector and
        // rangeShift only serve binary searches over the directory, which is
        // read linearly here
        Ok(Self {
            num_tables: u16::from_be_bytes([buf[4], buf[5]]),
        })
    }

    /// Parses the offset table from the start of the file
    pub(crate) fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
    ) -> Result<Self, VeroTypeError> {
        reader.seek_to(0)?;

        let mut buffer = [0u8; 12];
        reader.read_exact(&mut buffer)?;

        Ok(Self::from_buffer(&buffer)?)
    }

    /// Returns the number of tables exists in the font file
    pub fn num_tables(&self) -> u16 {
        self.num_tables
    }
}

/// Represents all of the tables and their respective data types.
#[derive(Debug)]
pub struct Tables {
    /// The offset table, which provides the starting offsets of other tables.
    pub offset: OffsetTable,
    pub headers: TablesHeaders,
}

impl Tables {
    /// Reads the offset table followed by the table directory.
    ///
    /// # Errors
    ///
    /// Fails with a `VeroTypeError` if the file is shorter than the directory
    /// it declares.
    pub fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
    ) -> Result<Self, VeroTypeError> {
        let offset_table = OffsetTable::from_reader(reader)?;
        let headers = TablesHeaders::from_reader(reader, offset_table.num_tables())?;
        Ok(Self {
            offset: offset_table,
            headers,
        })
    }
}

/// Represents the table headers and maps a table tag to it's offset
/// in the file / buffer
#[derive(Debug)]
pub struct TablesHeaders {
    /// Maps a table tag to it's metadata, tags this crate doesn't know are dropped
    inner: BTreeMap<TableTag, TableMetadata>,
}

impl TablesHeaders {
    pub fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        num_tables: u16,
    ) -> Result<Self, VeroTypeError> {
        // The directory directly follows the 12 byte offset table,
        // every record being 16 bytes long
        let mut buffer = vec![0u8; usize::from(num_tables) * 16];
        reader.read_exact(&mut buffer)?;

        let mut headers: BTreeMap<TableTag, TableMetadata> = BTreeMap::new();

        for raw_table in buffer.chunks(16) {
            let tag = &raw_table[0..4];

            if let Ok(table_type) = TableTag::try_from(tag) {
                let metadata = TableMetadata::from_buffer(raw_table)?;
                headers.insert(table_type, metadata);
            }
        }

        log::debug!(
            "table directory lists {} tables, {} recognised",
            num_tables,
            headers.len()
        );

        Ok(Self { inner: headers })
    }

    /// Looks up a table which may legitimately be absent, like 'kern'
    pub fn get(&self, tag: TableTag) -> Option<&TableMetadata> {
        self.inner.get(&tag)
    }

    /// Looks up a table the font cannot be used without
    pub fn require(&self, tag: TableTag) -> Result<&TableMetadata, TableEncodingError> {
        self.get(tag).ok_or(TableEncodingError::MissingTable(tag))
    }
}

/// Represents metadata for a table within a larger data structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableMetadata {
    /// The checksum of the table. This value can be used to verify the
    /// integrity of the table data.
    checksum: u32,
    /// The offset of the table, in bytes, from the beginning of the file
    /// or buffer containing the data structure. This indicates where the
    /// actual table data starts.
    offset: u32,
    /// The length of this table in bytes. This represents the actual size
    /// of the table data and does not include any padding that might be
    /// present.
    length: u32,
}

impl TableMetadata {
    /// Constructs a `TableMetadata` instance from a raw byte buffer.
    ///
    /// This method expects a buffer of exactly 16 bytes. The bytes are
    /// interpreted as follows (all values are in big-endian order):
    ///
    /// * Bytes 0-3: The tag (consumed by the caller)
    /// * Bytes 4-7: Checksum of the table
    /// * Bytes 8-11: Offset of the table from the beginning of the file
    /// * Bytes 12-15: Length of the table in bytes
    ///
    /// # Examples
    ///
    /// ```
    /// use vero_subset::tables::TableMetadata;
    ///
    /// let buffer: [u8; 16] = [
    ///     b'h', b'e', b'a', b'd', // Tag
    ///     0x12, 0x34, 0x56, 0x78, // Checksum
    ///     0x00, 0x01, 0x00, 0x00, // Offset
    ///     0x00, 0x00, 0x0A, 0x00, // Length
    /// ];
    ///
    /// let metadata = TableMetadata::from_buffer(&buffer).unwrap();
    /// assert_eq!(metadata.checksum(), 0x12345678);
    /// assert_eq!(metadata.offset(), 0x00010000);
    /// assert_eq!(metadata.length(), 0x00000A00);
    ///
    /// assert!(TableMetadata::from_buffer(&[0u8; 10]).is_err());
    /// ```
    pub fn from_buffer(buf: &[u8]) -> Result<Self, TableEncodingError> {
        let buf: &[u8; 16] = buf
            .try_into()
            .map_err(|_| TableEncodingError::InvalidBufferLength(16, buf.len()))?;

        Ok(Self {
            checksum: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
            offset: u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]),
            length: u32::from_be_bytes([buf[12], buf[13], buf[14], buf[15]]),
        })
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn length(&self) -> u32 {
        self.length
    }
}
