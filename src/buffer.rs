use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};

use thiserror::Error;

macro_rules! impl_read {
    ($fn_name:ident, $typ:ty) => {
        pub fn $fn_name(&mut self) -> Result<$typ, VeroBufReaderError> {
            let mut buf = [0u8; size_of::<$typ>()];
            self.inner.read_exact(&mut buf)?;

            Ok(<$typ>::from_be_bytes(buf))
        }
    };
}

/// Represents the possible errors that can occur when using `VeroBufReader`.
#[derive(Error, Debug)]
pub enum VeroBufReaderError {
    /// An error occurred during a read operation on the underlying buffer,
    /// most commonly a table that ends before its declared fields do.
    #[error(transparent)]
    ReadError(#[from] io::Error),

    /// An error occurred during a seek operation on the underlying buffer.
    #[error("Failed to seek, error context: {0}")]
    FailedToSeek(io::Error),
}

/// Big-endian cursor over a font file.
///
/// Every multi-byte value in a TrueType file is stored big-endian, so the
/// readers here never need to be told the byte order.
pub struct VeroBufReader<B: Read + Seek> {
    inner: BufReader<B>,
}

impl VeroBufReader<Cursor<Vec<u8>>> {
    /// Wraps an in-memory font, e.g. one received over the network
    /// or embedded with `include_bytes!`.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::from_buffer(Cursor::new(bytes))
    }
}

impl<B> VeroBufReader<B>
where
    B: Read + Seek,
{
    /// Returns a new buf reader from anything which implements read
    /// and seek, the most obvious use case would be a File.
    pub fn from_buffer(buffer: B) -> Self {
        Self {
            inner: BufReader::new(buffer),
        }
    }

    /// Seeks to a specifc place in the buffer
    /// from the start of the file
    ///
    /// # Examples
    ///
    /// ```
    /// use vero_subset::buffer::VeroBufReader;
    ///
    /// // Two u32 values, 10 and 20, in big-endian
    /// let mut reader = VeroBufReader::from_bytes(vec![0, 0, 0, 10, 0, 0, 0, 20]);
    ///
    /// reader.seek_to(4).unwrap();
    /// assert_eq!(reader.read_u32().unwrap(), 20);
    /// ```
    pub fn seek_to(&mut self, pos: u64) -> Result<(), VeroBufReaderError> {
        self.inner
            .seek(SeekFrom::Start(pos))
            .map_err(VeroBufReaderError::FailedToSeek)?;

        Ok(())
    }

    /// Skips n bytes from the CURRENT cursor positon
    ///
    /// # Examples
    ///
    /// ```
    /// use vero_subset::buffer::VeroBufReader;
    ///
    /// let mut reader = VeroBufReader::from_bytes(vec![0, 0, 0, 10, 0, 0, 0, 20]);
    ///
    /// assert_eq!(reader.read_u32().unwrap(), 10);
    /// reader.skip(4).unwrap();
    ///
    /// // Nothing is left to read
    /// assert!(reader.read_u32().is_err());
    /// ```
    pub fn skip(&mut self, n: i64) -> Result<(), VeroBufReaderError> {
        self.inner
            .seek_relative(n)
            .map_err(VeroBufReaderError::FailedToSeek)?;

        Ok(())
    }

    /// Fills `buf` completely or fails with an EOF read error.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), VeroBufReaderError> {
        self.inner.read_exact(buf)?;

        Ok(())
    }

    /// Reads `count` consecutive big-endian u16 values,
    /// the layout used by every array in the cmap and hmtx tables.
    pub fn read_u16_array(&mut self, count: usize) -> Result<Vec<u16>, VeroBufReaderError> {
        (0..count).map(|_| self.read_u16()).collect()
    }

    impl_read!(read_i32, i32);
    impl_read!(read_u32, u32);
    impl_read!(read_i16, i16);
    impl_read!(read_u16, u16);
    impl_read!(read_i8, i8);
    impl_read!(read_u8, u8);
}
