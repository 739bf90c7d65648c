//! Embeds subsets of TrueType fonts in PDF documents as Type0 composite
//! fonts with the Identity-H encoding.
//!
//! A [`FontSubset`] collects the characters a document uses, resolves them
//! to glyph indices through the font's cmap, reports their widths in PDF
//! glyph space and writes the font's dictionary.

use buffer::VeroBufReaderError;
use subset::SubsetError;
use tables::TableEncodingError;
use thiserror::Error;

pub mod buffer;
pub mod font;
pub mod options;
pub mod subset;
pub mod tables;

pub use font::{GlyphTable, TrueTypeFont};
pub use options::SubsetOptions;
pub use subset::FontSubset;

#[derive(Debug, Error)]
pub enum VeroTypeError {
    #[error(transparent)]
    TableEncodingError(#[from] TableEncodingError),

    #[error(transparent)]
    VeroBufReaderError(#[from] VeroBufReaderError),

    #[error(transparent)]
    SubsetError(#[from] SubsetError),
}
