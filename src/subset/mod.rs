use std::{
    collections::BTreeMap,
    io::{Read, Seek},
};

use thiserror::Error;

use crate::{
    VeroTypeError,
    buffer::VeroBufReader,
    font::{GlyphTable, TrueTypeFont},
    options::SubsetOptions,
    tables::kern::KernValue,
};

mod dictionary;
pub mod resolve;
pub mod width;

pub use dictionary::subset_font_name;

/// Errors raised while collecting characters into a subset or writing it out
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubsetError {
    /// The character was queried before it was added to the subset
    #[error("Character {0:?} was never added to this font subset")]
    CharacterNotRegistered(char),

    /// The font has no glyph for a supplementary plane code point
    #[error("The font has no glyph for code point {0:#X}")]
    GlyphNotFound(u32),

    /// The dictionary references an object whose index is still unknown
    #[error("The {0} object index must be assigned before the font dictionary is built")]
    ObjectIndexUnassigned(&'static str),
}

/// One embedded subset of a font family.
///
/// The characters of a document are added as text is laid out, each one is
/// resolved to a glyph index once and the set only ever grows. Afterwards
/// the subset answers glyph index, width and kerning queries and writes the
/// Type0 font dictionary that references it's descendant CID font and
/// ToUnicode map.
///
/// Adding characters requires `&mut self`, queries only `&self`.
#[derive(Debug, Clone)]
pub struct FontSubset<T: GlyphTable = TrueTypeFont> {
    family: String,
    table: T,
    options: SubsetOptions,
    character_to_glyph_index: BTreeMap<char, u32>,
    cid_font_object_index: Option<usize>,
    unicode_map_object_index: Option<usize>,
}

impl FontSubset<TrueTypeFont> {
    /// Parses the font from `reader`, honouring `options` while doing so,
    /// and starts an empty subset of it.
    pub fn from_reader<B: Read + Seek>(
        family: impl Into<String>,
        reader: &mut VeroBufReader<B>,
        options: SubsetOptions,
    ) -> Result<Self, VeroTypeError> {
        let font = TrueTypeFont::from_reader(reader, &options)?;
        Ok(Self::new(family, font, options))
    }
}

impl<T: GlyphTable> FontSubset<T> {
    pub fn new(family: impl Into<String>, table: T, options: SubsetOptions) -> Self {
        Self {
            family: family.into(),
            table,
            options,
            character_to_glyph_index: BTreeMap::new(),
            cid_font_object_index: None,
            unicode_map_object_index: None,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn options(&self) -> &SubsetOptions {
        &self.options
    }

    pub fn glyph_table(&self) -> &T {
        &self.table
    }

    /// Adds every character of `text` that isn't part of the subset yet.
    ///
    /// Adding the same text again, or text overlapping earlier text, leaves
    /// the subset as if the union had been added once.
    ///
    /// # Errors
    ///
    /// `SubsetError::GlyphNotFound` for the first character the font cannot
    /// map. Characters before it in `text` stay in the subset.
    pub fn add_chars(&mut self, text: &str) -> Result<(), SubsetError> {
        let before = self.character_to_glyph_index.len();

        for character in text.chars() {
            if self.character_to_glyph_index.contains_key(&character) {
                continue;
            }

            let glyph_index = resolve::glyph_index(&self.table, character.into())?;
            log::trace!("{}: {:?} -> glyph {glyph_index}", self.family, character);
            self.character_to_glyph_index.insert(character, glyph_index);
        }

        let added = self.character_to_glyph_index.len() - before;
        if added > 0 {
            log::debug!(
                "{}: {added} characters added, {} in subset",
                self.family,
                self.character_to_glyph_index.len()
            );
        }

        Ok(())
    }

    /// The glyph index a previously added character resolved to
    pub fn char_index(&self, character: char) -> Result<u32, SubsetError> {
        self.character_to_glyph_index
            .get(&character)
            .copied()
            .ok_or(SubsetError::CharacterNotRegistered(character))
    }

    /// The width of a previously added character in PDF glyph space
    pub fn char_width(&self, character: char) -> Result<u32, SubsetError> {
        self.char_index(character)
            .map(|glyph_index| self.glyph_index_to_pdf_width(glyph_index))
    }

    /// The width of any glyph of the font in PDF glyph space
    pub fn glyph_index_to_pdf_width(&self, glyph_index: u32) -> u32 {
        width::pdf_width(&self.table, glyph_index)
    }

    /// The kerning pairs starting with glyph `left`.
    ///
    /// `None` when kerning is turned off, when the font has no kerning or when
    /// `left` has no pairs.
    pub fn kern_value_by_left(&self, left: u32) -> Option<&KernValue> {
        if !self.options.use_kerning {
            return None;
        }

        self.table.kerning()?.by_left(left)
    }

    /// The subset's characters with their glyph indices, by code point
    pub fn characters(&self) -> impl Iterator<Item = (char, u32)> + '_ {
        self.character_to_glyph_index
            .iter()
            .map(|(character, glyph_index)| (*character, *glyph_index))
    }

    pub fn len(&self) -> usize {
        self.character_to_glyph_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.character_to_glyph_index.is_empty()
    }

    /// Passed through from the font's 'post' table, in font units
    pub fn underline_thickness(&self) -> i16 {
        self.table.underline_thickness()
    }

    /// Sets the 0-based index of the descendant CIDFontType2 object
    pub fn set_cid_font_object_index(&mut self, index: usize) {
        self.cid_font_object_index = Some(index);
    }

    /// Sets the 0-based index of the ToUnicode CMap stream object
    pub fn set_unicode_map_object_index(&mut self, index: usize) {
        self.unicode_map_object_index = Some(index);
    }
}
