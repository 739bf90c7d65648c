/// Settings fixed before a font is parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubsetOptions {
    /// Read the 'kern' table and answer kerning lookups.
    /// Off by default, the table can hold tens of thousands of pairs.
    pub use_kerning: bool,
}

impl SubsetOptions {
    pub fn with_kerning(mut self, use_kerning: bool) -> Self {
        self.use_kerning = use_kerning;
        self
    }
}
