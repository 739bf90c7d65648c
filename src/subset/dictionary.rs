use crate::font::GlyphTable;

use super::{FontSubset, SubsetError};

/// Characters which end a PDF name token or need escaping inside one
const NAME_DELIMITERS: &[char] = &['(', ')', '<', '>', '[', ']', '{', '}', '/', '%', '#'];

/// The base font name of an embedded subset: a six letter tag, a plus sign,
/// then the family stripped down to what a PDF name may hold unescaped.
///
/// The tag is a hash of the family, so it's stable across runs.
///
/// ```
/// use vero_subset::subset::subset_font_name;
///
/// let name = subset_font_name("Noto Sans (Bold)");
///
/// assert_eq!(name.len(), 6 + 1 + "NotoSansBold".len());
/// assert!(name.ends_with("+NotoSansBold"));
/// assert_eq!(name, subset_font_name("Noto Sans (Bold)"));
/// ```
pub fn subset_font_name(family: &str) -> String {
    let mut hash = fnv1a(family.as_bytes());

    let mut name = String::with_capacity(7 + family.len());
    for _ in 0..6 {
        name.push(char::from(b'A' + (hash % 26) as u8));
        hash /= 26;
    }
    name.push('+');
    name.extend(
        family
            .chars()
            .filter(|c| c.is_ascii_graphic() && !NAME_DELIMITERS.contains(c)),
    );

    name
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

impl<T: GlyphTable> FontSubset<T> {
    /// The name the font dictionary's /BaseFont refers to
    pub fn base_font_name(&self) -> String {
        subset_font_name(&self.family)
    }

    /// Writes the Type0 font dictionary.
    ///
    /// References are written as `index + 1 0 R`, object numbers start at 1
    /// while the indices handed to this subset start at 0.
    ///
    /// # Errors
    ///
    /// `SubsetError::ObjectIndexUnassigned` until both
    /// [`set_cid_font_object_index`](Self::set_cid_font_object_index) and
    /// [`set_unicode_map_object_index`](Self::set_unicode_map_object_index)
    /// were called.
    pub fn build(&self) -> Result<String, SubsetError> {
        let cid_font = self
            .cid_font_object_index
            .ok_or(SubsetError::ObjectIndexUnassigned("DescendantFonts"))?;
        let unicode_map = self
            .unicode_map_object_index
            .ok_or(SubsetError::ObjectIndexUnassigned("ToUnicode"))?;

        Ok(format!(
            "<<\n\
             /BaseFont /{}\n\
             /DescendantFonts [{} 0 R]\n\
             /Encoding /Identity-H\n\
             /Subtype /Type0\n\
             /ToUnicode {} 0 R\n\
             /Type /Font\n\
             >>\n",
            self.base_font_name(),
            cid_font + 1,
            unicode_map + 1,
        ))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{font::fixtures::MemoryFont, options::SubsetOptions};

    #[test]
    fn dictionary_references_are_one_based() {
        let mut subset =
            FontSubset::new("Test Sans", MemoryFont::latin(), SubsetOptions::default());
        subset.set_cid_font_object_index(5);
        subset.set_unicode_map_object_index(6);

        let expected = format!(
            "<<\n\
             /BaseFont /{}\n\
             /DescendantFonts [6 0 R]\n\
             /Encoding /Identity-H\n\
             /Subtype /Type0\n\
             /ToUnicode 7 0 R\n\
             /Type /Font\n\
             >>\n",
            subset_font_name("Test Sans")
        );
        assert_eq!(subset.build().unwrap(), expected);
    }

    #[test]
    fn building_needs_both_indices() {
        let mut subset =
            FontSubset::new("Test Sans", MemoryFont::latin(), SubsetOptions::default());
        assert_eq!(
            subset.build(),
            Err(SubsetError::ObjectIndexUnassigned("DescendantFonts"))
        );

        subset.set_cid_font_object_index(0);
        assert_eq!(
            subset.build(),
            Err(SubsetError::ObjectIndexUnassigned("ToUnicode"))
        );

        subset.set_unicode_map_object_index(1);
        assert!(subset.build().is_ok());
    }

    #[test]
    fn subset_names_are_pdf_names() {
        let name = subset_font_name("Ünïcode Serif/Italic #2");
        let (tag, family) = name.split_once('+').unwrap();

        assert_eq!(tag.len(), 6);
        assert!(tag.chars().all(|c| c.is_ascii_uppercase()));
        assert_eq!(family, "ncodeSerifItalic2");
    }

    #[test]
    fn subset_tags_depend_on_the_family() {
        let serif = subset_font_name("Serif");
        let sans = subset_font_name("Sans");

        assert_eq!(serif, subset_font_name("Serif"));
        assert_ne!(serif[..6], sans[..6]);
    }
}
