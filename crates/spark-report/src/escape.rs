//! Markup escaping shared by the HTML and `JUnit` writers.

use std::fmt::{self, Write};

const INVALID_REPLACEMENT: &str = "&#xFFFD;";

/// Write `value` with markup-significant characters replaced by entities.
///
/// Characters that may not appear in an XML document are replaced with the
/// Unicode replacement character reference.
pub(crate) fn write_escaped<W: Write>(writer: &mut W, value: &str) -> fmt::Result {
    for character in value.chars() {
        if !is_valid_xml_character(character) {
            writer.write_str(INVALID_REPLACEMENT)?;
            continue;
        }
        match character {
            '&' => writer.write_str("&amp;")?,
            '<' => writer.write_str("&lt;")?,
            '>' => writer.write_str("&gt;")?,
            '"' => writer.write_str("&quot;")?,
            '\'' => writer.write_str("&apos;")?,
            other => writer.write_char(other)?,
        }
    }
    Ok(())
}

fn is_valid_xml_character(character: char) -> bool {
    matches!(
        u32::from(character),
        0x09 | 0x0A | 0x0D
            | 0x20..=0xD7FF
            | 0xE000..=0xFFFD
            | 0x1_0000..=0x10_FFFF
    )
}
