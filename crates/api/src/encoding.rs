//! Sink-side character encoding.
//!
//! The formatter produces Unicode text and never escapes anything for the
//! benefit of a file encoding; that is decided here, per sink.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
    Ascii,
}

impl Encoding {
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Latin1 => "ISO-8859-1",
            Encoding::Ascii => "US-ASCII",
        }
    }

    pub fn can_encode(self, ch: char) -> bool {
        match self {
            Encoding::Utf8 => true,
            Encoding::Latin1 => (ch as u32) <= 0xFF,
            Encoding::Ascii => ch.is_ascii(),
        }
    }

    /// Control characters other than tab, line feed and carriage return are
    /// always escaped, whatever the encoding.
    pub fn requires_escape(self, ch: char) -> bool {
        if (ch as u32) < 0x20 {
            return !matches!(ch, '\t' | '\n' | '\r');
        }
        !self.can_encode(ch)
    }

    /// Replace every character that needs it with a `\uXXXX` escape the Java
    /// lexer understands. Characters above U+FFFF become a surrogate pair.
    pub fn escape(self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut units = [0u16; 2];
        for ch in text.chars() {
            if self.requires_escape(ch) {
                for unit in ch.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{unit:04x}");
                }
            } else {
                out.push(ch);
            }
        }
        out
    }

    /// Escape and encode `text` to bytes.
    pub fn encode(self, text: &str) -> Vec<u8> {
        let escaped = self.escape(text);
        match self {
            Encoding::Utf8 => escaped.into_bytes(),
            // After escaping every remaining char fits in one byte.
            Encoding::Latin1 | Encoding::Ascii => escaped.chars().map(|c| c as u8).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_characters_always_escaped() {
        assert_eq!(Encoding::Utf8.escape("a\u{0001}b"), "a\\u0001b");
        assert_eq!(Encoding::Utf8.escape("a\tb\r\n"), "a\tb\r\n");
    }

    #[test]
    fn test_unencodable_characters_escaped() {
        assert_eq!(Encoding::Utf8.escape("größe"), "größe");
        assert_eq!(Encoding::Ascii.escape("größe"), "gr\\u00f6\\u00dfe");
        assert_eq!(Encoding::Latin1.escape("größe €"), "größe \\u20ac");
        assert_eq!(Encoding::Ascii.escape("😀"), "\\ud83d\\ude00");
    }

    #[test]
    fn test_latin1_bytes() {
        assert_eq!(Encoding::Latin1.encode("ö"), vec![0xF6]);
        assert_eq!(Encoding::Utf8.encode("ö"), "ö".as_bytes().to_vec());
    }
}
