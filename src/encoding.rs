use std::fmt;

/// Supported encodings, identified by their canonical WHATWG label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Utf8,
    Utf16Le,
    Windows1252,
}

impl Encoding {
    /// Resolves an encoding label the way the Encoding Standard does:
    /// strip ASCII whitespace, lowercase, then match against the alias
    /// table. Returns `None` for labels outside the supported set.
    pub fn for_label(label: &str) -> Option<Encoding> {
        let normalized = label
            .trim_matches(|c: char| matches!(c, '\t' | '\n' | '\x0c' | '\r' | ' '))
            .to_ascii_lowercase();
        let encoding = match normalized.as_str() {
            "unicode-1-1-utf-8" | "unicode11utf8" | "unicode20utf8" | "utf-8" | "utf8"
            | "x-unicode20utf8" => Encoding::Utf8,

            "csunicode" | "iso-10646-ucs-2" | "ucs-2" | "unicode" | "unicodefeff" | "utf-16"
            | "utf-16le" => Encoding::Utf16Le,

            "ansi_x3.4-1968" | "ascii" | "cp1252" | "cp819" | "csisolatin1" | "ibm819"
            | "iso-8859-1" | "iso-ir-100" | "iso8859-1" | "iso88591" | "iso_8859-1"
            | "iso_8859-1:1987" | "l1" | "latin1" | "us-ascii" | "windows-1252"
            | "x-cp1252" => Encoding::Windows1252,

            _ => return None,
        };
        Some(encoding)
    }

    /// Canonical lowercase label.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf16Le => "utf-16le",
            Encoding::Windows1252 => "windows-1252",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// windows-1252 high range (0x80..=0x9F) per the Encoding Standard index.
// Every other byte maps to the code point of the same value.
const WINDOWS_1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}',
    '\u{2021}', '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}',
    '\u{017D}', '\u{008F}', '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}',
    '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}',
    '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Maps a windows-1252 byte to its Unicode scalar. Total over all 256
/// byte values, so single-byte decoding can never fail.
pub(crate) fn windows_1252(byte: u8) -> char {
    match byte {
        0x80..=0x9F => WINDOWS_1252_HIGH[(byte - 0x80) as usize],
        _ => byte as char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_aliases_resolve() {
        assert_eq!(Encoding::for_label("utf-8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::for_label("UTF-8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::for_label("unicode-1-1-utf-8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::for_label("  utf8\n"), Some(Encoding::Utf8));
        assert_eq!(Encoding::for_label("latin1"), Some(Encoding::Windows1252));
        assert_eq!(Encoding::for_label("iso-8859-1"), Some(Encoding::Windows1252));
        assert_eq!(Encoding::for_label("ascii"), Some(Encoding::Windows1252));
        assert_eq!(Encoding::for_label("utf-16"), Some(Encoding::Utf16Le));
        assert_eq!(Encoding::for_label("ucs-2"), Some(Encoding::Utf16Le));
        assert_eq!(Encoding::for_label("koi8-r"), None);
        assert_eq!(Encoding::for_label(""), None);
    }

    #[test]
    fn canonical_names() {
        assert_eq!(Encoding::Utf8.name(), "utf-8");
        assert_eq!(Encoding::Utf16Le.name(), "utf-16le");
        assert_eq!(Encoding::Windows1252.name(), "windows-1252");
        assert_eq!(Encoding::Windows1252.to_string(), "windows-1252");
    }

    #[test]
    fn windows_1252_table() {
        assert_eq!(windows_1252(0x41), 'A');
        assert_eq!(windows_1252(0x80), '\u{20AC}');
        assert_eq!(windows_1252(0x93), '\u{201C}');
        assert_eq!(windows_1252(0x9F), '\u{0178}');
        assert_eq!(windows_1252(0xA0), '\u{00A0}');
        assert_eq!(windows_1252(0xFF), '\u{00FF}');
    }
}
