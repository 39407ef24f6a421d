//! Repair of Windows-1252 punctuation stranded in otherwise UTF-8 tables.
//!
//! Game data files are mostly UTF-8, but hand-edited rows sometimes carry
//! single Windows-1252 bytes (curly quotes, dashes, ellipsis). Those bytes are
//! never valid UTF-8 on their own, so they are mapped to ASCII before the CSV
//! parser sees the text.

/// Replacement for every byte we know how to repair.
///
/// The double quotes become `""` because the repair runs before CSV parsing,
/// where they almost always sit inside a quoted field.
const REPAIRS: [(u8, &str); 7] = [
    (0x93, "\"\""),
    (0x94, "\"\""),
    (0x91, "'"),
    (0x92, "'"),
    (0x96, "-"),
    (0x97, "-"),
    (0x85, "..."),
];

fn repair_byte(byte: u8) -> Option<&'static str> {
    REPAIRS
        .iter()
        .find(|(b, _)| *b == byte)
        .map(|(_, replacement)| *replacement)
}

/// Result of [`repair_misdecoded`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repaired {
    pub text: String,
    /// Invalid bytes outside the repair table, replaced with U+FFFD.
    pub unknown: usize,
}

/// Decodes `bytes` as UTF-8, repairing stray Windows-1252 punctuation.
///
/// Each invalid byte is handled on its own, so a broken multi-byte sequence
/// followed by a repairable byte still gets the repair.
pub fn repair_misdecoded(bytes: &[u8]) -> Repaired {
    let mut text = String::with_capacity(bytes.len());
    let mut unknown = 0;

    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        for &byte in chunk.invalid() {
            match repair_byte(byte) {
                Some(replacement) => text.push_str(replacement),
                None => {
                    text.push(char::REPLACEMENT_CHARACTER);
                    unknown += 1;
                }
            }
        }
    }

    Repaired { text, unknown }
}
