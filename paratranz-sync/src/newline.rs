//! Newline handling between CSV files, in-memory cells and translation items.
//!
//! Three spellings of a line break are in play:
//!
//! - [`ESCAPED`]: the two characters `\` `n` written literally in game files,
//!   which the game expands at runtime;
//! - [`MARKER`]: `^n`, what table cells hold in place of [`ESCAPED`] so the
//!   CSV parser never confuses it with a record break;
//! - a real line feed, which only appears inside quoted multi-line fields or in
//!   text edited on the translation platform.
//!
//! Reading a file goes [`ESCAPED`] → [`MARKER`] ([`to_marker`]); writing goes
//! [`MARKER`] → [`ESCAPED`] and LF → CR LF ([`to_file`]). Item text coming from
//! the platform has [`ESCAPED`] expanded to a real LF ([`unescape`]).

/// Literal backslash followed by `n`.
pub const ESCAPED: &str = "\\n";

/// Reserved cell marker standing in for [`ESCAPED`].
pub const MARKER: &str = "^n";

/// File text → cell text.
pub fn to_marker(text: &str) -> String {
    text.replace(ESCAPED, MARKER)
}

/// Cell text → file text.
///
/// Real line breaks are written as CR LF so a multi-line cell cannot be taken
/// for a record terminator by tools that split on bare LF.
pub fn to_file(cell: &str) -> String {
    cell.replace(MARKER, ESCAPED).replace('\n', "\r\n")
}

/// Item text → cell text.
pub fn unescape(text: &str) -> String {
    text.replace(ESCAPED, "\n")
}

/// Normalizes CR LF inside a parsed field to LF.
pub(crate) fn normalize_line_breaks(cell: &str) -> String {
    if cell.contains('\r') {
        cell.replace("\r\n", "\n")
    } else {
        cell.to_string()
    }
}
