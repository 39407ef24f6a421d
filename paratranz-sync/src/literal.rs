//! Quoted text rendering shared by composite row ids and item contexts.
//!
//! Composite ids end up inside item keys, so the rendering must never change:
//! `('a', 'b')`, with one-element tuples written as `('a',)`.

/// Quotes `value` with single quotes, or double quotes when that avoids
/// escaping (the value contains `'` but no `"`).
///
/// Non-printable characters are written as `\xNN`, `\uNNNN` or `\UNNNNNNNN`.
pub fn quote(value: &str) -> String {
    let delimiter = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(delimiter);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => out.push_str(&escape_code_point(c)),
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

/// Code points that are not printable besides controls: separators other
/// than the ASCII space, format characters and private use areas.
///
/// Unassigned code points are treated as printable.
const NON_PRINTABLE: &[(u32, u32)] = &[
    (0x00A0, 0x00A0),
    (0x00AD, 0x00AD),
    (0x0600, 0x0605),
    (0x061C, 0x061C),
    (0x06DD, 0x06DD),
    (0x070F, 0x070F),
    (0x0890, 0x0891),
    (0x08E2, 0x08E2),
    (0x1680, 0x1680),
    (0x180E, 0x180E),
    (0x2000, 0x200F),
    (0x2028, 0x202F),
    (0x205F, 0x2064),
    (0x2066, 0x206F),
    (0x3000, 0x3000),
    (0xE000, 0xF8FF),
    (0xFEFF, 0xFEFF),
    (0xFFF9, 0xFFFB),
    (0x110BD, 0x110BD),
    (0x110CD, 0x110CD),
    (0x13430, 0x1343F),
    (0x1BCA0, 0x1BCA3),
    (0x1D173, 0x1D17A),
    (0xE0001, 0xE0001),
    (0xE0020, 0xE007F),
    (0xF0000, 0x10FFFF),
];

fn is_printable(c: char) -> bool {
    let code = c as u32;
    if code < 0x20 || (0x7F..0xA0).contains(&code) {
        return false;
    }
    !NON_PRINTABLE
        .iter()
        .any(|&(first, last)| (first..=last).contains(&code))
}

fn escape_code_point(c: char) -> String {
    let code = c as u32;
    match code {
        0..=0xFF => format!("\\x{:02x}", code),
        0x100..=0xFFFF => format!("\\u{:04x}", code),
        _ => format!("\\U{:08x}", code),
    }
}

/// Renders values as a parenthesised tuple of quoted strings.
pub fn tuple<S: AsRef<str>>(values: &[S]) -> String {
    let parts: Vec<String> = values.iter().map(|v| quote(v.as_ref())).collect();
    match parts.len() {
        1 => format!("({},)", parts[0]),
        _ => format!("({})", parts.join(", ")),
    }
}

/// Renders ordered pairs as a `{'key': 'value', ...}` block.
///
/// Fits on one line when shorter than `width`, otherwise one pair per line.
/// This approximates a pretty-printed dict: long values are never split
/// across lines.
pub fn dict<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)], width: usize) -> String {
    let parts: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("{}: {}", quote(k.as_ref()), quote(v.as_ref())))
        .collect();

    let single_line = format!("{{{}}}", parts.join(", "));
    if single_line.chars().count() <= width {
        single_line
    } else {
        format!("{{{}}}", parts.join(",\n "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain() {
        assert_eq!(quote("hello"), "'hello'");
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn test_quote_switches_delimiter() {
        assert_eq!(quote("it's"), "\"it's\"");
        assert_eq!(quote("say \"hi\""), "'say \"hi\"'");
        assert_eq!(quote("it's \"x\""), "'it\\'s \"x\"'");
    }

    #[test]
    fn test_quote_escapes_controls() {
        assert_eq!(quote("a\\b"), "'a\\\\b'");
        assert_eq!(quote("a\nb\tc"), "'a\\nb\\tc'");
        assert_eq!(quote("\u{1}"), "'\\x01'");
        assert_eq!(quote("한글"), "'한글'");
    }

    #[test]
    fn test_quote_escapes_invisible_characters() {
        assert_eq!(quote("a\u{a0}b"), "'a\\xa0b'");
        assert_eq!(quote("zero\u{200b}width"), "'zero\\u200bwidth'");
        assert_eq!(quote("line\u{2028}sep"), "'line\\u2028sep'");
        assert_eq!(quote("\u{feff}bom"), "'\\ufeffbom'");
        assert_eq!(quote("\u{f0000}"), "'\\U000f0000'");
        assert_eq!(quote("a b\u{3042}"), "'a b\u{3042}'");
    }

    #[test]
    fn test_tuple_with_non_breaking_space() {
        assert_eq!(tuple(&["a\u{a0}b", "c"]), "('a\\xa0b', 'c')");
    }

    #[test]
    fn test_tuple() {
        assert_eq!(tuple(&["a", "b"]), "('a', 'b')");
        assert_eq!(tuple(&["only"]), "('only',)");
    }

    #[test]
    fn test_dict_wraps_when_too_wide() {
        let pairs = [("id", "a"), ("text", "Hello")];
        assert_eq!(dict(&pairs, 80), "{'id': 'a', 'text': 'Hello'}");
        assert_eq!(dict(&pairs, 10), "{'id': 'a',\n 'text': 'Hello'}");
    }
}
