//! HTML character reference decoding
//!
//! Handles decimal and hex numeric references plus the full HTML5 named set.
//! Names that browsers accept without a trailing semicolon (the Latin-1
//! block and `amp`/`lt`/`gt`/`quot`) are also decoded when the semicolon is
//! missing, including when the name is followed by more letters (`&ampx`).

use crate::entity_table::{LEGACY_NAMES, NAMED_ENTITIES};

const REPLACEMENT: char = '\u{FFFD}';

/// Longest run of name characters considered after `&`
const MAX_NAME_LEN: usize = 32;

/// Decode all character references in `input`
///
/// Unknown or malformed references are left untouched.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        match decode_reference(after) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode the reference that starts right after an `&`
///
/// Returns the replacement text and the number of bytes of `after` consumed.
fn decode_reference(after: &str) -> Option<(String, usize)> {
    if let Some(numeric) = after.strip_prefix('#') {
        return decode_numeric(numeric).map(|(text, consumed)| (text, consumed + 1));
    }
    decode_named(after)
}

fn decode_numeric(numeric: &str) -> Option<(String, usize)> {
    let (radix, prefix_len) = if numeric.starts_with(['x', 'X']) {
        (16, 1)
    } else {
        (10, 0)
    };

    let digits = &numeric[prefix_len..];
    let len = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if len == 0 {
        return None;
    }

    let mut consumed = prefix_len + len;
    if digits[len..].starts_with(';') {
        consumed += 1;
    }

    // Overflowing u32 is out of range anyway
    let code = u32::from_str_radix(&digits[..len], radix).ok();
    Some((numeric_replacement(code), consumed))
}

fn numeric_replacement(code: Option<u32>) -> String {
    let Some(code) = code else {
        return REPLACEMENT.to_string();
    };

    if let Some(c) = remapped_code_point(code) {
        return c.to_string();
    }
    if (0xD800..=0xDFFF).contains(&code) || code > 0x10FFFF {
        return REPLACEMENT.to_string();
    }
    if is_disallowed_code_point(code) {
        return String::new();
    }

    char::from_u32(code)
        .map(|c| c.to_string())
        .unwrap_or_else(|| REPLACEMENT.to_string())
}

/// Numeric references that resolve to something other than their code point
fn remapped_code_point(code: u32) -> Option<char> {
    let c = match code {
        0x00 => REPLACEMENT,
        0x0D => '\r',
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        // Unassigned in Windows-1252, passed through as-is
        0x81 | 0x8D | 0x8F | 0x90 | 0x9D => char::from_u32(code)?,
        _ => return None,
    };
    Some(c)
}

fn is_disallowed_code_point(code: u32) -> bool {
    matches!(code, 0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F..=0x9F | 0xFDD0..=0xFDEF)
        || (code & 0xFFFE) == 0xFFFE
}

fn decode_named(after: &str) -> Option<(String, usize)> {
    let mut end = 0;
    for (count, (idx, c)) in after.char_indices().enumerate() {
        if count == MAX_NAME_LEN || matches!(c, '\t' | '\n' | '\x0C' | ' ' | '<' | '&' | '#' | ';') {
            break;
        }
        end = idx + c.len_utf8();
    }
    if end == 0 {
        return None;
    }

    let name = &after[..end];
    if after[end..].starts_with(';') {
        if let Some(c) = lookup_named(name) {
            return Some((c.to_string(), end + 1));
        }
    }

    // Longest prefix that is usable without a semicolon
    (2..=name.len())
        .rev()
        .filter(|&len| name.is_char_boundary(len))
        .find_map(|len| lookup_legacy(&name[..len]).map(|c| (c.to_string(), len)))
}

/// Named references recognized without a trailing semicolon
fn lookup_legacy(name: &str) -> Option<&'static str> {
    LEGACY_NAMES.binary_search(&name).ok()?;
    lookup_named(name)
}

fn lookup_named(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES
        .binary_search_by(|(entity, _)| entity.cmp(&name))
        .ok()
        .map(|idx| NAMED_ENTITIES[idx].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(decode_entities("no references here"), "no references here");
    }

    #[test]
    fn test_basic_named() {
        assert_eq!(decode_entities("Answer &amp; more"), "Answer & more");
        assert_eq!(decode_entities("&lt;b&gt;"), "<b>");
        assert_eq!(decode_entities("&quot;hi&quot; &apos;x&apos;"), "\"hi\" 'x'");
        assert_eq!(decode_entities("caf&eacute;"), "café");
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{A0}b");
    }

    #[test]
    fn test_numeric() {
        assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_entities("&#233"), "é");
        assert_eq!(decode_entities("&#x1F600;"), "\u{1F600}");
    }

    #[test]
    fn test_numeric_windows_1252_range() {
        assert_eq!(decode_entities("&#150;"), "\u{2013}");
        assert_eq!(decode_entities("&#x80;"), "\u{20AC}");
    }

    #[test]
    fn test_numeric_invalid() {
        assert_eq!(decode_entities("&#0;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#xD800;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#99999999999;"), "\u{FFFD}");
        assert_eq!(decode_entities("a&#1;b"), "ab");
        assert_eq!(decode_entities("&#xFFFF;"), "");
    }

    #[test]
    fn test_malformed_numeric_left_alone() {
        assert_eq!(decode_entities("&#;"), "&#;");
        assert_eq!(decode_entities("&#x;"), "&#x;");
        assert_eq!(decode_entities("&#abc"), "&#abc");
    }

    #[test]
    fn test_unknown_named_left_alone() {
        assert_eq!(decode_entities("&bogus;"), "&bogus;");
        assert_eq!(decode_entities("Tom & Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("trailing &"), "trailing &");
        assert_eq!(decode_entities("AT&T"), "AT&T");
    }

    #[test]
    fn test_legacy_without_semicolon() {
        assert_eq!(decode_entities("&amp"), "&");
        assert_eq!(decode_entities("&copy 2024"), "\u{A9} 2024");
        assert_eq!(decode_entities("&ampx"), "&x");
        assert_eq!(decode_entities("&notit;"), "\u{AC}it;");
    }

    #[test]
    fn test_non_legacy_requires_semicolon() {
        assert_eq!(decode_entities("&hellip"), "&hellip");
        assert_eq!(decode_entities("&hellip;"), "\u{2026}");
    }

    #[test]
    fn test_html5_names() {
        assert_eq!(decode_entities("&half;"), "\u{BD}");
        assert_eq!(decode_entities("a &rightarrow; b"), "a \u{2192} b");
        assert_eq!(decode_entities("&dollar;5"), "$5");
        assert_eq!(decode_entities("&check; &frac13; &ast;"), "\u{2713} \u{2153} *");
        assert_eq!(decode_entities("&lang;x&rang;"), "\u{27E8}x\u{27E9}");
    }

    #[test]
    fn test_html5_multi_char_value() {
        assert_eq!(decode_entities("&NotEqualTilde;"), "\u{2242}\u{338}");
    }

    #[test]
    fn test_html5_names_require_semicolon() {
        assert_eq!(decode_entities("&half"), "&half");
        assert_eq!(decode_entities("&dollar5"), "&dollar5");
    }

    #[test]
    fn test_tables_sorted() {
        assert!(NAMED_ENTITIES.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(LEGACY_NAMES.windows(2).all(|w| w[0] < w[1]));
        assert!(LEGACY_NAMES.iter().all(|name| lookup_named(name).is_some()));
    }

    #[test]
    fn test_decodes_once() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_multibyte_neighbours() {
        assert_eq!(decode_entities("日本&amp;語"), "日本&語");
        assert_eq!(decode_entities("&日本"), "&日本");
    }
}
