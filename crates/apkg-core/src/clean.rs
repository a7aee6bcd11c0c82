//! Field splitting and card text cleaning
//!
//! A note stores all of its fields in one column joined by the 0x1F unit
//! separator. Only the first two fields become a card; later fields are
//! ignored.

use crate::entities::decode_entities;
use crate::markup::strip_tags;
use crate::types::{CardPair, SkipReason};

/// Separator between fields in a note's field blob
pub const FIELD_SEPARATOR: char = '\u{1F}';

/// Line-break tag spellings turned into newlines before anything else
const LINE_BREAK_TAGS: &[&str] = &["<br>", "<br/>", "<br />"];

/// Split a raw field blob into its fields
pub fn split_fields(blob: &str) -> Vec<&str> {
    blob.split(FIELD_SEPARATOR).collect()
}

/// Clean a single field
///
/// Steps, in order: line-break tags to `\n`, decode character references,
/// strip remaining markup, trim.
pub fn clean_field(field: &str) -> String {
    let mut text = field.to_string();
    for tag in LINE_BREAK_TAGS {
        text = text.replace(tag, "\n");
    }
    let text = decode_entities(&text);
    strip_tags(&text).trim().to_string()
}

/// Turn a raw field blob into a card, or say why it was skipped
pub fn clean_note(blob: &str) -> Result<CardPair, SkipReason> {
    let fields = split_fields(blob);
    let [front, back, ..] = fields.as_slice() else {
        return Err(SkipReason::TooFewFields);
    };

    let front = clean_field(front);
    let back = clean_field(back);
    if front.is_empty() || back.is_empty() {
        return Err(SkipReason::EmptyAfterCleaning);
    }

    Ok(CardPair { front, back })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("a\u{1f}b\u{1f}c"), vec!["a", "b", "c"]);
        assert_eq!(split_fields("only"), vec!["only"]);
        assert_eq!(split_fields("a\u{1f}"), vec!["a", ""]);
    }

    #[test]
    fn test_clean_note_markup_and_entities() {
        let card = clean_note("<b>Hi</b> there\u{1f}Answer &amp; more").unwrap();
        assert_eq!(card, CardPair::new("Hi there", "Answer & more"));
    }

    #[test]
    fn test_clean_note_line_breaks() {
        let card = clean_note("Line1<br>Line2\u{1f}Back").unwrap();
        assert_eq!(card.front, "Line1\nLine2");

        let card = clean_note("a<br/>b<br />c\u{1f}Back").unwrap();
        assert_eq!(card.front, "a\nb\nc");
    }

    #[test]
    fn test_uppercase_br_is_just_a_tag() {
        let card = clean_note("a<BR>b\u{1f}Back").unwrap();
        assert_eq!(card.front, "ab");
    }

    #[test]
    fn test_single_field_skipped() {
        assert_eq!(clean_note("OnlyFront"), Err(SkipReason::TooFewFields));
        assert_eq!(clean_note(""), Err(SkipReason::TooFewFields));
    }

    #[test]
    fn test_empty_side_skipped() {
        assert_eq!(
            clean_note("Front\u{1f}<img src=\"x.png\">"),
            Err(SkipReason::EmptyAfterCleaning)
        );
        assert_eq!(
            clean_note("   <br>  \u{1f}Back"),
            Err(SkipReason::EmptyAfterCleaning)
        );
        assert_eq!(clean_note("\u{1f}"), Err(SkipReason::EmptyAfterCleaning));
    }

    #[test]
    fn test_clean_field_html5_entities() {
        assert_eq!(clean_field("&half; cup"), "\u{BD} cup");
        assert_eq!(clean_field("a &rightarrow; b"), "a \u{2192} b");
        assert_eq!(clean_field("&dollar;5"), "$5");
    }

    #[test]
    fn test_extra_fields_ignored() {
        let card = clean_note("Q\u{1f}A\u{1f}extra\u{1f}more").unwrap();
        assert_eq!(card, CardPair::new("Q", "A"));
    }

    #[test]
    fn test_trims_whitespace() {
        let card = clean_note("  <div> Q </div>\n\u{1f}\tA  ").unwrap();
        assert_eq!(card, CardPair::new("Q", "A"));
    }

    #[test]
    fn test_escaped_markup_is_removed() {
        // Escaped tags become real tags after decoding, then get stripped
        assert_eq!(clean_field("&lt;b&gt;bold&lt;/b&gt;"), "bold");
        assert_eq!(clean_field("&amp;lt;"), "<");
    }

    #[test]
    fn test_malformed_markup_does_not_panic() {
        assert_eq!(clean_field("text <div class=\"open"), "text");
        assert_eq!(clean_field("<<<>>>"), "<<<>>>");
    }
}
