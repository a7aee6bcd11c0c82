//! Streaming markup stripper
//!
//! Characters are pushed one at a time through a small state machine that
//! tracks whether we are in text or inside some kind of tag. Only text runs
//! are kept; each run is character-reference decoded when it is flushed.
//!
//! The bodies of `<script>` and `<style>` are raw text: they are kept
//! verbatim, without decoding, up to the matching end tag.
//!
//! Malformed input never fails:
//! - `<` not followed by a letter, `/`, `!` or `?` is literal text
//! - markup still open at the end of the input is discarded

use crate::entities::decode_entities;

/// Elements whose content is raw text
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Marked section keywords closed by a single `]>`
const CONDITIONAL_SECTIONS: [&str; 3] = ["if", "else", "endif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    /// Just saw `<`, not yet known whether it opens markup
    Open,
    /// Reading the name of a start tag
    TagName,
    /// Inside a start or end tag, after its name
    InTag {
        quote: Option<char>,
        after_equals: bool,
    },
    /// Body of a raw text element, runs to its end tag
    RawText,
    /// Saw `<!`
    Bang,
    /// Saw `<!-`
    BangDash,
    /// Inside `<!-- ... -->`, counting consecutive dashes
    Comment { dashes: usize },
    /// Inside `<![...]]>`, counting closing brackets
    MarkedSection { keyword: bool, brackets: usize },
    /// `<!DOCTYPE ...>`, `<?...>` and similar, runs to the next `>`
    Declaration,
}

/// Incremental tag stripper
#[derive(Debug)]
pub struct TagStripper {
    state: State,
    /// Lowercased name of the tag or marked section being read
    name: String,
    run: String,
    out: String,
}

impl Default for TagStripper {
    fn default() -> Self {
        Self::new()
    }
}

impl TagStripper {
    pub fn new() -> Self {
        Self {
            state: State::Text,
            name: String::new(),
            run: String::new(),
            out: String::new(),
        }
    }

    pub fn push_str(&mut self, s: &str) {
        for c in s.chars() {
            self.push(c);
        }
    }

    pub fn push(&mut self, c: char) {
        let state = self.state;
        self.state = match state {
            State::Text => self.text(c),
            State::Open => match c {
                c if c.is_ascii_alphabetic() => {
                    self.flush();
                    self.name.clear();
                    self.name.push(c.to_ascii_lowercase());
                    State::TagName
                }
                '/' => {
                    self.name.clear();
                    self.enter(State::InTag {
                        quote: None,
                        after_equals: false,
                    })
                }
                '!' => self.enter(State::Bang),
                '?' => self.enter(State::Declaration),
                _ => {
                    self.run.push('<');
                    self.text(c)
                }
            },
            State::TagName => match c {
                '>' => self.close_tag(),
                c if c == '/' || c.is_whitespace() => State::InTag {
                    quote: None,
                    after_equals: false,
                },
                _ => {
                    self.name.push(c.to_ascii_lowercase());
                    state
                }
            },
            State::InTag {
                quote: Some(q),
                ..
            } => {
                if c == q {
                    State::InTag {
                        quote: None,
                        after_equals: false,
                    }
                } else {
                    state
                }
            }
            State::InTag {
                quote: None,
                after_equals,
            } => match c {
                '>' => self.close_tag(),
                '=' => State::InTag {
                    quote: None,
                    after_equals: true,
                },
                '"' | '\'' if after_equals => State::InTag {
                    quote: Some(c),
                    after_equals: false,
                },
                c if c.is_whitespace() => state,
                _ => State::InTag {
                    quote: None,
                    after_equals: false,
                },
            },
            State::RawText => self.raw_text(c),
            State::Bang => match c {
                '-' => State::BangDash,
                '[' => {
                    self.name.clear();
                    State::MarkedSection {
                        keyword: true,
                        brackets: 0,
                    }
                }
                '>' => State::Text,
                _ => State::Declaration,
            },
            State::BangDash => match c {
                '-' => State::Comment { dashes: 0 },
                '>' => State::Text,
                _ => State::Declaration,
            },
            State::Comment { dashes } => match c {
                '-' => State::Comment { dashes: dashes + 1 },
                '>' if dashes >= 2 => State::Text,
                _ => State::Comment { dashes: 0 },
            },
            State::MarkedSection { keyword, brackets } => self.marked_section(c, keyword, brackets),
            State::Declaration => match c {
                '>' => State::Text,
                _ => State::Declaration,
            },
        };
    }

    /// Finish the stream and return the collected text
    pub fn finish(mut self) -> String {
        if self.state == State::RawText {
            self.flush_raw();
        } else {
            self.flush();
        }
        self.out
    }

    fn text(&mut self, c: char) -> State {
        if c == '<' {
            State::Open
        } else {
            self.run.push(c);
            State::Text
        }
    }

    fn enter(&mut self, state: State) -> State {
        self.flush();
        state
    }

    /// A start or end tag just ended with `>`
    fn close_tag(&mut self) -> State {
        if RAW_TEXT_ELEMENTS.contains(&self.name.as_str()) {
            State::RawText
        } else {
            self.name.clear();
            State::Text
        }
    }

    fn raw_text(&mut self, c: char) -> State {
        self.run.push(c);

        // End tag is `</` followed by the element name, in any case
        let tag_len = self.name.len() + 2;
        let Some(start) = self.run.len().checked_sub(tag_len) else {
            return State::RawText;
        };
        let is_end_tag = self.run.is_char_boundary(start)
            && self.run[start..].starts_with("</")
            && self.run[start + 2..].eq_ignore_ascii_case(&self.name);
        if !is_end_tag {
            return State::RawText;
        }

        self.run.truncate(start);
        self.flush_raw();
        self.name.clear();
        State::InTag {
            quote: None,
            after_equals: false,
        }
    }

    fn marked_section(&mut self, c: char, keyword: bool, brackets: usize) -> State {
        if keyword && c.is_ascii_alphabetic() {
            self.name.push(c.to_ascii_lowercase());
            return State::MarkedSection { keyword, brackets };
        }

        let needed = if CONDITIONAL_SECTIONS.contains(&self.name.as_str()) {
            1
        } else {
            2
        };
        match c {
            ']' => State::MarkedSection {
                keyword: false,
                brackets: brackets + 1,
            },
            '>' if brackets >= needed => {
                self.name.clear();
                State::Text
            }
            c if c.is_whitespace() => State::MarkedSection {
                keyword: false,
                brackets,
            },
            _ => State::MarkedSection {
                keyword: false,
                brackets: 0,
            },
        }
    }

    fn flush(&mut self) {
        if !self.run.is_empty() {
            self.out.push_str(&decode_entities(&self.run));
            self.run.clear();
        }
    }

    fn flush_raw(&mut self) {
        self.out.push_str(&self.run);
        self.run.clear();
    }
}

/// Remove all markup from `input`, keeping only text content
pub fn strip_tags(input: &str) -> String {
    let mut stripper = TagStripper::new();
    stripper.push_str(input);
    stripper.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tags() {
        assert_eq!(strip_tags("<b>Hi</b> there"), "Hi there");
        assert_eq!(strip_tags("<div><span>nested</span></div>"), "nested");
    }

    #[test]
    fn test_attributes_with_gt_in_quotes() {
        assert_eq!(strip_tags(r#"<a title="x > y">link</a>"#), "link");
        assert_eq!(strip_tags("<img alt='a>b' src=x.png>after"), "after");
    }

    #[test]
    fn test_apostrophe_in_unquoted_value() {
        assert_eq!(strip_tags("<a title=it's>text</a>"), "text");
    }

    #[test]
    fn test_literal_less_than() {
        assert_eq!(strip_tags("1 < 2"), "1 < 2");
        assert_eq!(strip_tags("a <> b"), "a <> b");
        assert_eq!(strip_tags("<<b>x</b>"), "<x");
    }

    #[test]
    fn test_comments_and_declarations() {
        assert_eq!(strip_tags("a<!-- hidden -->b"), "ab");
        assert_eq!(strip_tags("a<!-- x > y -->b"), "ab");
        assert_eq!(strip_tags("<!DOCTYPE html>text"), "text");
        assert_eq!(strip_tags("<?xml version=\"1.0\"?>text"), "text");
    }

    #[test]
    fn test_script_and_style_are_raw_text() {
        assert_eq!(strip_tags("<script>if(a<b)x</script>y"), "if(a<b)xy");
        assert_eq!(strip_tags("<style type=\"text/css\">p > a {}</STYLE>after"), "p > a {}after");
        assert_eq!(strip_tags("<script>&amp;</script>&amp;"), "&amp;&");
    }

    #[test]
    fn test_unterminated_raw_text_kept() {
        assert_eq!(strip_tags("<script>var a = 1 < 2;"), "var a = 1 < 2;");
    }

    #[test]
    fn test_end_tag_of_other_element_stays_in_raw_text() {
        assert_eq!(strip_tags("<script>a</b>c</script>"), "a</b>c");
    }

    #[test]
    fn test_marked_sections() {
        assert_eq!(strip_tags("<![CDATA[x>y]]>z"), "z");
        assert_eq!(strip_tags("a<![CDATA[x] ]>b"), "ab");
        assert_eq!(strip_tags("a<![CDATA[x]>b"), "a");
        assert_eq!(strip_tags("a<![if !IE]>b<![endif]>c"), "abc");
    }

    #[test]
    fn test_unterminated_markup_discarded() {
        assert_eq!(strip_tags("keep <span class="), "keep ");
        assert_eq!(strip_tags("keep <!-- never closed"), "keep ");
        assert_eq!(strip_tags("keep <"), "keep ");
    }

    #[test]
    fn test_text_runs_are_decoded() {
        assert_eq!(strip_tags("<i>&lt;tag&gt;</i>"), "<tag>");
        assert_eq!(strip_tags("fish &amp; chips"), "fish & chips");
    }

    #[test]
    fn test_empty_and_tag_only() {
        assert_eq!(strip_tags(""), "");
        assert_eq!(strip_tags("<img src=\"a.png\">"), "");
    }

    #[test]
    fn test_incremental_push() {
        let mut stripper = TagStripper::new();
        stripper.push_str("<p>one");
        stripper.push_str("</p><p>two</");
        stripper.push_str("p>");
        assert_eq!(stripper.finish(), "onetwo");
    }
}
