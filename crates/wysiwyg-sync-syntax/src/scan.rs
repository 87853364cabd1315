//! # Scanner - Tokens to Markup Events
//!
//! The second stage: group lexer tokens into markup events (start tags, end
//! tags, text runs, comments, declarations). The scanner is a pull iterator
//! that yields `Result<Event, HtmlError>`; it stops after the first error.
//!
//! ```text
//! "<p>Hi <b>you</b></p>" → [StartTag(p), Text("Hi "), StartTag(b),
//!                           Text("you"), EndTag(b), EndTag(p)]
//! ```
//!
//! The scanner only knows about *lexical* problems (a tag or comment that
//! never ends). Nesting is checked one level up, in [`check`](crate::check).

use std::ops::Range;

use crate::elements;
use crate::error::{HtmlError, HtmlErrorKind};
use crate::lexer::{Token, TokenKind, lex_with_spans};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'a> {
    StartTag {
        name: String,
        self_closing: bool,
        span: Range<usize>,
    },
    EndTag {
        name: String,
        span: Range<usize>,
    },
    Text {
        text: &'a str,
        span: Range<usize>,
    },
    Comment {
        span: Range<usize>,
    },
    Declaration {
        span: Range<usize>,
    },
}

pub struct Scanner<'a> {
    input: &'a str,
    tokens: Vec<(Token<'a>, Range<usize>)>,
    pos: usize,
    /// Set after a raw-text start tag (`<script>`, `<style>`, ...)
    raw_text: Option<String>,
    done: bool,
}

/// Scan `input` into markup events.
pub fn scan(input: &str) -> Scanner<'_> {
    Scanner::new(input)
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: lex_with_spans(input),
            pos: 0,
            raw_text: None,
            done: false,
        }
    }

    fn kind_at(&self, pos: usize) -> Option<TokenKind> {
        self.tokens.get(pos).map(|(token, _)| token.kind)
    }

    fn span_start(&self, pos: usize) -> usize {
        self.tokens
            .get(pos)
            .map_or(self.input.len(), |(_, span)| span.start)
    }

    /// Whether a tag name starts at `pos` (an ASCII letter directly after `<`).
    fn starts_name(&self, pos: usize) -> bool {
        match self.tokens.get(pos) {
            Some((token, _)) => {
                token.kind == TokenKind::Text
                    && token.text.starts_with(|c: char| c.is_ascii_alphabetic())
            }
            None => false,
        }
    }

    fn starts_markup(&self, pos: usize) -> bool {
        match self.kind_at(pos) {
            Some(TokenKind::CommentOpen | TokenKind::DeclOpen | TokenKind::EndTagOpen) => true,
            Some(TokenKind::Lt) => self.starts_name(pos + 1),
            _ => false,
        }
    }

    fn read_name(&mut self) -> String {
        let mut name = String::new();
        while let Some((token, _)) = self.tokens.get(self.pos) {
            if !matches!(token.kind, TokenKind::Text | TokenKind::Dash) {
                break;
            }
            name.push_str(&token.text.to_ascii_lowercase());
            self.pos += 1;
        }
        name
    }

    /// Advance past the next token of `kind`, returning its end offset.
    fn skip_past(&mut self, kind: TokenKind) -> Option<usize> {
        while let Some((token, span)) = self.tokens.get(self.pos) {
            self.pos += 1;
            if token.kind == kind {
                return Some(span.end);
            }
        }
        None
    }

    fn text(&mut self) -> Event<'a> {
        let start = self.span_start(self.pos);
        self.pos += 1;
        while self.pos < self.tokens.len() && !self.starts_markup(self.pos) {
            self.pos += 1;
        }
        let end = self.span_start(self.pos);
        let input = self.input;
        Event::Text {
            text: &input[start..end],
            span: start..end,
        }
    }

    fn comment(&mut self, start: usize) -> Result<Event<'a>, HtmlError> {
        self.pos += 1;
        match self.skip_past(TokenKind::CommentClose) {
            Some(end) => Ok(Event::Comment { span: start..end }),
            None => Err(HtmlError::new(HtmlErrorKind::UnterminatedComment, start)),
        }
    }

    fn declaration(&mut self, start: usize) -> Result<Event<'a>, HtmlError> {
        self.pos += 1;
        match self.skip_past(TokenKind::Gt) {
            Some(end) => Ok(Event::Declaration { span: start..end }),
            None => Err(HtmlError::new(HtmlErrorKind::UnterminatedTag, start)),
        }
    }

    fn start_tag(&mut self, start: usize) -> Result<Event<'a>, HtmlError> {
        self.pos += 1;
        let name = self.read_name();
        let mut after_eq = false;

        loop {
            let Some((token, span)) = self.tokens.get(self.pos) else {
                return Err(HtmlError::new(HtmlErrorKind::UnterminatedTag, start));
            };
            let (kind, quote_start, end) = (token.kind, span.start, span.end);
            self.pos += 1;

            match kind {
                TokenKind::Gt | TokenKind::SelfClose => {
                    let self_closing = kind == TokenKind::SelfClose;
                    if !self_closing && elements::is_raw_text(&name) {
                        self.raw_text = Some(name.clone());
                    }
                    return Ok(Event::StartTag {
                        name,
                        self_closing,
                        span: start..end,
                    });
                }
                TokenKind::Eq => after_eq = true,
                TokenKind::Whitespace | TokenKind::Newline => {}
                TokenKind::DoubleQuote | TokenKind::SingleQuote if after_eq => {
                    if self.skip_past(kind).is_none() {
                        return Err(HtmlError::new(
                            HtmlErrorKind::UnterminatedAttributeValue,
                            quote_start,
                        ));
                    }
                    after_eq = false;
                }
                _ => after_eq = false,
            }
        }
    }

    fn end_tag(&mut self, start: usize) -> Result<Event<'a>, HtmlError> {
        self.pos += 1;
        if self.pos >= self.tokens.len() {
            return Err(HtmlError::new(HtmlErrorKind::UnterminatedTag, start));
        }
        if !self.starts_name(self.pos) {
            return Err(HtmlError::new(HtmlErrorKind::EmptyTagName, start));
        }
        let name = self.read_name();
        match self.skip_past(TokenKind::Gt) {
            Some(end) => Ok(Event::EndTag {
                name,
                span: start..end,
            }),
            None => Err(HtmlError::new(HtmlErrorKind::UnterminatedTag, start)),
        }
    }

    /// Consume raw text up to `</name`, or to the end of input.
    fn raw_text_content(&mut self, name: &str) -> Option<Event<'a>> {
        let start = self.span_start(self.pos);
        let mut close = self.tokens.len();
        for i in self.pos..self.tokens.len() {
            if self.kind_at(i) == Some(TokenKind::EndTagOpen)
                && let Some((token, _)) = self.tokens.get(i + 1)
                && token.text.eq_ignore_ascii_case(name)
            {
                close = i;
                break;
            }
        }
        self.pos = close;
        let end = self.span_start(close);
        let input = self.input;
        (end > start).then(|| Event::Text {
            text: &input[start..end],
            span: start..end,
        })
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Event<'a>, HtmlError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(name) = self.raw_text.take()
            && let Some(event) = self.raw_text_content(&name)
        {
            return Some(Ok(event));
        }

        let (kind, start) = match self.tokens.get(self.pos) {
            Some((token, span)) => (token.kind, span.start),
            None => {
                self.done = true;
                return None;
            }
        };

        let result = match kind {
            TokenKind::CommentOpen => self.comment(start),
            TokenKind::DeclOpen => self.declaration(start),
            TokenKind::EndTagOpen => self.end_tag(start),
            TokenKind::Lt if self.starts_name(self.pos + 1) => self.start_tag(start),
            _ => Ok(self.text()),
        };

        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn events(input: &str) -> Vec<Event<'_>> {
        scan(input).collect::<Result<_, _>>().unwrap()
    }

    fn start(name: &str, self_closing: bool, span: Range<usize>) -> Event<'static> {
        Event::StartTag {
            name: name.to_string(),
            self_closing,
            span,
        }
    }

    fn end(name: &str, span: Range<usize>) -> Event<'static> {
        Event::EndTag {
            name: name.to_string(),
            span,
        }
    }

    #[test]
    fn scan_paragraph_with_bold() {
        assert_eq!(
            events("<p>Hi <b>you</b></p>"),
            vec![
                start("p", false, 0..3),
                Event::Text {
                    text: "Hi ",
                    span: 3..6
                },
                start("b", false, 6..9),
                Event::Text {
                    text: "you",
                    span: 9..12
                },
                end("b", 12..16),
                end("p", 16..20),
            ]
        );
    }

    #[test]
    fn tag_names_are_lowercased() {
        assert_eq!(
            events("<DIV></Div>"),
            vec![start("div", false, 0..5), end("div", 5..11)]
        );
    }

    #[test]
    fn hyphenated_custom_element_name() {
        assert_eq!(
            events("<my-widget/>"),
            vec![start("my-widget", true, 0..12)]
        );
    }

    #[test]
    fn stray_less_than_is_text() {
        assert_eq!(
            events("a < b"),
            vec![Event::Text {
                text: "a < b",
                span: 0..5
            }]
        );
    }

    #[test]
    fn quoted_attribute_may_contain_angle_brackets() {
        assert_eq!(
            events(r#"<img alt="x > y">"#),
            vec![start("img", false, 0..17)]
        );
    }

    #[test]
    fn apostrophe_in_unquoted_value_is_not_a_quote() {
        assert_eq!(events("<p title=it's>"), vec![start("p", false, 0..14)]);
    }

    #[test]
    fn script_content_is_raw_text() {
        assert_eq!(
            events("<script>if (a<b) {}</script>"),
            vec![
                start("script", false, 0..8),
                Event::Text {
                    text: "if (a<b) {}",
                    span: 8..19
                },
                end("script", 19..28),
            ]
        );
    }

    #[test]
    fn comment_and_doctype() {
        assert_eq!(
            events("<!DOCTYPE html><!-- hi -->"),
            vec![
                Event::Declaration { span: 0..15 },
                Event::Comment { span: 15..26 },
            ]
        );
    }

    #[test]
    fn unterminated_start_tag() {
        let err = scan("text <b").find_map(Result::err).unwrap();
        assert_eq!(err, HtmlError::new(HtmlErrorKind::UnterminatedTag, 5));
    }

    #[test]
    fn unterminated_comment() {
        let err = scan("<!-- open").find_map(Result::err).unwrap();
        assert_eq!(err, HtmlError::new(HtmlErrorKind::UnterminatedComment, 0));
    }

    #[test]
    fn unterminated_attribute_value() {
        let err = scan(r#"<a href="x>text</a>"#).find_map(Result::err).unwrap();
        assert_eq!(
            err,
            HtmlError::new(HtmlErrorKind::UnterminatedAttributeValue, 8)
        );
    }

    #[test]
    fn end_tag_without_name() {
        let err = scan("</ b>").find_map(Result::err).unwrap();
        assert_eq!(err, HtmlError::new(HtmlErrorKind::EmptyTagName, 0));
    }

    #[test]
    fn scanner_stops_after_error() {
        let results: Vec<_> = scan("<b").collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
