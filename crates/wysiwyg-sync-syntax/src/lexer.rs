//! # Lexer - Tokenizing HTML Source
//!
//! This module provides the first stage of reading Source View text: breaking
//! it into tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Nothing is skipped,
//! so offsets reported by the checker always point into the user's own text:
//!
//! ```
//! use wysiwyg_sync_syntax::lexer::lex;
//!
//! let input = "<p class=\"intro\">Hello &amp; welcome</p>\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are context-free. The lexer doesn't know whether `>` closes a tag
//! or is a stray character in text, or whether `"` starts an attribute value.
//! The [`scan`](crate::scan) module makes those decisions.
//!
//! Markup punctuation gets its own token (`<`, `</`, `<!--`, `/>`, `=`, quotes,
//! entities). Everything else becomes `Text`, grouped into runs.

use logos::Logos;

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Horizontal whitespace (spaces, tabs, form feeds)
    #[regex(r"[ \t\x0C]+")]
    Whitespace,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    /// `<!--` opening a comment
    #[token("<!--")]
    CommentOpen,

    /// `-->` closing a comment
    #[token("-->")]
    CommentClose,

    /// `<!` opening a declaration such as `<!DOCTYPE html>`
    #[token("<!")]
    DeclOpen,

    /// `</` opening an end tag
    #[token("</")]
    EndTagOpen,

    /// `<` opening a start tag (or a stray `<` in text)
    #[token("<")]
    Lt,

    /// `/>` closing a self-closing tag
    #[token("/>")]
    SelfClose,

    /// `>` closing a tag
    #[token(">")]
    Gt,

    /// `/`
    #[token("/")]
    Slash,

    /// `=` between attribute name and value
    #[token("=")]
    Eq,

    /// `"`
    #[token("\"")]
    DoubleQuote,

    /// `'`
    #[token("'")]
    SingleQuote,

    /// `-`, kept apart from text so `-->` can be recognised
    #[token("-")]
    Dash,

    /// Character reference such as `&amp;`, `&#39;` or `&#x27;`
    #[regex(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);")]
    Entity,

    /// A bare `&`
    #[token("&")]
    Amp,

    /// Plain text - anything not matched by other rules
    #[regex(r#"[^ \t\r\n\x0C<>=&"'/\-]+"#)]
    Text,
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        // Logos error means unrecognized input (e.g. a lone `\r`) - treat as TEXT
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push((Token { kind, text }, span));
    }

    tokens
}
