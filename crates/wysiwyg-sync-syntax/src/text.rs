//! Plain-text projection of HTML.
//!
//! [`inner_text`] approximates what a browser reports as `innerText` for an
//! editor's content: tags are dropped, character references decoded,
//! whitespace collapsed, and block boundaries and `<br>` become line breaks.
//! Malformed input is read best-effort: anything after the first lexical
//! error (an unterminated tag, say) is ignored, as a browser would.

use crate::elements;
use crate::scan::{Event, scan};

pub fn inner_text(html: &str) -> String {
    let mut out = TextBuilder::default();
    let mut raw_depth = 0usize;

    for event in scan(html) {
        let Ok(event) = event else {
            break;
        };
        match event {
            Event::StartTag { name, .. } if name == "br" => out.line_break(),
            Event::StartTag { name, self_closing, .. } => {
                if elements::is_block(&name) {
                    out.block_boundary();
                }
                if matches!(name.as_str(), "script" | "style") && !self_closing {
                    raw_depth += 1;
                }
            }
            Event::EndTag { name, .. } => {
                if elements::is_block(&name) {
                    out.block_boundary();
                }
                if matches!(name.as_str(), "script" | "style") {
                    raw_depth = raw_depth.saturating_sub(1);
                }
            }
            Event::Text { text, .. } if raw_depth == 0 => out.push_text(text),
            _ => {}
        }
    }

    out.finish()
}

#[derive(Default)]
struct TextBuilder {
    lines: Vec<String>,
    current: String,
    /// A collapsed space is owed before the next visible character
    pending_space: bool,
}

impl TextBuilder {
    fn push_text(&mut self, raw: &str) {
        let decoded = html_escape::decode_html_entities(raw);
        for c in decoded.chars() {
            if c.is_whitespace() && c != '\u{a0}' {
                self.pending_space = !self.current.is_empty();
            } else {
                if self.pending_space {
                    self.current.push(' ');
                    self.pending_space = false;
                }
                self.current.push(c);
            }
        }
    }

    fn line_break(&mut self) {
        self.lines.push(std::mem::take(&mut self.current));
        self.pending_space = false;
    }

    fn block_boundary(&mut self) {
        if !self.current.is_empty() {
            self.line_break();
        }
    }

    fn finish(mut self) -> String {
        self.block_boundary();
        while self.lines.last().is_some_and(|line| line.is_empty()) {
            self.lines.pop();
        }
        self.lines.join("\n")
    }
}
