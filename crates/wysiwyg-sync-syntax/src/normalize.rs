//! Whitespace normalization for comparing HTML projections.
//!
//! Editors re-serialize what they are given: indentation around block
//! elements is dropped and runs of spaces collapse. Two strings with the same
//! normalized form are treated as the same document.
//!
//! Only whitespace that cannot change the rendered document is touched. A
//! space between two inline elements is content and survives as one space.
//! Tags, comments and attribute values are kept byte for byte, as is the
//! content of `<pre>` and raw-text elements.

use std::sync::OnceLock;

use regex::Regex;

use crate::elements;
use crate::scan::{Event, scan};

/// Collapse whitespace runs in text to one space and drop whitespace that
/// touches a block boundary (or the start or end of the document).
///
/// Input the scanner cannot read is only trimmed.
pub fn normalize_whitespace(html: &str) -> String {
    static WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();
    let whitespace_run = WHITESPACE_RUN
        .get_or_init(|| Regex::new(r"[ \t\r\n\x0C]+").expect("Invalid whitespace regex"));

    let events: Vec<Event<'_>> = match scan(html).collect() {
        Ok(events) => events,
        Err(_) => return html.trim().to_string(),
    };

    let mut normalized = String::with_capacity(html.len());
    let mut preformatted = 0usize;

    for (index, event) in events.iter().enumerate() {
        match event {
            Event::Text { text, .. } => {
                let raw = index > 0 && is_raw_text_start(&events[index - 1]);
                if raw || preformatted > 0 {
                    normalized.push_str(text);
                    continue;
                }
                let collapsed = whitespace_run.replace_all(text, " ");
                let mut run: &str = &collapsed;
                if index == 0 || is_block_boundary(&events[index - 1]) {
                    run = run.trim_start_matches(' ');
                }
                if index + 1 == events.len() || is_block_boundary(&events[index + 1]) {
                    run = run.trim_end_matches(' ');
                }
                normalized.push_str(run);
            }
            Event::StartTag {
                name,
                self_closing,
                span,
            } => {
                if name == "pre" && !self_closing {
                    preformatted += 1;
                }
                normalized.push_str(&html[span.clone()]);
            }
            Event::EndTag { name, span } => {
                if name == "pre" {
                    preformatted = preformatted.saturating_sub(1);
                }
                normalized.push_str(&html[span.clone()]);
            }
            Event::Comment { span } | Event::Declaration { span } => {
                normalized.push_str(&html[span.clone()]);
            }
        }
    }

    normalized
}

/// Whether `a` and `b` are the same document modulo whitespace.
pub fn same_document(a: &str, b: &str) -> bool {
    a == b || normalize_whitespace(a) == normalize_whitespace(b)
}

fn is_block_boundary(event: &Event<'_>) -> bool {
    match event {
        Event::StartTag { name, .. } | Event::EndTag { name, .. } => elements::is_block(name),
        Event::Declaration { .. } => true,
        Event::Text { .. } | Event::Comment { .. } => false,
    }
}

fn is_raw_text_start(event: &Event<'_>) -> bool {
    matches!(
        event,
        Event::StartTag { name, self_closing: false, .. } if elements::is_raw_text(name)
    )
}
