//! Element classification tables.
//!
//! Names are compared lowercase; callers normalise with
//! [`str::to_ascii_lowercase`] before looking them up.

/// Elements that never have content or an end tag.
const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose end tag may be omitted.
const OPTIONAL_END: &[&str] = &[
    "p", "li", "dt", "dd", "option", "optgroup", "tr", "td", "th", "thead", "tbody", "tfoot",
    "colgroup", "rt", "rp",
];

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT: &[&str] = &["script", "style", "textarea", "title"];

/// Block-level elements: they close an open `<p>` and start a new line in the
/// plain-text projection.
const BLOCK: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tr",
    "ul",
];

pub fn is_void(name: &str) -> bool {
    VOID.contains(&name)
}

pub fn has_optional_end(name: &str) -> bool {
    OPTIONAL_END.contains(&name)
}

pub fn is_raw_text(name: &str) -> bool {
    RAW_TEXT.contains(&name)
}

pub fn is_block(name: &str) -> bool {
    BLOCK.contains(&name)
}

/// Whether opening `incoming` implicitly closes an open `open` element.
pub fn implicitly_closes(open: &str, incoming: &str) -> bool {
    match open {
        "p" => is_block(incoming),
        "li" => incoming == "li",
        "dt" | "dd" => matches!(incoming, "dt" | "dd"),
        "td" | "th" => matches!(incoming, "td" | "th" | "tr"),
        "tr" => incoming == "tr",
        "option" => matches!(incoming, "option" | "optgroup"),
        _ => false,
    }
}
