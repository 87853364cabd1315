use thiserror::Error;

/// Why a piece of HTML is not well-formed enough to hand to an editor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HtmlErrorKind {
    #[error("unterminated tag")]
    UnterminatedTag,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("unterminated attribute value")]
    UnterminatedAttributeValue,
    #[error("missing tag name")]
    EmptyTagName,
    #[error("element <{name}> is never closed")]
    UnclosedElement { name: String },
    #[error("expected </{expected}> but found </{found}>")]
    MismatchedEndTag { expected: String, found: String },
    #[error("</{name}> has no matching start tag")]
    StrayEndTag { name: String },
}

/// A well-formedness error with the byte offset where the problem starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}")]
pub struct HtmlError {
    pub kind: HtmlErrorKind,
    pub offset: usize,
}

impl HtmlError {
    pub fn new(kind: HtmlErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offset() {
        let err = HtmlError::new(
            HtmlErrorKind::UnclosedElement {
                name: "b".to_string(),
            },
            0,
        );
        assert_eq!(err.to_string(), "element <b> is never closed at byte 0");
    }

    #[test]
    fn display_mismatched_end_tag() {
        let err = HtmlError::new(
            HtmlErrorKind::MismatchedEndTag {
                expected: "i".to_string(),
                found: "b".to_string(),
            },
            9,
        );
        assert_eq!(err.to_string(), "expected </i> but found </b> at byte 9");
    }
}
