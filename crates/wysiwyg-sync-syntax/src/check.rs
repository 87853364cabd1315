//! Well-formedness checking.
//!
//! [`check_well_formed`] decides whether Source View text is safe to hand to a
//! strict editor. It is deliberately more forgiving than XHTML and stricter
//! than a browser:
//!
//! - void elements (`<br>`, `<img>`, ...) need no end tag
//! - elements with optional end tags (`<p>`, `<li>`, `<td>`, ...) are closed
//!   implicitly by a sibling, by their parent's end tag or by end of input
//! - `<tag/>` is accepted for any element
//! - everything else must be closed, in order

use crate::elements;
use crate::error::{HtmlError, HtmlErrorKind};
use crate::scan::{Event, scan};

struct OpenElement {
    name: String,
    offset: usize,
}

/// Check that `html` is well-formed, returning the first problem found.
pub fn check_well_formed(html: &str) -> Result<(), HtmlError> {
    let mut stack: Vec<OpenElement> = Vec::new();

    for event in scan(html) {
        match event? {
            Event::StartTag {
                name,
                self_closing,
                span,
            } => {
                while let Some(open) = stack.last()
                    && elements::implicitly_closes(&open.name, &name)
                {
                    stack.pop();
                }
                if !self_closing && !elements::is_void(&name) {
                    stack.push(OpenElement {
                        name,
                        offset: span.start,
                    });
                }
            }
            Event::EndTag { name, span } => {
                if elements::is_void(&name) {
                    continue;
                }
                close_element(&mut stack, &name, span.start)?;
            }
            Event::Text { .. } | Event::Comment { .. } | Event::Declaration { .. } => {}
        }
    }

    match stack
        .iter()
        .rev()
        .find(|open| !elements::has_optional_end(&open.name))
    {
        Some(open) => Err(HtmlError::new(
            HtmlErrorKind::UnclosedElement {
                name: open.name.clone(),
            },
            open.offset,
        )),
        None => Ok(()),
    }
}

/// Whether `html` passes [`check_well_formed`].
pub fn is_well_formed(html: &str) -> bool {
    check_well_formed(html).is_ok()
}

fn close_element(stack: &mut Vec<OpenElement>, name: &str, offset: usize) -> Result<(), HtmlError> {
    let Some(index) = stack.iter().rposition(|open| open.name == name) else {
        return Err(HtmlError::new(
            HtmlErrorKind::StrayEndTag {
                name: name.to_string(),
            },
            offset,
        ));
    };

    // Anything opened after the match must be allowed to close implicitly
    if let Some(blocking) = stack[index + 1..]
        .iter()
        .rev()
        .find(|open| !elements::has_optional_end(&open.name))
    {
        return Err(HtmlError::new(
            HtmlErrorKind::MismatchedEndTag {
                expected: blocking.name.clone(),
                found: name.to_string(),
            },
            offset,
        ));
    }

    stack.truncate(index);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("plain text")]
    #[case("<p>Hello</p>")]
    #[case("<p>Hello <b>World</b></p>")]
    #[case("<p>one<p>two")]
    #[case("<ul><li>a<li>b</ul>")]
    #[case("<table><tr><td>1<td>2<tr><td>3</table>")]
    #[case("line<br>break<br/>")]
    #[case(r#"<img src="a.png" alt="a > b">"#)]
    #[case("<!DOCTYPE html><html><body></body></html>")]
    #[case("<!-- <b> inside a comment -->")]
    #[case("<script>if (a < b && c) { x = '</b>'; }</script>")]
    #[case("a < b and c > d")]
    #[case("<custom-element/>")]
    #[case("<P>mixed case</p>")]
    #[case("<div><p>closed by parent</div>")]
    fn accepts_well_formed_html(#[case] html: &str) {
        assert_eq!(check_well_formed(html), Ok(()));
    }

    #[test]
    fn unterminated_bold() {
        assert_eq!(
            check_well_formed("<b>unterminated"),
            Err(HtmlError::new(
                HtmlErrorKind::UnclosedElement {
                    name: "b".to_string()
                },
                0
            ))
        );
    }

    #[test]
    fn innermost_unclosed_element_is_reported() {
        let err = check_well_formed("<div><i>text</div>").unwrap_err();
        assert_eq!(
            err.kind,
            HtmlErrorKind::MismatchedEndTag {
                expected: "i".to_string(),
                found: "div".to_string()
            }
        );
        assert_eq!(err.offset, 12);
    }

    #[test]
    fn misnested_inline_elements() {
        let err = check_well_formed("<b><i>x</b></i>").unwrap_err();
        assert_eq!(
            err.kind,
            HtmlErrorKind::MismatchedEndTag {
                expected: "i".to_string(),
                found: "b".to_string()
            }
        );
    }

    #[test]
    fn stray_end_tag() {
        assert_eq!(
            check_well_formed("text</span>"),
            Err(HtmlError::new(
                HtmlErrorKind::StrayEndTag {
                    name: "span".to_string()
                },
                4
            ))
        );
    }

    #[test]
    fn void_end_tag_is_ignored() {
        assert!(is_well_formed("a<br></br>b"));
    }

    #[test]
    fn unclosed_script_is_reported() {
        let err = check_well_formed("<script>let a = 1;").unwrap_err();
        assert_eq!(
            err.kind,
            HtmlErrorKind::UnclosedElement {
                name: "script".to_string()
            }
        );
    }

    #[test]
    fn lexical_errors_surface_through_check() {
        assert_eq!(
            check_well_formed("<p>Hello</p><b").unwrap_err().kind,
            HtmlErrorKind::UnterminatedTag
        );
        assert_eq!(
            check_well_formed("<!-- never closed").unwrap_err().kind,
            HtmlErrorKind::UnterminatedComment
        );
    }
}
