//! # wysiwyg-sync-syntax
//!
//! Lexing and checking of the HTML a user types into the Source View, using
//! [Logos] for tokenization.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Pipeline
//!
//! ```text
//! Source Text → Lexer → Tokens → Scanner → Events → check / inner_text
//!               (Logos)          (tags, text, comments)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Context-free, lossless tokenization. Every byte lands in some token.
//!
//! ### 2. Scanner ([`scan`] module)
//!
//! Groups tokens into start tags, end tags, text runs, comments and
//! declarations. Reports tags, comments and attribute values that never end.
//!
//! ### 3. Consumers
//!
//! - [`check`]: element nesting, producing [`HtmlError`] for the bridge's
//!   strict rendering mode
//! - [`text`]: the plain-text projection an editor reports as its text
//! - [`normalize`]: whitespace-insensitive comparison of two HTML strings
//!
//! ## Quick Start
//!
//! ```
//! use wysiwyg_sync_syntax::{HtmlErrorKind, check_well_formed, inner_text};
//!
//! assert!(check_well_formed("<p>Hello <b>World</b></p>").is_ok());
//!
//! let err = check_well_formed("<b>unterminated").unwrap_err();
//! assert_eq!(err.kind, HtmlErrorKind::UnclosedElement { name: "b".into() });
//!
//! assert_eq!(inner_text("<p>Hello <b>World</b></p>"), "Hello World");
//! ```

pub mod check;
pub mod elements;
pub mod error;
pub mod lexer;
pub mod normalize;
pub mod scan;
pub mod text;

pub use check::{check_well_formed, is_well_formed};
pub use error::{HtmlError, HtmlErrorKind};
pub use normalize::{normalize_whitespace, same_document};
pub use scan::{Event, Scanner, scan};
pub use text::inner_text;
