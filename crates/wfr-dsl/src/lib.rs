//! wfr DSL
//!
//! Parser for the line-oriented workflow language. A document is a sequence
//! of blank-line separated paragraphs, each introduced by a keyword:
//!
//! ```text
//! # copy a config file twice
//! step copy_1
//!   cp
//!   { input source toml }
//!   { output dest txt }
//!
//! step copy_2
//!   cp
//!   { input source txt }
//!   { output dest config }
//!
//! workflow double_copy
//!   copy_1 dest -> copy_2 source
//! ```
//!
//! Parsing is all-or-nothing: the first violation aborts the document with a
//! [`SyntaxError`] carrying the line number and text.

mod error;
mod lexer;
mod paragraph;
mod parser;

pub use error::{SyntaxError, SyntaxErrorKind};
pub use lexer::{Line, next_token, preprocess, strip_comment};
pub use paragraph::split_paragraphs;
pub use parser::{
  parse, parse_argument_value, parse_connector, parse_optional_argument, parse_paragraph,
  parse_positional_argument, parse_step, parse_workflow,
};
