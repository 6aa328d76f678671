//! Implements the lexical layer of the rill shell: a quote-aware tokenizer
//! that splits command lines on configurable delimiter sets while treating
//! double-quoted regions as atomic, and a decoder for the C-style escape
//! sequences recognized inside those regions.
//!
//! The same tokenizer is used twice per line: once to split a line into
//! pipeline stages on `|` (keeping quotes intact so stages can be re-examined
//! later), and once per stage to split on whitespace (stripping quotes and
//! decoding escapes) to produce the argument vector handed to a built-in or
//! to `exec`.

mod error;
mod escape;
mod tokenizer;

pub use error::ParseError;
pub use escape::EscapeMode;
pub use tokenizer::{tokenize, STAGE_DELIMITERS, WORD_DELIMITERS};
