//! Lexer
//!
//!     This module turns source text into the flat, position tagged token stream the dispatcher
//!     consumes. It is not a grammar accurate lexer for the checked language: it only needs to
//!     tell apart the token kinds the rules care about (keywords, brackets, commas, periods,
//!     operators, string boundaries and line ends) and to place each of them at the right line
//!     and column.
//!
//! The Lexing Pipeline
//!
//!     The pipeline consists of:
//!         1. Base tokenization using logos lexers. See [base_tokenization](base_tokenization).
//!            Code is scanned with one logos token enum; string bodies are scanned with their
//!            own enums (see [modes](modes)), switching back and forth with `Lexer::morph` when
//!            a quote or an interpolation boundary is reached. Heredoc, regular expression and
//!            percent literal bodies are read straight from the remaining input.
//!
//!         2. Newline classification. See [line_classification](line_classification).
//!            Every line end is emitted as a plain newline in step 1. This pass demotes the
//!            ones that do not terminate a statement (inside an open group, after a trailing
//!            operator, on blank lines) to ignored newlines.
//!
//! Unsupported Syntax
//!
//!     `=begin` blocks are not recognised, and `/` or `%` right after a local variable and a
//!     space (`x /2`) is read as the start of a literal, as for a method call. Anything the code
//!     lexer cannot match is a lex error.

pub mod base_tokenization;
pub mod common;
pub mod line_classification;
pub mod modes;

pub use common::{is_keyword, LexError, KEYWORDS};

use crate::plumb::token::Token;

/// Tokenize source text into the dispatcher's input stream.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = base_tokenization::tokenize(source)?;
    line_classification::classify_newlines(&mut tokens);
    Ok(tokens)
}
