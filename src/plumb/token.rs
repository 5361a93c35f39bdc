//! Core token types shared across the lexer, the dispatcher and the rules.
//!
//! Token Layers
//!
//!     Core Tokens:
//!         Position tagged tokens produced by the tokenizer. See [core](core) for the closed set
//!         of token kinds. Every token lives on exactly one physical line; string literals that
//!         cross a newline are cut into one content token per line.
//!
//!     Line Views:
//!         A borrowed slice of core tokens making up one logical line, that is everything the
//!         dispatcher received between two line-end tokens. See [line](line). This is what rules
//!         query when they need context around the token they are looking at.

pub mod core;
pub mod line;

pub use self::core::{Token, TokenKind};
pub use line::LineView;
