//! Newline classification
//!
//!     The base tokenizer emits every code line end as a newline. A statement does not always
//!     end there though, and rules that work per statement (rather than per physical line) need
//!     to know the difference. This pass rewrites a newline into an ignored newline when:
//!
//!         - the line is blank or holds only a comment,
//!         - a paren, bracket, brace or interpolation group is still open,
//!         - the last significant token of the line is an operator, a comma, a period, an
//!           opening delimiter, or one of the keywords `and`, `or`, `not`.
//!
//!     Line ends inside heredocs were already emitted as ignored newlines and are left alone.

use crate::plumb::token::{Token, TokenKind};

const CONTINUING_KEYWORDS: &[&str] = &["and", "or", "not"];

/// Rewrite statement-continuing newlines into ignored newlines, in place.
pub fn classify_newlines(tokens: &mut [Token]) {
    let mut depth = 0usize;
    let mut line_start = 0;

    for index in 0..tokens.len() {
        match tokens[index].kind {
            TokenKind::LeftParen
            | TokenKind::LeftBracket
            | TokenKind::LeftBrace
            | TokenKind::EmbeddedExprBegin => depth += 1,
            TokenKind::RightParen
            | TokenKind::RightBracket
            | TokenKind::RightBrace
            | TokenKind::EmbeddedExprEnd => depth = depth.saturating_sub(1),
            TokenKind::Newline => {
                if continues_statement(&tokens[line_start..index], depth) {
                    tokens[index].kind = TokenKind::IgnoredNewline;
                }
                line_start = index + 1;
            }
            TokenKind::IgnoredNewline => line_start = index + 1,
            _ => {}
        }
    }
}

fn continues_statement(line: &[Token], depth: usize) -> bool {
    if depth > 0 {
        return true;
    }
    match line.iter().rev().find(|t| t.is_significant()) {
        None => true,
        Some(last) => {
            matches!(
                last.kind,
                TokenKind::Operator
                    | TokenKind::Comma
                    | TokenKind::Period
                    | TokenKind::LeftParen
                    | TokenKind::LeftBracket
                    | TokenKind::LeftBrace
            ) || CONTINUING_KEYWORDS.iter().any(|word| last.is_keyword(word))
        }
    }
}
