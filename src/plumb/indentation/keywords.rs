//! Keyword tables and the token-pattern tests that decide how a keyword is used.
//!
//!     Whether a keyword opens a block depends on where it sits on its line. The tests here only
//!     ever look at the tokens of the keyword's own line view.

use crate::plumb::token::{LineView, TokenKind};

/// Keywords that open a block or continue one.
pub const INDENT_KEYWORDS: &[&str] = &[
    "begin", "case", "class", "def", "do", "else", "elsif", "ensure", "for", "if", "module",
    "rescue", "unless", "until", "when", "while",
];

/// Keywords that continue the enclosing block at the opener's level.
pub const CONTINUATION_KEYWORDS: &[&str] = &["elsif", "else", "ensure", "rescue", "when"];

/// Keywords that can trail a statement as a modifier.
pub const MODIFIER_KEYWORDS: &[&str] = &["if", "unless", "while", "until", "rescue"];

/// Keywords after which an expression has not started yet, so a following `if` (or any
/// other modifier capable keyword) opens a block.
const EXPRESSION_STARTERS: &[&str] = &[
    "and", "or", "not", "then", "do", "else", "elsif", "begin", "when", "in", "case", "if",
    "unless", "while", "until",
];

const LOOP_KEYWORDS: &[&str] = &["while", "until", "for"];

pub fn is_indent_keyword(word: &str) -> bool {
    INDENT_KEYWORDS.contains(&word)
}

pub fn is_continuation_keyword(word: &str) -> bool {
    CONTINUATION_KEYWORDS.contains(&word)
}

pub fn is_modifier_keyword(word: &str) -> bool {
    MODIFIER_KEYWORDS.contains(&word)
}

/// True if the keyword at `index` trails a complete expression (`stmt if cond`), which makes
/// it a statement modifier rather than a block opener.
pub fn is_trailing_modifier(line: &LineView<'_>, index: usize) -> bool {
    let Some(previous) = line.previous_significant(index) else {
        return false;
    };
    match previous.kind {
        TokenKind::Operator
        | TokenKind::Comma
        | TokenKind::LeftParen
        | TokenKind::LeftBracket
        | TokenKind::LeftBrace
        | TokenKind::Semicolon
        | TokenKind::EmbeddedExprBegin => false,
        TokenKind::Keyword => !EXPRESSION_STARTERS.contains(&previous.text.as_str()),
        _ => true,
    }
}

/// True if the `do` at `index` belongs to a `while`, `until` or `for` on the same line
/// (`while x do`), in which case it does not open a block of its own.
pub fn do_is_for_a_loop(line: &LineView<'_>, index: usize) -> bool {
    let tokens = line.tokens();
    tokens[..index.min(tokens.len())]
        .iter()
        .enumerate()
        .any(|(position, token)| {
            token.kind == TokenKind::Keyword
                && LOOP_KEYWORDS.contains(&token.text.as_str())
                && !is_trailing_modifier(line, position)
        })
}

/// True if the `def` at `index` defines an endless method (`def name(args) = expr`).
pub fn is_endless_def(line: &LineView<'_>, index: usize) -> bool {
    let tokens = line.tokens();
    let Some(mut name) = next_significant_index(line, index) else {
        return false;
    };

    // def self.name
    if let Some(period) = next_significant_index(line, name) {
        if tokens[period].kind == TokenKind::Period {
            match next_significant_index(line, period) {
                Some(method) => name = method,
                None => return false,
            }
        }
    }

    let Some(mut after) = next_significant_index(line, name) else {
        return false;
    };

    if tokens[after].kind == TokenKind::LeftParen {
        let Some(close) = matching_paren(line, after) else {
            return false;
        };
        match next_significant_index(line, close) {
            Some(next) => after = next,
            None => return false,
        }
    } else if tokens[after].column == tokens[name].end_column() {
        // `def name=(value)` is a setter, not an endless definition
        return false;
    }

    tokens[after].is_operator("=")
}

fn next_significant_index(line: &LineView<'_>, index: usize) -> Option<usize> {
    line.tokens()
        .iter()
        .enumerate()
        .skip(index + 1)
        .find(|(_, token)| token.is_significant())
        .map(|(position, _)| position)
}

fn matching_paren(line: &LineView<'_>, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (position, token) in line.tokens().iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(position);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plumb::lexing::tokenize;
    use crate::plumb::token::Token;

    fn keyword_index(tokens: &[Token], word: &str) -> usize {
        tokens
            .iter()
            .position(|t| t.is_keyword(word))
            .expect("keyword not found")
    }

    fn check(source: &str, word: &str, test: fn(&LineView<'_>, usize) -> bool) -> bool {
        let tokens = tokenize(source).unwrap();
        let index = keyword_index(&tokens, word);
        test(&LineView::new(&tokens), index)
    }

    #[test]
    fn test_modifiers() {
        assert!(check("return nil if x", "if", is_trailing_modifier));
        assert!(check("foo.bar unless done?", "unless", is_trailing_modifier));
        assert!(check("x = y rescue nil", "rescue", is_trailing_modifier));
        assert!(check("return if x", "if", is_trailing_modifier));
        assert!(check("begin; x; end while y", "while", is_trailing_modifier));
    }

    #[test]
    fn test_block_openers() {
        assert!(!check("if x", "if", is_trailing_modifier));
        assert!(!check("x = if y", "if", is_trailing_modifier));
        assert!(!check("foo(if x then 1 else 2 end)", "if", is_trailing_modifier));
        assert!(!check("a; unless b", "unless", is_trailing_modifier));
        assert!(!check("  rescue StandardError => e", "rescue", is_trailing_modifier));
    }

    #[test]
    fn test_loop_do() {
        assert!(check("while x do", "do", do_is_for_a_loop));
        assert!(check("for a in b do", "do", do_is_for_a_loop));
        assert!(!check("items.each do |item|", "do", do_is_for_a_loop));
    }

    #[test]
    fn test_endless_def() {
        assert!(check("def foo = 42", "def", is_endless_def));
        assert!(check("def foo(a, b = 1) = a + b", "def", is_endless_def));
        assert!(check("def self.foo() = 1", "def", is_endless_def));
        assert!(!check("def foo(a, b = 1)", "def", is_endless_def));
        assert!(!check("def foo=(value)", "def", is_endless_def));
        assert!(!check("def foo", "def", is_endless_def));
    }

    #[test]
    fn test_tables() {
        assert!(is_indent_keyword("until"));
        assert!(!is_indent_keyword("end"));
        assert!(is_continuation_keyword("when"));
        assert!(!is_continuation_keyword("if"));
        assert!(is_modifier_keyword("rescue"));
    }
}
