//! Token definitions for the checked language
//!
//!     Tokens are plain data: a kind from a closed set, the source text, and the position of the
//!     first character. Lines are 1-based, columns are 0-based byte offsets into the line, which
//!     is also what an indentation column is measured in.

use serde::Serialize;
use std::fmt;

/// The closed set of token kinds the tokenizer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Keyword,
    /// Identifiers, constants, variables, numbers, symbols and labels.
    Identifier,
    Whitespace,
    Newline,
    /// A newline inside an unterminated expression, or ending a blank or comment-only line.
    IgnoredNewline,
    StringBegin,
    StringContent,
    StringEnd,
    EmbeddedExprBegin,
    EmbeddedExprEnd,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    /// `.` and `&.` method-call periods.
    Period,
    Operator,
    Semicolon,
    Comment,
}

/// A single position tagged token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub line: usize,
    pub column: usize,
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(line: usize, column: usize, kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            line,
            column,
            kind,
            text: text.into(),
        }
    }

    /// Check if this token is horizontal whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace)
    }

    /// Check if this token ends a line
    pub fn is_newline(&self) -> bool {
        matches!(self.kind, TokenKind::Newline | TokenKind::IgnoredNewline)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::Comment)
    }

    /// Check if this token carries code: not whitespace, not a newline and not a comment.
    pub fn is_significant(&self) -> bool {
        !self.is_whitespace() && !self.is_newline() && !self.is_comment()
    }

    /// Check if this token opens a paren, bracket or brace group
    pub fn is_opener(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace
        )
    }

    /// Check if this token closes a paren, bracket or brace group
    pub fn is_closer(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace
        )
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == word
    }

    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// The column just past the last character of this token.
    pub fn end_column(&self) -> usize {
        self.column + self.text.len()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {:?} {:?}", self.line, self.column, self.kind, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_predicates() {
        let ws = Token::new(1, 0, TokenKind::Whitespace, "  ");
        let nl = Token::new(1, 2, TokenKind::IgnoredNewline, "\n");
        let comment = Token::new(1, 0, TokenKind::Comment, "# hi");
        let kw = Token::new(1, 0, TokenKind::Keyword, "def");

        assert!(ws.is_whitespace());
        assert!(!ws.is_significant());
        assert!(nl.is_newline());
        assert!(!nl.is_significant());
        assert!(!comment.is_significant());
        assert!(kw.is_significant());
        assert!(kw.is_keyword("def"));
        assert!(!kw.is_keyword("end"));
    }

    #[test]
    fn test_openers_and_closers() {
        assert!(Token::new(1, 0, TokenKind::LeftParen, "(").is_opener());
        assert!(Token::new(1, 0, TokenKind::LeftBrace, "{").is_opener());
        assert!(Token::new(1, 0, TokenKind::RightBracket, "]").is_closer());
        assert!(!Token::new(1, 0, TokenKind::EmbeddedExprBegin, "#{").is_opener());
    }

    #[test]
    fn test_end_column() {
        let token = Token::new(3, 4, TokenKind::Identifier, "waka");
        assert_eq!(token.end_column(), 8);
    }
}
