//! Line views
//!
//!     A line view is a non-owning window over the tokens of one logical line: every token the
//!     dispatcher received since the previous line-end token, including the line-end token itself
//!     when there is one. Most of the time that is exactly one physical line. It covers more than
//!     one only when a string literal crosses a newline, in which case the view starts on the line
//!     the string opened on.
//!
//!     Views are rebuilt for every line, never mutated.

use super::core::{Token, TokenKind};

#[derive(Debug, Clone, Copy)]
pub struct LineView<'t> {
    tokens: &'t [Token],
}

impl<'t> LineView<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        LineView { tokens }
    }

    pub fn tokens(&self) -> &'t [Token] {
        self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Line number of the first token, or 0 for an empty view.
    pub fn lineno(&self) -> usize {
        self.tokens.first().map(|t| t.line).unwrap_or(0)
    }

    /// Line number of the last token, which is the line the view ends on.
    pub fn last_lineno(&self) -> usize {
        self.tokens.last().map(|t| t.line).unwrap_or(0)
    }

    pub fn first_non_whitespace(&self) -> Option<&'t Token> {
        self.tokens
            .iter()
            .find(|t| !t.is_whitespace() && !t.is_newline())
    }

    pub fn first_significant(&self) -> Option<&'t Token> {
        self.tokens.iter().find(|t| t.is_significant())
    }

    pub fn last_significant(&self) -> Option<&'t Token> {
        self.tokens.iter().rev().find(|t| t.is_significant())
    }

    /// The closest significant token before `index`.
    pub fn previous_significant(&self, index: usize) -> Option<&'t Token> {
        self.tokens[..index.min(self.tokens.len())]
            .iter()
            .rev()
            .find(|t| t.is_significant())
    }

    /// The closest significant token after `index`.
    pub fn next_significant(&self, index: usize) -> Option<&'t Token> {
        self.tokens
            .iter()
            .skip(index + 1)
            .find(|t| t.is_significant())
    }

    /// Index of `token` in this view, matched by position.
    pub fn position_of(&self, token: &Token) -> Option<usize> {
        self.tokens
            .iter()
            .position(|t| t.line == token.line && t.column == token.column)
    }

    /// True if the line holds nothing but whitespace and its line end.
    pub fn is_blank(&self) -> bool {
        self.tokens
            .iter()
            .all(|t| t.is_whitespace() || t.is_newline())
    }

    pub fn is_comment_only(&self) -> bool {
        self.first_non_whitespace().is_some_and(|t| t.is_comment())
    }

    /// True if the view opens with the continuation or the end of a string literal begun on an
    /// earlier line (a multi-line string tail or a heredoc body).
    pub fn in_string_tail(&self) -> bool {
        self.tokens.first().is_some_and(|t| {
            matches!(t.kind, TokenKind::StringContent | TokenKind::StringEnd)
        })
    }

    pub fn contains_keyword(&self, word: &str) -> bool {
        self.tokens.iter().any(|t| t.is_keyword(word))
    }

    /// True if `token` is the first significant token of the line, that is nothing but
    /// whitespace comes before it.
    pub fn leads_line(&self, token: &Token) -> bool {
        self.first_significant()
            .is_some_and(|first| first.line == token.line && first.column == token.column)
    }

    /// The line-end token, if the view was terminated by one.
    pub fn terminator(&self) -> Option<&'t Token> {
        self.tokens.last().filter(|t| t.is_newline())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plumb::lexing::tokenize;

    fn tokens_of(source: &str) -> Vec<Token> {
        tokenize(source).expect("tokenize failed")
    }

    #[test]
    fn test_first_non_whitespace() {
        let tokens = tokens_of("    foo(bar)\n");
        let view = LineView::new(&tokens);
        let first = view.first_non_whitespace().expect("a token");
        assert_eq!(first.text, "foo");
        assert_eq!(first.column, 4);
        assert_eq!(view.lineno(), 1);
    }

    #[test]
    fn test_blank_and_comment_lines() {
        let blank = tokens_of("   \n");
        assert!(LineView::new(&blank).is_blank());

        let comment = tokens_of("  # note\n");
        let view = LineView::new(&comment);
        assert!(!view.is_blank());
        assert!(view.is_comment_only());
        assert!(view.first_significant().is_none());
    }

    #[test]
    fn test_leads_line() {
        let tokens = tokens_of("  ) + x\n");
        let view = LineView::new(&tokens);
        let paren = &tokens[1];
        assert_eq!(paren.kind, TokenKind::RightParen);
        assert!(view.leads_line(paren));
        assert!(!view.leads_line(&tokens[3]));
    }

    #[test]
    fn test_previous_and_next_significant() {
        let tokens = tokens_of("x = y if z\n");
        let view = LineView::new(&tokens);
        let index = tokens.iter().position(|t| t.is_keyword("if")).unwrap();
        assert_eq!(view.previous_significant(index).unwrap().text, "y");
        assert_eq!(view.next_significant(index).unwrap().text, "z");
    }

    #[test]
    fn test_string_tail() {
        let tokens = vec![
            Token::new(2, 0, TokenKind::StringContent, "tail"),
            Token::new(2, 4, TokenKind::StringEnd, "\""),
            Token::new(2, 5, TokenKind::Newline, "\n"),
        ];
        let view = LineView::new(&tokens);
        assert!(view.in_string_tail());
        assert_eq!(view.terminator().unwrap().kind, TokenKind::Newline);
    }
}
