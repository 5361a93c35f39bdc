//! Base tokenization implementation
//!
//!     This is where source strings become token streams. A `Scanner` drives the logos lexers of
//!     [modes](super::modes), converts lexemes into positioned [Token]s and keeps track of the
//!     current line and the byte offset the line starts at, so every token gets a line and a
//!     column without a second pass over the source.
//!
//!     Every line end is emitted as [TokenKind::Newline] here, except the one closing a heredoc
//!     terminator line, which is always ignored. Classification of the rest happens later.
//!
//! Strings
//!
//!     A string literal becomes a `StringBegin` token, zero or more `StringContent` tokens, and a
//!     `StringEnd` token. Content tokens never cross a physical line: a body that spans lines is
//!     cut after each line break, and the line break belongs to the content token it ends.
//!     Interpolations emit `EmbeddedExprBegin`, the code tokens of the expression and
//!     `EmbeddedExprEnd`.
//!
//!     Heredoc bodies start on the line after the heredoc operator. Their lines are read when
//!     the scanner reaches the end of the operator's line and emitted as content tokens, with
//!     the terminator as `StringEnd`. Heredoc bodies are not scanned for interpolation.
//!
//!     Regular expressions (`/ab+/i`) and percent literals (`%w[a b]`, `%q{text}`, `%r{x}`)
//!     are strings too. Their delimiters are only told apart from the `/` and `%` operators by
//!     position: they open a literal where a value is expected (at the start of a line, after
//!     an operator, an opening bracket, a comma or a keyword) or as the first argument of a call
//!     without parentheses (`split /,/`). Bracket delimiters nest, everything else closes on the
//!     next unescaped occurrence. A character literal (`?a`) in value position is an identifier.

use super::common::{is_keyword, LexError};
use super::modes::{CodeToken, InterpolatedBody, RawBody};
use crate::plumb::token::{Token, TokenKind};
use logos::{Lexer, Logos};

/// Tokenize source code into positioned tokens, every line end being a plain newline.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut scanner = Scanner::new(source);
    scanner.scan_code(CodeToken::lexer(source), None)?;
    if let Some(heredoc) = scanner.heredocs.into_iter().next() {
        return Err(LexError::UnterminatedHeredoc {
            line: heredoc.line,
            terminator: heredoc.terminator,
        });
    }
    Ok(scanner.tokens)
}

/// Keywords that stand for a value, so a `/` after them divides.
const VALUE_KEYWORDS: &[&str] = &["end", "self", "nil", "true", "false"];

/// How the body of a regular expression or percent literal ends.
#[derive(Debug, Clone, Copy)]
struct Delimiter {
    open: char,
    close: char,
    interpolates: bool,
    /// Regular expressions take option letters after the closing delimiter.
    takes_options: bool,
}

impl Delimiter {
    fn regex() -> Self {
        Delimiter {
            open: '/',
            close: '/',
            interpolates: true,
            takes_options: true,
        }
    }

    /// Reads the head of a percent literal from the text after the `%`. Returns the delimiter
    /// and the length of the head (type letter plus opening delimiter).
    fn percent(rest: &str) -> Option<(Self, usize)> {
        let mut chars = rest.chars();
        let first = chars.next()?;
        let (kind, open) = if "qQwWiIrsx".contains(first) {
            (Some(first), chars.next()?)
        } else {
            (None, first)
        };
        if open.is_alphanumeric() || open.is_whitespace() || open == '_' {
            return None;
        }
        let close = match open {
            '(' => ')',
            '[' => ']',
            '{' => '}',
            '<' => '>',
            other => other,
        };
        let delimiter = Delimiter {
            open,
            close,
            interpolates: !matches!(kind, Some('q' | 'w' | 'i' | 's')),
            takes_options: kind == Some('r'),
        };
        Some((delimiter, kind.map_or(0, char::len_utf8) + open.len_utf8()))
    }

    fn nests(&self) -> bool {
        self.open != self.close
    }
}

/// Length of what follows a `?` when it is a character literal (`?a`, `?{`, `?\n`).
fn character_literal(rest: &str) -> Option<usize> {
    let mut chars = rest.chars();
    let first = chars.next().filter(|c| !c.is_whitespace())?;
    let length = match first {
        '\\' => 1 + chars.next().filter(|c| !c.is_whitespace())?.len_utf8(),
        other => other.len_utf8(),
    };
    // `?ab` is not one
    match rest[length..].chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        _ => Some(length),
    }
}

/// A heredoc whose body has not been read yet.
#[derive(Debug)]
struct PendingHeredoc {
    terminator: String,
    /// `<<~` and `<<-` allow the terminator to be indented.
    indented_terminator: bool,
    line: usize,
}

impl PendingHeredoc {
    fn parse(operator: &str, line: usize) -> Self {
        let rest = operator.trim_start_matches("<<");
        let (indented_terminator, rest) = match rest.strip_prefix(['~', '-']) {
            Some(stripped) => (true, stripped),
            None => (false, rest),
        };
        let terminator = rest.trim_matches(|c: char| c == '\'' || c == '"').to_string();
        PendingHeredoc {
            terminator,
            indented_terminator,
            line,
        }
    }
}

struct Scanner<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    line: usize,
    line_start: usize,
    heredocs: Vec<PendingHeredoc>,
}

impl<'s> Scanner<'s> {
    fn new(source: &'s str) -> Self {
        Scanner {
            source,
            tokens: Vec::new(),
            line: 1,
            line_start: 0,
            heredocs: Vec::new(),
        }
    }

    fn column(&self, offset: usize) -> usize {
        offset - self.line_start
    }

    fn push(&mut self, offset: usize, kind: TokenKind, text: &str) {
        let column = self.column(offset);
        self.tokens.push(Token::new(self.line, column, kind, text));
    }

    fn push_content(&mut self, from: usize, to: usize) {
        if to > from {
            let source = self.source;
            self.push(from, TokenKind::StringContent, &source[from..to]);
        }
    }

    fn start_line(&mut self, offset: usize) {
        self.line += 1;
        self.line_start = offset;
    }

    fn previous_significant(&self) -> Option<&Token> {
        self.tokens.iter().rev().find(|t| t.is_significant())
    }

    /// Whether a value is expected next, which makes `/`, `%` and `?` open a literal.
    fn in_operand_position(&self) -> bool {
        let previous = self
            .tokens
            .iter()
            .rev()
            .find(|t| !t.is_whitespace() && !t.is_comment());
        let Some(previous) = previous else {
            return true;
        };
        match previous.kind {
            TokenKind::Newline
            | TokenKind::IgnoredNewline
            | TokenKind::Operator
            | TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::LeftParen
            | TokenKind::LeftBracket
            | TokenKind::LeftBrace
            | TokenKind::EmbeddedExprBegin => true,
            // `def /(other)` defines an operator
            TokenKind::Keyword => {
                !VALUE_KEYWORDS.contains(&previous.text.as_str()) && !previous.is_keyword("def")
            }
            // labels
            TokenKind::Identifier => {
                previous.text.ends_with(':') && !previous.text.starts_with(':')
            }
            _ => false,
        }
    }

    /// A spaced `/` or `%` right after a method name, with no space after it, starts the first
    /// argument of a call without parentheses: `split /,/`, `puts %w[a b]`.
    fn starts_bare_argument(&self, rest: &str) -> bool {
        let mut recent = self.tokens.iter().rev();
        let spaced = recent.next().is_some_and(|t| t.kind == TokenKind::Whitespace);
        let after_name = recent.next().is_some_and(|t| {
            t.kind == TokenKind::Identifier
                && t.text.starts_with(|c: char| c.is_ascii_lowercase() || c == '_')
        });
        spaced
            && after_name
            && !rest.is_empty()
            && !rest.starts_with(|c: char| c.is_whitespace() || c == '=')
    }

    /// Scans code until the input runs out or, when `interpolation` holds the position of a
    /// `#{`, until the `}` closing it. The lexer is handed back positioned after that `}`.
    fn scan_code(
        &mut self,
        mut lex: Lexer<'s, CodeToken>,
        interpolation: Option<(usize, usize)>,
    ) -> Result<Lexer<'s, CodeToken>, LexError> {
        let mut open_braces = 0usize;

        while let Some(result) = lex.next() {
            let span = lex.span();
            let text = lex.slice();
            let Ok(lexeme) = result else {
                return Err(LexError::UnexpectedCharacter {
                    line: self.line,
                    column: self.column(span.start),
                    text: text.to_string(),
                });
            };

            match lexeme {
                CodeToken::Whitespace => self.push(span.start, TokenKind::Whitespace, text),
                CodeToken::Newline => {
                    self.push(span.start, TokenKind::Newline, text);
                    self.start_line(span.end);
                    if !self.heredocs.is_empty() {
                        self.scan_heredoc_bodies(&mut lex, span.end)?;
                    }
                }
                CodeToken::Comment => self.push(span.start, TokenKind::Comment, text),
                CodeToken::Word => self.push_word(&mut lex, span.start, text),
                CodeToken::Variable
                | CodeToken::SpecialGlobal
                | CodeToken::Number
                | CodeToken::Symbol => self.push(span.start, TokenKind::Identifier, text),
                CodeToken::Heredoc => {
                    self.push(span.start, TokenKind::StringBegin, text);
                    self.heredocs.push(PendingHeredoc::parse(text, self.line));
                }
                CodeToken::DoubleQuote | CodeToken::Backtick => {
                    let begin = (self.line, self.column(span.start));
                    self.push(span.start, TokenKind::StringBegin, text);
                    let close = if lexeme == CodeToken::DoubleQuote {
                        InterpolatedBody::DoubleQuote
                    } else {
                        InterpolatedBody::Backtick
                    };
                    lex = self.scan_interpolated(lex, close, begin)?;
                }
                CodeToken::SingleQuote => {
                    let begin = (self.line, self.column(span.start));
                    self.push(span.start, TokenKind::StringBegin, text);
                    lex = self.scan_raw(lex, begin)?;
                }
                CodeToken::LeftParen => self.push(span.start, TokenKind::LeftParen, text),
                CodeToken::RightParen => self.push(span.start, TokenKind::RightParen, text),
                CodeToken::LeftBracket => self.push(span.start, TokenKind::LeftBracket, text),
                CodeToken::RightBracket => self.push(span.start, TokenKind::RightBracket, text),
                CodeToken::LeftBrace => {
                    open_braces += 1;
                    self.push(span.start, TokenKind::LeftBrace, text);
                }
                CodeToken::RightBrace => {
                    if interpolation.is_some() && open_braces == 0 {
                        self.push(span.start, TokenKind::EmbeddedExprEnd, text);
                        return Ok(lex);
                    }
                    open_braces = open_braces.saturating_sub(1);
                    self.push(span.start, TokenKind::RightBrace, text);
                }
                CodeToken::Comma => self.push(span.start, TokenKind::Comma, text),
                CodeToken::Period => self.push(span.start, TokenKind::Period, text),
                CodeToken::Semicolon => self.push(span.start, TokenKind::Semicolon, text),
                CodeToken::Operator => self.push_operator(&mut lex, span.start, text)?,
                CodeToken::Backslash => self.push(span.start, TokenKind::Operator, text),
            }
        }

        if let Some((line, column)) = interpolation {
            return Err(LexError::UnbalancedInterpolation { line, column });
        }
        Ok(lex)
    }

    /// Words become keywords unless they are used as a method name or a label.
    fn push_word(&mut self, lex: &mut Lexer<'s, CodeToken>, start: usize, word: &'s str) {
        let rest = lex.remainder();

        if rest.starts_with(':') && !rest.starts_with("::") {
            lex.bump(1);
            let source = self.source;
            let label = &source[start..start + word.len() + 1];
            self.push(start, TokenKind::Identifier, label);
            return;
        }

        // `foo!=bar` is `foo != bar`, not a call to `foo!`
        if word.ends_with('!') && rest.starts_with('=') && !rest.starts_with("==") {
            lex.bump(1);
            let name_end = start + word.len() - 1;
            self.push(start, TokenKind::Identifier, &word[..word.len() - 1]);
            self.push(name_end, TokenKind::Operator, "!=");
            return;
        }

        let method_name = self.previous_significant().is_some_and(|previous| {
            previous.kind == TokenKind::Period
                || previous.is_operator("::")
                || previous.is_keyword("def")
        });
        let kind = if is_keyword(word) && !method_name {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.push(start, kind, word);
    }

    /// `/`, `%` and `?` open a literal where a value is expected and are operators elsewhere.
    fn push_operator(
        &mut self,
        lex: &mut Lexer<'s, CodeToken>,
        start: usize,
        text: &'s str,
    ) -> Result<(), LexError> {
        let source = self.source;
        let rest = lex.remainder();
        let operand = self.in_operand_position();
        let literal = operand || self.starts_bare_argument(rest);
        let begin = (self.line, self.column(start));

        match text {
            "/" if literal => {
                self.push(start, TokenKind::StringBegin, text);
                return self.scan_delimited(lex, start + 1, Delimiter::regex(), begin);
            }
            "%" if literal => {
                if let Some((delimiter, head)) = Delimiter::percent(rest) {
                    let body = start + 1 + head;
                    self.push(start, TokenKind::StringBegin, &source[start..body]);
                    return self.scan_delimited(lex, body, delimiter, begin);
                }
            }
            "?" if operand => {
                if let Some(length) = character_literal(rest) {
                    lex.bump(length);
                    self.push(start, TokenKind::Identifier, &source[start..start + 1 + length]);
                    return Ok(());
                }
            }
            _ => {}
        }
        self.push(start, TokenKind::Operator, text);
        Ok(())
    }

    /// Scans a regular expression or percent literal body from `start` up to its closing
    /// delimiter and option letters, then moves the lexer past it.
    fn scan_delimited(
        &mut self,
        lex: &mut Lexer<'s, CodeToken>,
        start: usize,
        delimiter: Delimiter,
        begin: (usize, usize),
    ) -> Result<(), LexError> {
        let source = self.source;
        let mut segment = start;
        let mut offset = start;
        let mut depth = 0usize;

        while let Some(c) = source[offset..].chars().next() {
            let next = offset + c.len_utf8();
            match c {
                '\\' => match source[next..].chars().next() {
                    Some('\n') => {
                        self.push_content(segment, next + 1);
                        self.start_line(next + 1);
                        segment = next + 1;
                        offset = next + 1;
                        continue;
                    }
                    Some(escaped) => {
                        offset = next + escaped.len_utf8();
                        continue;
                    }
                    None => {}
                },
                '\n' => {
                    self.push_content(segment, next);
                    self.start_line(next);
                    segment = next;
                }
                '#' if delimiter.interpolates && source[next..].starts_with('{') => {
                    self.push_content(segment, offset);
                    let opened_at = (self.line, self.column(offset));
                    self.push(offset, TokenKind::EmbeddedExprBegin, "#{");
                    let mut code = CodeToken::lexer(source);
                    code.bump(next + 1);
                    let code = self.scan_code(code, Some(opened_at))?;
                    segment = code.span().end;
                    offset = segment;
                    continue;
                }
                c if c == delimiter.close && depth == 0 => {
                    self.push_content(segment, offset);
                    let mut end = next;
                    if delimiter.takes_options {
                        let after = &source[next..];
                        end += after.len()
                            - after.trim_start_matches(|c: char| c.is_ascii_lowercase()).len();
                    }
                    self.push(offset, TokenKind::StringEnd, &source[offset..end]);
                    lex.bump(end - lex.span().end);
                    return Ok(());
                }
                c if c == delimiter.close => depth -= 1,
                c if c == delimiter.open && delimiter.nests() => depth += 1,
                _ => {}
            }
            offset = next;
        }

        Err(LexError::UnterminatedString {
            line: begin.0,
            column: begin.1,
        })
    }

    fn scan_interpolated(
        &mut self,
        lex: Lexer<'s, CodeToken>,
        close: InterpolatedBody,
        begin: (usize, usize),
    ) -> Result<Lexer<'s, CodeToken>, LexError> {
        let mut segment = lex.span().end;
        let mut body: Lexer<'s, InterpolatedBody> = lex.morph();

        loop {
            let Some(Ok(lexeme)) = body.next() else {
                return Err(LexError::UnterminatedString {
                    line: begin.0,
                    column: begin.1,
                });
            };
            let span = body.span();

            match lexeme {
                InterpolatedBody::EmbeddedExprBegin => {
                    self.push_content(segment, span.start);
                    let opened_at = (self.line, self.column(span.start));
                    self.push(span.start, TokenKind::EmbeddedExprBegin, body.slice());
                    let code = self.scan_code(body.morph(), Some(opened_at))?;
                    segment = code.span().end;
                    body = code.morph();
                }
                InterpolatedBody::Newline => {
                    self.push_content(segment, span.end);
                    self.start_line(span.end);
                    segment = span.end;
                }
                quote if quote == close => {
                    self.push_content(segment, span.start);
                    self.push(span.start, TokenKind::StringEnd, body.slice());
                    return Ok(body.morph());
                }
                _ => {}
            }
        }
    }

    fn scan_raw(
        &mut self,
        lex: Lexer<'s, CodeToken>,
        begin: (usize, usize),
    ) -> Result<Lexer<'s, CodeToken>, LexError> {
        let mut segment = lex.span().end;
        let mut body: Lexer<'s, RawBody> = lex.morph();

        loop {
            let Some(Ok(lexeme)) = body.next() else {
                return Err(LexError::UnterminatedString {
                    line: begin.0,
                    column: begin.1,
                });
            };
            let span = body.span();

            match lexeme {
                RawBody::Quote => {
                    self.push_content(segment, span.start);
                    self.push(span.start, TokenKind::StringEnd, body.slice());
                    return Ok(body.morph());
                }
                RawBody::Newline => {
                    self.push_content(segment, span.end);
                    self.start_line(span.end);
                    segment = span.end;
                }
                RawBody::Escape | RawBody::Text => {}
            }
        }
    }

    /// Reads the bodies of every pending heredoc, starting at `offset` (the start of the line
    /// following the heredoc operators), and moves the lexer past them.
    fn scan_heredoc_bodies(
        &mut self,
        lex: &mut Lexer<'s, CodeToken>,
        start: usize,
    ) -> Result<(), LexError> {
        let source = self.source;
        let mut offset = start;

        for heredoc in std::mem::take(&mut self.heredocs) {
            loop {
                let rest = &source[offset..];
                if rest.is_empty() {
                    return Err(LexError::UnterminatedHeredoc {
                        line: heredoc.line,
                        terminator: heredoc.terminator,
                    });
                }
                let line_len = rest.find('\n').map_or(rest.len(), |i| i + 1);
                let text = &rest[..line_len];
                let content = text.trim_end_matches(|c: char| c == '\n' || c == '\r');
                let candidate = if heredoc.indented_terminator {
                    content.trim_start()
                } else {
                    content
                };

                if candidate == heredoc.terminator {
                    let indent = content.len() - content.trim_start().len();
                    self.push(offset + indent, TokenKind::StringEnd, candidate);
                    if content.len() < text.len() {
                        self.push(
                            offset + content.len(),
                            TokenKind::IgnoredNewline,
                            &text[content.len()..],
                        );
                        self.start_line(offset + line_len);
                    }
                    offset += line_len;
                    break;
                }

                self.push(offset, TokenKind::StringContent, text);
                if text.ends_with('\n') {
                    self.start_line(offset + line_len);
                }
                offset += line_len;
            }
        }

        lex.bump(offset - start);
        Ok(())
    }
}
