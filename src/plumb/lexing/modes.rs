//! Logos token enums, one per lexing mode
//!
//!     The code lexer runs most of the time. When it reads an opening quote the scanner morphs
//!     it into the body lexer for that kind of string, and morphs it back once the closing quote
//!     is found. Inside an interpolated body a `#{` morphs back into the code lexer until the
//!     matching `}`.
//!
//!     These enums only describe raw lexemes. Turning them into [Token](crate::plumb::token::Token)s
//!     (keyword lookup, labels, positions) is the scanner's job.

use logos::Logos;

/// Lexemes of code mode.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeToken {
    #[regex(r"[ \t\r\x0C]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"#[^\n]*")]
    Comment,

    /// Identifiers, constants, keywords and predicate/bang method names.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*[?!]?")]
    Word,

    #[regex(r"(@@?|\$)[A-Za-z_][A-Za-z0-9_]*")]
    Variable,

    #[regex(r#"\$([0-9]+|[!@&~=/\\,;.<>*$?:"'+])"#)]
    SpecialGlobal,

    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xXbBoO][0-9a-fA-F_]+")]
    Number,

    #[regex(r":[A-Za-z_][A-Za-z0-9_]*[?!]?")]
    Symbol,

    #[regex(r#"<<[~-]?([A-Za-z_][A-Za-z0-9_]*|'[^'\n]*'|"[^"\n]*")"#)]
    Heredoc,

    #[token("\"")]
    DoubleQuote,

    #[token("`")]
    Backtick,

    #[token("'")]
    SingleQuote,

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[token(",")]
    Comma,

    #[token(".")]
    #[token("&.")]
    Period,

    #[token(";")]
    Semicolon,

    /// Explicit line continuation.
    #[token("\\")]
    Backslash,

    #[regex(r"\*\*=|<=>|===|\.\.\.|<<=|>>=|&&=|\|\|=|==|!=|>=|<=|&&|\|\||<<|>>|=~|!~|\+=|-=|\*=|/=|%=|\|=|&=|\^=|\*\*|->|=>|::|\.\.")]
    #[regex(r"[-+*/%=<>!&|^~?:]")]
    Operator,
}

/// Lexemes of a double-quoted or backtick string body.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolatedBody {
    #[token("\"")]
    DoubleQuote,

    #[token("`")]
    Backtick,

    #[token("#{")]
    EmbeddedExprBegin,

    #[token("#")]
    Hash,

    #[regex(r"\\[^\n]")]
    Escape,

    /// A line break, escaped or not. Either way the string goes on on the next line.
    #[regex(r"\\?\r?\n")]
    Newline,

    #[regex(r#"[^"`#\\\n]+"#)]
    Text,
}

/// Lexemes of a single-quoted string body.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawBody {
    #[token("'")]
    Quote,

    #[regex(r"\\[^\n]")]
    Escape,

    #[regex(r"\\?\r?\n")]
    Newline,

    #[regex(r"[^'\\\n]+")]
    Text,
}
