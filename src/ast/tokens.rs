use std::fmt;

use rust_decimal::Decimal;

use crate::grammar;

/// Which quote character delimited a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `"..."`
    Double,
    /// `'...'`
    Single,
}

/// MDX keywords recognised by the lexer, independent of source case.
///
/// Whether a keyword may still be used as a bare identifier is decided by
/// the reserved-word table in [`crate::grammar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    And,
    As,
    Axis,
    Case,
    Cast,
    Cell,
    Chapters,
    Columns,
    Cube,
    CurrentCube,
    Dimension,
    Drillthrough,
    Else,
    Empty,
    End,
    Existing,
    Explain,
    FirstRowSet,
    For,
    From,
    In,
    Is,
    Matches,
    MaxRows,
    Member,
    Non,
    Not,
    Null,
    On,
    Or,
    Pages,
    Plan,
    Properties,
    Return,
    Rows,
    Sections,
    Select,
    Set,
    Then,
    When,
    Where,
    With,
    Xor,
}

impl Keyword {
    /// Every keyword, in alphabetical order.
    pub const ALL: [Keyword; 43] = [
        Keyword::And,
        Keyword::As,
        Keyword::Axis,
        Keyword::Case,
        Keyword::Cast,
        Keyword::Cell,
        Keyword::Chapters,
        Keyword::Columns,
        Keyword::Cube,
        Keyword::CurrentCube,
        Keyword::Dimension,
        Keyword::Drillthrough,
        Keyword::Else,
        Keyword::Empty,
        Keyword::End,
        Keyword::Existing,
        Keyword::Explain,
        Keyword::FirstRowSet,
        Keyword::For,
        Keyword::From,
        Keyword::In,
        Keyword::Is,
        Keyword::Matches,
        Keyword::MaxRows,
        Keyword::Member,
        Keyword::Non,
        Keyword::Not,
        Keyword::Null,
        Keyword::On,
        Keyword::Or,
        Keyword::Pages,
        Keyword::Plan,
        Keyword::Properties,
        Keyword::Return,
        Keyword::Rows,
        Keyword::Sections,
        Keyword::Select,
        Keyword::Set,
        Keyword::Then,
        Keyword::When,
        Keyword::Where,
        Keyword::With,
        Keyword::Xor,
    ];

    /// Canonical upper-case spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::And => "AND",
            Keyword::As => "AS",
            Keyword::Axis => "AXIS",
            Keyword::Case => "CASE",
            Keyword::Cast => "CAST",
            Keyword::Cell => "CELL",
            Keyword::Chapters => "CHAPTERS",
            Keyword::Columns => "COLUMNS",
            Keyword::Cube => "CUBE",
            Keyword::CurrentCube => "CURRENTCUBE",
            Keyword::Dimension => "DIMENSION",
            Keyword::Drillthrough => "DRILLTHROUGH",
            Keyword::Else => "ELSE",
            Keyword::Empty => "EMPTY",
            Keyword::End => "END",
            Keyword::Existing => "EXISTING",
            Keyword::Explain => "EXPLAIN",
            Keyword::FirstRowSet => "FIRSTROWSET",
            Keyword::For => "FOR",
            Keyword::From => "FROM",
            Keyword::In => "IN",
            Keyword::Is => "IS",
            Keyword::Matches => "MATCHES",
            Keyword::MaxRows => "MAXROWS",
            Keyword::Member => "MEMBER",
            Keyword::Non => "NON",
            Keyword::Not => "NOT",
            Keyword::Null => "NULL",
            Keyword::On => "ON",
            Keyword::Or => "OR",
            Keyword::Pages => "PAGES",
            Keyword::Plan => "PLAN",
            Keyword::Properties => "PROPERTIES",
            Keyword::Return => "RETURN",
            Keyword::Rows => "ROWS",
            Keyword::Sections => "SECTIONS",
            Keyword::Select => "SELECT",
            Keyword::Set => "SET",
            Keyword::Then => "THEN",
            Keyword::When => "WHEN",
            Keyword::Where => "WHERE",
            Keyword::With => "WITH",
            Keyword::Xor => "XOR",
        }
    }

    /// True when the keyword can never stand in for an unquoted identifier.
    pub fn is_reserved(self) -> bool {
        grammar::is_reserved_word(self.as_str())
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Unsigned numeric literal, kept as an exact decimal
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 10.25
    /// 10e+5
    /// ```
    Number(Decimal),

    /// String literal in double or single quotes, with doubled quotes unescaped
    ///
    /// # Examples
    /// ```text
    /// "String'Literal"
    /// 'it''s'
    /// ```
    String(String, QuoteStyle),

    // Identifiers
    /// Bare word that is not a keyword
    ///
    /// # Examples
    /// ```text
    /// Measures
    /// FunctionName
    /// $system
    /// ```
    Identifier(String),

    /// Keyword, together with its spelling in the source text
    ///
    /// # Examples
    /// ```text
    /// SELECT
    /// null
    /// Properties
    /// ```
    Keyword(Keyword, String),

    /// Bracketed identifier, with `]]` unescaped to `]`
    ///
    /// # Examples
    /// ```text
    /// [Measures]
    /// [arg1, arg2]
    /// [a]]b]
    /// ```
    QuotedId(String),

    /// Ampersand followed by a bracketed identifier (a key part)
    ///
    /// # Examples
    /// ```text
    /// &[1]
    /// ```
    AmpQuotedId(String),

    /// Ampersand followed by a bare word (a key part)
    ///
    /// # Examples
    /// ```text
    /// &foo
    /// ```
    AmpUnquotedId(String),

    // Operators
    /// Addition or unary plus
    Plus,

    /// Subtraction or unary minus
    Minus,

    /// Multiplication, or the asterisk query clause
    Star,

    /// Division
    Slash,

    /// String concatenation (`||`)
    Concat,

    /// Equality (`=`)
    Eq,

    /// Inequality (`<>`)
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    // Delimiters
    /// Left parenthesis for grouping, tuples, or call arguments
    LParen,

    /// Right parenthesis
    RParen,

    /// Left brace for set literals
    LBrace,

    /// Right brace
    RBrace,

    /// Comma separating list items
    Comma,

    /// Dot for identifier segments, properties, and methods
    Dot,

    /// Colon for member ranges
    Colon,

    /// Optional statement terminator
    Semicolon,

    /// End of input
    Eof,
}

impl Token {
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Token::Keyword(k, _) if *k == keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::String(s, _) => write!(f, "string \"{}\"", s),
            Token::Identifier(s) => write!(f, "identifier '{}'", s),
            Token::Keyword(k, _) => write!(f, "keyword {}", k),
            Token::QuotedId(s) => write!(f, "identifier [{}]", s.replace(']', "]]")),
            Token::AmpQuotedId(s) => write!(f, "key &[{}]", s.replace(']', "]]")),
            Token::AmpUnquotedId(s) => write!(f, "key &{}", s),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::Concat => f.write_str("'||'"),
            Token::Eq => f.write_str("'='"),
            Token::NotEq => f.write_str("'<>'"),
            Token::Lt => f.write_str("'<'"),
            Token::Gt => f.write_str("'>'"),
            Token::LtEq => f.write_str("'<='"),
            Token::GtEq => f.write_str("'>='"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::LBrace => f.write_str("'{'"),
            Token::RBrace => f.write_str("'}'"),
            Token::Comma => f.write_str("','"),
            Token::Dot => f.write_str("'.'"),
            Token::Colon => f.write_str("':'"),
            Token::Semicolon => f.write_str("';'"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}
