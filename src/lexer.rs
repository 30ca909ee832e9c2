use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::ast::{QuoteStyle, Token};
use crate::grammar;

/// Location in the source text. Lines and columns start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors raised while splitting MDX text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unterminated bracketed identifier starting at {0}")]
    UnterminatedIdentifier(Position),

    #[error("Unterminated string starting at {0}")]
    UnterminatedString(Position),

    #[error("Unterminated comment starting at {0}")]
    UnterminatedComment(Position),

    #[error("Invalid number '{text}' at {position}")]
    InvalidNumber { text: String, position: Position },

    #[error("Unexpected character '{ch}' at {position}")]
    UnexpectedCharacter { ch: char, position: Position },
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: u32,
    column: u32,
    token_start: Position,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            token_start: Position::START,
        }
    }

    /// Where the most recently returned token starts.
    pub fn token_position(&self) -> Position {
        self.token_start
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn here(&self) -> Position {
        Position {
            offset: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.position += 1;
    }

    fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    /// Skips whitespace and `//`, `--`, `/* */` comments.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match (self.current_char(), self.peek_char(1)) {
                (Some(ch), _) if ch.is_whitespace() => self.advance(),
                (Some('/'), Some('/')) | (Some('-'), Some('-')) => {
                    while let Some(ch) = self.current_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.here();
                    self.advance_by(2);
                    loop {
                        match (self.current_char(), self.peek_char(1)) {
                            (Some('*'), Some('/')) => {
                                self.advance_by(2);
                                break;
                            }
                            (Some(_), _) => self.advance(),
                            (None, _) => return Err(LexError::UnterminatedComment(start)),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn is_identifier_start(ch: char) -> bool {
        ch.is_alphabetic() || ch == '_' || ch == '$'
    }

    fn is_identifier_part(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || ch == '$'
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if Self::is_identifier_part(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads `[...]`, where `]]` stands for a literal `]`.
    fn read_bracketed(&mut self) -> Result<String, LexError> {
        let start = self.here();
        let mut result = String::new();
        self.advance(); // Consume '['

        while let Some(ch) = self.current_char() {
            if ch == ']' {
                if self.peek_char(1) == Some(']') {
                    result.push(']');
                    self.advance_by(2);
                } else {
                    self.advance();
                    return Ok(result);
                }
            } else {
                result.push(ch);
                self.advance();
            }
        }

        Err(LexError::UnterminatedIdentifier(start))
    }

    /// Reads a quoted string, where a doubled quote stands for one quote.
    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.here();
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            if ch == quote {
                if self.peek_char(1) == Some(quote) {
                    result.push(quote);
                    self.advance_by(2);
                } else {
                    self.advance();
                    return Ok(result);
                }
            } else {
                result.push(ch);
                self.advance();
            }
        }

        Err(LexError::UnterminatedString(start))
    }

    fn read_digits(&mut self, text: &mut String) {
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Reads `digits [. digits] [e [+|-] digits]`. Signs in front of a
    /// number are operators, never part of the literal.
    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.here();
        let mut text = String::new();
        self.read_digits(&mut text);

        if self.current_char() == Some('.') && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            text.push('.');
            self.advance();
            self.read_digits(&mut text);
        }

        let mut scientific = false;
        if matches!(self.current_char(), Some('e' | 'E')) {
            let exponent_digits_at = match self.peek_char(1) {
                Some('+' | '-') => 2,
                _ => 1,
            };
            if self
                .peek_char(exponent_digits_at)
                .is_some_and(|c| c.is_ascii_digit())
            {
                scientific = true;
                for _ in 0..exponent_digits_at {
                    match self.current_char() {
                        Some('+') | None => {}
                        Some(ch) => text.push(ch),
                    }
                    self.advance();
                }
                self.read_digits(&mut text);
            }
        }

        let value = if scientific {
            Decimal::from_scientific(&text)
        } else {
            Decimal::from_str(&text)
        };

        value.map(Token::Number).map_err(|_| LexError::InvalidNumber {
            text,
            position: start,
        })
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn double(&mut self, token: Token) -> Token {
        self.advance_by(2);
        token
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;
        self.token_start = self.here();

        let token = match self.current_char() {
            None => Token::Eof,
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('{') => self.single(Token::LBrace),
            Some('}') => self.single(Token::RBrace),
            Some(',') => self.single(Token::Comma),
            Some('.') => self.single(Token::Dot),
            Some(':') => self.single(Token::Colon),
            Some(';') => self.single(Token::Semicolon),
            Some('+') => self.single(Token::Plus),
            Some('-') => self.single(Token::Minus),
            Some('*') => self.single(Token::Star),
            Some('/') => self.single(Token::Slash),
            Some('=') => self.single(Token::Eq),
            Some('|') => {
                if self.peek_char(1) == Some('|') {
                    self.double(Token::Concat)
                } else {
                    return Err(LexError::UnexpectedCharacter {
                        ch: '|',
                        position: self.token_start,
                    });
                }
            }
            Some('<') => match self.peek_char(1) {
                Some('>') => self.double(Token::NotEq),
                Some('=') => self.double(Token::LtEq),
                _ => self.single(Token::Lt),
            },
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.double(Token::GtEq)
                } else {
                    self.single(Token::Gt)
                }
            }
            Some('[') => Token::QuotedId(self.read_bracketed()?),
            Some('&') => match self.peek_char(1) {
                Some('[') => {
                    self.advance();
                    Token::AmpQuotedId(self.read_bracketed()?)
                }
                Some(ch) if Self::is_identifier_start(ch) => {
                    self.advance();
                    Token::AmpUnquotedId(self.read_identifier())
                }
                _ => {
                    return Err(LexError::UnexpectedCharacter {
                        ch: '&',
                        position: self.token_start,
                    });
                }
            },
            Some('"') => Token::String(self.read_string('"')?, QuoteStyle::Double),
            Some('\'') => Token::String(self.read_string('\'')?, QuoteStyle::Single),
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) if Self::is_identifier_start(ch) => {
                let word = self.read_identifier();
                match grammar::keyword(&word) {
                    Some(keyword) => Token::Keyword(keyword, word),
                    None => Token::Identifier(word),
                }
            }
            Some(ch) => {
                return Err(LexError::UnexpectedCharacter {
                    ch,
                    position: self.token_start,
                });
            }
        };

        Ok(token)
    }
}

/// Lexes the whole input, pairing each token with where it starts. The
/// final element is always [`Token::Eof`].
pub fn tokenize(input: &str) -> Result<Vec<(Token, Position)>, LexError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token == Token::Eof;
        tokens.push((token, lexer.token_position()));
        if done {
            return Ok(tokens);
        }
    }
}

#[test]
fn test_keywords() {
    use crate::ast::Keyword;

    let mut lexer = Lexer::new("select From wHeRe null");
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::Keyword(Keyword::Select, "select".to_string())
    );
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::Keyword(Keyword::From, "From".to_string())
    );
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::Keyword(Keyword::Where, "wHeRe".to_string())
    );
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::Keyword(Keyword::Null, "null".to_string())
    );
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_member_path() {
    let mut lexer = Lexer::new("[Time].&[2024]&Q1.Children");
    assert_eq!(lexer.next_token().unwrap(), Token::QuotedId("Time".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Dot);
    assert_eq!(lexer.next_token().unwrap(), Token::AmpQuotedId("2024".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::AmpUnquotedId("Q1".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Dot);
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::Identifier("Children".to_string())
    );
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_positions() {
    let mut lexer = Lexer::new("SELECT\n  [a]");
    lexer.next_token().unwrap();
    assert_eq!(lexer.token_position(), Position::START);
    lexer.next_token().unwrap();
    assert_eq!(
        lexer.token_position(),
        Position {
            offset: 9,
            line: 2,
            column: 3
        }
    );
}
