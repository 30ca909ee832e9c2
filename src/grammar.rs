//! Process-wide grammar tables.
//!
//! The keyword map, the reserved-word set, and the operator table are built
//! on first use and never change afterwards, so every parse on every thread
//! reads the same tables without locking.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::ast::{Associativity, Fixity, Keyword, Operator, Token};

/// Binding strength, loosest first.
pub mod precedence {
    pub const ALIAS: u8 = 1;
    pub const OR: u8 = 2;
    pub const AND: u8 = 3;
    pub const NOT: u8 = 4;
    pub const COMPARISON: u8 = 5;
    pub const ADDITIVE: u8 = 6;
    pub const MULTIPLICATIVE: u8 = 7;
    pub const UNARY: u8 = 8;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    pub operator: Operator,
    pub precedence: u8,
    pub associativity: Associativity,
    pub fixity: Fixity,
}

const fn entry(
    operator: Operator,
    precedence: u8,
    associativity: Associativity,
    fixity: Fixity,
) -> OperatorInfo {
    OperatorInfo {
        operator,
        precedence,
        associativity,
        fixity,
    }
}

use Associativity::{Left, Right};
use Fixity::{Infix, Postfix, Prefix};

pub const OPERATOR_TABLE: [OperatorInfo; 29] = [
    entry(Operator::Alias, precedence::ALIAS, Left, Infix),
    entry(Operator::Or, precedence::OR, Left, Infix),
    entry(Operator::Xor, precedence::OR, Left, Infix),
    entry(Operator::Range, precedence::OR, Left, Infix),
    entry(Operator::And, precedence::AND, Left, Infix),
    entry(Operator::Not, precedence::NOT, Right, Prefix),
    entry(Operator::Equal, precedence::COMPARISON, Left, Infix),
    entry(Operator::NotEqual, precedence::COMPARISON, Left, Infix),
    entry(Operator::LessThan, precedence::COMPARISON, Left, Infix),
    entry(Operator::GreaterThan, precedence::COMPARISON, Left, Infix),
    entry(Operator::LessEqual, precedence::COMPARISON, Left, Infix),
    entry(Operator::GreaterEqual, precedence::COMPARISON, Left, Infix),
    entry(Operator::Is, precedence::COMPARISON, Left, Infix),
    entry(Operator::In, precedence::COMPARISON, Left, Infix),
    entry(Operator::Matches, precedence::COMPARISON, Left, Infix),
    entry(Operator::NotIn, precedence::COMPARISON, Left, Infix),
    entry(Operator::NotMatches, precedence::COMPARISON, Left, Infix),
    entry(Operator::IsNull, precedence::COMPARISON, Left, Postfix),
    entry(Operator::IsNotNull, precedence::COMPARISON, Left, Postfix),
    entry(Operator::IsEmpty, precedence::COMPARISON, Left, Postfix),
    entry(Operator::IsNotEmpty, precedence::COMPARISON, Left, Postfix),
    entry(Operator::Add, precedence::ADDITIVE, Left, Infix),
    entry(Operator::Subtract, precedence::ADDITIVE, Left, Infix),
    entry(Operator::Concat, precedence::ADDITIVE, Left, Infix),
    entry(Operator::Multiply, precedence::MULTIPLICATIVE, Left, Infix),
    entry(Operator::Divide, precedence::MULTIPLICATIVE, Left, Infix),
    entry(Operator::Negate, precedence::UNARY, Right, Prefix),
    entry(Operator::UnaryPlus, precedence::UNARY, Right, Prefix),
    entry(Operator::Existing, precedence::UNARY, Right, Prefix),
];

const RESERVED: [Keyword; 35] = [
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
    Keyword::Drillthrough,
    Keyword::Else,
    Keyword::Empty,
    Keyword::End,
    Keyword::Existing,
    Keyword::From,
    Keyword::In,
    Keyword::Is,
    Keyword::Matches,
    Keyword::Member,
    Keyword::Non,
    Keyword::Not,
    Keyword::Null,
    Keyword::On,
    Keyword::Or,
    Keyword::Pages,
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

static KEYWORDS: LazyLock<HashMap<&'static str, Keyword>> =
    LazyLock::new(|| Keyword::ALL.iter().map(|k| (k.as_str(), *k)).collect());

static RESERVED_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| RESERVED.iter().map(|k| k.as_str()).collect());

static OPERATORS: LazyLock<HashMap<Operator, OperatorInfo>> =
    LazyLock::new(|| OPERATOR_TABLE.iter().map(|info| (info.operator, *info)).collect());

/// Case-insensitive keyword lookup.
pub fn keyword(word: &str) -> Option<Keyword> {
    KEYWORDS.get(word.to_ascii_uppercase().as_str()).copied()
}

/// True if `word`, in any letter case, cannot be an unquoted identifier.
pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(word.to_ascii_uppercase().as_str())
}

pub fn reserved_words() -> impl Iterator<Item = &'static str> {
    RESERVED.iter().map(|k| k.as_str())
}

pub fn operator_info(operator: Operator) -> OperatorInfo {
    // Every Operator variant has a row in OPERATOR_TABLE
    OPERATORS[&operator]
}

/// Operator a token starts when it appears before an operand.
pub fn prefix_operator(token: &Token) -> Option<Operator> {
    match token {
        Token::Minus => Some(Operator::Negate),
        Token::Plus => Some(Operator::UnaryPlus),
        Token::Keyword(Keyword::Not, _) => Some(Operator::Not),
        Token::Keyword(Keyword::Existing, _) => Some(Operator::Existing),
        _ => None,
    }
}

/// Operator a single token denotes when it follows an operand.
///
/// `IS` and `NOT` need the following token to pick the operator and are
/// resolved by the parser.
pub fn infix_operator(token: &Token) -> Option<Operator> {
    match token {
        Token::Plus => Some(Operator::Add),
        Token::Minus => Some(Operator::Subtract),
        Token::Star => Some(Operator::Multiply),
        Token::Slash => Some(Operator::Divide),
        Token::Concat => Some(Operator::Concat),
        Token::Eq => Some(Operator::Equal),
        Token::NotEq => Some(Operator::NotEqual),
        Token::Lt => Some(Operator::LessThan),
        Token::Gt => Some(Operator::GreaterThan),
        Token::LtEq => Some(Operator::LessEqual),
        Token::GtEq => Some(Operator::GreaterEqual),
        Token::Colon => Some(Operator::Range),
        Token::Keyword(Keyword::Or, _) => Some(Operator::Or),
        Token::Keyword(Keyword::Xor, _) => Some(Operator::Xor),
        Token::Keyword(Keyword::And, _) => Some(Operator::And),
        Token::Keyword(Keyword::In, _) => Some(Operator::In),
        Token::Keyword(Keyword::Matches, _) => Some(Operator::Matches),
        Token::Keyword(Keyword::As, _) => Some(Operator::Alias),
        _ => None,
    }
}

#[test]
fn test_keyword_lookup_ignores_case() {
    assert_eq!(keyword("select"), Some(Keyword::Select));
    assert_eq!(keyword("Select"), Some(Keyword::Select));
    assert_eq!(keyword("CurrentCube"), Some(Keyword::CurrentCube));
    assert_eq!(keyword("Measures"), None);
}

#[test]
fn test_reserved_words() {
    assert!(is_reserved_word("cube"));
    assert!(is_reserved_word("CURRENTCUBE"));
    assert!(is_reserved_word("Null"));
    assert!(!is_reserved_word("Dimension"));
    assert!(!is_reserved_word("Properties"));
    assert!(!is_reserved_word("Sales"));
}

#[test]
fn test_operator_table_covers_every_operator() {
    for info in OPERATOR_TABLE {
        assert_eq!(operator_info(info.operator), info);
    }
    assert!(
        operator_info(Operator::Multiply).precedence > operator_info(Operator::Add).precedence
    );
    assert!(operator_info(Operator::Not).precedence < operator_info(Operator::Equal).precedence);
}
