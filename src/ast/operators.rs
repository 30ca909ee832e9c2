/// Operators of the MDX expression grammar.
///
/// The spelling each one carries into the AST (the `name` of its
/// [`CallExpression`](crate::ast::CallExpression)) comes from [`Operator::symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Alias
    /// Alias (`expr AS name`)
    Alias,

    // Logical
    /// Logical OR (`OR`)
    Or,
    /// Exclusive OR (`XOR`)
    Xor,
    /// Logical AND (`AND`)
    And,
    /// Logical negation (`NOT`), prefix
    Not,

    // Range
    /// Member range (`:`)
    Range,

    // Comparison
    /// Equal (`=`)
    Equal,
    /// Not equal (`<>`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Object identity (`IS`)
    Is,
    /// Set membership (`IN`)
    In,
    /// Regular expression match (`MATCHES`)
    Matches,
    /// `NOT IN`, encoded as `NOT` around `IN`
    NotIn,
    /// `NOT MATCHES`, encoded as `NOT` around `MATCHES`
    NotMatches,

    // Null and empty tests, postfix
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    IsNotNull,
    /// `IS EMPTY`
    IsEmpty,
    /// `IS NOT EMPTY`
    IsNotEmpty,

    // Arithmetic
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// String concatenation (`||`)
    Concat,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,

    // Unary prefix
    /// Unary minus (`-`)
    Negate,
    /// Unary plus (`+`)
    UnaryPlus,
    /// `EXISTING` set qualifier
    Existing,
}

/// How an operator attaches to its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    Prefix,
    Infix,
    Postfix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Alias => "AS",
            Operator::Or => "OR",
            Operator::Xor => "XOR",
            Operator::And => "AND",
            Operator::Not => "NOT",
            Operator::Range => ":",
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Is => "IS",
            Operator::In => "IN",
            Operator::Matches => "MATCHES",
            // Encoded as NOT around the positive form
            Operator::NotIn => "IN",
            Operator::NotMatches => "MATCHES",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::IsEmpty => "IS EMPTY",
            Operator::IsNotEmpty => "IS NOT EMPTY",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Concat => "||",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Negate => "-",
            Operator::UnaryPlus => "+",
            Operator::Existing => "EXISTING",
        }
    }

    /// True for the two operators that are written as `NOT` wrapped around
    /// an infix call.
    pub fn is_negated(self) -> bool {
        matches!(self, Operator::NotIn | Operator::NotMatches)
    }
}
