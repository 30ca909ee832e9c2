use rust_decimal::Decimal;

use crate::ast::CompoundId;

/// Syntactic form of a [`CallExpression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallType {
    /// `Name(args)`
    Function,
    /// `receiver.Name(args)`; the receiver is the first argument
    Method,
    /// `receiver.NAME`
    Property,
    /// `receiver.&NAME`, or `receiver.[NAME]` on a receiver that is not an identifier
    PropertyQuoted,
    /// `receiver.[&NAME]`
    PropertyAmpersAndQuoted,
    /// Binary operator
    TermInfix,
    /// Unary prefix operator
    TermPrefix,
    /// Unary postfix operator
    TermPostfix,
    /// Set literal `{ ... }`, name `"{}"`
    Braces,
    /// Tuple `( a, b, ... )`, name `"()"`
    Parentheses,
    /// `CAST(expr AS TYPE)`
    Cast,
    /// Flattened `CASE` expression, see [`CaseExpression::to_call`]
    TermCase,
    /// Placeholder for an elided call argument
    Empty,
}

/// Function, method, property, operator, and bracket applications.
///
/// # Examples
/// ```text
/// Filter([Customers].Members, [Measures].[Sales] > 0)   // Function
/// [Time].[2024].Children                                // Property
/// a + b                                                 // TermInfix "+"
/// { a, b }                                              // Braces "{}"
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub call_type: CallType,
    pub name: String,
    pub args: Vec<Expression>,
}

impl CallExpression {
    pub fn new(call_type: CallType, name: impl Into<String>, args: Vec<Expression>) -> Self {
        CallExpression {
            call_type,
            name: name.into(),
            args,
        }
    }

    /// Placeholder for an elided argument such as the middle one in `f(a, , b)`.
    pub fn empty() -> Self {
        CallExpression {
            call_type: CallType::Empty,
            name: String::new(),
            args: Vec::new(),
        }
    }

    pub fn braces(args: Vec<Expression>) -> Self {
        Self::new(CallType::Braces, "{}", args)
    }

    pub fn parentheses(args: Vec<Expression>) -> Self {
        Self::new(CallType::Parentheses, "()", args)
    }
}

/// One `WHEN condition THEN result` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct WhenBranch {
    pub condition: Expression,
    pub result: Expression,
}

/// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`.
///
/// With an operand this is a simple case (each condition is compared with
/// the operand); without one it is a searched case (each condition is a
/// boolean). There is always at least one branch.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpression {
    pub operand: Option<Box<Expression>>,
    pub branches: Vec<WhenBranch>,
    pub else_result: Option<Box<Expression>>,
}

impl CaseExpression {
    pub const MATCH_NAME: &'static str = "_CaseMatch";
    pub const TEST_NAME: &'static str = "_CaseTest";

    /// Positional `TermCase` call form.
    ///
    /// Simple case: `_CaseMatch(operand, when1, then1, .., else?)`.
    /// Searched case: `_CaseTest(when1, then1, .., else?)`.
    pub fn to_call(&self) -> CallExpression {
        let mut args = Vec::with_capacity(self.branches.len() * 2 + 2);
        let name = match &self.operand {
            Some(operand) => {
                args.push(operand.as_ref().clone());
                Self::MATCH_NAME
            }
            None => Self::TEST_NAME,
        };
        for branch in &self.branches {
            args.push(branch.condition.clone());
            args.push(branch.result.clone());
        }
        if let Some(else_result) = &self.else_result {
            args.push(else_result.as_ref().clone());
        }
        CallExpression::new(CallType::TermCase, name, args)
    }
}

/// Abstract Syntax Tree node for an MDX expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    // Literals
    /// Exact numeric literal, never signed
    ///
    /// # Example
    /// ```text
    /// 10e-5
    /// ```
    NumericLiteral(Decimal),

    /// String literal
    ///
    /// # Example
    /// ```text
    /// "hello"
    /// ```
    StringLiteral(String),

    /// Type name inside `CAST(.. AS TYPE)`
    SymbolLiteral(String),

    /// `NULL`, in any letter case
    NullLiteral,

    // References
    /// Member, level, hierarchy, dimension, or set name
    CompoundId(CompoundId),

    // Operations
    /// Any call-shaped node
    Call(CallExpression),

    /// Conditional expression
    Case(CaseExpression),
}

impl Expression {
    pub fn call(call_type: CallType, name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Call(CallExpression::new(call_type, name, args))
    }

    pub fn as_call(&self) -> Option<&CallExpression> {
        match self {
            Expression::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_compound_id(&self) -> Option<&CompoundId> {
        match self {
            Expression::CompoundId(id) => Some(id),
            _ => None,
        }
    }
}

impl From<CallExpression> for Expression {
    fn from(call: CallExpression) -> Self {
        Expression::Call(call)
    }
}

impl From<CompoundId> for Expression {
    fn from(id: CompoundId) -> Self {
        Expression::CompoundId(id)
    }
}
