//! Expression parsing.
//!
//! Expressions are parsed without recursion. Every bracket, argument list,
//! `CASE` and `CAST` opens a [`Level`] on an explicit stack; inside a level,
//! operands and operators are kept on two stacks and folded by precedence
//! (shunting-yard). Nesting depth is therefore limited only by
//! [`ParseOptions::max_nesting_depth`](crate::parser::ParseOptions), never by
//! the call stack.
//!
//! The limit applies to the tree being built as well as to the brackets that
//! are open: every operand carries the height of its subtree, and operators
//! still waiting on the stack count toward it, since each of them ends up
//! wrapping the operand that follows.

use tracing::trace;

use crate::{
    ast::{
        Associativity, CallExpression, CallType, CaseExpression, CompoundId, Expression, Fixity,
        KeyObjectIdentifier, Keyword, NameObjectIdentifier, ObjectIdentifier, Operator, Quoting,
        Token, WhenBranch,
    },
    grammar::{self, precedence},
    lexer::Position,
    parser::{ParseError, Parser},
};

/// What an open level is building.
enum Frame {
    Root,
    /// `( .. )`: one item is grouping, more is a tuple
    Parens(Vec<Expression>),
    Braces(Vec<Expression>),
    Function {
        name: String,
        args: Vec<Expression>,
    },
    Method {
        receiver: Expression,
        name: String,
        args: Vec<Expression>,
    },
    Cast,
    Case(CaseFrame),
}

impl Frame {
    fn kind(&self) -> &'static str {
        match self {
            Frame::Root => "root",
            Frame::Parens(_) => "parens",
            Frame::Braces(_) => "braces",
            Frame::Function { .. } => "function",
            Frame::Method { .. } => "method",
            Frame::Cast => "cast",
            Frame::Case(_) => "case",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaseStage {
    /// Reading the operand of a simple case
    Operand,
    When,
    Then,
    Else,
}

struct CaseFrame {
    operand: Option<Expression>,
    branches: Vec<WhenBranch>,
    condition: Option<Expression>,
    stage: CaseStage,
}

/// An operand and the height of its tree. Leaves have height 0.
struct Node {
    expr: Expression,
    height: usize,
}

impl Node {
    fn leaf(expr: Expression) -> Self {
        Node { expr, height: 0 }
    }

    /// A new node directly above children at most `below` high.
    fn above(expr: Expression, below: usize) -> Self {
        Node {
            expr,
            height: below + 1,
        }
    }
}

/// One expression under construction.
struct Level {
    frame: Frame,
    operands: Vec<Node>,
    operators: Vec<Operator>,
    /// Tallest item the frame has collected so far
    height: usize,
}

impl Level {
    fn new(frame: Frame) -> Self {
        Self::resume(frame, 0)
    }

    fn resume(frame: Frame, height: usize) -> Self {
        Level {
            frame,
            operands: Vec::new(),
            operators: Vec::new(),
            height,
        }
    }

    /// `f(a, , b)` and `f(a, )` leave an argument out.
    fn accepts_elided_argument(&self) -> bool {
        matches!(self.frame, Frame::Function { .. } | Frame::Method { .. })
            && self.operands.is_empty()
            && self.operators.is_empty()
    }

    /// Applies stacked operators that bind at least as tightly as an
    /// incoming operator of the given strength.
    fn reduce(&mut self, strength: u8, associativity: Associativity) -> Option<()> {
        while let Some(&top) = self.operators.last() {
            let stacked = grammar::operator_info(top).precedence;
            let fold = match associativity {
                Associativity::Left => stacked >= strength,
                Associativity::Right => stacked > strength,
            };
            if !fold {
                break;
            }
            self.operators.pop();
            self.apply(top)?;
        }
        Some(())
    }

    fn apply(&mut self, operator: Operator) -> Option<()> {
        let info = grammar::operator_info(operator);
        let node = match info.fixity {
            Fixity::Prefix => {
                let operand = self.operands.pop()?;
                let call =
                    Expression::call(CallType::TermPrefix, operator.symbol(), vec![operand.expr]);
                Node::above(call, operand.height)
            }
            Fixity::Postfix => {
                let operand = self.operands.pop()?;
                let call =
                    Expression::call(CallType::TermPostfix, operator.symbol(), vec![operand.expr]);
                Node::above(call, operand.height)
            }
            Fixity::Infix => {
                let right = self.operands.pop()?;
                let left = self.operands.pop()?;
                let call = Node::above(
                    Expression::call(
                        CallType::TermInfix,
                        operator.symbol(),
                        vec![left.expr, right.expr],
                    ),
                    left.height.max(right.height),
                );
                if operator.is_negated() {
                    let not = Expression::call(
                        CallType::TermPrefix,
                        Operator::Not.symbol(),
                        vec![call.expr],
                    );
                    Node::above(not, call.height)
                } else {
                    call
                }
            }
        };
        self.operands.push(node);
        Some(())
    }

    fn tallest_operand(&self) -> usize {
        self.operands.last().map_or(0, |node| node.height)
    }

    /// Folds everything that is left into a single expression.
    fn finish(&mut self) -> Option<Node> {
        self.reduce(0, Associativity::Left)?;
        if self.operands.len() == 1 {
            self.operands.pop()
        } else {
            None
        }
    }
}

enum State {
    /// Expecting an operand, possibly after prefix operators
    Operand,
    /// An operand was read; `.` accesses may follow
    Postfix(Node),
    /// Expecting an operator or the end of the current level
    Operator,
}

enum Step {
    Continue(State),
    Finished(Node),
}

/// Result of one `.` access.
enum Access {
    Done(Node),
    /// `receiver.Name(` with at least one argument to come
    OpenMethod { receiver: Node, name: String },
}

impl Parser {
    /// Parses one expression and stops at the first token that cannot
    /// continue it, leaving that token in place.
    pub(crate) fn expression(&mut self) -> Result<Expression, ParseError> {
        let mut stack = vec![Level::new(Frame::Root)];
        let mut state = State::Operand;
        loop {
            state = match state {
                State::Operand => self.operand_step(&mut stack)?,
                State::Postfix(expr) => self.postfix_step(&mut stack, expr)?,
                State::Operator => match self.operator_step(&mut stack)? {
                    Step::Continue(state) => state,
                    Step::Finished(node) => return Ok(node.expr),
                },
            };
        }
    }

    fn malformed(&self) -> ParseError {
        self.syntax_error("Malformed expression")
    }

    fn top<'a>(&self, stack: &'a mut [Level]) -> Result<&'a mut Level, ParseError> {
        stack.last_mut().ok_or_else(|| self.malformed())
    }

    fn too_deep(&self) -> ParseError {
        ParseError::NestingTooDeep {
            limit: self.options.max_nesting_depth,
        }
    }

    /// Rejects a subtree taller than the nesting left to this parser.
    fn check_height(&self, height: usize) -> Result<(), ParseError> {
        if self.depth + height > self.options.max_nesting_depth {
            return Err(self.too_deep());
        }
        Ok(())
    }

    /// Every open level and every waiting operator will sit above the next
    /// operand in the finished tree.
    fn check_pending(&self, stack: &[Level]) -> Result<(), ParseError> {
        let waiting = stack.last().map_or(0, |level| level.operators.len());
        if self.depth + stack.len() + waiting > self.options.max_nesting_depth {
            return Err(self.too_deep());
        }
        Ok(())
    }

    fn open(&self, stack: &mut Vec<Level>, level: Level) -> Result<State, ParseError> {
        if self.depth + stack.len() > self.options.max_nesting_depth {
            return Err(self.too_deep());
        }
        trace!(frame = level.frame.kind(), depth = stack.len(), "open");
        stack.push(level);
        Ok(State::Operand)
    }

    fn operand_step(&mut self, stack: &mut Vec<Level>) -> Result<State, ParseError> {
        if let Some(operator) = grammar::prefix_operator(&self.current_token) {
            self.check_pending(stack)?;
            self.advance()?;
            self.top(stack)?.operators.push(operator);
            return Ok(State::Operand);
        }

        match &self.current_token {
            Token::LParen => {
                self.advance()?;
                self.open(stack, Level::new(Frame::Parens(Vec::new())))
            }
            Token::LBrace => {
                self.advance()?;
                if self.check(&Token::RBrace) {
                    self.advance()?;
                    let braces = CallExpression::braces(Vec::new()).into();
                    return Ok(State::Postfix(Node::above(braces, 0)));
                }
                self.open(stack, Level::new(Frame::Braces(Vec::new())))
            }
            Token::Keyword(Keyword::Case, _) => {
                self.advance()?;
                let stage = if self.check_keyword(Keyword::When) {
                    self.advance()?;
                    CaseStage::When
                } else {
                    CaseStage::Operand
                };
                let case = CaseFrame {
                    operand: None,
                    branches: Vec::new(),
                    condition: None,
                    stage,
                };
                self.open(stack, Level::new(Frame::Case(case)))
            }
            Token::Keyword(Keyword::Cast, _) => {
                self.advance()?;
                self.expect(Token::LParen)?;
                self.open(stack, Level::new(Frame::Cast))
            }
            Token::Comma | Token::RParen if self.top(stack)?.accepts_elided_argument() => {
                self.top(stack)?
                    .operands
                    .push(Node::leaf(CallExpression::empty().into()));
                Ok(State::Operator)
            }
            _ => self.atom(stack),
        }
    }

    /// Literal, identifier, or the start of a function call.
    fn atom(&mut self, stack: &mut Vec<Level>) -> Result<State, ParseError> {
        let position = self.position;
        let expr = match self.take_token()? {
            Token::Number(n) => Expression::NumericLiteral(n),
            Token::String(s, _) => Expression::StringLiteral(s),
            Token::Keyword(Keyword::Null, _) => Expression::NullLiteral,
            Token::Identifier(name) => return self.name_or_function(stack, name),
            Token::Keyword(keyword, word) if !keyword.is_reserved() => {
                return self.name_or_function(stack, word);
            }
            Token::QuotedId(name) if name.is_empty() => {
                return Err(ParseError::EmptyIdentifier { position });
            }
            Token::QuotedId(name) => {
                CompoundId::from(NameObjectIdentifier::quoted(name)).into()
            }
            token @ (Token::AmpQuotedId(_) | Token::AmpUnquotedId(_)) => {
                let key = self.key_group(token, position)?;
                CompoundId::new(ObjectIdentifier::Key(key)).into()
            }
            token => {
                return Err(ParseError::UnexpectedToken {
                    expected: "expression".to_string(),
                    found: token.to_string(),
                    position,
                });
            }
        };
        Ok(State::Postfix(Node::leaf(expr)))
    }

    fn name_or_function(
        &mut self,
        stack: &mut Vec<Level>,
        name: String,
    ) -> Result<State, ParseError> {
        if !self.check(&Token::LParen) {
            let id = CompoundId::from(NameObjectIdentifier::unquoted(name));
            return Ok(State::Postfix(Node::leaf(id.into())));
        }

        self.advance()?;
        if self.check(&Token::RParen) {
            self.advance()?;
            let call = Expression::call(CallType::Function, name, Vec::new());
            return Ok(State::Postfix(Node::above(call, 0)));
        }
        let frame = Frame::Function {
            name,
            args: Vec::new(),
        };
        self.open(stack, Level::new(frame))
    }

    fn postfix_step(
        &mut self,
        stack: &mut Vec<Level>,
        mut node: Node,
    ) -> Result<State, ParseError> {
        while self.check(&Token::Dot) {
            self.advance()?;
            match self.member_access(node)? {
                Access::Done(next) => {
                    self.check_height(next.height)?;
                    node = next;
                }
                Access::OpenMethod { receiver, name } => {
                    let frame = Frame::Method {
                        receiver: receiver.expr,
                        name,
                        args: Vec::new(),
                    };
                    return self.open(stack, Level::resume(frame, receiver.height));
                }
            }
        }
        self.check_height(node.height)?;
        self.top(stack)?.operands.push(node);
        Ok(State::Operator)
    }

    /// Whatever follows a `.`: a method, a property, or another identifier
    /// segment.
    fn member_access(&mut self, receiver: Node) -> Result<Access, ParseError> {
        let position = self.position;
        match self.take_token()? {
            Token::Identifier(name) => self.property_or_method(receiver, name),
            Token::Keyword(keyword, word) if !keyword.is_reserved() => {
                self.property_or_method(receiver, word)
            }
            Token::Keyword(_, word) => Err(ParseError::ReservedWord { word, position }),
            Token::QuotedId(name) if name.is_empty() => {
                Err(ParseError::EmptyIdentifier { position })
            }
            Token::QuotedId(name) => {
                if self.check(&Token::LParen) {
                    return self.method_call(receiver, name);
                }
                if let Some(stripped) = name.strip_prefix('&') {
                    if stripped.is_empty() {
                        return Err(ParseError::EmptyIdentifier { position });
                    }
                    let call = Expression::call(
                        CallType::PropertyAmpersAndQuoted,
                        stripped,
                        vec![receiver.expr],
                    );
                    return Ok(Access::Done(Node::above(call, receiver.height)));
                }
                Ok(Access::Done(match receiver.expr {
                    Expression::CompoundId(id) => Node::leaf(
                        id.append(ObjectIdentifier::Name(NameObjectIdentifier::quoted(name)))
                            .into(),
                    ),
                    other => Node::above(
                        Expression::call(CallType::PropertyQuoted, name, vec![other]),
                        receiver.height,
                    ),
                }))
            }
            token @ (Token::AmpQuotedId(_) | Token::AmpUnquotedId(_)) => {
                let key = self.key_group(token, position)?;
                Self::attach_key(receiver, key, position).map(Access::Done)
            }
            token => Err(ParseError::UnexpectedToken {
                expected: "identifier after '.'".to_string(),
                found: token.to_string(),
                position,
            }),
        }
    }

    fn property_or_method(&mut self, receiver: Node, name: String) -> Result<Access, ParseError> {
        if self.check(&Token::LParen) {
            return self.method_call(receiver, name);
        }
        let call = Expression::call(CallType::Property, name, vec![receiver.expr]);
        Ok(Access::Done(Node::above(call, receiver.height)))
    }

    /// Called with the `(` still current.
    fn method_call(&mut self, receiver: Node, name: String) -> Result<Access, ParseError> {
        self.advance()?;
        if self.check(&Token::RParen) {
            self.advance()?;
            let args = vec![receiver.expr, CallExpression::empty().into()];
            let call = Expression::call(CallType::Method, name, args);
            return Ok(Access::Done(Node::above(call, receiver.height)));
        }
        Ok(Access::OpenMethod { receiver, name })
    }

    fn attach_key(
        receiver: Node,
        key: KeyObjectIdentifier,
        position: Position,
    ) -> Result<Node, ParseError> {
        let below = receiver.height;
        let mut parts = key.parts;
        if parts.len() == 1 {
            let part = parts.swap_remove(0);
            return Ok(match (receiver.expr, part.quoting) {
                // `x.&Name` is a property lookup
                (receiver, Quoting::Unquoted) => Node::above(
                    Expression::call(CallType::PropertyQuoted, part.name, vec![receiver]),
                    below,
                ),
                (Expression::CompoundId(id), Quoting::Quoted) => Node::leaf(
                    id.append(ObjectIdentifier::Key(KeyObjectIdentifier { parts: vec![part] }))
                        .into(),
                ),
                (receiver, Quoting::Quoted) => Node::above(
                    Expression::call(CallType::PropertyAmpersAndQuoted, part.name, vec![receiver]),
                    below,
                ),
            });
        }

        match receiver.expr {
            Expression::CompoundId(id) => Ok(Node::leaf(
                id.append(ObjectIdentifier::Key(KeyObjectIdentifier { parts }))
                    .into(),
            )),
            _ => Err(ParseError::Syntax {
                message: "A multi-part key can only follow an identifier".to_string(),
                position,
            }),
        }
    }

    fn operator_step(&mut self, stack: &mut Vec<Level>) -> Result<Step, ParseError> {
        if self.check_keyword(Keyword::Is) {
            self.advance()?;
            let postfix = if self.check_keyword(Keyword::Null) {
                Some(Operator::IsNull)
            } else if self.check_keyword(Keyword::Empty) {
                Some(Operator::IsEmpty)
            } else if self.check_keyword(Keyword::Not) {
                self.advance()?;
                if self.check_keyword(Keyword::Null) {
                    Some(Operator::IsNotNull)
                } else if self.check_keyword(Keyword::Empty) {
                    Some(Operator::IsNotEmpty)
                } else {
                    return Err(self.unexpected("NULL or EMPTY after IS NOT"));
                }
            } else {
                None
            };

            return match postfix {
                Some(operator) => {
                    self.advance()?;
                    self.push_postfix(stack, operator)?;
                    Ok(Step::Continue(State::Operator))
                }
                None => {
                    self.push_infix(stack, Operator::Is)?;
                    Ok(Step::Continue(State::Operand))
                }
            };
        }

        if self.check_keyword(Keyword::Not) {
            self.advance()?;
            let operator = if self.check_keyword(Keyword::In) {
                Operator::NotIn
            } else if self.check_keyword(Keyword::Matches) {
                Operator::NotMatches
            } else {
                return Err(self.unexpected("IN or MATCHES after NOT"));
            };
            self.advance()?;
            self.push_infix(stack, operator)?;
            return Ok(Step::Continue(State::Operand));
        }

        match grammar::infix_operator(&self.current_token) {
            // Inside CAST the AS introduces the target type
            Some(Operator::Alias) if matches!(self.top(stack)?.frame, Frame::Cast) => {
                self.close_level(stack)
            }
            Some(Operator::Alias) => {
                self.advance()?;
                self.push_alias(stack)?;
                Ok(Step::Continue(State::Operator))
            }
            Some(operator) => {
                self.advance()?;
                self.push_infix(stack, operator)?;
                Ok(Step::Continue(State::Operand))
            }
            None => self.close_level(stack),
        }
    }

    fn push_infix(&self, stack: &mut [Level], operator: Operator) -> Result<(), ParseError> {
        let info = grammar::operator_info(operator);
        let level = self.top(stack)?;
        level
            .reduce(info.precedence, info.associativity)
            .ok_or_else(|| self.malformed())?;
        self.check_height(level.tallest_operand())?;
        self.check_pending(stack)?;
        self.top(stack)?.operators.push(operator);
        Ok(())
    }

    fn push_postfix(&self, stack: &mut [Level], operator: Operator) -> Result<(), ParseError> {
        let info = grammar::operator_info(operator);
        let level = self.top(stack)?;
        level
            .reduce(info.precedence, Associativity::Left)
            .and_then(|()| level.apply(operator))
            .ok_or_else(|| self.malformed())?;
        self.check_height(level.tallest_operand())
    }

    /// `expr AS name`: everything to the left is the aliased expression and
    /// the right side is always an identifier.
    fn push_alias(&mut self, stack: &mut [Level]) -> Result<(), ParseError> {
        let alias = self.compound_id()?;
        let level = self.top(stack)?;
        level
            .reduce(precedence::ALIAS, Associativity::Left)
            .ok_or_else(|| self.malformed())?;
        let aliased = level.operands.pop().ok_or_else(|| self.malformed())?;
        let call = Expression::call(
            CallType::TermInfix,
            Operator::Alias.symbol(),
            vec![aliased.expr, alias.into()],
        );
        let node = Node::above(call, aliased.height);
        self.check_height(node.height)?;
        level.operands.push(node);
        Ok(())
    }

    /// Type name after `CAST(expr AS`.
    fn cast_type(&mut self) -> Result<Expression, ParseError> {
        let name = self.name_segment()?;
        Ok(Expression::SymbolLiteral(name.name))
    }

    /// Ends the expression of the innermost level at the current token and
    /// decides, from that token, whether its frame continues or closes.
    fn close_level(&mut self, stack: &mut Vec<Level>) -> Result<Step, ParseError> {
        let mut level = stack.pop().ok_or_else(|| self.malformed())?;
        let node = level.finish().ok_or_else(|| self.malformed())?;
        self.check_height(node.height)?;
        let height = level.height.max(node.height);
        let expr = node.expr;

        let closed = match level.frame {
            Frame::Root => return Ok(Step::Finished(Node { expr, height })),

            Frame::Parens(mut items) => {
                items.push(expr);
                if self.check(&Token::Comma) {
                    self.advance()?;
                    stack.push(Level::resume(Frame::Parens(items), height));
                    return Ok(Step::Continue(State::Operand));
                }
                self.expect_closing(Token::RParen, "',' or ')'")?;
                if items.len() == 1 {
                    Node {
                        expr: items.swap_remove(0),
                        height,
                    }
                } else {
                    Node::above(CallExpression::parentheses(items).into(), height)
                }
            }

            Frame::Braces(mut items) => {
                items.push(expr);
                if self.check(&Token::Comma) {
                    self.advance()?;
                    stack.push(Level::resume(Frame::Braces(items), height));
                    return Ok(Step::Continue(State::Operand));
                }
                self.expect_closing(Token::RBrace, "',' or '}'")?;
                Node::above(CallExpression::braces(items).into(), height)
            }

            Frame::Function { name, mut args } => {
                args.push(expr);
                if self.check(&Token::Comma) {
                    self.advance()?;
                    stack.push(Level::resume(Frame::Function { name, args }, height));
                    return Ok(Step::Continue(State::Operand));
                }
                self.expect_closing(Token::RParen, "',' or ')'")?;
                Node::above(Expression::call(CallType::Function, name, args), height)
            }

            Frame::Method {
                receiver,
                name,
                mut args,
            } => {
                args.push(expr);
                if self.check(&Token::Comma) {
                    self.advance()?;
                    let frame = Frame::Method {
                        receiver,
                        name,
                        args,
                    };
                    stack.push(Level::resume(frame, height));
                    return Ok(Step::Continue(State::Operand));
                }
                self.expect_closing(Token::RParen, "',' or ')'")?;
                let mut all = Vec::with_capacity(args.len() + 1);
                all.push(receiver);
                all.extend(args);
                Node::above(Expression::call(CallType::Method, name, all), height)
            }

            Frame::Cast => {
                if self.check(&Token::Comma) {
                    return Err(self.syntax_error("CAST takes a single expression before AS"));
                }
                self.expect_keyword(Keyword::As)?;
                let target = self.cast_type()?;
                self.expect_closing(Token::RParen, "')'")?;
                Node::above(
                    Expression::call(CallType::Cast, "CAST", vec![expr, target]),
                    height,
                )
            }

            Frame::Case(mut case) => match self.case_step(&mut case, expr)? {
                Some(done) => Node::above(done, height),
                None => {
                    stack.push(Level::resume(Frame::Case(case), height));
                    return Ok(Step::Continue(State::Operand));
                }
            },
        };

        self.check_height(closed.height)?;
        trace!(depth = stack.len(), "close");
        Ok(Step::Continue(State::Postfix(closed)))
    }

    fn expect_closing(&mut self, token: Token, expected: &str) -> Result<(), ParseError> {
        if !self.check(&token) {
            return Err(self.unexpected(expected));
        }
        self.advance()
    }

    /// Consumes the keyword that ended `expr` inside a `CASE`. Returns the
    /// finished expression once `END` is reached.
    fn case_step(
        &mut self,
        case: &mut CaseFrame,
        expr: Expression,
    ) -> Result<Option<Expression>, ParseError> {
        match case.stage {
            CaseStage::Operand => {
                self.expect_keyword(Keyword::When)?;
                case.operand = Some(expr);
                case.stage = CaseStage::When;
            }
            CaseStage::When => {
                self.expect_keyword(Keyword::Then)?;
                case.condition = Some(expr);
                case.stage = CaseStage::Then;
            }
            CaseStage::Then => {
                let condition = case.condition.take().ok_or_else(|| self.malformed())?;
                case.branches.push(WhenBranch {
                    condition,
                    result: expr,
                });
                if self.check_keyword(Keyword::When) {
                    case.stage = CaseStage::When;
                } else if self.check_keyword(Keyword::Else) {
                    case.stage = CaseStage::Else;
                } else if self.check_keyword(Keyword::End) {
                    self.advance()?;
                    return Ok(Some(Self::finish_case(case, None)));
                } else {
                    return Err(self.unexpected("WHEN, ELSE or END"));
                }
                self.advance()?;
            }
            CaseStage::Else => {
                self.expect_keyword(Keyword::End)?;
                return Ok(Some(Self::finish_case(case, Some(expr))));
            }
        }
        Ok(None)
    }

    fn finish_case(case: &mut CaseFrame, else_result: Option<Expression>) -> Expression {
        Expression::Case(CaseExpression {
            operand: case.operand.take().map(Box::new),
            branches: std::mem::take(&mut case.branches),
            else_result: else_result.map(Box::new),
        })
    }
}
