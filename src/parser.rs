use std::mem;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;
use tracing::debug;

use crate::{
    ast::{
        Axis, AxisClause, CompoundId, CreateMemberBodyClause, CreateSetBodyClause,
        CubeNameIdentifier, DmvStatement, DrillthroughStatement, ExplainStatement, Expression,
        KeyObjectIdentifier, Keyword, MdxStatement, MemberPropertyDefinition,
        NameObjectIdentifier, ObjectIdentifier, QuoteStyle, SelectQueryClause,
        SelectStatement, SelectSubcubeClause, SelectWithClause, SubcubeStatement, Token,
    },
    lexer::{LexError, Lexer, Position},
};

mod expressions;

/// Limits applied to a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of the input and of the tree built from it: open
    /// brackets, calls, `CASE`/`CAST` bodies, sub-selects and `EXPLAIN`
    /// prefixes, plus operator chains such as `NOT NOT ..` or `a + b + ..`.
    ///
    /// The syntax tree is dropped, cloned, compared and rendered
    /// recursively, so the limit also bounds the stack those operations use.
    pub max_nesting_depth: usize,
}

impl ParseOptions {
    /// Small enough for a tree at the limit to be rendered and dropped on a
    /// 2 MiB thread stack.
    pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_nesting_depth: Self::DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

/// The single error type for every way MDX text can fail to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Expected {expected}, got {found} at {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: Position,
    },

    #[error("Reserved word '{word}' cannot be used as an identifier at {position}; write it as [{word}]")]
    ReservedWord { word: String, position: Position },

    #[error("Empty bracketed identifier '[]' at {position}")]
    EmptyIdentifier { position: Position },

    #[error("Cube name must be a single identifier segment at {position}")]
    CompoundCubeName { position: Position },

    #[error("{message} at {position}")]
    Syntax { message: String, position: Position },

    #[error("Nesting depth exceeds the limit of {limit}")]
    NestingTooDeep { limit: usize },
}

/// Raw axis or DMV column, before the `FROM` target decides which it is.
struct QueryItem {
    non_empty: bool,
    expression: Expression,
    dimension_properties: Vec<CompoundId>,
    axis: Option<Axis>,
    end: Position,
}

enum SelectBody {
    Select(SelectStatement),
    Dmv(DmvStatement),
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    position: Position,
    options: ParseOptions,
    /// Nesting already used by enclosing statements
    depth: usize,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Result<Self, ParseError> {
        Self::with_options(lexer, ParseOptions::default())
    }

    pub fn with_options(mut lexer: Lexer, options: ParseOptions) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        let position = lexer.token_position();
        Ok(Parser {
            lexer,
            current_token,
            position,
            options,
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        self.position = self.lexer.token_position();
        Ok(())
    }

    /// Moves past the current token and hands it back.
    fn take_token(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        self.position = self.lexer.token_position();
        Ok(mem::replace(&mut self.current_token, next))
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current_token.is_keyword(keyword)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(expected.to_string()));
        }
        self.advance()
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if !self.check_keyword(keyword) {
            return Err(self.unexpected(format!("keyword {}", keyword)));
        }
        self.advance()
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: self.current_token.to_string(),
            position: self.position,
        }
    }

    fn syntax_error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            message: message.into(),
            position: self.position,
        }
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        if self.check(&Token::Semicolon) {
            self.advance()?;
        }
        if !self.check(&Token::Eof) {
            return Err(self.unexpected("end of input"));
        }
        Ok(())
    }

    /// Moves one statement level deeper, failing once the configured limit
    /// is reached. Callers restore `depth` when they are done.
    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.options.max_nesting_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.options.max_nesting_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Runs `parse` and puts `depth` back to where it was, whatever the
    /// outcome.
    fn keeping_depth<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let depth = self.depth;
        let result = parse(self);
        self.depth = depth;
        result
    }
}

// ============================================================================
// Entry points
// ============================================================================

impl Parser {
    /// Parses the whole input as one expression.
    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let expr = self.expression()?;
        if !self.check(&Token::Eof) {
            return Err(self.unexpected("end of input"));
        }
        Ok(expr)
    }

    /// Parses the whole input as a `SELECT` statement.
    pub fn parse_select_statement(&mut self) -> Result<SelectStatement, ParseError> {
        let statement = self.select_statement()?;
        self.expect_end()?;
        Ok(statement)
    }

    /// Parses the whole input as any top-level statement.
    pub fn parse_mdx_statement(&mut self) -> Result<MdxStatement, ParseError> {
        let statement = self.mdx_statement()?;
        self.expect_end()?;
        Ok(statement)
    }

    /// Parses the whole input as a single cube name.
    pub fn parse_cube_name(&mut self) -> Result<CubeNameIdentifier, ParseError> {
        let name = self.cube_name()?;
        if !self.check(&Token::Eof) {
            return Err(self.unexpected("end of input"));
        }
        Ok(name)
    }
}

// ============================================================================
// Identifiers
// ============================================================================

impl Parser {
    /// A bare or bracketed name where an identifier is required.
    fn name_segment(&mut self) -> Result<NameObjectIdentifier, ParseError> {
        if !matches!(
            self.current_token,
            Token::Identifier(_) | Token::Keyword(..) | Token::QuotedId(_)
        ) {
            return Err(self.unexpected("identifier"));
        }

        let position = self.position;
        match self.take_token()? {
            Token::Identifier(name) => Ok(NameObjectIdentifier::unquoted(name)),
            Token::Keyword(keyword, word) if keyword.is_reserved() => {
                Err(ParseError::ReservedWord { word, position })
            }
            Token::Keyword(_, word) => Ok(NameObjectIdentifier::unquoted(word)),
            Token::QuotedId(name) if name.is_empty() => Err(ParseError::EmptyIdentifier { position }),
            Token::QuotedId(name) => Ok(NameObjectIdentifier::quoted(name)),
            token => Err(ParseError::UnexpectedToken {
                expected: "identifier".to_string(),
                found: token.to_string(),
                position,
            }),
        }
    }

    /// Collects `&part&part...` starting with the already-taken `first`.
    fn key_group(
        &mut self,
        first: Token,
        position: Position,
    ) -> Result<KeyObjectIdentifier, ParseError> {
        let mut parts = vec![Self::key_part(first, position)?];
        while matches!(
            self.current_token,
            Token::AmpQuotedId(_) | Token::AmpUnquotedId(_)
        ) {
            let position = self.position;
            let token = self.take_token()?;
            parts.push(Self::key_part(token, position)?);
        }
        Ok(KeyObjectIdentifier { parts })
    }

    fn key_part(token: Token, position: Position) -> Result<NameObjectIdentifier, ParseError> {
        match token {
            Token::AmpQuotedId(name) if name.is_empty() => {
                Err(ParseError::EmptyIdentifier { position })
            }
            Token::AmpQuotedId(name) => Ok(NameObjectIdentifier::quoted(name)),
            Token::AmpUnquotedId(name) => Ok(NameObjectIdentifier::unquoted(name)),
            token => Err(ParseError::UnexpectedToken {
                expected: "key".to_string(),
                found: token.to_string(),
                position,
            }),
        }
    }

    fn object_identifier(&mut self) -> Result<ObjectIdentifier, ParseError> {
        if matches!(
            self.current_token,
            Token::AmpQuotedId(_) | Token::AmpUnquotedId(_)
        ) {
            let position = self.position;
            let first = self.take_token()?;
            return Ok(ObjectIdentifier::Key(self.key_group(first, position)?));
        }
        Ok(ObjectIdentifier::Name(self.name_segment()?))
    }

    /// Dot-separated identifier outside expression context, where every
    /// segment is part of the name.
    fn compound_id(&mut self) -> Result<CompoundId, ParseError> {
        let mut id = CompoundId::new(self.object_identifier()?);
        while self.check(&Token::Dot) {
            self.advance()?;
            id = id.append(self.object_identifier()?);
        }
        Ok(id)
    }

    fn compound_id_list(&mut self) -> Result<Vec<CompoundId>, ParseError> {
        let mut ids = vec![self.compound_id()?];
        while self.check(&Token::Comma) {
            self.advance()?;
            ids.push(self.compound_id()?);
        }
        Ok(ids)
    }

    fn cube_name(&mut self) -> Result<CubeNameIdentifier, ParseError> {
        let name = self.name_segment()?;
        if self.check(&Token::Dot) {
            return Err(ParseError::CompoundCubeName {
                position: self.position,
            });
        }
        Ok(CubeNameIdentifier {
            name: name.name,
            quoting: name.quoting,
        })
    }

    fn unsigned_integer(&mut self, what: &str) -> Result<u64, ParseError> {
        let value = match &self.current_token {
            Token::Number(n) if n.fract() == Decimal::ZERO => n.to_u64(),
            _ => None,
        };
        match value {
            Some(n) => {
                self.advance()?;
                Ok(n)
            }
            None => Err(self.unexpected(format!("non-negative integer {}", what))),
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

impl Parser {
    /// Any statement, under as many `EXPLAIN PLAN FOR` prefixes as the input
    /// has. The prefixes are counted first and wrapped around the inner
    /// statement afterwards.
    fn mdx_statement(&mut self) -> Result<MdxStatement, ParseError> {
        self.keeping_depth(|p| {
            let mut explains = 0;
            while p.check_keyword(Keyword::Explain) {
                p.descend()?;
                p.advance()?;
                p.expect_keyword(Keyword::Plan)?;
                p.expect_keyword(Keyword::For)?;
                explains += 1;
            }

            let mut statement = p.plain_statement()?;
            for _ in 0..explains {
                statement = MdxStatement::Explain(ExplainStatement {
                    statement: Box::new(statement),
                });
            }
            Ok(statement)
        })
    }

    fn plain_statement(&mut self) -> Result<MdxStatement, ParseError> {
        if self.check_keyword(Keyword::Drillthrough) {
            return Ok(MdxStatement::Drillthrough(self.drillthrough()?));
        }
        match self.select_body(true)? {
            SelectBody::Select(select) => Ok(MdxStatement::Select(select)),
            SelectBody::Dmv(dmv) => Ok(MdxStatement::Dmv(dmv)),
        }
    }

    fn select_statement(&mut self) -> Result<SelectStatement, ParseError> {
        match self.select_body(false)? {
            SelectBody::Select(select) => Ok(select),
            SelectBody::Dmv(_) => Err(self.syntax_error("Expected a SELECT statement")),
        }
    }

    /// `[WITH ..] SELECT .. FROM .. [WHERE ..] [CELL PROPERTIES ..]`, or a
    /// DMV query when `allow_dmv` is set.
    fn select_body(&mut self, allow_dmv: bool) -> Result<SelectBody, ParseError> {
        let with_clauses = if self.check_keyword(Keyword::With) {
            self.advance()?;
            self.with_clauses()?
        } else {
            Vec::new()
        };

        self.expect_keyword(Keyword::Select)?;
        let (asterisk, items) = self.query_items()?;
        self.expect_keyword(Keyword::From)?;

        if allow_dmv && with_clauses.is_empty() {
            if let Some(table) = self.system_table()? {
                let where_clause = self.where_clause()?;
                return Ok(SelectBody::Dmv(DmvStatement {
                    columns: Self::dmv_columns(items)?,
                    table,
                    where_clause,
                }));
            }
        }

        let query_clause = Self::query_clause(asterisk, items)?;
        let subcube_clause = self.subcube_clause()?;
        let where_clause = self.where_clause()?;
        let cell_properties = self.cell_properties()?;

        Ok(SelectBody::Select(SelectStatement {
            with_clauses,
            query_clause,
            subcube_clause,
            where_clause,
            cell_properties,
        }))
    }

    fn with_clauses(&mut self) -> Result<Vec<SelectWithClause>, ParseError> {
        let mut clauses = Vec::new();
        loop {
            if self.check_keyword(Keyword::Member) {
                self.advance()?;
                let name = self.compound_id()?;
                self.expect_keyword(Keyword::As)?;
                let expression = self.formula()?;
                let mut properties = Vec::new();
                while self.check(&Token::Comma) {
                    self.advance()?;
                    let name = self.name_segment()?;
                    self.expect(Token::Eq)?;
                    let value = self.expression()?;
                    properties.push(MemberPropertyDefinition { name, value });
                }
                clauses.push(SelectWithClause::Member(CreateMemberBodyClause {
                    name,
                    expression,
                    properties,
                }));
            } else if self.check_keyword(Keyword::Set) {
                self.advance()?;
                let name = self.compound_id()?;
                self.expect_keyword(Keyword::As)?;
                let expression = self.formula()?;
                clauses.push(SelectWithClause::Set(CreateSetBodyClause { name, expression }));
            } else if clauses.is_empty() {
                return Err(self.unexpected("MEMBER or SET"));
            } else {
                return Ok(clauses);
            }
        }
    }

    /// Formula of a calculated member or named set. The legacy form wraps the
    /// expression in single quotes.
    fn formula(&mut self) -> Result<Expression, ParseError> {
        if let Token::String(text, QuoteStyle::Single) = &self.current_token {
            let lexer = Lexer::new(text);
            let mut inner = Parser::with_options(lexer, self.options)?;
            inner.depth = self.depth + 1;
            if inner.depth > self.options.max_nesting_depth {
                return Err(ParseError::NestingTooDeep {
                    limit: self.options.max_nesting_depth,
                });
            }
            let expression = inner.parse_expression()?;
            self.advance()?;
            return Ok(expression);
        }
        self.expression()
    }

    /// Items between `SELECT` and `FROM`. Returns whether `*` was used.
    fn query_items(&mut self) -> Result<(bool, Vec<QueryItem>), ParseError> {
        if self.check_keyword(Keyword::From) {
            return Ok((false, Vec::new()));
        }
        if self.check(&Token::Star) {
            self.advance()?;
            return Ok((true, Vec::new()));
        }

        let mut items = vec![self.query_item()?];
        while self.check(&Token::Comma) {
            self.advance()?;
            items.push(self.query_item()?);
        }
        Ok((false, items))
    }

    fn query_item(&mut self) -> Result<QueryItem, ParseError> {
        let non_empty = if self.check_keyword(Keyword::Non) {
            self.advance()?;
            self.expect_keyword(Keyword::Empty)?;
            true
        } else {
            false
        };

        let expression = self.expression()?;

        let dimension_properties = if self.check_keyword(Keyword::Dimension) {
            self.advance()?;
            self.expect_keyword(Keyword::Properties)?;
            self.compound_id_list()?
        } else if self.check_keyword(Keyword::Properties) {
            self.advance()?;
            self.compound_id_list()?
        } else {
            Vec::new()
        };

        let end = self.position;
        let axis = if self.check_keyword(Keyword::On) {
            self.advance()?;
            Some(self.axis()?)
        } else {
            None
        };

        Ok(QueryItem {
            non_empty,
            expression,
            dimension_properties,
            axis,
            end,
        })
    }

    fn axis(&mut self) -> Result<Axis, ParseError> {
        let named = match &self.current_token {
            Token::Keyword(Keyword::Columns, _) => Some(Axis::Columns),
            Token::Keyword(Keyword::Rows, _) => Some(Axis::Rows),
            Token::Keyword(Keyword::Pages, _) => Some(Axis::Pages),
            Token::Keyword(Keyword::Chapters, _) => Some(Axis::Chapters),
            Token::Keyword(Keyword::Sections, _) => Some(Axis::Sections),
            _ => None,
        };
        if let Some(axis) = named {
            self.advance()?;
            return Ok(axis);
        }

        let parenthesized = self.check_keyword(Keyword::Axis);
        if parenthesized {
            self.advance()?;
            self.expect(Token::LParen)?;
        }
        let ordinal = self.unsigned_integer("axis number")?;
        if parenthesized {
            self.expect(Token::RParen)?;
        }
        u32::try_from(ordinal)
            .map(Axis::from_ordinal)
            .map_err(|_| self.syntax_error(format!("Axis number {} is out of range", ordinal)))
    }

    fn query_clause(asterisk: bool, items: Vec<QueryItem>) -> Result<SelectQueryClause, ParseError> {
        if asterisk {
            return Ok(SelectQueryClause::Asterisk);
        }
        if items.is_empty() {
            return Ok(SelectQueryClause::Empty);
        }

        let mut axes = Vec::with_capacity(items.len());
        for item in items {
            let Some(axis) = item.axis else {
                return Err(ParseError::UnexpectedToken {
                    expected: "ON <axis>".to_string(),
                    found: "end of axis expression".to_string(),
                    position: item.end,
                });
            };
            axes.push(AxisClause {
                non_empty: item.non_empty,
                expression: item.expression,
                dimension_properties: item.dimension_properties,
                axis,
            });
        }
        Ok(SelectQueryClause::Axes(axes))
    }

    fn dmv_columns(items: Vec<QueryItem>) -> Result<Vec<CompoundId>, ParseError> {
        items
            .into_iter()
            .map(|item| {
                let plain =
                    !item.non_empty && item.axis.is_none() && item.dimension_properties.is_empty();
                match item.expression {
                    Expression::CompoundId(id) if plain => Ok(id),
                    _ => Err(ParseError::Syntax {
                        message: "Schema rowset queries select plain column names".to_string(),
                        position: item.end,
                    }),
                }
            })
            .collect()
    }

    /// `$SYSTEM.<table>` in the `FROM` position.
    fn system_table(&mut self) -> Result<Option<NameObjectIdentifier>, ParseError> {
        let is_system = matches!(
            &self.current_token,
            Token::Identifier(name) if name.eq_ignore_ascii_case("$system")
        );
        if !is_system {
            return Ok(None);
        }
        // `$SYSTEM` alone would be an ordinary cube name, but it is only ever
        // used as the schema-rowset prefix.
        self.advance()?;
        self.expect(Token::Dot)?;
        Ok(Some(self.name_segment()?))
    }

    /// A cube name or a chain of nested sub-selects.
    ///
    /// Each `( SELECT .. FROM` is read on the way in and kept on a stack;
    /// the innermost cube name ends the chain, and every `[WHERE ..] )` is
    /// then read on the way out.
    fn subcube_clause(&mut self) -> Result<SelectSubcubeClause, ParseError> {
        self.keeping_depth(|p| {
            let base = p.depth;
            let mut open = Vec::new();
            while p.check(&Token::LParen) {
                p.descend()?;
                p.advance()?;
                p.expect_keyword(Keyword::Select)?;
                let (asterisk, items) = p.query_items()?;
                open.push(Self::query_clause(asterisk, items)?);
                p.expect_keyword(Keyword::From)?;
            }

            let mut clause = SelectSubcubeClause::Name(p.cube_name()?);
            while let Some(query_clause) = open.pop() {
                p.depth = base + open.len() + 1;
                let where_clause = p.where_clause()?;
                p.expect(Token::RParen)?;
                clause = SelectSubcubeClause::Statement(SubcubeStatement {
                    query_clause,
                    subcube_clause: Box::new(clause),
                    where_clause,
                });
            }
            Ok(clause)
        })
    }

    fn where_clause(&mut self) -> Result<Option<Expression>, ParseError> {
        if !self.check_keyword(Keyword::Where) {
            return Ok(None);
        }
        self.advance()?;
        Ok(Some(self.expression()?))
    }

    fn cell_properties(&mut self) -> Result<Vec<CompoundId>, ParseError> {
        if self.check_keyword(Keyword::Cell) {
            self.advance()?;
            self.expect_keyword(Keyword::Properties)?;
        } else if self.check_keyword(Keyword::Properties) {
            self.advance()?;
        } else {
            return Ok(Vec::new());
        }
        self.compound_id_list()
    }

    fn drillthrough(&mut self) -> Result<DrillthroughStatement, ParseError> {
        self.expect_keyword(Keyword::Drillthrough)?;

        let mut max_rows = None;
        let mut first_row_set = None;
        loop {
            if max_rows.is_none() && self.check_keyword(Keyword::MaxRows) {
                self.advance()?;
                max_rows = Some(self.unsigned_integer("after MAXROWS")?);
            } else if first_row_set.is_none() && self.check_keyword(Keyword::FirstRowSet) {
                self.advance()?;
                first_row_set = Some(self.unsigned_integer("after FIRSTROWSET")?);
            } else {
                break;
            }
        }

        let select = self.select_statement()?;

        let return_items = if self.check_keyword(Keyword::Return) {
            self.advance()?;
            self.compound_id_list()?
        } else {
            Vec::new()
        };

        Ok(DrillthroughStatement {
            max_rows,
            first_row_set,
            select,
            return_items,
        })
    }
}

// ============================================================================
// Convenience functions
// ============================================================================

fn run<T>(
    what: &str,
    text: &str,
    parse: impl FnOnce(&mut Parser) -> Result<T, ParseError>,
) -> Result<T, ParseError> {
    debug!(kind = what, len = text.len(), "parsing MDX");
    let result = Parser::new(Lexer::new(text)).and_then(|mut parser| parse(&mut parser));
    match &result {
        Ok(_) => debug!(kind = what, "parsed MDX"),
        Err(e) => debug!(kind = what, error = %e, "MDX parse failed"),
    }
    result
}

/// Parses a `SELECT` statement.
///
/// # Examples
///
/// ```
/// use mdx_lang::ast::SelectQueryClause;
/// use mdx_lang::parse_select_statement;
///
/// let statement = parse_select_statement("SELECT * FROM [Sales]").unwrap();
/// assert_eq!(statement.query_clause, SelectQueryClause::Asterisk);
/// ```
pub fn parse_select_statement(text: &str) -> Result<SelectStatement, ParseError> {
    run("select", text, |p| p.parse_select_statement())
}

/// Parses a standalone expression, such as a calculated member formula.
///
/// # Examples
///
/// ```
/// use mdx_lang::ast::{CallType, Expression};
/// use mdx_lang::parse_expression;
///
/// let expr = parse_expression("{ [a], [b] }").unwrap();
/// match expr {
///     Expression::Call(call) => {
///         assert_eq!(call.call_type, CallType::Braces);
///         assert_eq!(call.args.len(), 2);
///     }
///     other => panic!("expected braces, got {:?}", other),
/// }
/// ```
pub fn parse_expression(text: &str) -> Result<Expression, ParseError> {
    run("expression", text, |p| p.parse_expression())
}

/// Parses any top-level statement: `SELECT`, `DRILLTHROUGH`, `EXPLAIN PLAN FOR`,
/// or a `$SYSTEM` schema rowset query.
pub fn parse_mdx_statement(text: &str) -> Result<MdxStatement, ParseError> {
    run("statement", text, |p| p.parse_mdx_statement())
}

/// Parses a single cube name, as allowed after `FROM`.
pub fn parse_cube_name(text: &str) -> Result<CubeNameIdentifier, ParseError> {
    run("cube name", text, |p| p.parse_cube_name())
}
