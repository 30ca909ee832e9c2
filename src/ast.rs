//! # MDX - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) produced by the MDX
//! parser. Every node is a plain owned value: the parser builds the tree
//! bottom-up and hands the whole thing to the caller, keeping no reference
//! to it afterwards.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens and keywords produced by the lexer
//! - **[identifiers]** - Name, key, and compound identifiers
//! - **[expressions]** - Literals, identifiers, calls, and `CASE`
//! - **[operators]** - Prefix, infix, and postfix operators
//! - **[statements]** - `SELECT`, `DRILLTHROUGH`, `EXPLAIN`, and DMV statements
//!
//! ## Quick Start
//!
//! ```text
//! SELECT {[Measures].[Unit Sales]} ON COLUMNS,
//!        [Product].Children ON ROWS
//! FROM [Sales]
//! WHERE ([Time].[2024])
//! ```
//!
//! ## Core Concepts
//!
//! ### Everything is a call
//!
//! Function calls, methods, properties, operators, set braces, and tuple
//! parentheses all become a [`CallExpression`] whose [`CallType`] records the
//! syntax that was used:
//!
//! ```text
//! a + b            ->  TermInfix   "+"   [a, b]
//! -10.25           ->  TermPrefix  "-"   [10.25]
//! { a }            ->  Braces      "{}"  [a]
//! ( a, b )         ->  Parentheses "()"  [a, b]
//! x.Children       ->  Property    "Children" [x]
//! x.Lag(1)         ->  Method      "Lag" [x, 1]
//! ```
//!
//! A single parenthesised expression is plain grouping and produces no node.
//!
//! ### Identifiers
//!
//! `[Time].&[2024]&[Q1].[Jan]` is one [`CompoundId`] with three segments: a
//! quoted name, a key made of two parts, and another quoted name.
pub mod tokens;
pub mod identifiers;
pub mod expressions;
pub mod operators;
pub mod statements;

pub use tokens::{Keyword, QuoteStyle, Token};
pub use identifiers::{
    CompoundId, CubeNameIdentifier, KeyObjectIdentifier, NameObjectIdentifier, ObjectIdentifier,
    Quoting,
};
pub use expressions::{CallExpression, CallType, CaseExpression, Expression, WhenBranch};
pub use operators::{Associativity, Fixity, Operator};
pub use statements::{
    Axis, AxisClause, CreateMemberBodyClause, CreateSetBodyClause, DmvStatement,
    DrillthroughStatement, ExplainStatement, MdxStatement, MemberPropertyDefinition,
    SelectQueryClause, SelectStatement, SelectSubcubeClause, SelectWithClause, SubcubeStatement,
};
