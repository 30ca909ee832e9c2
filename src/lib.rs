//! Parser for the MDX (Multidimensional Expressions) query language.
//!
//! Text goes through the [`Lexer`] into the [`Parser`], which produces the
//! immutable syntax tree in [`ast`]. Parsing never recurses on input
//! structure, so hostile or machine-generated queries cannot exhaust the
//! stack; nesting is bounded by [`ParseOptions`] instead.
//!
//! ```
//! use mdx_lang::ast::{Axis, SelectQueryClause};
//!
//! let statement = mdx_lang::parse_select_statement(
//!     "SELECT {[Measures].[Unit Sales]} ON COLUMNS FROM [Sales]",
//! )
//! .unwrap();
//!
//! match &statement.query_clause {
//!     SelectQueryClause::Axes(axes) => assert_eq!(axes[0].axis, Axis::Columns),
//!     other => panic!("unexpected query clause {:?}", other),
//! }
//! ```

pub mod ast;
pub mod cli;
pub mod grammar;
pub mod lexer;
pub mod output;
pub mod parser;

pub use ast::{CallExpression, CallType, CompoundId, Expression, MdxStatement, SelectStatement, Token};
pub use lexer::{LexError, Lexer, Position, tokenize};
pub use output::{expression_to_json, to_json, to_json_pretty};
pub use parser::{
    ParseError, ParseOptions, Parser, parse_cube_name, parse_expression, parse_mdx_statement,
    parse_select_statement,
};
