//! Documentation content for the mdx CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Identifiers,
    Operators,
    Statements,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" | "lexical" => Some(Self::Syntax),
            "identifiers" | "identifier" | "names" => Some(Self::Identifiers),
            "operators" | "ops" => Some(Self::Operators),
            "statements" | "statement" | "select" => Some(Self::Statements),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"MDX DOCUMENTATION

MDX (Multidimensional Expressions) queries OLAP cubes. A query picks sets of
members for each axis, names the cube, and optionally slices it with a
WHERE tuple.

DOCUMENTATION CATEGORIES

  syntax            Comments, literals, keywords, and reserved words
  identifiers       Bracketed names, member keys, and compound identifiers
  operators         Operator precedence, CASE, CAST, and calls
  statements        SELECT, WITH, sub-selects, DRILLTHROUGH, EXPLAIN, DMV

QUICK REFERENCE

  [Measures].[Sales]          Compound identifier
  [Time].&[2024]              Member by key
  { a, b }                    Set
  ( a, b )                    Tuple
  x.Children  x.Lag(1)        Property and method
  a : b                       Range

Run 'mdx doc <category>' for detailed documentation.
Run 'mdx check "<mdx>"' to validate a query or expression.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Identifiers) => Ok(IDENTIFIERS_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Statements) => Ok(STATEMENTS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Lexical Rules

COMMENTS
  // to end of line
  -- to end of line
  /* block */
    Block comments must be closed before the end of input.

KEYWORDS
  Keywords are case-insensitive: select, SELECT and Select are the same.

  Reserved words cannot be used as bare identifiers. Write them in brackets
  instead, for example [Cube] or [Set]:

    AND AS AXIS CASE CAST CELL CHAPTERS COLUMNS CUBE CURRENTCUBE
    DRILLTHROUGH ELSE EMPTY END EXISTING FROM IN IS MATCHES MEMBER NON
    NOT NULL ON OR PAGES ROWS SECTIONS SELECT SET THEN WHEN WHERE WITH XOR

  Other keywords (DIMENSION, PROPERTIES, EXPLAIN, PLAN, FOR, MAXROWS,
  FIRSTROWSET, RETURN) are also valid identifiers.

NUMBERS
  42   10.25   1e6   10e-5
    Numbers are exact decimals. A leading minus sign is the negation
    operator, not part of the literal: -10.25 is NEGATE(10.25).

STRINGS
  "double quoted"   'single quoted'
    A doubled quote inside a string stands for one quote: "say ""hi""".

NULL
  NULL
    The null literal, in any letter case.
"#;

const IDENTIFIERS_DOC: &str = r#"IDENTIFIERS - Names and Keys

NAMES
  Sales           Unquoted name
  [Unit Sales]    Bracketed name; may contain spaces and punctuation
  [a]]b]          A doubled ] inside brackets stands for one ]

    Constraints:
      - [] is not a valid name
      - Reserved words must be bracketed

COMPOUND IDENTIFIERS
  [Time].[2024].[Q1]
    Dot-separated segments form one identifier.

MEMBER KEYS
  [Time].&[2024]
  [Time].&[2024]&[Q1]
    An ampersand introduces a member key. Adjacent key parts make up a
    composite key and form a single segment.

PROPERTIES AND METHODS
  [Product].Children            Property
  [Time].[2024].Lag(1)          Method; the receiver is the first argument
  [Time].[2024].Lag()           Method with an empty argument
  x.&Caption                    Quoted property
  ([a], [b]).[Caption]          Bracketed property of a non-identifier

CUBE NAMES
  FROM [Sales]
    A cube name is a single segment. [Sales].[Cube] is rejected.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS - Precedence and Forms

PRECEDENCE (loosest first)
  AS                                    Alias
  OR  XOR  :                            Disjunction, range
  AND                                   Conjunction
  NOT                                   Prefix negation
  =  <>  <  >  <=  >=  IS  IN  MATCHES  Comparison
  NOT IN  NOT MATCHES
  IS NULL  IS NOT NULL  IS EMPTY  IS NOT EMPTY
  +  -  ||                              Additive, concatenation
  *  /                                  Multiplicative
  -  +  EXISTING                        Unary prefix

    Operators of equal precedence group to the left:
      a - b - c   is   (a - b) - c

SETS AND TUPLES
  { a, b, c }     Set
  {}              Empty set
  ( a, b )        Tuple
  ( a )           Grouping only

CALLS
  Filter([Customers].Members, [Measures].[Sales] > 0)
  IIf(a, , c)
    Function arguments may be left out; the gap becomes an empty argument.

CASE
  CASE x WHEN 1 THEN "one" WHEN 2 THEN "two" ELSE "many" END
  CASE WHEN a > 0 THEN "pos" ELSE "neg" END

CAST
  CAST(expression AS TYPE)
    TYPE is an identifier such as Integer or String.
"#;

const STATEMENTS_DOC: &str = r##"STATEMENTS - Queries

SELECT
  SELECT
    NON EMPTY {[Measures].[Unit Sales]} ON COLUMNS,
    [Product].Children DIMENSION PROPERTIES [Product].[Name] ON ROWS
  FROM [Sales]
  WHERE ([Time].[2024])
  CELL PROPERTIES VALUE, FORMATTED_VALUE

  Axes: COLUMNS, ROWS, PAGES, CHAPTERS, SECTIONS, a number, or AXIS(n).
  Axis numbers 0 to 4 are the same as the named axes.

  SELECT * FROM [Sales]       All measures
  SELECT FROM [Sales]         Default member only

CALCULATED MEMBERS AND NAMED SETS
  WITH
    MEMBER [Measures].[Profit] AS [Measures].[Sales] - [Measures].[Cost],
      FORMAT_STRING = "#,##0.00", SOLVE_ORDER = 1
    SET [Top10] AS TopCount([Product].Members, 10, [Measures].[Sales])
  SELECT ...

    A formula written as a single-quoted string is parsed as MDX:
      MEMBER [Measures].[X] AS '[Measures].[Sales] * 2'

SUB-SELECTS
  SELECT ... FROM (SELECT {[Time].[2024]} ON COLUMNS FROM [Sales])

DRILLTHROUGH
  DRILLTHROUGH MAXROWS 100 FIRSTROWSET 1
  SELECT ... FROM [Sales]
  RETURN [Measures].[Unit Sales], [Customer].[Name]

EXPLAIN
  EXPLAIN PLAN FOR SELECT ... FROM [Sales]

SCHEMA ROWSETS
  SELECT * FROM $SYSTEM.MDSCHEMA_CUBES WHERE CUBE_NAME = 'Sales'
  SELECT CUBE_NAME, LAST_DATA_UPDATE FROM $SYSTEM.MDSCHEMA_CUBES

A trailing semicolon is allowed after any statement.
"##;
