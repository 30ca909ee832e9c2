use crate::ast::{CompoundId, CubeNameIdentifier, Expression, NameObjectIdentifier};

/// Any top-level MDX statement.
#[derive(Debug, Clone, PartialEq)]
pub enum MdxStatement {
    /// `[WITH ..] SELECT .. FROM ..`
    Select(SelectStatement),

    /// `DRILLTHROUGH [MAXROWS n] [FIRSTROWSET n] SELECT .. [RETURN ..]`
    Drillthrough(DrillthroughStatement),

    /// `EXPLAIN PLAN FOR <statement>`
    Explain(ExplainStatement),

    /// `SELECT .. FROM $SYSTEM.<table>`
    Dmv(DmvStatement),
}

/// Complete `SELECT` query.
///
/// # Example
/// ```text
/// WITH MEMBER [Measures].[Profit] AS [Measures].[Sales] - [Measures].[Cost]
/// SELECT {[Measures].[Profit]} ON COLUMNS
/// FROM [Sales]
/// WHERE ([Time].[2024])
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Calculated members and named sets defined for this query
    pub with_clauses: Vec<SelectWithClause>,

    pub query_clause: SelectQueryClause,

    pub subcube_clause: SelectSubcubeClause,

    /// Slicer
    pub where_clause: Option<Expression>,

    /// Trailing `CELL PROPERTIES` list
    pub cell_properties: Vec<CompoundId>,
}

/// What appears between `SELECT` and `FROM`.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectQueryClause {
    /// `SELECT FROM [cube]`
    Empty,
    /// `SELECT * FROM [cube]`
    Asterisk,
    /// `SELECT expr ON COLUMNS, expr ON ROWS FROM [cube]`
    Axes(Vec<AxisClause>),
}

/// `[NON EMPTY] expr [DIMENSION PROPERTIES ..] ON axis`
#[derive(Debug, Clone, PartialEq)]
pub struct AxisClause {
    pub non_empty: bool,
    pub expression: Expression,
    pub dimension_properties: Vec<CompoundId>,
    pub axis: Axis,
}

/// Target axis of an [`AxisClause`].
///
/// Ordinals 0 to 4 always come back as the named variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Columns,
    Rows,
    Pages,
    Chapters,
    Sections,
    Ordinal(u32),
}

impl Axis {
    pub fn from_ordinal(ordinal: u32) -> Self {
        match ordinal {
            0 => Axis::Columns,
            1 => Axis::Rows,
            2 => Axis::Pages,
            3 => Axis::Chapters,
            4 => Axis::Sections,
            n => Axis::Ordinal(n),
        }
    }

    pub fn ordinal(self) -> u32 {
        match self {
            Axis::Columns => 0,
            Axis::Rows => 1,
            Axis::Pages => 2,
            Axis::Chapters => 3,
            Axis::Sections => 4,
            Axis::Ordinal(n) => n,
        }
    }
}

/// The `FROM` target.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectSubcubeClause {
    /// `FROM [Sales]`
    Name(CubeNameIdentifier),
    /// `FROM (SELECT .. FROM ..)`
    Statement(SubcubeStatement),
}

/// Sub-select used as a subcube.
#[derive(Debug, Clone, PartialEq)]
pub struct SubcubeStatement {
    pub query_clause: SelectQueryClause,
    pub subcube_clause: Box<SelectSubcubeClause>,
    pub where_clause: Option<Expression>,
}

/// One definition in a `WITH` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectWithClause {
    /// `MEMBER name AS expr [, PROP = expr ..]`
    Member(CreateMemberBodyClause),
    /// `SET name AS expr`
    Set(CreateSetBodyClause),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateMemberBodyClause {
    pub name: CompoundId,
    pub expression: Expression,
    pub properties: Vec<MemberPropertyDefinition>,
}

/// `SOLVE_ORDER = 1`, `FORMAT_STRING = "#,##0"`, ...
#[derive(Debug, Clone, PartialEq)]
pub struct MemberPropertyDefinition {
    pub name: NameObjectIdentifier,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSetBodyClause {
    pub name: CompoundId,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrillthroughStatement {
    pub max_rows: Option<u64>,
    pub first_row_set: Option<u64>,
    pub select: SelectStatement,
    pub return_items: Vec<CompoundId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplainStatement {
    pub statement: Box<MdxStatement>,
}

/// Query against a `$SYSTEM` schema rowset.
#[derive(Debug, Clone, PartialEq)]
pub struct DmvStatement {
    /// Empty for `SELECT *`
    pub columns: Vec<CompoundId>,
    pub table: NameObjectIdentifier,
    pub where_clause: Option<Expression>,
}
