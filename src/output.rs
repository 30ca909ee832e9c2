//! JSON rendering of parsed MDX.
//!
//! The syntax tree is turned into a [`serde_json::Value`] so callers can
//! inspect or store it without depending on the AST types. Output is
//! deterministic: object keys are sorted.
//!
//! # Shapes
//!
//! - Literals become `{"type": "numeric" | "string" | "symbol" | "null", "value": ..}`.
//!   Numbers are written as strings so no precision is lost.
//! - Identifiers become `{"type": "identifier", "segments": [..]}`, where a
//!   segment is `{"name", "quoted"}` or `{"key": [{"name", "quoted"}, ..]}`.
//! - Calls become `{"type": "call", "call_type", "name", "args"}`.
//!
//! # Examples
//!
//! ```
//! use mdx_lang::output::{expression_to_json, to_json_string};
//! use mdx_lang::parse_expression;
//!
//! let expr = parse_expression("1 + 2").unwrap();
//! let json = expression_to_json(&expr);
//! assert_eq!(json["type"], "call");
//! assert_eq!(json["name"], "+");
//! assert_eq!(json["args"][0]["value"], "1");
//!
//! assert!(to_json_string(&json, false).starts_with('{'));
//! ```

use serde_json::{Map, Value, json};

use crate::ast::{
    Axis, AxisClause, CallExpression, CallType, CaseExpression, CompoundId, CubeNameIdentifier,
    Expression, MdxStatement, NameObjectIdentifier, ObjectIdentifier, Quoting, SelectQueryClause,
    SelectStatement, SelectSubcubeClause, SelectWithClause,
};

/// Compact JSON for a statement.
pub fn to_json(statement: &MdxStatement) -> String {
    to_json_string(&statement_to_json(statement), false)
}

/// Indented JSON for a statement.
pub fn to_json_pretty(statement: &MdxStatement) -> String {
    to_json_string(&statement_to_json(statement), true)
}

pub fn to_json_string(value: &Value, pretty: bool) -> String {
    // Serializing a Value with string keys cannot fail
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.unwrap_or_default()
}

pub fn statement_to_json(statement: &MdxStatement) -> Value {
    match statement {
        MdxStatement::Explain(explain) => json!({
            "type": "explain",
            "statement": statement_to_json(&explain.statement),
        }),
        other => query_statement_to_json(other),
    }
}

fn query_statement_to_json(statement: &MdxStatement) -> Value {
    match statement {
        MdxStatement::Explain(_) => statement_to_json(statement),
        MdxStatement::Select(select) => select_to_json(select),
        MdxStatement::Drillthrough(drillthrough) => json!({
            "type": "drillthrough",
            "max_rows": drillthrough.max_rows,
            "first_row_set": drillthrough.first_row_set,
            "select": select_to_json(&drillthrough.select),
            "return": ids_to_json(&drillthrough.return_items),
        }),
        MdxStatement::Dmv(dmv) => json!({
            "type": "dmv",
            "columns": ids_to_json(&dmv.columns),
            "table": name_to_json(&dmv.table),
            "where": optional(dmv.where_clause.as_ref()),
        }),
    }
}

pub fn select_to_json(select: &SelectStatement) -> Value {
    let with: Vec<Value> = select
        .with_clauses
        .iter()
        .map(|clause| match clause {
            SelectWithClause::Member(member) => json!({
                "member": compound_id_to_json(&member.name),
                "expression": expression_to_json(&member.expression),
                "properties": member
                    .properties
                    .iter()
                    .map(|p| json!({
                        "name": name_to_json(&p.name),
                        "value": expression_to_json(&p.value),
                    }))
                    .collect::<Vec<_>>(),
            }),
            SelectWithClause::Set(set) => json!({
                "set": compound_id_to_json(&set.name),
                "expression": expression_to_json(&set.expression),
            }),
        })
        .collect();

    json!({
        "type": "select",
        "with": with,
        "query": query_to_json(&select.query_clause),
        "from": subcube_to_json(&select.subcube_clause),
        "where": optional(select.where_clause.as_ref()),
        "cell_properties": ids_to_json(&select.cell_properties),
    })
}

fn query_to_json(query: &SelectQueryClause) -> Value {
    match query {
        SelectQueryClause::Empty => Value::Null,
        SelectQueryClause::Asterisk => Value::from("*"),
        SelectQueryClause::Axes(axes) => axes.iter().map(axis_to_json).collect(),
    }
}

fn axis_to_json(clause: &AxisClause) -> Value {
    let axis = match clause.axis {
        Axis::Columns => Value::from("COLUMNS"),
        Axis::Rows => Value::from("ROWS"),
        Axis::Pages => Value::from("PAGES"),
        Axis::Chapters => Value::from("CHAPTERS"),
        Axis::Sections => Value::from("SECTIONS"),
        Axis::Ordinal(n) => Value::from(n),
    };
    json!({
        "axis": axis,
        "non_empty": clause.non_empty,
        "expression": expression_to_json(&clause.expression),
        "dimension_properties": ids_to_json(&clause.dimension_properties),
    })
}

fn subcube_to_json(subcube: &SelectSubcubeClause) -> Value {
    match subcube {
        SelectSubcubeClause::Name(cube) => json!({ "cube": cube_to_json(cube) }),
        SelectSubcubeClause::Statement(statement) => json!({
            "select": {
                "query": query_to_json(&statement.query_clause),
                "from": subcube_to_json(&statement.subcube_clause),
                "where": optional(statement.where_clause.as_ref()),
            }
        }),
    }
}

fn cube_to_json(cube: &CubeNameIdentifier) -> Value {
    json!({
        "name": cube.name,
        "quoted": cube.quoting == Quoting::Quoted,
    })
}

fn name_to_json(name: &NameObjectIdentifier) -> Value {
    json!({
        "name": name.name,
        "quoted": name.quoting == Quoting::Quoted,
    })
}

pub fn compound_id_to_json(id: &CompoundId) -> Value {
    let segments: Vec<Value> = id
        .segments()
        .iter()
        .map(|segment| match segment {
            ObjectIdentifier::Name(name) => name_to_json(name),
            ObjectIdentifier::Key(key) => json!({
                "key": key.parts.iter().map(name_to_json).collect::<Vec<_>>(),
            }),
        })
        .collect();
    json!({ "type": "identifier", "segments": segments })
}

fn ids_to_json(ids: &[CompoundId]) -> Value {
    ids.iter().map(compound_id_to_json).collect()
}

fn optional(expr: Option<&Expression>) -> Value {
    expr.map(expression_to_json).unwrap_or(Value::Null)
}

fn call_type_name(call_type: CallType) -> &'static str {
    match call_type {
        CallType::Function => "function",
        CallType::Method => "method",
        CallType::Property => "property",
        CallType::PropertyQuoted => "property_quoted",
        CallType::PropertyAmpersAndQuoted => "property_ampers_and_quoted",
        CallType::TermInfix => "infix",
        CallType::TermPrefix => "prefix",
        CallType::TermPostfix => "postfix",
        CallType::Braces => "braces",
        CallType::Parentheses => "parentheses",
        CallType::Cast => "cast",
        CallType::TermCase => "case",
        CallType::Empty => "empty",
    }
}

pub fn expression_to_json(expr: &Expression) -> Value {
    // Leaf shapes live in their own function to keep this recursive frame small
    match expr {
        Expression::Call(call) => call_to_json(call),
        Expression::Case(case) => case_to_json(case),
        leaf => leaf_to_json(leaf),
    }
}

fn leaf_to_json(expr: &Expression) -> Value {
    match expr {
        Expression::NumericLiteral(n) => json!({ "type": "numeric", "value": n.to_string() }),
        Expression::StringLiteral(s) => json!({ "type": "string", "value": s }),
        Expression::SymbolLiteral(s) => json!({ "type": "symbol", "value": s }),
        Expression::NullLiteral => json!({ "type": "null" }),
        Expression::CompoundId(id) => compound_id_to_json(id),
        Expression::Call(call) => call_to_json(call),
        Expression::Case(case) => case_to_json(case),
    }
}

fn call_to_json(call: &CallExpression) -> Value {
    let args: Vec<Value> = call.args.iter().map(expression_to_json).collect();
    json!({
        "type": "call",
        "call_type": call_type_name(call.call_type),
        "name": call.name,
        "args": args,
    })
}

fn case_to_json(case: &CaseExpression) -> Value {
    let mut object = Map::new();
    object.insert("type".to_string(), Value::from("case"));
    object.insert("operand".to_string(), optional(case.operand.as_deref()));
    object.insert(
        "branches".to_string(),
        case.branches
            .iter()
            .map(|branch| {
                json!({
                    "when": expression_to_json(&branch.condition),
                    "then": expression_to_json(&branch.result),
                })
            })
            .collect(),
    );
    object.insert("else".to_string(), optional(case.else_result.as_deref()));
    Value::Object(object)
}
