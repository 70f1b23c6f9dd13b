//! Filter predicate trees for livequery
//!
//! A filter is a boolean expression over a table's columns: comparison
//! leaves combined with And/Or/Not. The protocol layer builds an untyped
//! [`FilterNode`] tree; [`FilterNode::compile`] checks it against the
//! target table's column registry and produces a [`CompiledFilter`] that
//! can be evaluated per row.
//!
//! Compilation is the error boundary: unknown columns, literal/column type
//! mismatches, and invalid match patterns all fail before any row is
//! scanned. Evaluation is pure and total — absent data fails every
//! positive comparison and satisfies only not-equals.

mod errors;

pub use errors::{FilterError, FilterResult};

use std::cmp::Ordering;

use regex::Regex;

use crate::column::ColumnRegistry;
use crate::store::StatusStore;
use crate::table::Row;
use crate::value::{Value, ValueType};

/// Comparison operators for filter leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    /// Regex match on string columns; a plain-text pattern behaves as a
    /// substring search
    Matches,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    /// List membership on string-list columns
    Contains,
}

impl CompareOp {
    /// Returns the operator name used in error messages
    pub fn op_name(&self) -> &'static str {
        match self {
            CompareOp::Equal => "=",
            CompareOp::NotEqual => "!=",
            CompareOp::Matches => "~",
            CompareOp::Less => "<",
            CompareOp::LessOrEqual => "<=",
            CompareOp::Greater => ">",
            CompareOp::GreaterOrEqual => ">=",
            CompareOp::Contains => "contains",
        }
    }
}

/// An unvalidated filter tree, as built by the protocol layer.
///
/// And/Or accept any number of children; an empty And matches every row,
/// an empty Or matches none.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Compare {
        column: String,
        op: CompareOp,
        literal: Value,
    },
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Not(Box<FilterNode>),
}

impl FilterNode {
    fn compare(column: impl Into<String>, op: CompareOp, literal: impl Into<Value>) -> Self {
        FilterNode::Compare {
            column: column.into(),
            op,
            literal: literal.into(),
        }
    }

    pub fn eq(column: impl Into<String>, literal: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Equal, literal)
    }

    pub fn ne(column: impl Into<String>, literal: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::NotEqual, literal)
    }

    pub fn matches(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::compare(column, CompareOp::Matches, Value::Str(pattern.into()))
    }

    pub fn lt(column: impl Into<String>, literal: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Less, literal)
    }

    pub fn le(column: impl Into<String>, literal: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::LessOrEqual, literal)
    }

    pub fn gt(column: impl Into<String>, literal: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Greater, literal)
    }

    pub fn ge(column: impl Into<String>, literal: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::GreaterOrEqual, literal)
    }

    pub fn contains(column: impl Into<String>, item: impl Into<String>) -> Self {
        Self::compare(column, CompareOp::Contains, Value::Str(item.into()))
    }

    pub fn and(children: Vec<FilterNode>) -> Self {
        FilterNode::And(children)
    }

    pub fn or(children: Vec<FilterNode>) -> Self {
        FilterNode::Or(children)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: FilterNode) -> Self {
        FilterNode::Not(Box::new(inner))
    }

    /// Validates this tree against a table's registry and produces an
    /// evaluable filter. All construction-time errors surface here, before
    /// any scanning begins.
    pub fn compile(self, registry: &ColumnRegistry) -> FilterResult<CompiledFilter> {
        Ok(CompiledFilter {
            root: compile_node(self, registry)?,
        })
    }
}

/// A leaf comparison with its column resolved and its literal type-checked
#[derive(Debug)]
enum CompiledOp {
    Equal(Value),
    NotEqual(Value),
    Matches(Regex),
    Less(Value),
    LessOrEqual(Value),
    Greater(Value),
    GreaterOrEqual(Value),
    Contains(String),
}

#[derive(Debug)]
enum CompiledNode {
    Compare { column: usize, op: CompiledOp },
    And(Vec<CompiledNode>),
    Or(Vec<CompiledNode>),
    Not(Box<CompiledNode>),
}

/// A filter tree validated against one table's column registry
#[derive(Debug)]
pub struct CompiledFilter {
    root: CompiledNode,
}

impl CompiledFilter {
    /// Evaluates the tree for one row under one snapshot.
    ///
    /// Pure: resolves columns through `registry` and compares; no table
    /// state is touched. And/Or short-circuit left to right.
    pub fn evaluate(&self, registry: &ColumnRegistry, row: &Row, store: &StatusStore) -> bool {
        eval_node(&self.root, registry, row, store)
    }
}

fn eval_node(node: &CompiledNode, registry: &ColumnRegistry, row: &Row, store: &StatusStore) -> bool {
    match node {
        CompiledNode::Compare { column, op } => {
            let actual = registry.get(*column).resolve(row, store);
            match op {
                CompiledOp::Equal(lit) => actual.eq_value(lit),
                // The one negative match: absent data is unequal to every
                // literal, so this passes where Equal fails.
                CompiledOp::NotEqual(lit) => !actual.eq_value(lit),
                CompiledOp::Matches(re) => actual.as_str().map_or(false, |s| re.is_match(s)),
                CompiledOp::Less(lit) => cmp_is(&actual, lit, &[Ordering::Less]),
                CompiledOp::LessOrEqual(lit) => {
                    cmp_is(&actual, lit, &[Ordering::Less, Ordering::Equal])
                }
                CompiledOp::Greater(lit) => cmp_is(&actual, lit, &[Ordering::Greater]),
                CompiledOp::GreaterOrEqual(lit) => {
                    cmp_is(&actual, lit, &[Ordering::Greater, Ordering::Equal])
                }
                CompiledOp::Contains(item) => actual.contains_str(item),
            }
        }
        CompiledNode::And(children) => children
            .iter()
            .all(|child| eval_node(child, registry, row, store)),
        CompiledNode::Or(children) => children
            .iter()
            .any(|child| eval_node(child, registry, row, store)),
        CompiledNode::Not(inner) => !eval_node(inner, registry, row, store),
    }
}

fn cmp_is(actual: &Value, literal: &Value, accepted: &[Ordering]) -> bool {
    actual
        .partial_cmp_value(literal)
        .map_or(false, |ord| accepted.contains(&ord))
}

fn compile_node(node: FilterNode, registry: &ColumnRegistry) -> FilterResult<CompiledNode> {
    match node {
        FilterNode::Compare {
            column,
            op,
            literal,
        } => {
            let index = registry
                .index_of(&column)
                .map_err(|_| FilterError::UnknownColumn {
                    column: column.clone(),
                })?;
            let column_type = registry.get(index).value_type();
            let op = compile_leaf(&column, column_type, op, literal)?;
            Ok(CompiledNode::Compare { column: index, op })
        }
        FilterNode::And(children) => Ok(CompiledNode::And(
            children
                .into_iter()
                .map(|child| compile_node(child, registry))
                .collect::<FilterResult<Vec<_>>>()?,
        )),
        FilterNode::Or(children) => Ok(CompiledNode::Or(
            children
                .into_iter()
                .map(|child| compile_node(child, registry))
                .collect::<FilterResult<Vec<_>>>()?,
        )),
        FilterNode::Not(inner) => Ok(CompiledNode::Not(Box::new(compile_node(
            *inner, registry,
        )?))),
    }
}

/// Type-checks one leaf and pre-compiles its payload.
fn compile_leaf(
    column: &str,
    column_type: ValueType,
    op: CompareOp,
    literal: Value,
) -> FilterResult<CompiledOp> {
    let mismatch = |literal_name: &'static str| FilterError::TypeMismatch {
        column: column.to_string(),
        column_type,
        op: op.op_name(),
        literal: literal_name,
    };
    let literal_name = match literal.type_of() {
        Some(t) => t.as_str(),
        None => return Err(mismatch("absent")),
    };

    match op {
        CompareOp::Equal | CompareOp::NotEqual => {
            if !literal_comparable(column_type, &literal) {
                return Err(mismatch(literal_name));
            }
            Ok(match op {
                CompareOp::Equal => CompiledOp::Equal(literal),
                _ => CompiledOp::NotEqual(literal),
            })
        }
        CompareOp::Less | CompareOp::LessOrEqual | CompareOp::Greater | CompareOp::GreaterOrEqual => {
            if column_type == ValueType::StrList || !literal_comparable(column_type, &literal) {
                return Err(mismatch(literal_name));
            }
            Ok(match op {
                CompareOp::Less => CompiledOp::Less(literal),
                CompareOp::LessOrEqual => CompiledOp::LessOrEqual(literal),
                CompareOp::Greater => CompiledOp::Greater(literal),
                _ => CompiledOp::GreaterOrEqual(literal),
            })
        }
        CompareOp::Matches => match (column_type, literal) {
            (ValueType::Str, Value::Str(pattern)) => {
                let re = Regex::new(&pattern).map_err(|e| FilterError::BadPattern {
                    column: column.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(CompiledOp::Matches(re))
            }
            _ => Err(mismatch(literal_name)),
        },
        CompareOp::Contains => match (column_type, literal) {
            (ValueType::StrList, Value::Str(item)) => Ok(CompiledOp::Contains(item)),
            _ => Err(mismatch(literal_name)),
        },
    }
}

/// Whether a literal of this kind can meet a column of `column_type` under
/// equality or ordering. Mirrors the mixes `Value` comparisons allow.
fn literal_comparable(column_type: ValueType, literal: &Value) -> bool {
    match column_type {
        ValueType::Int | ValueType::Float => {
            matches!(literal, Value::Int(_) | Value::Float(_))
        }
        ValueType::Str => matches!(literal, Value::Str(_)),
        ValueType::StrList => matches!(literal, Value::StrList(_)),
        ValueType::Time => matches!(literal, Value::Time(_) | Value::Int(_)),
    }
}
