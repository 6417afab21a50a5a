//! SQL statement AST types.

use core::fmt;

use super::expression::{Expr, Literal};
use super::types::ColumnDef;

/// A CREATE TABLE statement with explicit column definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateStatement {
    /// Table name.
    pub table: String,
    /// Column definitions, in declaration order.
    pub columns: Vec<ColumnDef>,
}

/// A CREATE TABLE … AS statement; the source is captured unevaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAsStatement {
    /// Table name.
    pub table: String,
    /// Source table expression (table ref, parenthesized SELECT, or JOIN).
    pub source: Expr,
}

/// One value in an INSERT list, positional or named.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertValue {
    /// Target column for the named form; None for positional values.
    pub column: Option<String>,
    /// The literal value.
    pub value: Literal,
}

impl InsertValue {
    /// Creates a positional value.
    #[must_use]
    pub const fn positional(value: Literal) -> Self {
        Self {
            column: None,
            value,
        }
    }

    /// Creates a named value.
    #[must_use]
    pub fn named(column: impl Into<String>, value: Literal) -> Self {
        Self {
            column: Some(column.into()),
            value,
        }
    }
}

/// An INSERT statement: `INSERT (…) TO table`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// Target table name.
    pub table: String,
    /// The values; all named or all positional (the parser rejects mixing).
    pub values: Vec<InsertValue>,
}

impl InsertStatement {
    /// Returns true if the values use the named form.
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.values.iter().any(|v| v.column.is_some())
    }
}

/// One element of a select list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    /// The selected expression (star, column ref, or computed).
    pub expr: Expr,
    /// Column alias.
    pub alias: Option<String>,
}

impl SelectItem {
    /// Creates a select item without an alias.
    #[must_use]
    pub const fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    /// Creates a select item with an alias.
    #[must_use]
    pub fn with_alias(expr: Expr, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: Some(alias.into()),
        }
    }
}

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// The select list.
    pub items: Vec<SelectItem>,
    /// The FROM source in table context.
    pub from: Expr,
    /// The WHERE predicate. The parser always requires one; the field stays
    /// optional so plans over programmatic ASTs can omit the filter step.
    pub where_clause: Option<Expr>,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    /// Target table name.
    pub table: String,
    /// The WHERE predicate.
    pub where_clause: Expr,
}

/// An assignment in UPDATE … SET.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAssignment {
    /// Column name.
    pub column: String,
    /// Value expression.
    pub value: Expr,
}

/// An UPDATE statement. Parsed only; execution reports an unsupported
/// operation.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// Target table name.
    pub table: String,
    /// SET assignments.
    pub assignments: Vec<UpdateAssignment>,
    /// The WHERE predicate.
    pub where_clause: Expr,
}

/// A DROP TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DropStatement {
    /// Table name.
    pub table: String,
}

/// A statement of the dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// CREATE TABLE with column definitions.
    Create(CreateStatement),
    /// CREATE TABLE … AS.
    CreateAs(CreateAsStatement),
    /// INSERT.
    Insert(InsertStatement),
    /// SELECT.
    Select(SelectStatement),
    /// DELETE.
    Delete(DeleteStatement),
    /// UPDATE.
    Update(UpdateStatement),
    /// DROP TABLE.
    Drop(DropStatement),
}

// ===================================================================
// Display implementations
// ===================================================================

impl fmt::Display for CreateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE TABLE {} (", self.table)?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{column}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for CreateAsStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE TABLE {} AS {}", self.table, self.source)
    }
}

impl fmt::Display for InsertValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(column) = &self.column {
            write!(f, "{column} = ")?;
        }
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT (")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, ") TO {}", self.table)
    }
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, " FROM {}", self.from)?;
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DeleteStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM {} WHERE {}", self.table, self.where_clause)
    }
}

impl fmt::Display for UpdateAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.column, self.value)
    }
}

impl fmt::Display for UpdateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UPDATE {} SET ", self.table)?;
        for (i, assignment) in self.assignments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{assignment}")?;
        }
        write!(f, " WHERE {}", self.where_clause)
    }
}

impl fmt::Display for DropStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP TABLE {}", self.table)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create(s) => write!(f, "{s}"),
            Self::CreateAs(s) => write!(f, "{s}"),
            Self::Insert(s) => write!(f, "{s}"),
            Self::Select(s) => write!(f, "{s}"),
            Self::Delete(s) => write!(f, "{s}"),
            Self::Update(s) => write!(f, "{s}"),
            Self::Drop(s) => write!(f, "{s}"),
        }
    }
}
