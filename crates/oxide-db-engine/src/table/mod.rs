//! The table algebra.
//!
//! One tagged union covers the four table variants — storage, filtered,
//! evaluated, join — with a single pull-based row iterator, instead of a
//! class hierarchy with virtual dispatch. Virtual tables borrow their
//! sources and live for one query execution; iterators borrow the tables
//! they scan, so mutation while a scan is live is a compile error.

mod evaluated;
mod filtered;
mod join;
mod storage;

pub use evaluated::{EvalRows, EvaluatedTable};
pub use filtered::{FilterRows, FilteredTable};
pub use join::{InnerJoinRows, JoinTable};
pub use storage::{ScanRows, StorageTable};

use oxide_db_core::ast::Expr;

use crate::column::{resolve_column, Column};
use crate::error::{EngineError, Result};
use crate::row::Row;

/// A table of the algebra.
#[derive(Debug)]
pub enum Table<'a> {
    /// A catalog table.
    Storage(&'a StorageTable),
    /// A source filtered by a boolean predicate.
    Filtered(Box<FilteredTable<'a>>),
    /// A source projected through a list of expressions.
    Evaluated(Box<EvaluatedTable<'a>>),
    /// Two sources joined on a predicate.
    Join(Box<JoinTable<'a>>),
}

impl<'a> Table<'a> {
    /// The table's name. Virtual tables answer with their source's name;
    /// joins combine both sources.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Storage(table) => table.name(),
            Self::Filtered(table) => table.source().name(),
            Self::Evaluated(table) => table.source().name(),
            Self::Join(table) => table.name(),
        }
    }

    /// The ordered column list.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        match self {
            Self::Storage(table) => table.columns(),
            Self::Filtered(table) => table.source().columns(),
            Self::Evaluated(table) => table.columns(),
            Self::Join(table) => table.columns(),
        }
    }

    /// Whether column references must carry a table qualifier (joins).
    #[must_use]
    pub fn requires_qualifier(&self) -> bool {
        match self {
            Self::Join(_) => true,
            Self::Filtered(table) => table.source().requires_qualifier(),
            Self::Storage(_) | Self::Evaluated(_) => false,
        }
    }

    /// Resolves a column-reference expression to a column index.
    ///
    /// # Errors
    ///
    /// Returns a name error for unknown columns, qualifier mismatches, and
    /// unqualified references against a join.
    pub fn resolve(&self, expr: &Expr) -> Result<usize> {
        match expr {
            Expr::Column { table, name } => resolve_column(
                self.columns(),
                table.as_deref(),
                name,
                self.requires_qualifier(),
            ),
            other => Err(EngineError::type_error(format!(
                "not a column reference: {other}"
            ))),
        }
    }

    /// Returns a fresh pull-based row iterator over the table.
    ///
    /// Iterators are not restartable; request a new one to rescan (the
    /// inner join does this internally for its right side).
    ///
    /// # Errors
    ///
    /// Returns an unsupported-operation error for join kinds other than
    /// INNER.
    pub fn rows(&self) -> Result<Rows<'_>> {
        match self {
            Self::Storage(table) => Ok(Rows::Scan(table.scan())),
            Self::Filtered(table) => Ok(Rows::Filter(Box::new(FilterRows::new(
                table.source().rows()?,
                table.predicate(),
            )))),
            Self::Evaluated(table) => Ok(Rows::Eval(Box::new(EvalRows::new(
                table,
                table.source().rows()?,
            )))),
            Self::Join(table) => Ok(Rows::Join(Box::new(InnerJoinRows::new(table)?))),
        }
    }
}

/// A pull-based row iterator over a table.
#[derive(Debug)]
pub enum Rows<'t> {
    /// Storage scan in key order.
    Scan(ScanRows<'t>),
    /// Where-clause iterator skipping non-matching rows.
    Filter(Box<FilterRows<'t>>),
    /// Projection iterator materializing a fresh cell per row.
    Eval(Box<EvalRows<'t>>),
    /// Inner-join cursor pair.
    Join(Box<InnerJoinRows<'t>>),
}

impl<'t> Iterator for Rows<'t> {
    type Item = Result<Row<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Scan(rows) => rows.next(),
            Self::Filter(rows) => rows.next(),
            Self::Eval(rows) => rows.next(),
            Self::Join(rows) => rows.next(),
        }
    }
}

/// Folds a predicate against a row, demanding a BOOL literal result.
pub(crate) fn check_predicate(row: &Row<'_>, predicate: &Expr) -> Result<bool> {
    match row.evaluate(predicate)? {
        oxide_db_core::ast::Literal::Bool(b) => Ok(b),
        other => Err(EngineError::type_error(format!(
            "predicate must evaluate to BOOL, got {}",
            other.kind()
        ))),
    }
}
