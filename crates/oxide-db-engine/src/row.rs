//! Rows: cells viewed through a table's column list.

use oxide_db_core::ast::{Expr, Literal};

use crate::column::Column;
use crate::error::{EngineError, Result};
use crate::eval;
use crate::value::{Cell, Value};

/// A cell viewed through a table, for typed access and evaluation.
///
/// Rows are produced by table iterators and live for one pull step; virtual
/// tables materialize a fresh cell per row, storage scans clone the stored
/// one.
#[derive(Debug, Clone)]
pub struct Row<'t> {
    columns: &'t [Column],
    cell: Cell,
    /// Set for join rows: column references must carry a table qualifier.
    requires_qualifier: bool,
}

impl<'t> Row<'t> {
    /// Creates a row over the given columns.
    #[must_use]
    pub fn new(columns: &'t [Column], cell: Cell) -> Self {
        Self {
            columns,
            cell,
            requires_qualifier: false,
        }
    }

    /// Creates a join row; column references must be qualified.
    #[must_use]
    pub fn qualified(columns: &'t [Column], cell: Cell) -> Self {
        Self {
            columns,
            cell,
            requires_qualifier: true,
        }
    }

    /// The columns this row is viewed through.
    #[must_use]
    pub fn columns(&self) -> &'t [Column] {
        self.columns
    }

    /// The underlying cell.
    #[must_use]
    pub const fn cell(&self) -> &Cell {
        &self.cell
    }

    /// Consumes the row, returning its cell.
    #[must_use]
    pub fn into_cell(self) -> Cell {
        self.cell
    }

    /// Returns the slot at `index`.
    #[must_use]
    pub fn value(&self, index: usize) -> &Value {
        self.cell.value(index)
    }

    /// Returns true if the slot at `index` is null.
    #[must_use]
    pub fn is_null(&self, index: usize) -> bool {
        self.cell.is_null(index)
    }

    /// Returns the index of the named column.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Typed access: INT32 slot at `index`.
    ///
    /// # Errors
    ///
    /// Returns a type error if the slot holds anything else.
    pub fn int32(&self, index: usize) -> Result<i32> {
        match self.value(index) {
            Value::Int32(n) => Ok(*n),
            other => Err(type_mismatch("INT32", other)),
        }
    }

    /// Typed access: BOOL slot at `index`.
    ///
    /// # Errors
    ///
    /// Returns a type error if the slot holds anything else.
    pub fn boolean(&self, index: usize) -> Result<bool> {
        match self.value(index) {
            Value::Bool(b) => Ok(*b),
            other => Err(type_mismatch("BOOL", other)),
        }
    }

    /// Typed access: STRING slot at `index`.
    ///
    /// # Errors
    ///
    /// Returns a type error if the slot holds anything else.
    pub fn string(&self, index: usize) -> Result<&str> {
        match self.value(index) {
            Value::Str(s) => Ok(s),
            other => Err(type_mismatch("STRING", other)),
        }
    }

    /// Typed access: BYTES slot at `index`.
    ///
    /// # Errors
    ///
    /// Returns a type error if the slot holds anything else.
    pub fn bytes(&self, index: usize) -> Result<&[u8]> {
        match self.value(index) {
            Value::Bytes(b) => Ok(b),
            other => Err(type_mismatch("BYTES", other)),
        }
    }

    /// Whether column references against this row must be qualified.
    #[must_use]
    pub const fn requires_qualifier(&self) -> bool {
        self.requires_qualifier
    }

    /// Evaluates an expression bound to this row, folding it to a literal.
    ///
    /// # Errors
    ///
    /// Propagates name resolution and type errors from the evaluator.
    pub fn evaluate(&self, expr: &Expr) -> Result<Literal> {
        eval::evaluate(expr, self)
    }
}

fn type_mismatch(expected: &str, found: &Value) -> EngineError {
    EngineError::type_error(format!("expected {expected} slot, found {found:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_db_core::ast::{ColumnDef, ColumnType};

    fn test_row(columns: &[Column]) -> Row<'_> {
        Row::new(
            columns,
            Cell::new(vec![Value::Int32(1), Value::Str(String::from("a")), Value::Null]),
        )
    }

    fn test_columns() -> Vec<Column> {
        vec![
            Column::from_def(&ColumnDef::new("id", ColumnType::Int32), "t"),
            Column::from_def(&ColumnDef::new("login", ColumnType::String(8)), "t"),
            Column::from_def(&ColumnDef::new("note", ColumnType::String(8)), "t"),
        ]
    }

    #[test]
    fn test_typed_access() {
        let columns = test_columns();
        let row = test_row(&columns);
        assert_eq!(row.int32(0).unwrap(), 1);
        assert_eq!(row.string(1).unwrap(), "a");
        assert!(row.int32(1).is_err());
        assert!(row.is_null(2));
    }

    #[test]
    fn test_index_of() {
        let columns = test_columns();
        let row = test_row(&columns);
        assert_eq!(row.index_of("login"), Some(1));
        assert_eq!(row.index_of("missing"), None);
    }

    #[test]
    fn test_evaluate_column_ref() {
        let columns = test_columns();
        let row = test_row(&columns);
        assert_eq!(row.evaluate(&Expr::column("id")).unwrap(), Literal::Int(1));
        // A null slot folds to the NULL literal.
        assert_eq!(row.evaluate(&Expr::column("note")).unwrap(), Literal::Null);
    }
}
