//! Join tables.

use oxide_db_core::ast::{Expr, JoinKind, Literal};

use crate::column::Column;
use crate::error::{EngineError, Result};
use crate::row::Row;
use crate::table::{Rows, Table};

/// A read-only view joining two source tables on a predicate.
///
/// Columns are clones of the left source's then the right source's,
/// keeping their qualifiers; column lookup therefore requires a qualifying
/// table name. Only INNER joins execute.
#[derive(Debug)]
pub struct JoinTable<'a> {
    name: String,
    left: Table<'a>,
    right: Table<'a>,
    on: &'a Expr,
    kind: JoinKind,
    columns: Vec<Column>,
}

impl<'a> JoinTable<'a> {
    /// Builds a join over two sources.
    #[must_use]
    pub fn new(left: Table<'a>, right: Table<'a>, on: &'a Expr, kind: JoinKind) -> Self {
        let name = format!("{}_{}", left.name(), right.name());
        let columns = left
            .columns()
            .iter()
            .chain(right.columns().iter())
            .map(|c| c.cloned_as(None))
            .collect();
        Self {
            name,
            left,
            right,
            on,
            kind,
            columns,
        }
    }

    /// The combined table name (`left_right`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Left then right columns, bound to the join.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The join kind.
    #[must_use]
    pub const fn kind(&self) -> JoinKind {
        self.kind
    }
}

/// Inner-join cursor pair: the right side advances to exhaustion per left
/// row and restarts from a fresh iterator when the left advances. Emission
/// order is therefore lexicographic in (left, right).
#[derive(Debug)]
pub struct InnerJoinRows<'t> {
    table: &'t JoinTable<'t>,
    left: Rows<'t>,
    current_left: Option<Row<'t>>,
    right: Rows<'t>,
}

impl<'t> InnerJoinRows<'t> {
    pub(crate) fn new(table: &'t JoinTable<'t>) -> Result<Self> {
        if table.kind != JoinKind::Inner {
            return Err(EngineError::unsupported(format!(
                "{} is not executable, only INNER JOIN is",
                table.kind.as_str()
            )));
        }
        Ok(Self {
            table,
            left: table.left.rows()?,
            current_left: None,
            right: table.right.rows()?,
        })
    }
}

impl<'t> Iterator for InnerJoinRows<'t> {
    type Item = Result<Row<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_left.is_none() {
                match self.left.next() {
                    None => return None,
                    Some(Err(e)) => return Some(Err(e)),
                    Some(Ok(row)) => {
                        self.current_left = Some(row);
                        self.right = match self.table.right.rows() {
                            Ok(rows) => rows,
                            Err(e) => return Some(Err(e)),
                        };
                    }
                }
            }

            let right_row = match self.right.next() {
                None => {
                    self.current_left = None;
                    continue;
                }
                Some(Err(e)) => return Some(Err(e)),
                Some(Ok(row)) => row,
            };

            let left_row = self
                .current_left
                .as_ref()
                .expect("left row set at loop head");
            let merged = Row::qualified(
                &self.table.columns,
                left_row.cell().concat(right_row.cell()),
            );
            match merged.evaluate(self.table.on) {
                Ok(Literal::Bool(true)) => return Some(Ok(merged)),
                Ok(Literal::Bool(false)) => {}
                Ok(other) => {
                    return Some(Err(EngineError::type_error(format!(
                        "ON predicate must evaluate to BOOL, got {}",
                        other.kind()
                    ))));
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
