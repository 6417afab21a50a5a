//! Evaluated (projection) tables.

use oxide_db_core::ast::{ColumnType, Expr, SelectItem};

use crate::column::Column;
use crate::error::{EngineError, Result};
use crate::eval;
use crate::row::Row;
use crate::table::{Rows, Table};
use crate::value::{Cell, Value};

/// How one output column gets its value.
#[derive(Debug)]
enum Projection<'a> {
    /// Re-read the source slot at this index.
    Pass(usize),
    /// Evaluate the retained expression against the source row.
    Compute(&'a Expr),
}

/// A read-only view projecting a source table through a select list.
///
/// Construction materializes the column list: a bare column reference
/// clones its origin column (the alias renames the clone), a star expands
/// into clones of all source columns, and a general expression requires an
/// alias and gets its type from prediction.
#[derive(Debug)]
pub struct EvaluatedTable<'a> {
    source: Table<'a>,
    columns: Vec<Column>,
    projections: Vec<Projection<'a>>,
}

impl<'a> EvaluatedTable<'a> {
    /// Builds the projection over a source table.
    ///
    /// # Errors
    ///
    /// Returns a name error for unresolvable references and unaliased
    /// computed columns, and a type error for unpredictable expressions.
    pub fn new(source: Table<'a>, items: &'a [SelectItem]) -> Result<Self> {
        let mut columns = Vec::new();
        let mut projections = Vec::new();

        for item in items {
            match &item.expr {
                Expr::Column { .. } => {
                    let index = source.resolve(&item.expr)?;
                    columns.push(source.columns()[index].cloned_as(item.alias.as_deref()));
                    projections.push(Projection::Pass(index));
                }
                Expr::Star { table } => {
                    let mut expanded = false;
                    for (index, column) in source.columns().iter().enumerate() {
                        if let Some(qualifier) = table {
                            if column.qualifier() != Some(qualifier.as_str()) {
                                continue;
                            }
                        }
                        columns.push(column.cloned_as(None));
                        projections.push(Projection::Pass(index));
                        expanded = true;
                    }
                    if !expanded {
                        return Err(EngineError::name(format!(
                            "star qualifier matches no columns: {}",
                            table.as_deref().unwrap_or("*")
                        )));
                    }
                }
                expr => {
                    let Some(alias) = &item.alias else {
                        return Err(EngineError::name(format!(
                            "computed select column needs an alias: {expr}"
                        )));
                    };
                    let ty = eval::predict_type(
                        expr,
                        source.columns(),
                        source.requires_qualifier(),
                    )?;
                    if ty == ColumnType::Unknown {
                        return Err(EngineError::type_error(format!(
                            "cannot derive a column type from {expr}"
                        )));
                    }
                    columns.push(Column::derived(alias.clone(), ty));
                    projections.push(Projection::Compute(expr));
                }
            }
        }

        Ok(Self {
            source,
            columns,
            projections,
        })
    }

    /// The wrapped source.
    #[must_use]
    pub const fn source(&self) -> &Table<'a> {
        &self.source
    }

    /// The materialized output columns.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}

/// Projection iterator: builds a fresh cell per source row by re-reading
/// origin slots and evaluating retained expressions.
#[derive(Debug)]
pub struct EvalRows<'t> {
    table: &'t EvaluatedTable<'t>,
    inner: Rows<'t>,
}

impl<'t> EvalRows<'t> {
    pub(crate) const fn new(table: &'t EvaluatedTable<'t>, inner: Rows<'t>) -> Self {
        Self { table, inner }
    }

    fn project(&self, source: &Row<'t>) -> Result<Row<'t>> {
        let mut values = Vec::with_capacity(self.table.projections.len());
        for projection in &self.table.projections {
            let value = match projection {
                Projection::Pass(index) => source.value(*index).clone(),
                Projection::Compute(expr) => Value::from(&source.evaluate(expr)?),
            };
            values.push(value);
        }
        Ok(Row::new(&self.table.columns, Cell::new(values)))
    }
}

impl<'t> Iterator for EvalRows<'t> {
    type Item = Result<Row<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        let source = match self.inner.next()? {
            Ok(row) => row,
            Err(e) => return Some(Err(e)),
        };
        Some(self.project(&source))
    }
}
