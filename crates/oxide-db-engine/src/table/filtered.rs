//! Filtered tables.

use oxide_db_core::ast::Expr;

use crate::error::Result;
use crate::row::Row;
use crate::table::{check_predicate, Rows, Table};

/// A read-only view of a source table restricted to rows whose predicate
/// evaluates to TRUE. Columns are the source columns unchanged.
#[derive(Debug)]
pub struct FilteredTable<'a> {
    source: Table<'a>,
    predicate: &'a Expr,
}

impl<'a> FilteredTable<'a> {
    /// Wraps a source table with a predicate.
    #[must_use]
    pub const fn new(source: Table<'a>, predicate: &'a Expr) -> Self {
        Self { source, predicate }
    }

    /// The wrapped source.
    #[must_use]
    pub const fn source(&self) -> &Table<'a> {
        &self.source
    }

    /// The boolean predicate.
    #[must_use]
    pub const fn predicate(&self) -> &'a Expr {
        self.predicate
    }
}

/// Where-clause iterator: advances the inner iterator until the next row
/// satisfies the predicate. Source order is preserved.
#[derive(Debug)]
pub struct FilterRows<'t> {
    inner: Rows<'t>,
    predicate: &'t Expr,
}

impl<'t> FilterRows<'t> {
    pub(crate) const fn new(inner: Rows<'t>, predicate: &'t Expr) -> Self {
        Self { inner, predicate }
    }
}

impl<'t> Iterator for FilterRows<'t> {
    type Item = Result<Row<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = match self.inner.next()? {
                Ok(row) => row,
                Err(e) => return Some(Err(e)),
            };
            match check_predicate(&row, self.predicate) {
                Ok(true) => return Some(Ok(row)),
                Ok(false) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
