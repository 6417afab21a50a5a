//! Columns bound to tables.

use oxide_db_core::ast::{ColumnDef, ColumnType, Literal};

use crate::error::{EngineError, Result};

/// A column bound to a table.
///
/// Storage-backed columns carry their owning table's name as a qualifier and
/// may carry constraints and a default. Derived columns (on virtual tables)
/// carry no constraints; pass-through clones keep their origin's qualifier so
/// qualified lookup keeps working across joins.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    ty: ColumnType,
    qualifier: Option<String>,
    key: bool,
    unique: bool,
    autoincrement: bool,
    default: Option<Literal>,
}

impl Column {
    /// Binds a column definition to the named table.
    #[must_use]
    pub fn from_def(def: &ColumnDef, table: &str) -> Self {
        Self {
            name: def.name.clone(),
            ty: def.ty,
            qualifier: Some(table.to_owned()),
            key: def.key,
            unique: def.unique,
            autoincrement: def.autoincrement,
            default: def.default.clone(),
        }
    }

    /// Creates a derived column (no constraints, no qualifier).
    #[must_use]
    pub fn derived(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            qualifier: None,
            key: false,
            unique: false,
            autoincrement: false,
            default: None,
        }
    }

    /// Clones the column, optionally renaming it. The qualifier and
    /// constraints travel with the clone.
    #[must_use]
    pub fn cloned_as(&self, name: Option<&str>) -> Self {
        let mut column = self.clone();
        if let Some(name) = name {
            column.name = name.to_owned();
        }
        column
    }

    /// Clones the column onto a new owning table, replacing the qualifier.
    #[must_use]
    pub fn rebound(&self, table: &str) -> Self {
        let mut column = self.clone();
        column.qualifier = Some(table.to_owned());
        column
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column type.
    #[must_use]
    pub const fn ty(&self) -> ColumnType {
        self.ty
    }

    /// The table name qualified references must use, if any.
    #[must_use]
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// True if the column is part of the table key.
    #[must_use]
    pub const fn is_key(&self) -> bool {
        self.key
    }

    /// True if the column is unique.
    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    /// True if the column auto-increments.
    #[must_use]
    pub const fn is_autoincrement(&self) -> bool {
        self.autoincrement
    }

    /// The default literal, if declared.
    #[must_use]
    pub const fn default(&self) -> Option<&Literal> {
        self.default.as_ref()
    }
}

/// Resolves a column reference against a column list.
///
/// With a qualifier, both qualifier and name must match; a name that exists
/// only under another qualifier is a qualifier mismatch. Without one, the
/// first name match wins — unless `require_qualifier` is set (join tables),
/// in which case unqualified references are rejected outright.
pub(crate) fn resolve_column(
    columns: &[Column],
    qualifier: Option<&str>,
    name: &str,
    require_qualifier: bool,
) -> Result<usize> {
    if require_qualifier && qualifier.is_none() {
        return Err(EngineError::name(format!(
            "column {name} must be qualified with a table name here"
        )));
    }

    let mut name_match = None;
    for (index, column) in columns.iter().enumerate() {
        if column.name() != name {
            continue;
        }
        match qualifier {
            None => return Ok(index),
            Some(q) if column.qualifier() == Some(q) => return Ok(index),
            Some(_) => name_match = Some(column),
        }
    }

    match (qualifier, name_match) {
        (Some(q), Some(column)) => Err(EngineError::name(format!(
            "qualifier mismatch: {q}.{name} does not match {}.{name}",
            column.qualifier().unwrap_or("?")
        ))),
        _ => Err(EngineError::name(format!("column not found: {name}"))),
    }
}
