//! Catalog tables backed by ordered storage.

use oxide_db_core::ast::{
    CreateStatement, Expr, InsertStatement, Literal, UpdateStatement,
};

use crate::column::Column;
use crate::error::{EngineError, Result};
use crate::row::Row;
use crate::storage::{CellIter, Storage};
use crate::table::check_predicate;
use crate::value::{Cell, Value};

/// A mutable table owning its storage and column list.
#[derive(Debug)]
pub struct StorageTable {
    name: String,
    columns: Vec<Column>,
    storage: Storage,
}

impl StorageTable {
    /// Creates an empty table from a CREATE statement.
    ///
    /// # Errors
    ///
    /// Returns a name error on duplicate column names.
    pub fn create(stmt: &CreateStatement) -> Result<Self> {
        let columns: Vec<Column> = stmt
            .columns
            .iter()
            .map(|def| Column::from_def(def, &stmt.table))
            .collect();
        Self::from_columns(&stmt.table, columns)
    }

    /// Creates an empty table from pre-built columns (CREATE … AS); the
    /// columns are rebound to the new table's name.
    ///
    /// # Errors
    ///
    /// Returns a name error on duplicate column names.
    pub fn from_columns(name: &str, columns: Vec<Column>) -> Result<Self> {
        let columns: Vec<Column> = columns.iter().map(|c| c.rebound(name)).collect();
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name() == column.name()) {
                return Err(EngineError::name(format!(
                    "duplicate column {} in table {name}",
                    column.name()
                )));
            }
        }
        let key_columns = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_key())
            .map(|(i, _)| i)
            .collect();
        Ok(Self {
            name: name.to_owned(),
            columns,
            storage: Storage::new(key_columns),
        })
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered column list.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// True if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// The backing storage.
    #[must_use]
    pub const fn storage(&self) -> &Storage {
        &self.storage
    }

    pub(crate) fn scan(&self) -> ScanRows<'_> {
        ScanRows {
            columns: &self.columns,
            inner: self.storage.iter(),
        }
    }

    /// Inserts a row from an INSERT statement.
    ///
    /// The candidate cell is built column by column: the named (or
    /// positional) value if present, else the default, else the next
    /// autoincrement value, else NULL. UNIQUE and KEY columns are scanned
    /// for duplicate non-null values before the set insert installs the
    /// cell.
    ///
    /// # Errors
    ///
    /// Returns type errors for wrong literal kinds, name errors for unknown
    /// columns, and constraint violations for duplicates.
    pub fn insert(&mut self, stmt: &InsertStatement) -> Result<()> {
        let cell = if stmt.is_named() {
            self.build_named_cell(stmt)?
        } else {
            self.build_positional_cell(stmt)?
        };
        self.check_unique(&cell)?;
        self.storage.insert(cell)
    }

    /// Installs a pre-built cell while seeding (CREATE … AS). Only the set
    /// key guard applies; the per-column UNIQUE scan does not, since cloned
    /// UNIQUE flags would reject legitimate join output.
    ///
    /// # Errors
    ///
    /// Returns a constraint violation on a duplicate key.
    pub(crate) fn seed_cell(&mut self, cell: Cell) -> Result<()> {
        if cell.len() != self.columns.len() {
            return Err(EngineError::Internal(format!(
                "cell width {} does not match table {} width {}",
                cell.len(),
                self.name,
                self.columns.len()
            )));
        }
        self.storage.insert(cell)
    }

    fn build_named_cell(&self, stmt: &InsertStatement) -> Result<Cell> {
        for value in &stmt.values {
            let Some(column) = &value.column else {
                return Err(EngineError::Internal(String::from(
                    "mixed insert forms past the parser",
                )));
            };
            if !self.columns.iter().any(|c| c.name() == *column) {
                return Err(EngineError::name(format!(
                    "column not found: {column} in table {}",
                    self.name
                )));
            }
            if stmt
                .values
                .iter()
                .filter(|v| v.column.as_deref() == Some(column.as_str()))
                .count()
                > 1
            {
                return Err(EngineError::name(format!(
                    "column {column} named twice in insert"
                )));
            }
        }

        let mut values = Vec::with_capacity(self.columns.len());
        for (index, column) in self.columns.iter().enumerate() {
            let named = stmt
                .values
                .iter()
                .find(|v| v.column.as_deref() == Some(column.name()));
            let value = match named {
                Some(v) => coerce(column, &v.value)?,
                None => self.missing_value(index)?,
            };
            values.push(value);
        }
        Ok(Cell::new(values))
    }

    fn build_positional_cell(&self, stmt: &InsertStatement) -> Result<Cell> {
        if stmt.values.len() > self.columns.len() {
            return Err(EngineError::type_error(format!(
                "{} values for {} columns of table {}",
                stmt.values.len(),
                self.columns.len(),
                self.name
            )));
        }
        let mut values = Vec::with_capacity(self.columns.len());
        for (i, column) in self.columns.iter().enumerate() {
            let value = match stmt.values.get(i) {
                Some(v) => coerce(column, &v.value)?,
                None => self.missing_value(i)?,
            };
            values.push(value);
        }
        Ok(Cell::new(values))
    }

    /// The value of a column no insert value was supplied for.
    fn missing_value(&self, index: usize) -> Result<Value> {
        let column = &self.columns[index];
        if let Some(default) = column.default() {
            return coerce(column, default);
        }
        if column.is_autoincrement() {
            return Ok(Value::Int32(self.autoincrement_next(index)));
        }
        Ok(Value::Null)
    }

    /// Max existing value plus one; the first generated id is 1.
    fn autoincrement_next(&self, index: usize) -> i32 {
        let mut max = 0;
        for cell in self.storage.iter() {
            if let Value::Int32(n) = cell.value(index) {
                if *n > max {
                    max = *n;
                }
            }
        }
        max + 1
    }

    /// Scans every UNIQUE or KEY column for a duplicate of the candidate's
    /// non-null value.
    fn check_unique(&self, candidate: &Cell) -> Result<()> {
        let guarded: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_unique() || c.is_key())
            .map(|(i, _)| i)
            .collect();
        if guarded.is_empty() {
            return Ok(());
        }

        for cell in self.storage.iter() {
            for &index in &guarded {
                let new = candidate.value(index);
                if new.is_null() || cell.value(index).is_null() {
                    continue;
                }
                if cell.value(index) == new {
                    tracing::trace!(
                        table = %self.name,
                        column = %self.columns[index].name(),
                        "rejecting duplicate value"
                    );
                    return Err(EngineError::constraint(format!(
                        "duplicate value in column {} of table {}",
                        self.columns[index].name(),
                        self.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Deletes every row whose predicate evaluates to TRUE; returns the
    /// number of removed rows.
    ///
    /// # Errors
    ///
    /// Returns a type error if the predicate does not fold to a BOOL
    /// literal.
    pub fn delete_where(&mut self, predicate: &Expr) -> Result<usize> {
        let mut doomed = Vec::new();
        for (key, cell) in self.storage.entries() {
            let row = Row::new(&self.columns, cell.clone());
            if check_predicate(&row, predicate)? {
                doomed.push(key.clone());
            }
        }
        for key in &doomed {
            self.storage.remove(key);
        }
        Ok(doomed.len())
    }

    /// UPDATE is parsed but not executable.
    ///
    /// # Errors
    ///
    /// Always returns an unsupported-operation error.
    pub fn update(&mut self, _stmt: &UpdateStatement) -> Result<()> {
        Err(EngineError::unsupported(format!(
            "UPDATE is not executable (table {})",
            self.name
        )))
    }
}

/// Checks an insert or default literal against a column and produces the
/// stored value. A STRING literal feeds a BYTES column by copying exactly
/// the declared length (zero-padded, truncated); BYTES values are
/// normalized to the declared width the same way.
fn coerce(column: &Column, literal: &Literal) -> Result<Value> {
    use oxide_db_core::ast::ColumnType;

    match (literal, column.ty()) {
        (Literal::Null, _) => Ok(Value::Null),
        (Literal::Int(n), ColumnType::Int32) => Ok(Value::Int32(*n)),
        (Literal::Bool(b), ColumnType::Bool) => Ok(Value::Bool(*b)),
        (Literal::String(s), ColumnType::String(n)) => {
            if s.len() > n as usize {
                return Err(EngineError::type_error(format!(
                    "value of length {} too long for column {}: {}",
                    s.len(),
                    column.name(),
                    column.ty()
                )));
            }
            Ok(Value::Str(s.clone()))
        }
        (Literal::String(s), ColumnType::Bytes(n)) => Ok(Value::Bytes(fit(s.as_bytes(), n))),
        (Literal::Bytes(b), ColumnType::Bytes(n)) => Ok(Value::Bytes(fit(b, n))),
        (literal, ty) => Err(EngineError::type_error(format!(
            "wrong literal kind {} for column {}: {ty}",
            literal.kind(),
            column.name()
        ))),
    }
}

/// Copies exactly `n` bytes: zero-pads short input, truncates long input.
fn fit(source: &[u8], n: u32) -> Vec<u8> {
    let n = n as usize;
    let mut out = vec![0u8; n];
    let take = source.len().min(n);
    out[..take].copy_from_slice(&source[..take]);
    out
}

/// Storage scan yielding rows in key order.
#[derive(Debug)]
pub struct ScanRows<'t> {
    pub(crate) columns: &'t [Column],
    pub(crate) inner: CellIter<'t>,
}

impl<'t> Iterator for ScanRows<'t> {
    type Item = Result<Row<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|cell| Ok(Row::new(self.columns, cell.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_db_core::ast::Statement;
    use oxide_db_core::Parser;

    fn parse(sql: &str) -> Statement {
        Parser::new(sql).parse_statement().unwrap()
    }

    fn users_table() -> StorageTable {
        let Statement::Create(create) = parse(
            "create table t ({key, autoincrement} id: int32, {unique} login: string[8], is_admin: bool = false)",
        ) else {
            panic!("expected CREATE");
        };
        StorageTable::create(&create).unwrap()
    }

    fn insert(table: &mut StorageTable, sql: &str) -> Result<()> {
        let Statement::Insert(stmt) = parse(sql) else {
            panic!("expected INSERT");
        };
        table.insert(&stmt)
    }

    #[test]
    fn test_autoincrement_and_default() {
        let mut table = users_table();
        insert(&mut table, "insert (login = \"a\") to t").unwrap();
        insert(&mut table, "insert (login = \"b\") to t").unwrap();

        let rows: Vec<Cell> = table
            .scan()
            .map(|r| r.unwrap().into_cell())
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value(0), &Value::Int32(1));
        assert_eq!(rows[1].value(0), &Value::Int32(2));
        assert_eq!(rows[0].value(2), &Value::Bool(false));
    }

    #[test]
    fn test_duplicate_unique_rejected_and_table_unchanged() {
        let mut table = users_table();
        insert(&mut table, "insert (login = \"a\") to t").unwrap();
        insert(&mut table, "insert (login = \"b\") to t").unwrap();
        let err = insert(&mut table, "insert (login = \"a\") to t").unwrap_err();
        assert!(matches!(err, EngineError::Constraint(_)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_explicit_id_feeds_key_guard() {
        let mut table = users_table();
        insert(&mut table, "insert (id = 7, login = \"a\") to t").unwrap();
        let err = insert(&mut table, "insert (id = 7, login = \"b\") to t").unwrap_err();
        assert!(matches!(err, EngineError::Constraint(_)));
        // Autoincrement continues past the explicit value.
        insert(&mut table, "insert (login = \"c\") to t").unwrap();
        let ids: Vec<Value> = table
            .scan()
            .map(|r| r.unwrap().value(0).clone())
            .collect();
        assert_eq!(ids, vec![Value::Int32(7), Value::Int32(8)]);
    }

    #[test]
    fn test_positional_insert_fills_trailing_defaults() {
        let mut table = users_table();
        insert(&mut table, "insert (5, \"e\") to t").unwrap();
        let row = table.scan().next().unwrap().unwrap();
        assert_eq!(row.value(2), &Value::Bool(false));
        assert!(insert(&mut table, "insert (1, \"x\", true, 9) to t").is_err());
    }

    #[test]
    fn test_unknown_named_column_rejected() {
        let mut table = users_table();
        let err = insert(&mut table, "insert (nope = 1) to t").unwrap_err();
        assert!(matches!(err, EngineError::Name(_)));
    }

    #[test]
    fn test_wrong_literal_kind_rejected() {
        let mut table = users_table();
        let err = insert(&mut table, "insert (login = 5) to t").unwrap_err();
        assert!(matches!(err, EngineError::Type(_)));
    }

    #[test]
    fn test_over_length_string_rejected() {
        let mut table = users_table();
        let err = insert(&mut table, "insert (login = \"waytoolongvalue\") to t").unwrap_err();
        assert!(matches!(err, EngineError::Type(_)));
    }

    #[test]
    fn test_bytes_fixed_width() {
        let Statement::Create(create) =
            parse("create table h (hash: bytes[4] = \"ab\")")
        else {
            panic!("expected CREATE");
        };
        let mut table = StorageTable::create(&create).unwrap();
        // Default: "ab" zero-padded to 4 bytes.
        insert(&mut table, "insert () to h").unwrap();
        // Hex literal: 0x0102 zero-padded to 4 bytes.
        insert(&mut table, "insert (hash = 0x0102) to h").unwrap();
        let cells: Vec<Cell> = table.scan().map(|r| r.unwrap().into_cell()).collect();
        assert_eq!(cells[0].value(0), &Value::Bytes(vec![b'a', b'b', 0, 0]));
        assert_eq!(cells[1].value(0), &Value::Bytes(vec![0x02, 0x01, 0, 0]));
    }

    #[test]
    fn test_delete_where() {
        let mut table = users_table();
        for login in ["a", "b", "c"] {
            insert(&mut table, &format!("insert (login = \"{login}\") to t")).unwrap();
        }
        let predicate = Parser::new("id % 2 = 1").parse_expression(0).unwrap();
        let removed = table.delete_where(&predicate).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(table.len(), 1);

        let non_bool = Parser::new("id + 1").parse_expression(0).unwrap();
        assert!(matches!(
            table.delete_where(&non_bool),
            Err(EngineError::Type(_))
        ));
    }

    #[test]
    fn test_update_is_unsupported() {
        let Statement::Update(update) = parse("update t set login = \"x\" where true") else {
            panic!("expected UPDATE");
        };
        let mut table = users_table();
        assert!(matches!(
            table.update(&update),
            Err(EngineError::Unsupported(_))
        ));
    }
}
