//! CSV export.
//!
//! Header row is the column name list; null prints `null`, INT32 decimal,
//! BOOL `true`/`false`, STRING in double quotes, BYTES as `0x` with the
//! highest index first (the spelling a `0x` literal re-parses to).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use oxide_db_core::ast::Literal;

use crate::column::Column;
use crate::database::{Database, ResultSet};
use crate::error::Result;
use crate::value::{Cell, Value};

#[cfg(windows)]
const NEWLINE: &str = "\r\n";
#[cfg(not(windows))]
const NEWLINE: &str = "\n";

/// Writes columns and cells as CSV.
///
/// # Errors
///
/// Propagates I/O errors from the writer.
pub fn write_csv<'c, W, I>(writer: &mut W, columns: &[Column], cells: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'c Cell>,
{
    let header: Vec<&str> = columns.iter().map(Column::name).collect();
    write!(writer, "{}{NEWLINE}", header.join(","))?;

    for cell in cells {
        let fields: Vec<String> = cell.iter().map(format_value).collect();
        write!(writer, "{}{NEWLINE}", fields.join(","))?;
    }
    Ok(())
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::Int32(n) => n.to_string(),
        Value::Bool(true) => String::from("true"),
        Value::Bool(false) => String::from("false"),
        Value::Str(s) => format!("\"{s}\""),
        // The byte rendering matches the literal syntax; reuse it.
        Value::Bytes(b) => Literal::Bytes(b.clone()).to_string(),
    }
}

impl ResultSet {
    /// Writes the result set as CSV.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the writer.
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_csv(writer, &self.columns, &self.rows)
    }
}

impl Database {
    /// Writes a catalog table as CSV.
    ///
    /// # Errors
    ///
    /// Returns a name error for unknown tables and propagates I/O errors.
    pub fn export_table_csv<W: Write>(&self, name: &str, writer: &mut W) -> Result<()> {
        let table = self.table(name)?;
        write_csv(writer, table.columns(), table.storage().iter())
    }

    /// Writes a catalog table as CSV to a file path.
    ///
    /// # Errors
    ///
    /// Returns a name error for unknown tables and propagates I/O errors.
    pub fn export_table_to_path(&self, name: &str, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.export_table_csv(name, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_values() {
        assert_eq!(format_value(&Value::Null), "null");
        assert_eq!(format_value(&Value::Int32(-3)), "-3");
        assert_eq!(format_value(&Value::Bool(true)), "true");
        assert_eq!(format_value(&Value::Str(String::from("a"))), "\"a\"");
        assert_eq!(format_value(&Value::Bytes(vec![0x34, 0x12])), "0x1234");
        assert_eq!(format_value(&Value::Bytes(vec![0, 0])), "0x0");
    }

    #[test]
    fn test_write_csv_shape() {
        let columns = vec![
            Column::derived("id", oxide_db_core::ast::ColumnType::Int32),
            Column::derived("login", oxide_db_core::ast::ColumnType::String(8)),
        ];
        let cells = vec![
            Cell::new(vec![Value::Int32(2), Value::Str(String::from("b"))]),
        ];
        let mut out = Vec::new();
        write_csv(&mut out, &columns, &cells).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, format!("id,login{NEWLINE}2,\"b\"{NEWLINE}"));
    }
}
