//! Parser for the dialect.
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//!
//! # Parsing approach
//!
//! Statements (`CREATE`, `INSERT`, `SELECT`, `DELETE`, `UPDATE`, `DROP`) are
//! parsed by dedicated recursive-descent methods. Value-context expressions
//! use a Pratt (top-down operator precedence) parser; table-context
//! expressions (table references, parenthesized SELECTs, JOIN chains) use a
//! separate entry point, with JOIN as the outermost binary of its level.
//!
//! # Supported statements
//!
//! | Statement | Notes |
//! |-----------|-------|
//! | `CREATE TABLE` | Column definitions with `{KEY, UNIQUE, AUTOINCREMENT}` constraint sets and defaults, or `AS <table-expression>` |
//! | `INSERT`  | `(v, …) TO name` positional or `(k = v, …) TO name` named; mixing rejected |
//! | `SELECT`  | Select list, mandatory `FROM` and `WHERE`; computed columns need parentheses or an alias |
//! | `DELETE`  | `FROM name WHERE …` |
//! | `UPDATE`  | Accepted syntactically; execution is unsupported |
//! | `DROP TABLE` | Removes a table |
//!
//! # Expressions
//!
//! - **Literals**: integers, strings, `0x` byte arrays, `TRUE`/`FALSE`, `NULL`
//! - **Column references**: `col`, `t.col`; stars `*` and `t.*` in select lists
//! - **Binary operators**: `+ - * / %`, `= != < <= > >=`, `AND`, `OR`
//! - **Unary operators**: `-`, `~`, `NOT`, `|expr|` (byte length),
//!   postfix `IS [NOT] NULL`
//! - **Table context**: table refs, `(…)`, embedded `(SELECT …)`,
//!   `[INNER|LEFT|RIGHT|FULL|CROSS] JOIN … ON …`

mod error;
mod parser;
mod pratt;

pub use error::ParseError;
pub use parser::Parser;
