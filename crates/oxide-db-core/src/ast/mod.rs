//! Abstract syntax tree types for the dialect.

mod expression;
mod statement;
mod types;

pub use expression::{BinaryOp, Expr, JoinKind, Literal, UnaryOp};
pub use statement::{
    CreateAsStatement, CreateStatement, DeleteStatement, DropStatement, InsertStatement,
    InsertValue, SelectItem, SelectStatement, Statement, UpdateAssignment, UpdateStatement,
};
pub use types::{ColumnDef, ColumnType};
