//! # oxide-db-engine
//!
//! An in-process relational engine over the oxide-db dialect: in-memory
//! tables with a sorted-set primary key, a literal-folding expression
//! evaluator, a pull-based table algebra (scan, filter, evaluate, inner
//! join) and a cost-annotated query planner.
//!
//! ```rust
//! use oxide_db_engine::{Database, StatementOutcome};
//!
//! let mut db = Database::new();
//! let outcomes = db
//!     .execute(
//!         "create table t ({key, autoincrement} id: int32, {unique} login: string[8]);
//!          insert (login = \"a\") to t;
//!          select * from t where id > 0;",
//!     )
//!     .unwrap();
//! let Some(StatementOutcome::Selected(result)) = outcomes.last() else {
//!     panic!("expected rows");
//! };
//! assert_eq!(result.len(), 1);
//! ```
//!
//! The engine is single-threaded and cooperative: a caller drives a query
//! by pulling rows from an iterator that borrows the catalog, so the
//! borrow checker rules out mutation during a scan. Durability,
//! transactions and concurrency are out of scope.

pub mod column;
pub mod csv;
pub mod database;
pub mod error;
pub mod eval;
pub mod plan;
pub mod row;
pub mod storage;
pub mod table;
pub mod value;

pub use column::Column;
pub use database::{Database, ResultSet, StatementOutcome};
pub use error::{EngineError, Result};
pub use plan::{Cost, PlanStep, QueryPlan};
pub use row::Row;
pub use table::{EvaluatedTable, FilteredTable, JoinTable, Rows, StorageTable, Table};
pub use value::{Cell, Value};
