//! The database facade: catalog, statement dispatch, and the executor
//! wiring plans to the table algebra.

use std::collections::BTreeMap;

use oxide_db_core::ast::{CreateAsStatement, Expr, SelectStatement, Statement};
use oxide_db_core::Parser;

use crate::column::Column;
use crate::error::{EngineError, Result};
use crate::plan::{PlanStep, QueryPlan};
use crate::table::{EvaluatedTable, FilteredTable, JoinTable, StorageTable, Table};
use crate::value::Cell;

/// A materialized query result: the output columns and one cell per row.
#[derive(Debug)]
pub struct ResultSet {
    /// The output columns, in select-list order.
    pub columns: Vec<Column>,
    /// The emitted rows.
    pub rows: Vec<Cell>,
}

impl ResultSet {
    /// The column names, in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if no rows were emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What one executed statement produced.
#[derive(Debug)]
pub enum StatementOutcome {
    /// A table was created.
    Created,
    /// A row was inserted.
    Inserted,
    /// Rows were deleted.
    Deleted(usize),
    /// A table was dropped.
    Dropped,
    /// A SELECT produced rows.
    Selected(ResultSet),
}

/// An in-memory database: a catalog of named storage tables plus the
/// statement dispatcher.
///
/// The facade path ([`Database::execute`]) materializes SELECT results;
/// embedders that want to stream rows plan with [`Database::plan`], build
/// the table algebra with [`Database::run_plan`] and pull from
/// [`Table::rows`].
#[derive(Debug, Default)]
pub struct Database {
    tables: BTreeMap<String, StorageTable>,
}

impl Database {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a catalog table.
    ///
    /// # Errors
    ///
    /// Returns a name error if the table does not exist.
    pub fn table(&self, name: &str) -> Result<&StorageTable> {
        self.tables
            .get(name)
            .ok_or_else(|| EngineError::name(format!("table not found: {name}")))
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut StorageTable> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| EngineError::name(format!("table not found: {name}")))
    }

    /// The catalog's table names, sorted.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Parses and executes a script, one statement at a time.
    ///
    /// # Errors
    ///
    /// Stops at the first failing statement; prior statements of the same
    /// call stay committed.
    pub fn execute(&mut self, sql: &str) -> Result<Vec<StatementOutcome>> {
        let statements = Parser::new(sql).parse_program()?;
        let mut outcomes = Vec::with_capacity(statements.len());
        for statement in &statements {
            tracing::debug!(statement = %statement, "executing");
            outcomes.push(self.run(statement)?);
        }
        Ok(outcomes)
    }

    /// Executes a single parsed statement.
    ///
    /// # Errors
    ///
    /// Propagates the executing subsystem's error; the catalog is left
    /// unchanged by the failing statement.
    pub fn run(&mut self, statement: &Statement) -> Result<StatementOutcome> {
        match statement {
            Statement::Create(create) => {
                self.check_vacant(&create.table)?;
                let table = StorageTable::create(create)?;
                self.tables.insert(create.table.clone(), table);
                Ok(StatementOutcome::Created)
            }
            Statement::CreateAs(create) => {
                self.run_create_as(create)?;
                Ok(StatementOutcome::Created)
            }
            Statement::Insert(insert) => {
                self.table_mut(&insert.table)?.insert(insert)?;
                Ok(StatementOutcome::Inserted)
            }
            Statement::Select(select) => Ok(StatementOutcome::Selected(self.run_select(select)?)),
            Statement::Delete(delete) => {
                let removed = self
                    .table_mut(&delete.table)?
                    .delete_where(&delete.where_clause)?;
                Ok(StatementOutcome::Deleted(removed))
            }
            Statement::Update(update) => {
                // The table is looked up first so an unknown table still
                // reports NameError; the table then reports the
                // unsupported operation.
                self.table_mut(&update.table)?.update(update)?;
                unreachable!("update never succeeds")
            }
            Statement::Drop(drop) => {
                if self.tables.remove(&drop.table).is_none() {
                    return Err(EngineError::name(format!(
                        "table not found: {}",
                        drop.table
                    )));
                }
                Ok(StatementOutcome::Dropped)
            }
        }
    }

    fn check_vacant(&self, name: &str) -> Result<()> {
        if self.tables.contains_key(name) {
            return Err(EngineError::name(format!("table already exists: {name}")));
        }
        Ok(())
    }

    /// Builds a cost-annotated plan for a table-context expression and logs
    /// its Mermaid diagram.
    ///
    /// # Errors
    ///
    /// Returns a name error for unknown tables.
    pub fn plan(&self, expr: &Expr) -> Result<QueryPlan> {
        let plan = QueryPlan::create(expr, self)?;
        tracing::debug!(
            total_steps = plan.cost().total_steps,
            est_rows = plan.cost().est_rows,
            "query plan:\n{}",
            plan.to_mermaid()
        );
        Ok(plan)
    }

    /// Interprets a plan as table-algebra operations, producing a (virtual)
    /// table borrowing the catalog and the plan.
    ///
    /// # Errors
    ///
    /// Returns an unsupported-operation error for the planner-only steps
    /// (RangeScan, Sort, HashMerge).
    pub fn run_plan<'a>(&'a self, plan: &'a QueryPlan) -> Result<Table<'a>> {
        match plan.step() {
            PlanStep::Project => match plan.expr() {
                Expr::TableRef(name) => Ok(Table::Storage(self.table(name)?)),
                other => Err(internal_shape("Project", other)),
            },
            PlanStep::FullScan => {
                let child = plan.left().ok_or_else(|| missing_child("FullScan"))?;
                self.run_plan(child)
            }
            PlanStep::Filter => {
                let child = plan.left().ok_or_else(|| missing_child("Filter"))?;
                let source = self.run_plan(child)?;
                Ok(Table::Filtered(Box::new(FilteredTable::new(
                    source,
                    plan.expr(),
                ))))
            }
            PlanStep::Eval => {
                let Expr::Select(select) = plan.expr() else {
                    return Err(internal_shape("Eval", plan.expr()));
                };
                let child = plan.left().ok_or_else(|| missing_child("Eval"))?;
                let source = self.run_plan(child)?;
                Ok(Table::Evaluated(Box::new(EvaluatedTable::new(
                    source,
                    &select.items,
                )?)))
            }
            PlanStep::Join(kind) => {
                let Expr::Join { on, .. } = plan.expr() else {
                    return Err(internal_shape("Join", plan.expr()));
                };
                let left = plan.left().ok_or_else(|| missing_child("Join"))?;
                let right = plan.right().ok_or_else(|| missing_child("Join"))?;
                let left = self.run_plan(left)?;
                let right = self.run_plan(right)?;
                Ok(Table::Join(Box::new(JoinTable::new(
                    left,
                    right,
                    on.as_ref(),
                    kind,
                ))))
            }
            PlanStep::RangeScan | PlanStep::Sort | PlanStep::HashMerge => {
                Err(EngineError::unsupported(format!(
                    "{} is planner vocabulary only",
                    plan.step().label()
                )))
            }
        }
    }

    fn run_select(&self, select: &SelectStatement) -> Result<ResultSet> {
        let expr = Expr::Select(Box::new(select.clone()));
        let plan = self.plan(&expr)?;
        let table = self.run_plan(&plan)?;
        let columns = table.columns().to_vec();
        let mut rows = Vec::new();
        for row in table.rows()? {
            rows.push(row?.into_cell());
        }
        Ok(ResultSet { columns, rows })
    }

    /// CREATE TABLE … AS: plans and runs the source, then seeds the new
    /// table with the source's cloned columns and materialized rows.
    fn run_create_as(&mut self, create: &CreateAsStatement) -> Result<()> {
        self.check_vacant(&create.table)?;

        let plan = self.plan(&create.source)?;
        let (columns, cells) = {
            let source = self.run_plan(&plan)?;
            let columns = source.columns().to_vec();
            let mut cells = Vec::new();
            for row in source.rows()? {
                cells.push(row?.into_cell());
            }
            (columns, cells)
        };

        let mut table = StorageTable::from_columns(&create.table, columns)?;
        for cell in cells {
            table.seed_cell(cell)?;
        }
        tracing::debug!(table = %create.table, rows = table.len(), "seeded table");
        self.tables.insert(create.table.clone(), table);
        Ok(())
    }
}

fn internal_shape(step: &str, expr: &Expr) -> EngineError {
    EngineError::Internal(format!("{step} node over unexpected expression {expr}"))
}

fn missing_child(step: &str) -> EngineError {
    EngineError::Internal(format!("{step} node without a child"))
}
