//! Cost-annotated query plans.
//!
//! A plan is a tree of steps built from a table-context expression:
//! SELECT becomes Eval over Filter over FullScan over the plan of its
//! source, JOIN becomes a Join node over both source plans, and a table
//! reference bottoms out in Project. RangeScan, Sort and HashMerge are
//! planner vocabulary only; executing them reports an unsupported
//! operation.

use std::fmt::Write as _;

use oxide_db_core::ast::{Expr, JoinKind};

use crate::database::Database;
use crate::error::{EngineError, Result};

/// One step of a query plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStep {
    /// Project a catalog table.
    Project,
    /// Scan every row of the child.
    FullScan,
    /// Scan a key range of the child (planner-only).
    RangeScan,
    /// Filter the child by a predicate.
    Filter,
    /// Project the child through a select list.
    Eval,
    /// Sort the child (planner-only).
    Sort,
    /// Join the two children.
    Join(JoinKind),
    /// Hash-merge the two children (planner-only).
    HashMerge,
}

impl PlanStep {
    /// Short label for diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::FullScan => "FullScan",
            Self::RangeScan => "RangeScan",
            Self::Filter => "Filter",
            Self::Eval => "Eval",
            Self::Sort => "Sort",
            Self::Join(_) => "Join",
            Self::HashMerge => "HashMerge",
        }
    }
}

/// The cost annotation of one plan node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cost {
    /// Steps including all sub-steps.
    pub total_steps: u64,
    /// Steps attributed to this node alone.
    pub self_steps: u64,
    /// Predicted number of emitted rows.
    pub est_rows: u64,
}

/// A cost-annotated plan node with up to two children and the expression
/// it represents.
#[derive(Debug)]
pub struct QueryPlan {
    step: PlanStep,
    expr: Expr,
    left: Option<Box<QueryPlan>>,
    right: Option<Box<QueryPlan>>,
    cost: Cost,
}

impl QueryPlan {
    /// Builds a plan tree for a table-context expression. The database is
    /// the planning context: table sizes seed the row estimates.
    ///
    /// # Errors
    ///
    /// Returns a name error for unknown tables and an unsupported-operation
    /// error for expressions that are not table-context.
    pub fn create(expr: &Expr, db: &Database) -> Result<Self> {
        match expr {
            Expr::Select(select) => {
                let source = Self::create(&select.from, db)?;
                let scan = Self::full_scan(select.from.clone(), source);
                let filtered = match &select.where_clause {
                    Some(predicate) => Self::filter(predicate.clone(), scan),
                    None => scan,
                };
                Ok(Self::eval(expr.clone(), filtered))
            }
            Expr::Join {
                left, right, kind, ..
            } => {
                let left = Self::create(left, db)?;
                let right = Self::create(right, db)?;
                Ok(Self::join(expr.clone(), *kind, left, right))
            }
            Expr::TableRef(name) => {
                let table = db.table(name)?;
                Ok(Self::project(expr.clone(), table.len() as u64))
            }
            Expr::Paren(inner) => Self::create(inner, db),
            other => Err(EngineError::unsupported(format!(
                "cannot plan expression: {other}"
            ))),
        }
    }

    /// Project(table): `est_rows = |table|`, zero cost.
    #[must_use]
    pub fn project(expr: Expr, rows: u64) -> Self {
        Self {
            step: PlanStep::Project,
            expr,
            left: None,
            right: None,
            cost: Cost {
                total_steps: 0,
                self_steps: 0,
                est_rows: rows,
            },
        }
    }

    /// FullScan(child): `total = child.total + child.rows`.
    #[must_use]
    pub fn full_scan(expr: Expr, child: Self) -> Self {
        let rows = child.cost.est_rows;
        let total = child.cost.total_steps + rows;
        Self::unary(PlanStep::FullScan, expr, child, total, 0, rows)
    }

    /// RangeScan(child): costed like FullScan; planner-only.
    #[must_use]
    pub fn range_scan(expr: Expr, child: Self) -> Self {
        let rows = child.cost.est_rows;
        let total = child.cost.total_steps + rows;
        Self::unary(PlanStep::RangeScan, expr, child, total, 0, rows)
    }

    /// Filter(child): passes the child's totals through.
    #[must_use]
    pub fn filter(expr: Expr, child: Self) -> Self {
        let rows = child.cost.est_rows;
        let total = child.cost.total_steps;
        Self::unary(PlanStep::Filter, expr, child, total, 0, rows)
    }

    /// Eval(child): passes the child's totals through.
    #[must_use]
    pub fn eval(expr: Expr, child: Self) -> Self {
        let rows = child.cost.est_rows;
        let total = child.cost.total_steps;
        Self::unary(PlanStep::Eval, expr, child, total, 0, rows)
    }

    /// Sort(child): `self = rows · ⌈log₂ rows⌉`; planner-only.
    #[must_use]
    pub fn sort(expr: Expr, child: Self) -> Self {
        let rows = child.cost.est_rows;
        let self_steps = rows * ceil_log2(rows);
        let total = child.cost.total_steps + self_steps;
        Self::unary(PlanStep::Sort, expr, child, total, self_steps, rows)
    }

    /// HashMerge(l, r): `est = l.rows + r.rows`; planner-only.
    #[must_use]
    pub fn hash_merge(expr: Expr, left: Self, right: Self) -> Self {
        let cost = Cost {
            total_steps: left.cost.total_steps + right.cost.total_steps,
            self_steps: 0,
            est_rows: left.cost.est_rows + right.cost.est_rows,
        };
        Self {
            step: PlanStep::HashMerge,
            expr,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
            cost,
        }
    }

    /// Join(l, r, kind): nested-loop total, kind-dependent row estimate.
    #[must_use]
    pub fn join(expr: Expr, kind: JoinKind, left: Self, right: Self) -> Self {
        let l = left.cost;
        let r = right.cost;
        let est_rows = match kind {
            JoinKind::Inner | JoinKind::Cross => l.est_rows + r.est_rows,
            JoinKind::Left => l.est_rows,
            JoinKind::Right => r.est_rows,
            JoinKind::Full => l.est_rows * r.est_rows,
        };
        let cost = Cost {
            total_steps: l.total_steps + l.est_rows * r.total_steps,
            self_steps: 0,
            est_rows,
        };
        Self {
            step: PlanStep::Join(kind),
            expr,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
            cost,
        }
    }

    fn unary(
        step: PlanStep,
        expr: Expr,
        child: Self,
        total_steps: u64,
        self_steps: u64,
        est_rows: u64,
    ) -> Self {
        Self {
            step,
            expr,
            left: Some(Box::new(child)),
            right: None,
            cost: Cost {
                total_steps,
                self_steps,
                est_rows,
            },
        }
    }

    /// The step this node performs.
    #[must_use]
    pub const fn step(&self) -> PlanStep {
        self.step
    }

    /// The expression this node represents.
    #[must_use]
    pub const fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Left (or only) child.
    #[must_use]
    pub fn left(&self) -> Option<&QueryPlan> {
        self.left.as_deref()
    }

    /// Right child.
    #[must_use]
    pub fn right(&self) -> Option<&QueryPlan> {
        self.right.as_deref()
    }

    /// The cost annotation.
    #[must_use]
    pub const fn cost(&self) -> &Cost {
        &self.cost
    }

    /// Renders the plan as a Mermaid `graph TD` diagram: one node per
    /// step showing self cost and estimated rows, plus a TOTAL node.
    #[must_use]
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph TD\n");
        self.mermaid_node(&mut out, "A");
        let _ = writeln!(out, "  TOTAL((\"Total cost: {}\"))", self.cost.total_steps);
        let _ = writeln!(out, "  A --> TOTAL");
        out
    }

    fn mermaid_node(&self, out: &mut String, name: &str) {
        let label = match self.step {
            PlanStep::Project => format!("Project: {}<br>Rows: {}", self.expr, self.cost.est_rows),
            PlanStep::Join(kind) => format!(
                "{}<br>Cost: {}<br>Rows: {}",
                kind.as_str(),
                self.cost.self_steps,
                self.cost.est_rows
            ),
            step => format!(
                "{}<br>Cost: {}<br>Rows: {}",
                step.label(),
                self.cost.self_steps,
                self.cost.est_rows
            ),
        };
        match self.step {
            PlanStep::Project => {
                let _ = writeln!(out, "  {name}[\"{label}\"]");
            }
            _ => {
                let _ = writeln!(out, "  {name}(\"{label}\")");
            }
        }
        if let Some(left) = &self.left {
            let child = format!("{name}L");
            left.mermaid_node(out, &child);
            let _ = writeln!(out, "  {child} --> {name}");
        }
        if let Some(right) = &self.right {
            let child = format!("{name}R");
            right.mermaid_node(out, &child);
            let _ = writeln!(out, "  {child} --> {name}");
        }
    }
}

/// ⌈log₂ x⌉ with `ceil_log2(0) = ceil_log2(1) = 0`.
fn ceil_log2(x: u64) -> u64 {
    if x <= 1 {
        0
    } else {
        u64::from(64 - (x - 1).leading_zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(rows: u64) -> QueryPlan {
        QueryPlan::project(Expr::TableRef(String::from("t")), rows)
    }

    #[test]
    fn test_ceil_log2() {
        assert_eq!(ceil_log2(0), 0);
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(5), 3);
        assert_eq!(ceil_log2(8), 3);
        assert_eq!(ceil_log2(9), 4);
    }

    #[test]
    fn test_project_cost() {
        let plan = leaf(10);
        assert_eq!(plan.cost().total_steps, 0);
        assert_eq!(plan.cost().est_rows, 10);
    }

    #[test]
    fn test_scan_filter_eval_stack() {
        let scan = QueryPlan::full_scan(Expr::TableRef(String::from("t")), leaf(10));
        assert_eq!(scan.cost().total_steps, 10);
        assert_eq!(scan.cost().est_rows, 10);

        let filter = QueryPlan::filter(Expr::boolean(true), scan);
        assert_eq!(filter.cost().total_steps, 10);
        assert_eq!(filter.cost().est_rows, 10);

        let eval = QueryPlan::eval(Expr::Star { table: None }, filter);
        assert_eq!(eval.cost().total_steps, 10);
    }

    #[test]
    fn test_sort_cost() {
        let sort = QueryPlan::sort(Expr::TableRef(String::from("t")), leaf(8));
        assert_eq!(sort.cost().self_steps, 8 * 3);
        assert_eq!(sort.cost().total_steps, 24);
    }

    #[test]
    fn test_join_costs_per_kind() {
        let join_expr = || Expr::TableRef(String::from("j"));
        let scan = |rows| QueryPlan::full_scan(Expr::TableRef(String::from("t")), leaf(rows));

        let inner = QueryPlan::join(join_expr(), JoinKind::Inner, scan(3), scan(4));
        // l.total + l.rows * r.total = 3 + 3 * 4
        assert_eq!(inner.cost().total_steps, 15);
        assert_eq!(inner.cost().est_rows, 7);

        let left = QueryPlan::join(join_expr(), JoinKind::Left, scan(3), scan(4));
        assert_eq!(left.cost().est_rows, 3);
        let right = QueryPlan::join(join_expr(), JoinKind::Right, scan(3), scan(4));
        assert_eq!(right.cost().est_rows, 4);
        let full = QueryPlan::join(join_expr(), JoinKind::Full, scan(3), scan(4));
        assert_eq!(full.cost().est_rows, 12);
        let cross = QueryPlan::join(join_expr(), JoinKind::Cross, scan(3), scan(4));
        assert_eq!(cross.cost().est_rows, 7);
    }

    #[test]
    fn test_hash_merge_cost() {
        let merge = QueryPlan::hash_merge(
            Expr::TableRef(String::from("m")),
            leaf(3),
            leaf(4),
        );
        assert_eq!(merge.cost().est_rows, 7);
        assert_eq!(merge.cost().total_steps, 0);
    }

    #[test]
    fn test_mermaid_shape() {
        let scan = QueryPlan::full_scan(Expr::TableRef(String::from("t")), leaf(2));
        let plan = QueryPlan::filter(Expr::boolean(true), scan);
        let diagram = plan.to_mermaid();
        assert!(diagram.starts_with("graph TD\n"));
        assert!(diagram.contains("Filter"));
        assert!(diagram.contains("Project: t"));
        assert!(diagram.contains("A --> TOTAL"));
        assert!(diagram.contains("AL --> A"));
    }
}
