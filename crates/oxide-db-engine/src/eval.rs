//! Literal-folding expression evaluator.
//!
//! Evaluation folds an [`Expr`] bound to a row down to a single literal,
//! applying the dialect's null semantics: NULL propagates through unary
//! operators except the total `IS [NOT] NULL` tests, compares as
//! false/`=` and true/`!=`, and is an error under every other binary.

use std::cmp::Ordering;

use oxide_db_core::ast::{BinaryOp, ColumnType, Expr, Literal, UnaryOp};

use crate::column::{resolve_column, Column};
use crate::error::{EngineError, Result};
use crate::row::Row;
use crate::value::literal_type;

/// Evaluates an expression bound to a row, yielding a literal.
///
/// # Errors
///
/// Returns a name error for unresolvable column references and a type error
/// for invalid operator/kind combinations.
pub fn evaluate(expr: &Expr, row: &Row<'_>) -> Result<Literal> {
    match expr {
        Expr::Literal(literal) => Ok(literal.clone()),
        Expr::Column { table, name } => {
            let index = resolve_column(
                row.columns(),
                table.as_deref(),
                name,
                row.requires_qualifier(),
            )?;
            Ok(row.value(index).to_literal())
        }
        Expr::Paren(inner) => evaluate(inner, row),
        Expr::Unary { op, operand } => apply_unary(*op, evaluate(operand, row)?),
        Expr::Binary { left, op, right } => {
            apply_binary(evaluate(left, row)?, *op, evaluate(right, row)?)
        }
        Expr::Star { .. } | Expr::TableRef(_) | Expr::Select(_) | Expr::Join { .. } => Err(
            EngineError::type_error(format!("not a value expression: {expr}")),
        ),
    }
}

/// Applies a unary operator to a literal.
fn apply_unary(op: UnaryOp, operand: Literal) -> Result<Literal> {
    // The null tests are total; everything else propagates NULL.
    match op {
        UnaryOp::IsNull => return Ok(Literal::Bool(operand.is_null())),
        UnaryOp::IsNotNull => return Ok(Literal::Bool(!operand.is_null())),
        UnaryOp::Exists => {
            return Err(EngineError::unsupported("EXISTS is not evaluated"));
        }
        _ => {}
    }
    if operand.is_null() {
        return Ok(Literal::Null);
    }

    match op {
        UnaryOp::Neg => match operand {
            Literal::Int(n) => Ok(Literal::Int(n.wrapping_neg())),
            other => Err(invalid_unary("-", &other)),
        },
        UnaryOp::BitNot => match operand {
            Literal::Int(n) => Ok(Literal::Int(!n)),
            other => Err(invalid_unary("~", &other)),
        },
        UnaryOp::Not => Ok(Literal::Bool(match operand {
            Literal::Int(n) => n == 0,
            Literal::Bool(b) => !b,
            Literal::String(s) => s.is_empty(),
            Literal::Bytes(b) => b.is_empty(),
            Literal::Null => unreachable!(),
        })),
        UnaryOp::Length => match operand {
            Literal::String(s) => Ok(Literal::Int(s.len() as i32)),
            Literal::Bytes(b) => Ok(Literal::Int(b.len() as i32)),
            other => Err(invalid_unary("| |", &other)),
        },
        UnaryOp::IsNull | UnaryOp::IsNotNull | UnaryOp::Exists => unreachable!(),
    }
}

/// Applies a binary operator to two literals.
fn apply_binary(left: Literal, op: BinaryOp, right: Literal) -> Result<Literal> {
    if !left.same_kind(&right) {
        return match op {
            BinaryOp::Eq => Ok(Literal::Bool(false)),
            BinaryOp::NotEq => Ok(Literal::Bool(true)),
            _ => Err(EngineError::type_error(format!(
                "operands of {op} must have the same kind, got {} and {}",
                left.kind(),
                right.kind()
            ))),
        };
    }

    match (&left, &right) {
        (Literal::Null, Literal::Null) => match op {
            BinaryOp::Eq => Ok(Literal::Bool(false)),
            BinaryOp::NotEq => Ok(Literal::Bool(true)),
            _ => Err(EngineError::type_error(format!(
                "NULL supports only = and !=, not {op}"
            ))),
        },
        (Literal::Int(a), Literal::Int(b)) => int_binary(*a, op, *b),
        (Literal::String(a), Literal::String(b)) => match op {
            BinaryOp::Add => Ok(Literal::String(format!("{a}{b}"))),
            _ if op.is_comparison() => Ok(compare(a.cmp(b), op)),
            _ => Err(invalid_binary(op, "STRING")),
        },
        (Literal::Bool(a), Literal::Bool(b)) => match op {
            BinaryOp::And => Ok(Literal::Bool(*a && *b)),
            BinaryOp::Or => Ok(Literal::Bool(*a || *b)),
            _ if op.is_comparison() => Ok(compare(a.cmp(b), op)),
            _ => Err(invalid_binary(op, "BOOL")),
        },
        (Literal::Bytes(a), Literal::Bytes(b)) => {
            if a.len() != b.len() {
                return Err(EngineError::type_error(format!(
                    "mismatched BYTES lengths: {} and {}",
                    a.len(),
                    b.len()
                )));
            }
            if op.is_comparison() {
                Ok(compare(bytes_cmp(a, b), op))
            } else {
                Err(invalid_binary(op, "BYTES"))
            }
        }
        _ => unreachable!("kinds checked above"),
    }
}

fn int_binary(a: i32, op: BinaryOp, b: i32) -> Result<Literal> {
    let int = |n: i32| Ok(Literal::Int(n));
    match op {
        BinaryOp::Add => int(a.wrapping_add(b)),
        BinaryOp::Sub => int(a.wrapping_sub(b)),
        BinaryOp::Mul => int(a.wrapping_mul(b)),
        BinaryOp::Div => {
            if b == 0 {
                Err(EngineError::type_error("division by zero"))
            } else {
                int(a.wrapping_div(b))
            }
        }
        // Remainder sign follows the dividend.
        BinaryOp::Mod => {
            if b == 0 {
                Err(EngineError::type_error("division by zero"))
            } else {
                int(a.wrapping_rem(b))
            }
        }
        _ if op.is_comparison() => Ok(compare(a.cmp(&b), op)),
        BinaryOp::And | BinaryOp::Or => Err(invalid_binary(op, "INT32")),
        _ => unreachable!(),
    }
}

/// Big-endian byte comparison: the highest index is the most significant.
fn bytes_cmp(a: &[u8], b: &[u8]) -> Ordering {
    for (x, y) in a.iter().rev().zip(b.iter().rev()) {
        match x.cmp(y) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
    }
    Ordering::Equal
}

fn compare(ordering: Ordering, op: BinaryOp) -> Literal {
    let result = match op {
        BinaryOp::Eq => ordering == Ordering::Equal,
        BinaryOp::NotEq => ordering != Ordering::Equal,
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::GtEq => ordering != Ordering::Less,
        _ => unreachable!("not a comparison"),
    };
    Literal::Bool(result)
}

fn invalid_unary(op: &str, operand: &Literal) -> EngineError {
    EngineError::type_error(format!("invalid operation: {op} on {}", operand.kind()))
}

fn invalid_binary(op: BinaryOp, kind: &str) -> EngineError {
    EngineError::type_error(format!("invalid operation on {kind}: {op}"))
}

/// Predicts the type an expression will evaluate to against the given
/// columns, without a row. Used to materialize derived columns.
///
/// # Errors
///
/// Returns a type error for expressions the evaluator would reject.
pub fn predict_type(
    expr: &Expr,
    columns: &[Column],
    require_qualifier: bool,
) -> Result<ColumnType> {
    match expr {
        Expr::Literal(literal) => Ok(literal_type(literal)),
        Expr::Column { table, name } => {
            let index = resolve_column(columns, table.as_deref(), name, require_qualifier)?;
            Ok(columns[index].ty())
        }
        Expr::Paren(inner) => predict_type(inner, columns, require_qualifier),
        Expr::Unary { op, operand } => {
            let operand_ty = predict_type(operand, columns, require_qualifier)?;
            match op {
                UnaryOp::Neg | UnaryOp::BitNot => match operand_ty {
                    ColumnType::Int32 | ColumnType::Unknown => Ok(ColumnType::Int32),
                    other => Err(EngineError::type_error(format!(
                        "{} requires INT32, got {other}",
                        op.as_str()
                    ))),
                },
                UnaryOp::Not => Ok(ColumnType::Bool),
                UnaryOp::Length => match operand_ty {
                    ColumnType::String(_) | ColumnType::Bytes(_) | ColumnType::Unknown => {
                        Ok(ColumnType::Int32)
                    }
                    other => Err(EngineError::type_error(format!(
                        "| | requires STRING or BYTES, got {other}"
                    ))),
                },
                UnaryOp::IsNull | UnaryOp::IsNotNull => Ok(ColumnType::Bool),
                UnaryOp::Exists => Err(EngineError::unsupported("EXISTS is not evaluated")),
            }
        }
        Expr::Binary { left, op, right } => {
            let left_ty = predict_type(left, columns, require_qualifier)?;
            let right_ty = predict_type(right, columns, require_qualifier)?;
            if op.is_comparison() || matches!(op, BinaryOp::And | BinaryOp::Or) {
                return Ok(ColumnType::Bool);
            }
            match (left_ty, right_ty) {
                (ColumnType::Int32, ColumnType::Int32) => Ok(ColumnType::Int32),
                (ColumnType::String(a), ColumnType::String(b)) if *op == BinaryOp::Add => {
                    Ok(ColumnType::String(a + b))
                }
                (ColumnType::Bytes(a), ColumnType::Bytes(b)) if *op == BinaryOp::Add => {
                    Ok(ColumnType::Bytes(a + b))
                }
                (l, r) => Err(EngineError::type_error(format!(
                    "arithmetic {op} needs INT32 operands, got {l} and {r}"
                ))),
            }
        }
        Expr::Star { .. } | Expr::TableRef(_) | Expr::Select(_) | Expr::Join { .. } => Err(
            EngineError::type_error(format!("cannot predict a type for {expr}")),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Cell, Value};
    use oxide_db_core::ast::ColumnDef;
    use oxide_db_core::Parser;

    fn columns() -> Vec<Column> {
        vec![
            Column::from_def(&ColumnDef::new("id", ColumnType::Int32), "t"),
            Column::from_def(&ColumnDef::new("login", ColumnType::String(8)), "t"),
            Column::from_def(&ColumnDef::new("flag", ColumnType::Bool), "t"),
            Column::from_def(&ColumnDef::new("gone", ColumnType::Int32), "t"),
        ]
    }

    fn cell() -> Cell {
        Cell::new(vec![
            Value::Int32(7),
            Value::Str(String::from("abc")),
            Value::Bool(true),
            Value::Null,
        ])
    }

    fn eval(text: &str) -> Result<Literal> {
        let expr = Parser::new(text).parse_expression(0).unwrap();
        let columns = columns();
        let row = Row::new(&columns, cell());
        evaluate(&expr, &row)
    }

    #[test]
    fn test_arithmetic_and_precedence() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), Literal::Int(7));
        assert_eq!(eval("(1 + 2) * 3").unwrap(), Literal::Int(9));
        assert_eq!(eval("7 / 2").unwrap(), Literal::Int(3));
        assert_eq!(eval("-7 % 2").unwrap(), Literal::Int(-1));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(eval("1 / 0"), Err(EngineError::Type(_))));
        assert!(matches!(eval("1 % 0"), Err(EngineError::Type(_))));
    }

    #[test]
    fn test_column_lookup() {
        assert_eq!(eval("id + 1").unwrap(), Literal::Int(8));
        assert_eq!(eval("t.id").unwrap(), Literal::Int(7));
        assert!(matches!(eval("x.id"), Err(EngineError::Name(_))));
        assert!(matches!(eval("missing"), Err(EngineError::Name(_))));
    }

    #[test]
    fn test_string_operations() {
        assert_eq!(
            eval("login + \"!\"").unwrap(),
            Literal::String(String::from("abc!"))
        );
        assert_eq!(eval("login < \"b\"").unwrap(), Literal::Bool(true));
        assert!(eval("login - \"x\"").is_err());
    }

    #[test]
    fn test_length() {
        assert_eq!(eval("|login|").unwrap(), Literal::Int(3));
        assert_eq!(eval("|login| % 2 = 1").unwrap(), Literal::Bool(true));
        assert!(eval("|id|").is_err());
    }

    #[test]
    fn test_not_truthiness() {
        assert_eq!(eval("not 0").unwrap(), Literal::Bool(true));
        assert_eq!(eval("not 3").unwrap(), Literal::Bool(false));
        assert_eq!(eval("not \"\"").unwrap(), Literal::Bool(true));
        assert_eq!(eval("not flag").unwrap(), Literal::Bool(false));
    }

    #[test]
    fn test_unary_int_only() {
        assert_eq!(eval("-id").unwrap(), Literal::Int(-7));
        assert_eq!(eval("~0").unwrap(), Literal::Int(-1));
        assert!(eval("-login").is_err());
        assert!(eval("~flag").is_err());
    }

    #[test]
    fn test_null_semantics() {
        // NULL propagates through ordinary unaries…
        assert_eq!(eval("-gone").unwrap(), Literal::Null);
        assert_eq!(eval("not gone").unwrap(), Literal::Null);
        // …but the null tests are total.
        assert_eq!(eval("gone is null").unwrap(), Literal::Bool(true));
        assert_eq!(eval("gone is not null").unwrap(), Literal::Bool(false));
        assert_eq!(eval("id is null").unwrap(), Literal::Bool(false));
        // NULL under = / != is false / true, other binaries are errors.
        assert_eq!(eval("gone = null").unwrap(), Literal::Bool(false));
        assert_eq!(eval("gone != null").unwrap(), Literal::Bool(true));
        assert!(eval("gone + 1").is_err());
    }

    #[test]
    fn test_mismatched_kinds() {
        assert_eq!(eval("id = login").unwrap(), Literal::Bool(false));
        assert_eq!(eval("id != login").unwrap(), Literal::Bool(true));
        assert!(eval("id < login").is_err());
    }

    #[test]
    fn test_bool_ordering() {
        assert_eq!(eval("false < true").unwrap(), Literal::Bool(true));
        assert_eq!(eval("flag and true").unwrap(), Literal::Bool(true));
        assert_eq!(eval("false or flag").unwrap(), Literal::Bool(true));
        assert!(eval("flag + flag").is_err());
    }

    #[test]
    fn test_bytes_comparisons() {
        assert_eq!(eval("0x1234 = 0x1234").unwrap(), Literal::Bool(true));
        assert_eq!(eval("0x1234 != 0x1235").unwrap(), Literal::Bool(true));
        // Big-endian: 0x0201 > 0x0103 even though byte 0 is smaller.
        assert_eq!(eval("0x0201 > 0x0103").unwrap(), Literal::Bool(true));
        // Equal declared lengths are required.
        assert!(matches!(eval("0x1234 = 0x12"), Err(EngineError::Type(_))));
        assert!(eval("0x12 + 0x34").is_err());
    }

    #[test]
    fn test_predict_matches_evaluation_kind() {
        let columns = columns();
        let row = Row::new(&columns, cell());
        for text in [
            "id + 1",
            "(id + 1) * 2",
            "login + \"x\"",
            "id > 3",
            "not flag",
            "|login|",
            "login is null",
            "flag and true",
        ] {
            let expr = Parser::new(text).parse_expression(0).unwrap();
            let predicted = predict_type(&expr, &columns, false).unwrap();
            let result = evaluate(&expr, &row).unwrap();
            assert_eq!(
                literal_kind_of(predicted),
                result.kind(),
                "prediction mismatch for {text}"
            );
        }
    }

    fn literal_kind_of(ty: ColumnType) -> &'static str {
        match ty {
            ColumnType::Int32 => "INT32",
            ColumnType::Bool => "BOOL",
            ColumnType::String(_) => "STRING",
            ColumnType::Bytes(_) => "BYTES",
            ColumnType::Unknown => "NULL",
        }
    }

    #[test]
    fn test_predict_string_concat_sums_lengths() {
        let columns = columns();
        let expr = Parser::new("login + login").parse_expression(0).unwrap();
        assert_eq!(
            predict_type(&expr, &columns, false).unwrap(),
            ColumnType::String(16)
        );
    }

    #[test]
    fn test_predict_rejects_arithmetic_on_non_int() {
        let columns = columns();
        let expr = Parser::new("flag + flag").parse_expression(0).unwrap();
        assert!(predict_type(&expr, &columns, false).is_err());
    }
}
