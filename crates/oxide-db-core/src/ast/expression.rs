//! Expression AST types.

use core::fmt;

use super::SelectStatement;

/// A literal value of one of the five literal kinds.
///
/// A column reference is not a literal; evaluation folds every accepted
/// expression down to one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Integer literal.
    Int(i32),
    /// String literal.
    String(String),
    /// Boolean literal.
    Bool(bool),
    /// Byte-array literal, little-endian (index 0 is the least significant
    /// byte of the `0x` spelling).
    Bytes(Vec<u8>),
    /// NULL.
    Null,
}

impl Literal {
    /// Returns a short kind name for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "INT32",
            Self::String(_) => "STRING",
            Self::Bool(_) => "BOOL",
            Self::Bytes(_) => "BYTES",
            Self::Null => "NULL",
        }
    }

    /// Returns true if this is NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if the two literals are of the same kind.
    #[must_use]
    pub const fn same_kind(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Int(_), Self::Int(_))
                | (Self::String(_), Self::String(_))
                | (Self::Bool(_), Self::Bool(_))
                | (Self::Bytes(_), Self::Bytes(_))
                | (Self::Null, Self::Null)
        )
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Bool(true) => f.write_str("TRUE"),
            Self::Bool(false) => f.write_str("FALSE"),
            Self::Bytes(bytes) => {
                // Highest index first, so the rendering matches the `0x`
                // literal it was parsed from.
                f.write_str("0x")?;
                let mut significant = false;
                for byte in bytes.iter().rev() {
                    if !significant {
                        if *byte == 0 {
                            continue;
                        }
                        significant = true;
                        write!(f, "{byte:x}")?;
                    } else {
                        write!(f, "{byte:02x}")?;
                    }
                }
                if !significant {
                    f.write_str("0")?;
                }
                Ok(())
            }
            Self::Null => f.write_str("NULL"),
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Returns the dialect spelling of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Returns the precedence (higher binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 3,
            Self::Add | Self::Sub => 4,
            Self::Mul | Self::Div | Self::Mod => 5,
        }
    }

    /// Returns true for `= != < <= > >=`.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary operators, including the postfix null tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-` (negation)
    Neg,
    /// `NOT`
    Not,
    /// `~` (bitwise NOT)
    BitNot,
    /// `|expr|` (byte length)
    Length,
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    IsNotNull,
    /// `EXISTS` (parsed; evaluation is not supported)
    Exists,
}

impl UnaryOp {
    /// Returns the dialect spelling of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "NOT",
            Self::BitNot => "~",
            Self::Length => "| |",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
            Self::Exists => "EXISTS",
        }
    }
}

/// Join kinds. Only INNER executes; the rest parse and cost-estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    /// Returns the dialect spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expression.
///
/// One algebra covers both value context (literals, column refs, operators)
/// and table context (table refs, embedded SELECTs, JOINs); the parser
/// controls which variants are admitted where. Parentheses are a first-class
/// node so the input shape survives into the plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// `*` or `table.*` in a select list.
    Star {
        /// Optional table qualifier.
        table: Option<String>,
    },

    /// A column reference, optionally qualified.
    Column {
        /// Table qualifier (optional).
        table: Option<String>,
        /// Column name.
        name: String,
    },

    /// A table reference in table context.
    TableRef(String),

    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },

    /// A binary expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },

    /// A parenthesized expression.
    Paren(Box<Expr>),

    /// An embedded SELECT in table context.
    Select(Box<SelectStatement>),

    /// A JOIN of two table expressions.
    Join {
        /// Left source.
        left: Box<Expr>,
        /// Right source.
        right: Box<Expr>,
        /// ON predicate.
        on: Box<Expr>,
        /// Join kind.
        kind: JoinKind,
    },
}

impl Expr {
    /// Creates an unqualified column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            table: None,
            name: name.into(),
        }
    }

    /// Creates a qualified column reference.
    #[must_use]
    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Column {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    /// Creates an integer literal.
    #[must_use]
    pub const fn integer(value: i32) -> Self {
        Self::Literal(Literal::Int(value))
    }

    /// Creates a string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// Creates a boolean literal.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Bool(value))
    }

    /// Creates a NULL literal.
    #[must_use]
    pub const fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq(self, right: Self) -> Self {
        self.binary(BinaryOp::Eq, right)
    }

    /// Creates a greater-than expression.
    #[must_use]
    pub fn gt(self, right: Self) -> Self {
        self.binary(BinaryOp::Gt, right)
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, right: Self) -> Self {
        self.binary(BinaryOp::And, right)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, right: Self) -> Self {
        self.binary(BinaryOp::Or, right)
    }

    /// Wraps the expression in parentheses.
    #[must_use]
    pub fn paren(self) -> Self {
        Self::Paren(Box::new(self))
    }

    /// Creates an `IS NULL` test.
    #[must_use]
    pub fn is_null(self) -> Self {
        Self::Unary {
            op: UnaryOp::IsNull,
            operand: Box::new(self),
        }
    }

    /// Creates an `IS NOT NULL` test.
    #[must_use]
    pub fn is_not_null(self) -> Self {
        Self::Unary {
            op: UnaryOp::IsNotNull,
            operand: Box::new(self),
        }
    }

    /// Returns the literal if this expression is one.
    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lit) => write!(f, "{lit}"),
            Self::Star { table: None } => f.write_str("*"),
            Self::Star { table: Some(t) } => write!(f, "{t}.*"),
            Self::Column { table: None, name } => f.write_str(name),
            Self::Column {
                table: Some(t),
                name,
            } => write!(f, "{t}.{name}"),
            Self::TableRef(name) => f.write_str(name),
            Self::Unary { op, operand } => match op {
                UnaryOp::Neg => write!(f, "-{operand}"),
                UnaryOp::BitNot => write!(f, "~{operand}"),
                UnaryOp::Not => write!(f, "NOT {operand}"),
                UnaryOp::Length => write!(f, "|{operand}|"),
                UnaryOp::IsNull => write!(f, "{operand} IS NULL"),
                UnaryOp::IsNotNull => write!(f, "{operand} IS NOT NULL"),
                UnaryOp::Exists => write!(f, "EXISTS {operand}"),
            },
            Self::Binary { left, op, right } => write!(f, "{left} {op} {right}"),
            Self::Paren(inner) => write!(f, "({inner})"),
            Self::Select(select) => write!(f, "{select}"),
            Self::Join {
                left,
                right,
                on,
                kind,
            } => write!(f, "{left} {kind} {right} ON {on}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_kinds() {
        assert_eq!(Literal::Int(1).kind(), "INT32");
        assert!(Literal::Null.is_null());
        assert!(Literal::Int(1).same_kind(&Literal::Int(2)));
        assert!(!Literal::Int(1).same_kind(&Literal::Bool(true)));
    }

    #[test]
    fn test_bytes_display_round_trips_the_literal() {
        assert_eq!(Literal::Bytes(vec![0x34, 0x12]).to_string(), "0x1234");
        assert_eq!(Literal::Bytes(vec![0x02, 0x01]).to_string(), "0x102");
        assert_eq!(Literal::Bytes(vec![0x00, 0x00]).to_string(), "0x0");
    }

    #[test]
    fn test_precedence_table() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Eq.precedence());
        assert!(BinaryOp::Eq.precedence() > BinaryOp::And.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
    }

    #[test]
    fn test_expr_builders_and_display() {
        let expr = Expr::column("age")
            .gt(Expr::integer(18))
            .and(Expr::qualified_column("u", "name").eq(Expr::string("bob")));
        assert_eq!(expr.to_string(), "age > 18 AND u.name = \"bob\"");
    }

    #[test]
    fn test_unary_display() {
        let len = Expr::Unary {
            op: UnaryOp::Length,
            operand: Box::new(Expr::column("login")),
        };
        assert_eq!(len.to_string(), "|login|");
        assert_eq!(Expr::column("x").is_not_null().to_string(), "x IS NOT NULL");
    }
}
