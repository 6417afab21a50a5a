//! Recursive-descent parser for the dialect.

use super::error::ParseError;
use super::pratt::{
    infix_binding_power, postfix_binding_power, prefix_binding_power, token_to_binary_op,
    token_to_unary_op,
};
use crate::ast::{
    ColumnDef, ColumnType, CreateAsStatement, CreateStatement, DeleteStatement, DropStatement,
    Expr, InsertStatement, InsertValue, JoinKind, Literal, SelectItem, SelectStatement, Statement,
    UnaryOp, UpdateAssignment, UpdateStatement,
};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

/// Parser for the dialect.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self { lexer, current }
    }

    /// Parses a `;`-separated sequence of statements.
    ///
    /// Parsing stops at the first failed statement. The final terminator may
    /// be omitted at end of input.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] carrying the offending token.
    pub fn parse_program(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        while !self.current.is_eof() {
            statements.push(self.parse_statement()?);
            match &self.current.kind {
                TokenKind::Semicolon => self.advance(),
                TokenKind::Eof => break,
                _ => {
                    return Err(ParseError::unexpected(
                        ";",
                        self.current.kind.clone(),
                        self.current.span,
                    ));
                }
            }
        }
        Ok(statements)
    }

    /// Parses a single statement.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the input is not a valid statement.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.current.as_keyword() {
            Some(Keyword::Create) => self.parse_create(),
            Some(Keyword::Insert) => Ok(Statement::Insert(self.parse_insert()?)),
            Some(Keyword::Select) => Ok(Statement::Select(self.parse_select()?)),
            Some(Keyword::Delete) => Ok(Statement::Delete(self.parse_delete()?)),
            Some(Keyword::Update) => Ok(Statement::Update(self.parse_update()?)),
            Some(Keyword::Drop) => Ok(Statement::Drop(self.parse_drop()?)),
            _ => Err(ParseError::unexpected(
                "CREATE, INSERT, SELECT, DELETE, UPDATE, or DROP",
                self.current.kind.clone(),
                self.current.span,
            )),
        }
    }

    // --- Statements ---

    fn parse_create(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Table)?;
        let table = self.expect_name()?;

        if self.check_keyword(Keyword::As) {
            self.advance();
            let source = self.parse_table_expr()?;
            return Ok(Statement::CreateAs(CreateAsStatement { table, source }));
        }

        self.expect(&TokenKind::LParen)?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column_def()?);
            match &self.current.kind {
                TokenKind::Comma => self.advance(),
                TokenKind::RParen => {
                    self.advance();
                    break;
                }
                _ => {
                    return Err(ParseError::unexpected(
                        ", or )",
                        self.current.kind.clone(),
                        self.current.span,
                    ));
                }
            }
        }

        Ok(Statement::Create(CreateStatement { table, columns }))
    }

    /// Parses `[{constraints}] name: type [= literal]`.
    fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let mut key = false;
        let mut unique = false;
        let mut autoincrement = false;

        if self.check(&TokenKind::LBrace) {
            self.advance();
            loop {
                match self.current.as_keyword() {
                    Some(Keyword::Key) => key = true,
                    Some(Keyword::Unique) => unique = true,
                    Some(Keyword::Autoincrement) => autoincrement = true,
                    _ => {
                        return Err(ParseError::unexpected(
                            "KEY, UNIQUE, or AUTOINCREMENT",
                            self.current.kind.clone(),
                            self.current.span,
                        ));
                    }
                }
                self.advance();
                match &self.current.kind {
                    TokenKind::Comma => self.advance(),
                    TokenKind::RBrace => {
                        self.advance();
                        break;
                    }
                    _ => {
                        return Err(ParseError::unexpected(
                            ", or }",
                            self.current.kind.clone(),
                            self.current.span,
                        ));
                    }
                }
            }
        }

        let name_span = self.current.span;
        let name = self.expect_name()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.expect_type()?;

        let default = if self.check(&TokenKind::Eq) {
            self.advance();
            Some(self.parse_literal()?)
        } else {
            None
        };

        if autoincrement && ty != ColumnType::Int32 {
            return Err(ParseError::new(
                format!("AUTOINCREMENT column {name} must be INT32"),
                name_span,
            ));
        }
        if autoincrement && default.is_some() {
            return Err(ParseError::new(
                format!("column {name} cannot combine AUTOINCREMENT with a default"),
                name_span,
            ));
        }
        if let Some(default) = &default {
            if !default_matches_type(default, ty) {
                return Err(ParseError::new(
                    format!(
                        "default of kind {} does not match column type {ty}",
                        default.kind()
                    ),
                    name_span,
                ));
            }
        }

        let mut def = ColumnDef::new(name, ty);
        def.key = key;
        def.unique = unique;
        def.autoincrement = autoincrement;
        def.default = default;
        Ok(def)
    }

    fn parse_insert(&mut self) -> Result<InsertStatement, ParseError> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect(&TokenKind::LParen)?;

        let mut values: Vec<InsertValue> = Vec::new();
        if self.check(&TokenKind::RParen) {
            self.advance();
        } else {
            loop {
                let value = if matches!(self.current.kind, TokenKind::Name(_)) {
                    let column = self.expect_name()?;
                    self.expect(&TokenKind::Eq)?;
                    InsertValue::named(column, self.parse_literal()?)
                } else {
                    InsertValue::positional(self.parse_literal()?)
                };
                values.push(value);
                match &self.current.kind {
                    TokenKind::Comma => self.advance(),
                    TokenKind::RParen => {
                        self.advance();
                        break;
                    }
                    _ => {
                        return Err(ParseError::unexpected(
                            ", or )",
                            self.current.kind.clone(),
                            self.current.span,
                        ));
                    }
                }
            }
        }

        let named = values.iter().filter(|v| v.column.is_some()).count();
        if named != 0 && named != values.len() {
            return Err(ParseError::new(
                "cannot mix named and positional values",
                self.current.span,
            ));
        }

        self.expect_keyword(Keyword::To)?;
        let table = self.expect_name()?;

        Ok(InsertStatement { table, values })
    }

    /// Parses a SELECT statement, starting at the SELECT keyword.
    pub fn parse_select(&mut self) -> Result<SelectStatement, ParseError> {
        self.expect_keyword(Keyword::Select)?;
        let items = self.parse_select_items()?;
        self.expect_keyword(Keyword::From)?;
        let from = self.parse_table_expr()?;
        self.expect_keyword(Keyword::Where)?;
        let where_clause = self.parse_expression(0)?;
        Ok(SelectStatement {
            items,
            from,
            where_clause: Some(where_clause),
        })
    }

    fn parse_select_items(&mut self) -> Result<Vec<SelectItem>, ParseError> {
        let mut items = Vec::new();
        loop {
            let item = match &self.current.kind {
                TokenKind::Star => {
                    self.advance();
                    SelectItem::new(Expr::Star { table: None })
                }
                TokenKind::QualifiedStar(table) => {
                    let table = table.clone();
                    self.advance();
                    SelectItem::new(Expr::Star { table: Some(table) })
                }
                _ => {
                    let span = self.current.span;
                    let expr = self.parse_expression(0)?;
                    let alias = if self.check_keyword(Keyword::As) {
                        self.advance();
                        Some(self.expect_name()?)
                    } else {
                        None
                    };
                    // A computed column must be parenthesized or aliased.
                    if alias.is_none()
                        && !matches!(expr, Expr::Column { .. } | Expr::Paren(_))
                    {
                        return Err(ParseError::new(
                            "computed select column needs parentheses or an AS alias",
                            span,
                        ));
                    }
                    SelectItem { expr, alias }
                }
            };
            items.push(item);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(items)
    }

    fn parse_delete(&mut self) -> Result<DeleteStatement, ParseError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.expect_name()?;
        self.expect_keyword(Keyword::Where)?;
        let where_clause = self.parse_expression(0)?;
        Ok(DeleteStatement {
            table,
            where_clause,
        })
    }

    fn parse_update(&mut self) -> Result<UpdateStatement, ParseError> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.expect_name()?;
        self.expect_keyword(Keyword::Set)?;

        let mut assignments = Vec::new();
        loop {
            let column = self.expect_name()?;
            self.expect(&TokenKind::Eq)?;
            let value = self.parse_expression(0)?;
            assignments.push(UpdateAssignment { column, value });
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        self.expect_keyword(Keyword::Where)?;
        let where_clause = self.parse_expression(0)?;
        Ok(UpdateStatement {
            table,
            assignments,
            where_clause,
        })
    }

    fn parse_drop(&mut self) -> Result<DropStatement, ParseError> {
        self.expect_keyword(Keyword::Drop)?;
        self.expect_keyword(Keyword::Table)?;
        let table = self.expect_name()?;
        Ok(DropStatement { table })
    }

    // --- Table context ---

    /// Parses a table expression: a table reference, a parenthesized table
    /// expression or SELECT, or a chain of JOINs. JOIN is the outermost
    /// binary of its level, so this returns as soon as the join chain ends.
    pub fn parse_table_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_table_primary()?;

        while self.is_join_keyword() {
            let kind = self.parse_join_kind()?;
            let right = self.parse_table_primary()?;
            self.expect_keyword(Keyword::On)?;
            let on = self.parse_expression(0)?;
            expr = Expr::Join {
                left: Box::new(expr),
                right: Box::new(right),
                on: Box::new(on),
                kind,
            };
        }

        Ok(expr)
    }

    fn parse_table_primary(&mut self) -> Result<Expr, ParseError> {
        match &self.current.kind {
            TokenKind::LParen => {
                self.advance();
                let inner = if self.check_keyword(Keyword::Select) {
                    Expr::Select(Box::new(self.parse_select()?))
                } else {
                    self.parse_table_expr()?
                };
                self.expect(&TokenKind::RParen)?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            TokenKind::Name(name) => {
                let name = name.clone();
                self.advance();
                Ok(Expr::TableRef(name))
            }
            _ => Err(ParseError::unexpected(
                "table name or (",
                self.current.kind.clone(),
                self.current.span,
            )),
        }
    }

    fn is_join_keyword(&self) -> bool {
        matches!(
            self.current.as_keyword(),
            Some(
                Keyword::Join
                    | Keyword::Inner
                    | Keyword::Left
                    | Keyword::Right
                    | Keyword::Full
                    | Keyword::Cross
            )
        )
    }

    fn parse_join_kind(&mut self) -> Result<JoinKind, ParseError> {
        let kind = match self.current.as_keyword() {
            Some(Keyword::Join) => {
                self.advance();
                return Ok(JoinKind::Inner);
            }
            Some(Keyword::Inner) => JoinKind::Inner,
            Some(Keyword::Left) => JoinKind::Left,
            Some(Keyword::Right) => JoinKind::Right,
            Some(Keyword::Full) => JoinKind::Full,
            Some(Keyword::Cross) => JoinKind::Cross,
            _ => {
                return Err(ParseError::unexpected(
                    "JOIN",
                    self.current.kind.clone(),
                    self.current.span,
                ));
            }
        };
        self.advance();
        self.expect_keyword(Keyword::Join)?;
        Ok(kind)
    }

    // --- Expressions ---

    /// Parses a value-context expression with Pratt precedence climbing.
    pub fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            if let Some(bp) = postfix_binding_power(&self.current.kind) {
                if bp < min_bp {
                    break;
                }
                let op = match self.current.as_keyword() {
                    Some(Keyword::IsNotNull) => UnaryOp::IsNotNull,
                    _ => UnaryOp::IsNull,
                };
                self.advance();
                lhs = Expr::Unary {
                    op,
                    operand: Box::new(lhs),
                };
                continue;
            }

            let Some((l_bp, r_bp)) = infix_binding_power(&self.current.kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            let Some(op) = token_to_binary_op(&self.current.kind) else {
                break;
            };
            self.advance();
            let rhs = self.parse_expression(r_bp)?;
            lhs = Expr::Binary {
                left: Box::new(lhs),
                op,
                right: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        if let Some(op) = token_to_unary_op(&self.current.kind) {
            let bp = prefix_binding_power(&self.current.kind).unwrap_or(13);
            self.advance();
            let operand = self.parse_expression(bp)?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current.span;
        match self.current.kind.clone() {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(Expr::Literal(Literal::Int(n)))
            }
            TokenKind::Hex(bytes) => {
                self.advance();
                Ok(Expr::Literal(Literal::Bytes(bytes)))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Expr::Literal(Literal::String(s)))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(true)))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(false)))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expr::Literal(Literal::Null))
            }
            TokenKind::Name(name) => {
                self.advance();
                Ok(Expr::Column { table: None, name })
            }
            TokenKind::ColumnName(table, name) => {
                self.advance();
                Ok(Expr::Column {
                    table: Some(table),
                    name,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression(0)?;
                self.expect(&TokenKind::RParen)?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            TokenKind::Pipe => {
                self.advance();
                let operand = self.parse_expression(0)?;
                self.expect(&TokenKind::Pipe)?;
                Ok(Expr::Unary {
                    op: UnaryOp::Length,
                    operand: Box::new(operand),
                })
            }
            TokenKind::Error(message) => Err(ParseError::new(message, span)),
            other => Err(ParseError::unexpected("expression", other, span)),
        }
    }

    /// Parses a literal token (the only value form INSERT and defaults take).
    fn parse_literal(&mut self) -> Result<Literal, ParseError> {
        let literal = match &self.current.kind {
            TokenKind::Integer(n) => Literal::Int(*n),
            TokenKind::Hex(bytes) => Literal::Bytes(bytes.clone()),
            TokenKind::String(s) => Literal::String(s.clone()),
            TokenKind::Keyword(Keyword::True) => Literal::Bool(true),
            TokenKind::Keyword(Keyword::False) => Literal::Bool(false),
            TokenKind::Keyword(Keyword::Null) => Literal::Null,
            _ => {
                return Err(ParseError::unexpected(
                    "literal",
                    self.current.kind.clone(),
                    self.current.span,
                ));
            }
        };
        self.advance();
        Ok(literal)
    }

    // --- Helpers ---

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current.kind) == core::mem::discriminant(kind)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.as_keyword() == Some(keyword)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected(
                kind.to_string(),
                self.current.kind.clone(),
                self.current.span,
            ))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected(
                keyword.as_str(),
                self.current.kind.clone(),
                self.current.span,
            ))
        }
    }

    fn expect_name(&mut self) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::Name(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(ParseError::unexpected(
                "name",
                self.current.kind.clone(),
                self.current.span,
            )),
        }
    }

    fn expect_type(&mut self) -> Result<ColumnType, ParseError> {
        match &self.current.kind {
            TokenKind::Type(ty) => {
                let ty = *ty;
                self.advance();
                Ok(ty)
            }
            _ => Err(ParseError::unexpected(
                "column type",
                self.current.kind.clone(),
                self.current.span,
            )),
        }
    }

    /// Returns the span of the current token, for diagnostics.
    #[must_use]
    pub const fn current_span(&self) -> Span {
        self.current.span
    }
}

/// Checks a default literal against the declared column type. A STRING
/// literal is accepted for a BYTES column.
fn default_matches_type(literal: &Literal, ty: ColumnType) -> bool {
    matches!(
        (literal, ty),
        (Literal::Int(_), ColumnType::Int32)
            | (Literal::Bool(_), ColumnType::Bool)
            | (Literal::String(_), ColumnType::String(_))
            | (Literal::String(_) | Literal::Bytes(_), ColumnType::Bytes(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp;

    fn parse(sql: &str) -> Result<Statement, ParseError> {
        Parser::new(sql).parse_statement()
    }

    fn parse_expr(text: &str) -> Expr {
        Parser::new(text).parse_expression(0).unwrap()
    }

    #[test]
    fn test_create_table() {
        let stmt = parse(
            "create table t ({key, autoincrement} id: int32, {unique} login: string[8])",
        )
        .unwrap();
        let Statement::Create(create) = stmt else {
            panic!("expected CREATE");
        };
        assert_eq!(create.table, "t");
        assert_eq!(create.columns.len(), 2);
        assert!(create.columns[0].key);
        assert!(create.columns[0].autoincrement);
        assert_eq!(create.columns[1].ty, ColumnType::String(8));
        assert!(create.columns[1].unique);
    }

    #[test]
    fn test_create_table_default() {
        let stmt = parse("create table t (is_admin: bool = false)").unwrap();
        let Statement::Create(create) = stmt else {
            panic!("expected CREATE");
        };
        assert_eq!(create.columns[0].default, Some(Literal::Bool(false)));
    }

    #[test]
    fn test_create_rejects_autoincrement_on_string() {
        assert!(parse("create table t ({autoincrement} login: string[8])").is_err());
    }

    #[test]
    fn test_create_rejects_autoincrement_with_default() {
        assert!(parse("create table t ({autoincrement} id: int32 = 1)").is_err());
    }

    #[test]
    fn test_create_rejects_mismatched_default() {
        assert!(parse("create table t (id: int32 = \"x\")").is_err());
    }

    #[test]
    fn test_create_accepts_string_default_for_bytes() {
        let stmt = parse("create table t (hash: bytes[8] = \"12345678\")").unwrap();
        assert!(matches!(stmt, Statement::Create(_)));
    }

    #[test]
    fn test_create_table_as() {
        let stmt = parse("create table t2 as (select * from t where true)").unwrap();
        let Statement::CreateAs(create) = stmt else {
            panic!("expected CREATE AS");
        };
        assert_eq!(create.table, "t2");
        assert!(matches!(create.source, Expr::Paren(_)));
    }

    #[test]
    fn test_insert_positional() {
        let stmt = parse("insert (1, \"a\", true) to t").unwrap();
        let Statement::Insert(insert) = stmt else {
            panic!("expected INSERT");
        };
        assert_eq!(insert.table, "t");
        assert_eq!(insert.values.len(), 3);
        assert!(!insert.is_named());
    }

    #[test]
    fn test_insert_named() {
        let stmt = parse("insert (login = \"a\", is_admin = true) to t").unwrap();
        let Statement::Insert(insert) = stmt else {
            panic!("expected INSERT");
        };
        assert!(insert.is_named());
        assert_eq!(insert.values[0].column.as_deref(), Some("login"));
    }

    #[test]
    fn test_insert_rejects_mixed_forms() {
        assert!(parse("insert (login = \"a\", 1) to t").is_err());
    }

    #[test]
    fn test_select_star() {
        let stmt = parse("select * from t where id > 0").unwrap();
        let Statement::Select(select) = stmt else {
            panic!("expected SELECT");
        };
        assert!(matches!(
            select.items[0].expr,
            Expr::Star { table: None }
        ));
        assert!(matches!(select.from, Expr::TableRef(ref n) if n == "t"));
        assert!(select.where_clause.is_some());
    }

    #[test]
    fn test_select_requires_where() {
        assert!(parse("select * from t").is_err());
    }

    #[test]
    fn test_select_aliased_expression() {
        // S6: a parenthesized computed column with an alias parses.
        let stmt = parse("SELECT (id + 1) AS n FROM t WHERE n IS NOT NULL").unwrap();
        let Statement::Select(select) = stmt else {
            panic!("expected SELECT");
        };
        assert_eq!(select.items[0].alias.as_deref(), Some("n"));
        assert!(matches!(
            select.where_clause,
            Some(Expr::Unary {
                op: UnaryOp::IsNotNull,
                ..
            })
        ));
    }

    #[test]
    fn test_select_rejects_bare_computed_column() {
        // S6: unparenthesized, unaliased computed columns are rejected.
        assert!(parse("SELECT id + 1 FROM t WHERE true").is_err());
    }

    #[test]
    fn test_select_accepts_parenthesized_unaliased() {
        assert!(parse("SELECT (id + 1) FROM t WHERE true").is_ok());
    }

    #[test]
    fn test_select_join() {
        let stmt =
            parse("select u.login as user, p.title as t from (u join p on u.id = p.uid) where true")
                .unwrap();
        let Statement::Select(select) = stmt else {
            panic!("expected SELECT");
        };
        assert_eq!(select.items.len(), 2);
        let Expr::Paren(inner) = &select.from else {
            panic!("expected parenthesized join");
        };
        let Expr::Join { kind, on, .. } = inner.as_ref() else {
            panic!("expected join");
        };
        assert_eq!(*kind, JoinKind::Inner);
        assert!(matches!(on.as_ref(), Expr::Binary { .. }));
    }

    #[test]
    fn test_join_kinds() {
        for (text, kind) in [
            ("a join b on true", JoinKind::Inner),
            ("a inner join b on true", JoinKind::Inner),
            ("a left join b on true", JoinKind::Left),
            ("a right join b on true", JoinKind::Right),
            ("a full join b on true", JoinKind::Full),
            ("a cross join b on true", JoinKind::Cross),
        ] {
            let expr = Parser::new(text).parse_table_expr().unwrap();
            let Expr::Join { kind: parsed, .. } = expr else {
                panic!("expected join for {text}");
            };
            assert_eq!(parsed, kind, "{text}");
        }
    }

    #[test]
    fn test_embedded_select_source() {
        let stmt = parse("select * from (select id from t where true) where true").unwrap();
        let Statement::Select(select) = stmt else {
            panic!("expected SELECT");
        };
        let Expr::Paren(inner) = &select.from else {
            panic!("expected paren");
        };
        assert!(matches!(inner.as_ref(), Expr::Select(_)));
    }

    #[test]
    fn test_delete() {
        let stmt = parse("delete from t where id = 1").unwrap();
        let Statement::Delete(delete) = stmt else {
            panic!("expected DELETE");
        };
        assert_eq!(delete.table, "t");
    }

    #[test]
    fn test_update_parses() {
        let stmt = parse("update t set login = \"b\", id = id + 1 where id = 1").unwrap();
        let Statement::Update(update) = stmt else {
            panic!("expected UPDATE");
        };
        assert_eq!(update.assignments.len(), 2);
    }

    #[test]
    fn test_drop() {
        let stmt = parse("drop table t").unwrap();
        assert!(matches!(stmt, Statement::Drop(d) if d.table == "t"));
    }

    #[test]
    fn test_program_stops_after_failed_statement() {
        let mut parser = Parser::new("select from; create table t (id: int32);");
        assert!(parser.parse_program().is_err());
    }

    #[test]
    fn test_program_final_terminator_optional() {
        let stmts = Parser::new("drop table a; drop table b")
            .parse_program()
            .unwrap();
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn test_expression_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let expr = parse_expr("1 + 2 * 3");
        let Expr::Binary { op, right, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(
            right.as_ref(),
            Expr::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn test_not_binds_looser_than_comparison() {
        // NOT a = b AND c parses as (NOT (a = b)) AND c
        let expr = parse_expr("not a = b and c");
        let Expr::Binary { op, left, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::And);
        let Expr::Unary {
            op: UnaryOp::Not,
            operand,
        } = left.as_ref()
        else {
            panic!("expected NOT");
        };
        assert!(matches!(
            operand.as_ref(),
            Expr::Binary {
                op: BinaryOp::Eq,
                ..
            }
        ));
    }

    #[test]
    fn test_unary_minus_binds_tighter_than_mul() {
        // -a * b parses as (-a) * b
        let expr = parse_expr("-a * b");
        let Expr::Binary { op, left, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Mul);
        assert!(matches!(
            left.as_ref(),
            Expr::Unary {
                op: UnaryOp::Neg,
                ..
            }
        ));
    }

    #[test]
    fn test_length_expression() {
        // |login| % 2 = 1 (scenario S3)
        let expr = parse_expr("|login| % 2 = 1");
        let Expr::Binary { op, left, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Eq);
        let Expr::Binary {
            op: BinaryOp::Mod,
            left: len,
            ..
        } = left.as_ref()
        else {
            panic!("expected modulo");
        };
        assert!(matches!(
            len.as_ref(),
            Expr::Unary {
                op: UnaryOp::Length,
                ..
            }
        ));
    }

    #[test]
    fn test_is_null_postfix_binds_tightest() {
        // a + b IS NULL parses as a + (b IS NULL)
        let expr = parse_expr("a + b is null");
        let Expr::Binary { op, right, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(
            right.as_ref(),
            Expr::Unary {
                op: UnaryOp::IsNull,
                ..
            }
        ));
    }

    #[test]
    fn test_round_trip_statements() {
        for sql in [
            "CREATE TABLE t ({KEY, AUTOINCREMENT} id: INT32, {UNIQUE} login: STRING[8])",
            "CREATE TABLE t2 AS (SELECT * FROM t WHERE TRUE)",
            "INSERT (login = \"a\", hash = 0x1234) TO t",
            "SELECT u.login AS user, (id + 1) AS n FROM (u JOIN p ON u.id = p.uid) WHERE TRUE",
            "DELETE FROM t WHERE id = 1",
            "UPDATE t SET login = \"b\" WHERE id = 1",
            "DROP TABLE t",
        ] {
            let stmt = parse(sql).unwrap();
            let rendered = stmt.to_string();
            let reparsed = parse(&rendered)
                .unwrap_or_else(|e| panic!("reparse of {rendered:?} failed: {e}"));
            assert_eq!(stmt, reparsed, "{sql}");
        }
    }

    #[test]
    fn test_error_carries_offending_token() {
        let err = parse("select * from t where ?").unwrap_err();
        assert!(err.message.contains("unexpected character"));

        let err = parse("select * from t limit 1").unwrap_err();
        assert_eq!(err.found, Some(TokenKind::Name(String::from("limit"))));
    }
}
