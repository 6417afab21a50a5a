//! # oxide-db-core
//!
//! Tokenizer, AST and parser for the oxide-db SQL dialect.
//!
//! This crate is the front end of the engine: it turns source text into a
//! typed [`ast::Statement`] tree and knows nothing about tables or storage.
//!
//! ```rust
//! use oxide_db_core::{Parser, ast::Statement};
//!
//! let mut parser = Parser::new("select * from users where id > 0;");
//! let statements = parser.parse_program().unwrap();
//! assert!(matches!(statements[0], Statement::Select(_)));
//! ```
//!
//! The dialect is deliberately small: a handful of statement forms, five
//! literal kinds, fixed-width `STRING[n]`/`BYTES[n]` types, and a compact
//! operator algebra with `|expr|` for byte length and single-token
//! `IS [NOT] NULL` tests.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{Expr, Statement};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{ParseError, Parser};
