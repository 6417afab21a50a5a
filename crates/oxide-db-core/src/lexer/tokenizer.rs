//! SQL tokenizer implementation.

use crate::ast::ColumnType;

use super::{Keyword, Span, Token, TokenKind};

/// A lexer that tokenizes dialect input.
///
/// The lexer is a restartable lazy token source: the parser pulls one token
/// at a time via [`Lexer::next_token`]. Whitespace and comments are skipped.
pub struct Lexer<'a> {
    /// The input source text.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace and `--` line comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(|c| c.is_whitespace()) {
                self.advance();
            }

            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            break;
        }
    }

    /// Creates a token with the current span.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn error_token(&self, message: impl Into<String>) -> Token {
        self.make_token(TokenKind::Error(message.into()))
    }

    /// Scans a word (`[A-Za-z_][A-Za-z0-9_]*`) starting at the current
    /// position and returns it.
    fn scan_word(&mut self) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }
        &input[start..self.pos]
    }

    /// Scans an identifier, keyword, type, or qualified name.
    fn scan_identifier(&mut self) -> Token {
        let word = self.scan_word();

        if word.eq_ignore_ascii_case("IS") {
            return self.scan_is_keyword();
        }
        if let Some(keyword) = Keyword::from_str(word) {
            return self.make_token(TokenKind::Keyword(keyword));
        }
        if let Some(token) = self.scan_type(word) {
            return token;
        }

        // NAME.NAME is one token; NAME.* is a qualified star.
        if self.peek() == Some('.') {
            match self.peek_next() {
                Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                    self.advance();
                    let column = self.scan_word();
                    return self
                        .make_token(TokenKind::ColumnName(word.to_owned(), column.to_owned()));
                }
                Some('*') => {
                    self.advance();
                    self.advance();
                    return self.make_token(TokenKind::QualifiedStar(word.to_owned()));
                }
                _ => {}
            }
        }

        self.make_token(TokenKind::Name(word.to_owned()))
    }

    /// Merges `IS NULL` / `IS NOT NULL` into a single keyword token.
    ///
    /// A bare `IS` falls back to a plain name so the parser reports it.
    fn scan_is_keyword(&mut self) -> Token {
        let saved = self.pos;

        self.skip_whitespace_and_comments();
        let word = self.scan_word();
        if word.eq_ignore_ascii_case("NULL") {
            return self.make_token(TokenKind::Keyword(Keyword::IsNull));
        }
        if word.eq_ignore_ascii_case("NOT") {
            self.skip_whitespace_and_comments();
            let word = self.scan_word();
            if word.eq_ignore_ascii_case("NULL") {
                return self.make_token(TokenKind::Keyword(Keyword::IsNotNull));
            }
        }

        self.pos = saved;
        self.make_token(TokenKind::Name(self.input[self.start..saved].to_owned()))
    }

    /// Recognizes `BOOL`, `INT32`, `STRING[<n>]` and `BYTES[<n>]`.
    ///
    /// `STRING` or `BYTES` without a `[<n>]` suffix is a plain name.
    fn scan_type(&mut self, word: &str) -> Option<Token> {
        let upper = word.to_ascii_uppercase();
        match upper.as_str() {
            "BOOL" => Some(self.make_token(TokenKind::Type(ColumnType::Bool))),
            "INT32" => Some(self.make_token(TokenKind::Type(ColumnType::Int32))),
            "STRING" | "BYTES" => {
                if self.peek() != Some('[') {
                    return None;
                }
                self.advance();
                let digits_start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
                let digits = &self.input[digits_start..self.pos];
                if digits.is_empty() || self.peek() != Some(']') {
                    return Some(self.error_token("malformed type length"));
                }
                let Ok(length) = digits.parse::<u32>() else {
                    return Some(self.error_token("type length out of range"));
                };
                self.advance();
                let ty = if upper == "STRING" {
                    ColumnType::String(length)
                } else {
                    ColumnType::Bytes(length)
                };
                Some(self.make_token(TokenKind::Type(ty)))
            }
            _ => None,
        }
    }

    /// Scans a decimal integer or a `0x` hex byte literal.
    fn scan_number(&mut self) -> Token {
        if self.peek() == Some('0') && self.peek_next() == Some('x') {
            self.advance();
            self.advance();
            return self.scan_hex();
        }

        let digits = self.scan_word();
        match digits.parse::<i32>() {
            Ok(n) => self.make_token(TokenKind::Integer(n)),
            Err(_) => self.error_token(format!("integer literal out of range: {digits}")),
        }
    }

    /// Scans the digits of a hex literal into a little-endian byte array:
    /// pairs are consumed right-to-left from the text, so `0x1234` becomes
    /// `[0x34, 0x12]` and an odd leading digit forms the final byte.
    fn scan_hex(&mut self) -> Token {
        let digits_start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.advance();
        }
        let digits = &self.input[digits_start..self.pos];
        if digits.is_empty() {
            return self.error_token("empty hex literal");
        }

        let chars: Vec<char> = digits.chars().collect();
        let mut bytes = Vec::with_capacity(chars.len().div_ceil(2));
        let mut i = chars.len();
        while i > 0 {
            let lo = chars[i - 1].to_digit(16).unwrap_or(0) as u8;
            let hi = if i >= 2 {
                chars[i - 2].to_digit(16).unwrap_or(0) as u8
            } else {
                0
            };
            bytes.push((hi << 4) | lo);
            i = i.saturating_sub(2);
        }
        self.make_token(TokenKind::Hex(bytes))
    }

    /// Scans a string literal. No embedded quotes, no escapes.
    fn scan_string(&mut self, quote: char) -> Token {
        self.advance();
        let content_start = self.pos;

        loop {
            match self.peek() {
                Some(c) if c == quote => break,
                Some(_) => {
                    self.advance();
                }
                None => return self.error_token("unterminated string literal"),
            }
        }

        let content = self.input[content_start..self.pos].to_owned();
        self.advance();
        self.make_token(TokenKind::String(content))
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let c = match self.peek() {
            Some(c) => c,
            None => return self.make_token(TokenKind::Eof),
        };

        match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            ',' => self.single(TokenKind::Comma),
            ':' => self.single(TokenKind::Colon),
            ';' => self.single(TokenKind::Semicolon),
            '*' => self.single(TokenKind::Star),
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '/' => self.single(TokenKind::Slash),
            '%' => self.single(TokenKind::Percent),
            '|' => self.single(TokenKind::Pipe),
            '&' => self.single(TokenKind::Amp),
            '~' => self.single(TokenKind::Tilde),
            '=' => self.single(TokenKind::Eq),
            '<' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::LtEq)
                } else {
                    self.make_token(TokenKind::Lt)
                }
            }
            '>' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::GtEq)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }
            '!' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.error_token("unexpected character: !")
                }
            }
            '\'' | '"' => self.scan_string(c),
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(),
            c => {
                self.advance();
                self.error_token(format!("unexpected character: {c}"))
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        self.advance();
        self.make_token(kind)
    }

    /// Tokenizes the entire input.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}
