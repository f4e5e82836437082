use crate::ast::{
    ArithOp, CompareOp, Condition, FieldPath, Operand, PathSegment, Projection, SelectList, Token,
    ValueExpr,
};
use crate::lexer::{Lexer, Position, Spanned, SyntaxError};
use crate::value::Value;
use std::fmt;

/// The aggregate of every syntax error found while parsing one expression.
///
/// The parser does not stop at the first problem: it records the error,
/// resynchronises at the next clause boundary (`and`/`or` in a where clause,
/// `,` in a select list) and keeps going, so a single pass reports everything
/// that is wrong with the expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub errors: Vec<SyntaxError>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse expression due to: ")?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Parse a `where` clause into a [`Condition`] tree.
///
/// Blank input short-circuits to `Ok(None)` without a parse attempt; a
/// compiled matcher for `None` accepts every record.
pub fn parse_where(expression: &str) -> Result<Option<Condition>, ParseError> {
    if expression.trim().is_empty() {
        return Ok(None);
    }

    let mut parser = Parser::new(expression);
    let condition = parser.parse_or();
    parser.expect_eof();
    parser.finish().map(|()| Some(condition))
}

/// Parse a `select` clause into a [`SelectList`].
///
/// Blank input or a bare `*` short-circuits to the identity projection.
pub fn parse_select(expression: &str) -> Result<SelectList, ParseError> {
    if expression.trim().is_empty() {
        return Ok(SelectList::identity());
    }

    let mut parser = Parser::new(expression);

    if parser.check(&Token::Star) && parser.peek_is_eof() {
        return Ok(SelectList::identity());
    }

    let mut projections = vec![parser.parse_sublist()];
    while parser.check(&Token::Comma) {
        parser.advance();
        projections.push(parser.parse_sublist());
    }
    parser.expect_eof();
    parser.finish().map(|()| SelectList { projections })
}

struct Parser {
    tokens: Vec<Spanned>,
    position: usize,
    errors: Vec<SyntaxError>,
}

impl Parser {
    fn new(expression: &str) -> Self {
        let (tokens, errors) = Lexer::new(expression).tokenize();
        Parser {
            tokens,
            position: 0,
            errors,
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.position].token
    }

    fn current_position(&self) -> Position {
        self.tokens[self.position].position
    }

    fn peek_is_eof(&self) -> bool {
        self.tokens
            .get(self.position + 1)
            .is_none_or(|s| s.token == Token::Eof)
    }

    fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(token)
    }

    fn error_here(&mut self, message: impl Into<String>) {
        let position = self.current_position();
        self.errors.push(SyntaxError::new(message, position));
    }

    fn expect(&mut self, expected: Token) {
        if self.check(&expected) {
            self.advance();
        } else {
            self.error_here(format!("expected '{}', got '{}'", expected, self.current()));
        }
    }

    fn expect_eof(&mut self) {
        if !self.check(&Token::Eof) {
            self.error_here(format!("unexpected trailing input '{}'", self.current()));
        }
    }

    fn finish(self) -> Result<(), ParseError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ParseError {
                errors: self.errors,
            })
        }
    }

    /// Skip ahead to the next conjunction, closing paren, or end of input.
    fn recover_where(&mut self) {
        loop {
            match self.current() {
                Token::And | Token::Or | Token::RParen | Token::Eof => break,
                _ => self.advance(),
            }
        }
    }

    /// Skip ahead to the next select-list comma or end of input.
    fn recover_select(&mut self) {
        loop {
            match self.current() {
                Token::Comma | Token::Eof => break,
                _ => self.advance(),
            }
        }
    }

    // a throwaway leaf emitted after an error has been recorded; never
    // observable because finish() fails when any error exists
    fn placeholder() -> Condition {
        Condition::compare(
            Operand::Literal(Value::Null),
            CompareOp::Eq,
            Operand::Literal(Value::Null),
        )
    }

    // ---- where clause -------------------------------------------------

    fn parse_or(&mut self) -> Condition {
        let mut left = self.parse_and();
        while self.check(&Token::Or) {
            self.advance();
            let right = self.parse_and();
            left = Condition::or(left, right);
        }
        left
    }

    fn parse_and(&mut self) -> Condition {
        let mut left = self.parse_unary();
        while self.check(&Token::And) {
            self.advance();
            let right = self.parse_unary();
            left = Condition::and(left, right);
        }
        left
    }

    fn parse_unary(&mut self) -> Condition {
        if self.check(&Token::Not) {
            self.advance();
            return Condition::not(self.parse_unary());
        }
        if self.check(&Token::LParen) {
            self.advance();
            let grouped = self.parse_or();
            self.expect(Token::RParen);
            return grouped;
        }
        self.parse_predicate()
    }

    fn parse_predicate(&mut self) -> Condition {
        let lhs = match self.parse_operand() {
            Some(operand) => operand,
            None => {
                self.recover_where();
                return Self::placeholder();
            }
        };

        let op = match self.current() {
            Token::Eq => CompareOp::Eq,
            Token::Ne => CompareOp::Ne,
            Token::Lt => CompareOp::Lt,
            Token::Le => CompareOp::Le,
            Token::Gt => CompareOp::Gt,
            Token::Ge => CompareOp::Ge,
            Token::Like => {
                self.advance();
                return self.finish_comparison(lhs, CompareOp::Like);
            }
            Token::In => {
                self.advance();
                return Condition::compare(lhs, CompareOp::In, self.parse_in_list());
            }
            Token::Not => {
                // `not like ...` / `not in (...)`
                self.advance();
                return match self.current() {
                    Token::Like => {
                        self.advance();
                        Condition::not(self.finish_comparison(lhs, CompareOp::Like))
                    }
                    Token::In => {
                        self.advance();
                        Condition::not(Condition::compare(
                            lhs,
                            CompareOp::In,
                            self.parse_in_list(),
                        ))
                    }
                    other => {
                        self.error_here(format!("expected 'like' or 'in' after 'not', got '{}'", other));
                        self.recover_where();
                        Self::placeholder()
                    }
                };
            }
            Token::Is => {
                // `is null` / `is not null` compile to an equality against null
                self.advance();
                let negated = self.check(&Token::Not);
                if negated {
                    self.advance();
                }
                self.expect(Token::Null);
                let comparison =
                    Condition::compare(lhs, CompareOp::Eq, Operand::Literal(Value::Null));
                return if negated {
                    Condition::not(comparison)
                } else {
                    comparison
                };
            }
            other => {
                self.error_here(format!("expected a comparison operator, got '{}'", other));
                self.recover_where();
                return Self::placeholder();
            }
        };

        self.advance();
        self.finish_comparison(lhs, op)
    }

    fn finish_comparison(&mut self, lhs: Operand, op: CompareOp) -> Condition {
        match self.parse_operand() {
            Some(rhs) => Condition::compare(lhs, op, rhs),
            None => {
                self.recover_where();
                Self::placeholder()
            }
        }
    }

    /// A comparison operand: a literal or a field path. Records an error and
    /// returns `None` when neither fits.
    fn parse_operand(&mut self) -> Option<Operand> {
        if let Some(literal) = self.parse_literal() {
            return Some(Operand::Literal(literal));
        }
        if self.check(&Token::Identifier(String::new())) {
            return Some(Operand::Path(self.parse_path()));
        }
        self.error_here(format!(
            "expected a field path or literal, got '{}'",
            self.current()
        ));
        None
    }

    /// Consume a literal token if one is next. `-` followed by a number is a
    /// negative numeric literal.
    fn parse_literal(&mut self) -> Option<Value> {
        let literal = match self.current().clone() {
            Token::Integer(n) => Value::Integer(n),
            Token::Float(n) => Value::Float(n),
            Token::String(s) => Value::String(s),
            Token::Boolean(b) => Value::Boolean(b),
            Token::Null => Value::Null,
            Token::Minus => {
                self.advance();
                return match self.current().clone() {
                    Token::Integer(n) => {
                        self.advance();
                        Some(Value::Integer(-n))
                    }
                    Token::Float(n) => {
                        self.advance();
                        Some(Value::Float(-n))
                    }
                    other => {
                        self.error_here(format!("expected a number after '-', got '{}'", other));
                        Some(Value::Null)
                    }
                };
            }
            _ => return None,
        };
        self.advance();
        Some(literal)
    }

    fn parse_in_list(&mut self) -> Operand {
        self.expect(Token::LParen);
        let mut values = Vec::new();
        loop {
            match self.parse_literal() {
                Some(value) => values.push(value),
                None => {
                    self.error_here(format!(
                        "expected a literal in the 'in' list, got '{}'",
                        self.current()
                    ));
                    self.recover_where();
                    return Operand::List(values);
                }
            }
            if self.check(&Token::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(Token::RParen);
        Operand::List(values)
    }

    /// A dotted, bracket-aware field path: `a.b[0].c` or `items[*].price`.
    fn parse_path(&mut self) -> FieldPath {
        let mut segments = Vec::new();
        if let Token::Identifier(name) = self.current().clone() {
            segments.push(PathSegment::Field(name));
            self.advance();
        }

        loop {
            if self.check(&Token::Dot) {
                self.advance();
                match self.current().clone() {
                    Token::Identifier(name) => {
                        segments.push(PathSegment::Field(name));
                        self.advance();
                    }
                    other => {
                        self.error_here(format!("expected a field name after '.', got '{}'", other));
                        break;
                    }
                }
            } else if self.check(&Token::LBracket) {
                self.advance();
                match self.current().clone() {
                    Token::Integer(n) if n >= 0 => {
                        segments.push(PathSegment::Index(n as usize));
                        self.advance();
                    }
                    Token::Star => {
                        segments.push(PathSegment::AnyElement);
                        self.advance();
                    }
                    other => {
                        self.error_here(format!(
                            "expected an array index or '*' inside brackets, got '{}'",
                            other
                        ));
                        break;
                    }
                }
                self.expect(Token::RBracket);
            } else {
                break;
            }
        }

        FieldPath::new(segments)
    }

    // ---- select clause ------------------------------------------------

    fn parse_sublist(&mut self) -> Projection {
        let expr = self.parse_additive();

        let alias = if self.check(&Token::As) {
            self.advance();
            match self.current().clone() {
                Token::Identifier(name) => {
                    self.advance();
                    Some(name)
                }
                other => {
                    self.error_here(format!("expected an alias after 'as', got '{}'", other));
                    self.recover_select();
                    None
                }
            }
        } else {
            None
        };

        if !self.check(&Token::Comma) && !self.check(&Token::Eof) {
            self.error_here(format!(
                "unexpected '{}' in select expression",
                self.current()
            ));
            self.recover_select();
        }

        Projection { expr, alias }
    }

    fn parse_additive(&mut self) -> ValueExpr {
        let mut left = self.parse_multiplicative();
        loop {
            let op = match self.current() {
                Token::Plus => ArithOp::Add,
                Token::Minus => ArithOp::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative();
            left = ValueExpr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        left
    }

    fn parse_multiplicative(&mut self) -> ValueExpr {
        let mut left = self.parse_select_primary();
        loop {
            let op = match self.current() {
                Token::Star => ArithOp::Multiply,
                Token::Slash => ArithOp::Divide,
                _ => break,
            };
            self.advance();
            let right = self.parse_select_primary();
            left = ValueExpr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        left
    }

    fn parse_select_primary(&mut self) -> ValueExpr {
        if self.check(&Token::LParen) {
            self.advance();
            let grouped = self.parse_additive();
            self.expect(Token::RParen);
            return grouped;
        }
        if let Some(literal) = self.parse_literal() {
            return ValueExpr::Literal(literal);
        }
        if self.check(&Token::Identifier(String::new())) {
            return ValueExpr::Path(self.parse_path());
        }
        self.error_here(format!(
            "expected a field path or literal, got '{}'",
            self.current()
        ));
        self.recover_select();
        ValueExpr::Literal(Value::Null)
    }
}
