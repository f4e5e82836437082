use crate::ast::Token;
use std::fmt;

/// A 1-based line/column position within an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A single syntax error with its position. Lexing and parsing both record
/// these; the parser aggregates every one found in a pass into a
/// [`ParseError`](crate::ParseError) rather than stopping at the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub position: Position,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        SyntaxError {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {} ] at {}", self.message, self.position)
    }
}

/// A token tagged with the position where it started.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: Position,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    errors: Vec<SyntaxError>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            errors: Vec::new(),
        }
    }

    /// Scan the whole input. Lexical errors do not abort the scan: the
    /// offending character is skipped and scanning continues, so every error
    /// in the expression is reported. The token stream always ends with
    /// [`Token::Eof`].
    pub fn tokenize(mut self) -> (Vec<Spanned>, Vec<SyntaxError>) {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token();
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                break;
            }
        }
        (tokens, self.errors)
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if self.current_char() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    fn here(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn error(&mut self, message: impl Into<String>, position: Position) {
        self.errors.push(SyntaxError::new(message, position));
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> String {
        let start = self.here();
        let mut result = String::new();
        self.advance(); // consume opening quote

        while let Some(ch) = self.current_char() {
            if ch == quote {
                // a doubled quote is an escaped quote
                if self.peek_char(1) == Some(quote) {
                    result.push(quote);
                    self.advance();
                    self.advance();
                } else {
                    self.advance();
                    return result;
                }
            } else {
                result.push(ch);
                self.advance();
            }
        }

        self.error("unterminated string literal", start);
        result
    }

    fn read_number(&mut self) -> Token {
        let start = self.here();
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if is_float {
            match number.parse::<f64>() {
                Ok(n) => Token::Float(n),
                Err(_) => {
                    self.error(format!("invalid numeric literal '{}'", number), start);
                    Token::Float(0.0)
                }
            }
        } else {
            match number.parse::<i64>() {
                Ok(n) => Token::Integer(n),
                Err(_) => {
                    self.error(format!("integer literal '{}' out of range", number), start);
                    Token::Integer(0)
                }
            }
        }
    }

    fn next_token(&mut self) -> Spanned {
        loop {
            self.skip_whitespace();
            let position = self.here();

            let token = match self.current_char() {
                None => Token::Eof,
                Some(',') => {
                    self.advance();
                    Token::Comma
                }
                Some('.') => {
                    self.advance();
                    Token::Dot
                }
                Some('*') => {
                    self.advance();
                    Token::Star
                }
                Some('+') => {
                    self.advance();
                    Token::Plus
                }
                Some('-') => {
                    self.advance();
                    Token::Minus
                }
                Some('/') => {
                    self.advance();
                    Token::Slash
                }
                Some('(') => {
                    self.advance();
                    Token::LParen
                }
                Some(')') => {
                    self.advance();
                    Token::RParen
                }
                Some('[') => {
                    self.advance();
                    Token::LBracket
                }
                Some(']') => {
                    self.advance();
                    Token::RBracket
                }
                Some('=') => {
                    self.advance();
                    if self.current_char() == Some('=') {
                        self.advance();
                    }
                    Token::Eq
                }
                Some('!') => {
                    if self.peek_char(1) == Some('=') {
                        self.advance();
                        self.advance();
                        Token::Ne
                    } else {
                        self.advance();
                        self.error("unexpected '!' (did you mean '!=')", position);
                        continue;
                    }
                }
                Some('<') => {
                    self.advance();
                    match self.current_char() {
                        Some('=') => {
                            self.advance();
                            Token::Le
                        }
                        Some('>') => {
                            self.advance();
                            Token::Ne
                        }
                        _ => Token::Lt,
                    }
                }
                Some('>') => {
                    self.advance();
                    if self.current_char() == Some('=') {
                        self.advance();
                        Token::Ge
                    } else {
                        Token::Gt
                    }
                }
                Some('\'') => Token::String(self.read_string('\'')),
                Some('"') => Token::String(self.read_string('"')),
                Some(ch) if ch.is_ascii_digit() => self.read_number(),
                Some(ch) if ch.is_alphabetic() || ch == '_' => {
                    let ident = self.read_identifier();

                    // keywords are case-insensitive, identifiers keep their case
                    match ident.to_ascii_lowercase().as_str() {
                        "and" => Token::And,
                        "or" => Token::Or,
                        "not" => Token::Not,
                        "in" => Token::In,
                        "like" => Token::Like,
                        "is" => Token::Is,
                        "as" => Token::As,
                        "null" => Token::Null,
                        "true" => Token::Boolean(true),
                        "false" => Token::Boolean(false),
                        _ => Token::Identifier(ident),
                    }
                }
                Some(ch) => {
                    self.advance();
                    self.error(format!("unexpected character '{}'", ch), position);
                    continue;
                }
            };

            return Spanned { token, position };
        }
    }
}

#[test]
fn test_keywords_case_insensitive() {
    let (tokens, errors) = Lexer::new("AND or NOT In LIKE is NULL").tokenize();
    let tokens: Vec<Token> = tokens.into_iter().map(|s| s.token).collect();
    assert!(errors.is_empty());
    assert_eq!(
        tokens,
        vec![
            Token::And,
            Token::Or,
            Token::Not,
            Token::In,
            Token::Like,
            Token::Is,
            Token::Null,
            Token::Eof,
        ]
    );
}

#[test]
fn test_where_clause_tokens() {
    let (tokens, errors) = Lexer::new("items[*].quantity = 10").tokenize();
    let tokens: Vec<Token> = tokens.into_iter().map(|s| s.token).collect();
    assert!(errors.is_empty());
    assert_eq!(
        tokens,
        vec![
            Token::Identifier("items".to_string()),
            Token::LBracket,
            Token::Star,
            Token::RBracket,
            Token::Dot,
            Token::Identifier("quantity".to_string()),
            Token::Eq,
            Token::Integer(10),
            Token::Eof,
        ]
    );
}

#[test]
fn test_errors_do_not_abort_the_scan() {
    let (tokens, errors) = Lexer::new("a ; b").tokenize();
    let tokens: Vec<Token> = tokens.into_iter().map(|s| s.token).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].position, Position { line: 1, column: 3 });
    assert_eq!(
        tokens,
        vec![
            Token::Identifier("a".to_string()),
            Token::Identifier("b".to_string()),
            Token::Eof,
        ]
    );
}
