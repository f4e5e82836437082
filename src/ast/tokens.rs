use std::fmt;

/// Lexical tokens of the Quell clause grammars.
///
/// Keywords (`and`, `or`, `not`, `in`, `like`, `is`, `null`, `as`, `true`,
/// `false`) are recognised case-insensitively; identifier text and string
/// literal content are case-preserving.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer literal
    Integer(i64),

    /// Floating-point literal
    Float(f64),

    /// String literal, single- or double-quoted; a doubled quote escapes
    /// itself (`'it''s'`)
    String(String),

    /// Boolean literal (`true`/`false`)
    Boolean(bool),

    /// `null`
    Null,

    /// Field or alias name
    Identifier(String),

    // Keywords
    /// `and`
    And,
    /// `or`
    Or,
    /// `not`
    Not,
    /// `in`
    In,
    /// `like`
    Like,
    /// `is`
    Is,
    /// `as`
    As,

    // Comparison operators
    /// `=` or `==`
    Eq,
    /// `!=` or `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,

    // Punctuation
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `*` - multiplication, the bare select-all, or `[*]`
    Star,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `/`
    Slash,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,

    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(n) => write!(f, "{}", n),
            Token::Float(n) => write!(f, "{}", n),
            Token::String(s) => write!(f, "'{}'", s),
            Token::Boolean(b) => write!(f, "{}", b),
            Token::Null => write!(f, "null"),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::Not => write!(f, "not"),
            Token::In => write!(f, "in"),
            Token::Like => write!(f, "like"),
            Token::Is => write!(f, "is"),
            Token::As => write!(f, "as"),
            Token::Eq => write!(f, "="),
            Token::Ne => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Le => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::Ge => write!(f, ">="),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::Star => write!(f, "*"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Eof => write!(f, "<eof>"),
        }
    }
}
