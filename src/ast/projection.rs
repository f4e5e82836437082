use crate::ast::{ArithOp, FieldPath};
use crate::value::Value;

/// A scalar expression in a `select` clause: a literal, a field path, or
/// arithmetic over both.
///
/// # Examples
/// ```text
/// price                      // Path
/// 'silver '                  // Literal
/// 2 * price                  // Binary
/// 5 + quantity               // Binary (literal + accessor)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpr {
    Literal(Value),
    Path(FieldPath),
    Binary {
        op: ArithOp,
        left: Box<ValueExpr>,
        right: Box<ValueExpr>,
    },
}

impl ValueExpr {
    /// Source-shaped rendering, used to derive output keys when no alias is
    /// given. String literals render without their quotes.
    fn render(&self) -> String {
        match self {
            ValueExpr::Literal(v) => v.as_string(),
            ValueExpr::Path(path) => path.to_string(),
            ValueExpr::Binary { op, left, right } => {
                format!("{}{}{}", left.render(), op.symbol(), right.render())
            }
        }
    }
}

/// One output column of a `select` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub expr: ValueExpr,
    pub alias: Option<String>,
}

impl Projection {
    /// The key this column is emitted under: the explicit alias if one was
    /// given, otherwise a key derived from the expression's source text
    /// (`"unknown"` if that comes out empty).
    pub fn output_key(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => {
                let derived = self.expr.render();
                if derived.is_empty() {
                    "unknown".to_string()
                } else {
                    derived
                }
            }
        }
    }
}

/// A parsed `select` clause: zero or more projections.
///
/// An empty list means the identity projection (`*` or a blank clause); the
/// record passes through unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectList {
    pub projections: Vec<Projection>,
}

impl SelectList {
    pub fn identity() -> Self {
        SelectList::default()
    }

    pub fn is_identity(&self) -> bool {
        self.projections.is_empty()
    }
}
