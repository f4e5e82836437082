use crate::ast::{CompareOp, FieldPath};
use crate::value::Value;

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A field path resolved against the record under evaluation
    Path(FieldPath),

    /// A literal value
    Literal(Value),

    /// A literal list, the right-hand side of `in (...)`
    List(Vec<Value>),
}

/// A single `field <operator> value` comparison.
///
/// `is null` is represented as an equality against the null literal;
/// `is not null`, `not like` and `not in` are [`Condition::Not`] wrappers
/// around the positive form rather than a flag on the comparison itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub lhs: Operand,
    pub op: CompareOp,
    pub rhs: Operand,
}

/// The boolean condition tree of a parsed `where` clause.
///
/// Conjunctions are structural: `a and b or c` parses as
/// `Or(And(a, b), c)` (AND binds tighter than OR) and parentheses group
/// explicitly. Evaluation short-circuits left to right.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A leaf comparison
    Compare(Comparison),

    /// Logical conjunction (`and`)
    And(Box<Condition>, Box<Condition>),

    /// Logical disjunction (`or`)
    Or(Box<Condition>, Box<Condition>),

    /// Logical negation (`not`, `not like`, `not in`, `is not null`)
    Not(Box<Condition>),
}

impl Condition {
    pub fn and(left: Condition, right: Condition) -> Condition {
        Condition::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Condition, right: Condition) -> Condition {
        Condition::Or(Box::new(left), Box::new(right))
    }

    pub fn not(inner: Condition) -> Condition {
        Condition::Not(Box::new(inner))
    }

    pub fn compare(lhs: Operand, op: CompareOp, rhs: Operand) -> Condition {
        Condition::Compare(Comparison { lhs, op, rhs })
    }
}
