use crate::ast::{ArithOp, CompareOp, Comparison, Condition, FieldPath, Operand, PathSegment, ValueExpr};
use crate::value::Value;
use regex::Regex;
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use std::collections::HashMap;

/// Errors that can occur while evaluating a condition or projection against
/// a record.
#[derive(Debug, Clone)]
pub enum EvalError {
    /// Type mismatch or invalid operation for the given types
    TypeError(String),

    /// A `like` pattern that is not a valid regular expression
    PatternError(String),

    /// Division by zero
    DivisionByZero,
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::TypeError(msg) => write!(f, "Type error: {}", msg),
            EvalError::PatternError(msg) => write!(f, "Invalid pattern: {}", msg),
            EvalError::DivisionByZero => write!(f, "Division by zero"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Regex patterns appearing as `like` literals in a condition, compiled
/// once when the artifact is built rather than per evaluated record.
/// Patterns that fail to compile are left out and reported when the
/// comparison is evaluated; patterns that arrive through a field path are
/// only known at evaluation time and compile there.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    compiled: HashMap<String, Regex>,
}

impl PatternSet {
    pub fn from_condition(condition: &Condition) -> Self {
        let mut set = PatternSet::default();
        set.collect(condition);
        set
    }

    fn collect(&mut self, condition: &Condition) {
        match condition {
            Condition::And(left, right) | Condition::Or(left, right) => {
                self.collect(left);
                self.collect(right);
            }
            Condition::Not(inner) => self.collect(inner),
            Condition::Compare(comparison) => {
                if comparison.op == CompareOp::Like
                    && let Operand::Literal(Value::String(pattern)) = &comparison.rhs
                    && let Ok(regex) = Regex::new(pattern)
                {
                    self.compiled.insert(pattern.clone(), regex);
                }
            }
        }
    }

    fn get(&self, pattern: &str) -> Option<&Regex> {
        self.compiled.get(pattern)
    }
}

/// One record under evaluation.
///
/// When the record came out of a single-key array wrapper, `strip_prefix`
/// carries the wrapper key so paths written against the wrapped document
/// (`lines[*].price`) still resolve against the unwrapped element.
pub struct EvalScope<'a> {
    record: &'a Value,
    strip_prefix: Option<&'a str>,
}

impl<'a> EvalScope<'a> {
    pub fn new(record: &'a Value) -> Self {
        EvalScope {
            record,
            strip_prefix: None,
        }
    }

    pub fn with_prefix(record: &'a Value, prefix: &'a str) -> Self {
        EvalScope {
            record,
            strip_prefix: Some(prefix),
        }
    }

    /// Resolves a field path to every value it addresses. A `[*]` segment
    /// fans out across the array it lands on; missing fields and
    /// out-of-range indexes resolve to null rather than erroring.
    fn resolve(&self, path: &FieldPath) -> Vec<Value> {
        let mut segments: &[PathSegment] = &path.segments;
        if let Some(prefix) = self.strip_prefix
            && let Some(PathSegment::Field(first)) = segments.first()
            && first == prefix
        {
            segments = &segments[1..];
            // the record already is one element of the wrapper array, so a
            // quantifier written right after the wrapper key is satisfied
            if let Some(PathSegment::AnyElement) = segments.first() {
                segments = &segments[1..];
            }
        }
        resolve_segments(self.record, segments)
    }

    pub fn eval_condition(
        &self,
        condition: &Condition,
        patterns: &PatternSet,
    ) -> Result<bool, EvalError> {
        match condition {
            Condition::And(left, right) => {
                Ok(self.eval_condition(left, patterns)? && self.eval_condition(right, patterns)?)
            }
            Condition::Or(left, right) => {
                Ok(self.eval_condition(left, patterns)? || self.eval_condition(right, patterns)?)
            }
            Condition::Not(inner) => Ok(!self.eval_condition(inner, patterns)?),
            Condition::Compare(comparison) => self.eval_comparison(comparison, patterns),
        }
    }

    /// A comparison holds as soon as any addressed left value matches any
    /// right value, so `items[*].quantity = 10` is an existential test over
    /// the array.
    fn eval_comparison(
        &self,
        comparison: &Comparison,
        patterns: &PatternSet,
    ) -> Result<bool, EvalError> {
        let lhs_values = self.operand_values(&comparison.lhs)?;

        if comparison.op == CompareOp::In {
            let Operand::List(candidates) = &comparison.rhs else {
                return Err(EvalError::TypeError(
                    "'in' requires a parenthesised value list".to_string(),
                ));
            };
            return Ok(lhs_values
                .iter()
                .any(|lhs| candidates.iter().any(|c| loose_eq(lhs, c))));
        }

        let rhs_values = self.operand_values(&comparison.rhs)?;
        for lhs in &lhs_values {
            for rhs in &rhs_values {
                if compare_values(comparison.op, lhs, rhs, patterns)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn operand_values(&self, operand: &Operand) -> Result<Vec<Value>, EvalError> {
        match operand {
            Operand::Path(path) => Ok(self.resolve(path)),
            Operand::Literal(value) => Ok(vec![value.clone()]),
            Operand::List(_) => Err(EvalError::TypeError(
                "a value list is only valid after 'in'".to_string(),
            )),
        }
    }

    pub fn eval_value_expr(&self, expr: &ValueExpr) -> Result<Value, EvalError> {
        match expr {
            ValueExpr::Literal(value) => Ok(value.clone()),
            ValueExpr::Path(path) => {
                Ok(self.resolve(path).into_iter().next().unwrap_or(Value::Null))
            }
            ValueExpr::Binary { op, left, right } => {
                let left = self.eval_value_expr(left)?;
                let right = self.eval_value_expr(right)?;
                apply_binop(*op, &left, &right)
            }
        }
    }
}

fn resolve_segments(value: &Value, segments: &[PathSegment]) -> Vec<Value> {
    let Some((head, rest)) = segments.split_first() else {
        return vec![value.clone()];
    };
    match (head, value) {
        (PathSegment::Field(name), Value::Object(map)) => match map.get(name) {
            Some(inner) => resolve_segments(inner, rest),
            None => vec![Value::Null],
        },
        (PathSegment::Index(index), Value::Array(items)) => match items.get(*index) {
            Some(inner) => resolve_segments(inner, rest),
            None => vec![Value::Null],
        },
        (PathSegment::AnyElement, Value::Array(items)) => items
            .iter()
            .flat_map(|item| resolve_segments(item, rest))
            .collect(),
        (PathSegment::AnyElement, _) => Vec::new(),
        _ => vec![Value::Null],
    }
}

/// Equality across the numeric tower: `10` equals `10.0`. Null equals only
/// null, and values of unrelated types are unequal rather than an error.
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Integer(x), Value::Integer(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Integer(x), Value::Float(y)) | (Value::Float(y), Value::Integer(x)) => {
            *x as f64 == *y
        }
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| loose_eq(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| loose_eq(v, other)))
        }
        _ => false,
    }
}

fn compare_values(
    op: CompareOp,
    lhs: &Value,
    rhs: &Value,
    patterns: &PatternSet,
) -> Result<bool, EvalError> {
    match op {
        CompareOp::Eq => Ok(loose_eq(lhs, rhs)),
        CompareOp::Ne => Ok(!loose_eq(lhs, rhs)),
        CompareOp::Like => eval_like(lhs, rhs, patterns),
        CompareOp::In => unreachable!("in is handled before pairwise comparison"),
        CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => {
            // a null on either side fails the ordering instead of erroring,
            // matching how missing fields resolve
            if lhs.is_null() || rhs.is_null() {
                return Ok(false);
            }
            let ordering = match (lhs, rhs) {
                (Value::String(a), Value::String(b)) => a.cmp(b),
                _ => {
                    let (Some(a), Some(b)) = (lhs.as_float(), rhs.as_float()) else {
                        return Err(EvalError::TypeError(format!(
                            "cannot order {} against {}",
                            lhs.type_name(),
                            rhs.type_name()
                        )));
                    };
                    a.partial_cmp(&b).ok_or_else(|| {
                        EvalError::TypeError("cannot order NaN".to_string())
                    })?
                }
            };
            Ok(match op {
                CompareOp::Lt => ordering.is_lt(),
                CompareOp::Le => ordering.is_le(),
                CompareOp::Gt => ordering.is_gt(),
                CompareOp::Ge => ordering.is_ge(),
                _ => unreachable!(),
            })
        }
    }
}

/// `like` matches when the pattern, taken as a regular expression, is found
/// anywhere in the string, so `name like 'ta'` matches `"tap"`. Literal
/// patterns come precompiled through the [`PatternSet`]; anything else
/// (an invalid pattern, or one resolved from a field) compiles here.
fn eval_like(lhs: &Value, rhs: &Value, patterns: &PatternSet) -> Result<bool, EvalError> {
    let Value::String(pattern) = rhs else {
        return Err(EvalError::TypeError(format!(
            "'like' pattern must be a string, got {}",
            rhs.type_name()
        )));
    };
    let Value::String(subject) = lhs else {
        return Ok(false);
    };
    match patterns.get(pattern) {
        Some(regex) => Ok(regex.is_match(subject)),
        None => {
            let regex = Regex::new(pattern).map_err(|e| EvalError::PatternError(e.to_string()))?;
            Ok(regex.is_match(subject))
        }
    }
}

fn apply_binop(op: ArithOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => match op {
            ArithOp::Add => Ok(Value::Integer(a + b)),
            ArithOp::Subtract => Ok(Value::Integer(a - b)),
            ArithOp::Multiply => Ok(Value::Integer(a * b)),
            ArithOp::Divide => {
                if *b == 0 {
                    Err(EvalError::DivisionByZero)
                } else if a % b == 0 {
                    Ok(Value::Integer(a / b))
                } else {
                    Ok(Value::Float(*a as f64 / *b as f64))
                }
            }
        },
        (Value::Float(a), Value::Float(b)) => {
            if op == ArithOp::Divide && *b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Float(match op {
                ArithOp::Add => a + b,
                ArithOp::Subtract => a - b,
                ArithOp::Multiply => a * b,
                ArithOp::Divide => a / b,
            }))
        }
        (Value::Integer(a), Value::Float(b)) => {
            mixed_binop(op, Decimal::from_i64(*a), Decimal::from_f64(*b), *a as f64, *b)
        }
        (Value::Float(a), Value::Integer(b)) => {
            mixed_binop(op, Decimal::from_f64(*a), Decimal::from_i64(*b), *a, *b as f64)
        }
        (Value::String(a), b) if op == ArithOp::Add => {
            Ok(Value::String(format!("{}{}", a, b.as_string())))
        }
        (a, Value::String(b)) if op == ArithOp::Add => {
            Ok(Value::String(format!("{}{}", a.as_string(), b)))
        }
        (a, b) => Err(EvalError::TypeError(format!(
            "cannot apply '{}' to {} and {}",
            op.symbol(),
            a.type_name(),
            b.type_name()
        ))),
    }
}

/// Mixed integer/float arithmetic goes through `Decimal` so `2 * 49.99`
/// comes out as `99.98` and `5 + 10.0` collapses back to an integer. The
/// plain f64 operands are the fallback when the decimal conversion fails.
fn mixed_binop(
    op: ArithOp,
    left: Option<Decimal>,
    right: Option<Decimal>,
    left_f: f64,
    right_f: f64,
) -> Result<Value, EvalError> {
    if op == ArithOp::Divide && right_f == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    if let (Some(a), Some(b)) = (left, right) {
        let result = match op {
            ArithOp::Add => Some(a + b),
            ArithOp::Subtract => Some(a - b),
            ArithOp::Multiply => Some(a * b),
            ArithOp::Divide => a.checked_div(b),
        };
        if let Some(r) = result {
            if r.is_integer()
                && let Some(n) = r.to_i64()
            {
                return Ok(Value::Integer(n));
            }
            if let Some(n) = r.to_f64() {
                return Ok(Value::Float(n));
            }
        }
    }
    Ok(Value::Float(match op {
        ArithOp::Add => left_f + right_f,
        ArithOp::Subtract => left_f - right_f,
        ArithOp::Multiply => left_f * right_f,
        ArithOp::Divide => left_f / right_f,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record() -> Value {
        let mut item = HashMap::new();
        item.insert("quantity".to_string(), Value::Integer(10));
        let mut map = HashMap::new();
        map.insert("name".to_string(), Value::String("tap".to_string()));
        map.insert("price".to_string(), Value::Float(49.99));
        map.insert("items".to_string(), Value::Array(vec![Value::Object(item)]));
        Value::Object(map)
    }

    #[test]
    fn test_numeric_equality_crosses_int_and_float() {
        assert!(loose_eq(&Value::Integer(10), &Value::Float(10.0)));
        assert!(!loose_eq(&Value::Integer(10), &Value::String("10".to_string())));
    }

    fn quantified_items_path() -> Operand {
        Operand::Path(FieldPath::new(vec![
            PathSegment::Field("items".to_string()),
            PathSegment::AnyElement,
            PathSegment::Field("quantity".to_string()),
        ]))
    }

    #[test]
    fn test_any_element_is_existential() {
        let record = record();
        let scope = EvalScope::new(&record);
        let condition = Condition::compare(
            quantified_items_path(),
            CompareOp::Eq,
            Operand::Literal(Value::Integer(10)),
        );
        assert!(scope.eval_condition(&condition, &PatternSet::default()).unwrap());
    }

    #[test]
    fn test_stripped_prefix_also_absorbs_the_quantifier() {
        // the element under evaluation already came out of the wrapper
        // array, so `items[*].quantity` means its own `quantity` field
        let mut element = HashMap::new();
        element.insert("quantity".to_string(), Value::Integer(10));
        let element = Value::Object(element);
        let scope = EvalScope::with_prefix(&element, "items");
        let condition = Condition::compare(
            quantified_items_path(),
            CompareOp::Eq,
            Operand::Literal(Value::Integer(10)),
        );
        assert!(scope.eval_condition(&condition, &PatternSet::default()).unwrap());
    }

    #[test]
    fn test_literal_like_patterns_are_compiled_up_front() {
        let name_path = Operand::Path(FieldPath::new(vec![PathSegment::Field(
            "name".to_string(),
        )]));
        let condition = Condition::and(
            Condition::compare(
                name_path.clone(),
                CompareOp::Like,
                Operand::Literal(Value::String("ta".to_string())),
            ),
            Condition::not(Condition::compare(
                name_path.clone(),
                CompareOp::Like,
                Operand::Literal(Value::String("ink".to_string())),
            )),
        );
        let patterns = PatternSet::from_condition(&condition);
        assert!(patterns.get("ta").is_some());
        assert!(patterns.get("ink").is_some());

        // an invalid pattern stays out of the set and errors at evaluation
        let invalid = Condition::compare(
            name_path,
            CompareOp::Like,
            Operand::Literal(Value::String("(".to_string())),
        );
        assert!(PatternSet::from_condition(&invalid).get("(").is_none());
    }

    #[test]
    fn test_mixed_arithmetic_keeps_decimal_precision() {
        let doubled = apply_binop(ArithOp::Multiply, &Value::Integer(2), &Value::Float(49.99));
        assert!(matches!(doubled, Ok(Value::Float(n)) if n == 99.98));
        let exact = apply_binop(ArithOp::Add, &Value::Integer(5), &Value::Float(10.0));
        assert!(matches!(exact, Ok(Value::Integer(15))));
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        let result = apply_binop(ArithOp::Divide, &Value::Integer(1), &Value::Integer(0));
        assert!(matches!(result, Err(EvalError::DivisionByZero)));
    }
}
