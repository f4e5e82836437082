use crate::ast::{Condition, SelectList};
use crate::eval::{EvalError, EvalScope, PatternSet};
use crate::parser::{self, ParseError};
use crate::value::Value;
use log::debug;
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// A compiled `where` clause, ready to test records. Literal `like`
/// patterns are compiled into the matcher itself, not per record.
#[derive(Debug, Clone)]
pub struct Matcher {
    condition: Option<Condition>,
    patterns: PatternSet,
}

impl Matcher {
    pub fn compile(expression: &str) -> Result<Self, ParseError> {
        let condition = parser::parse_where(expression)?;
        let patterns = condition
            .as_ref()
            .map(PatternSet::from_condition)
            .unwrap_or_default();
        Ok(Matcher {
            condition,
            patterns,
        })
    }

    /// The matcher produced by a blank `where` clause; accepts every record.
    pub fn accept_all() -> Self {
        Matcher {
            condition: None,
            patterns: PatternSet::default(),
        }
    }

    pub fn is_match(&self, record: &Value) -> Result<bool, EvalError> {
        self.is_match_scoped(&EvalScope::new(record))
    }

    pub(crate) fn is_match_scoped(&self, scope: &EvalScope<'_>) -> Result<bool, EvalError> {
        match &self.condition {
            Some(condition) => scope.eval_condition(condition, &self.patterns),
            None => Ok(true),
        }
    }
}

/// A compiled `select` clause, ready to reshape records.
#[derive(Debug, Clone)]
pub struct Projector {
    select: SelectList,
}

impl Projector {
    pub fn compile(expression: &str) -> Result<Self, ParseError> {
        Ok(Projector {
            select: parser::parse_select(expression)?,
        })
    }

    /// The projector produced by a blank or `*` select; passes records
    /// through unchanged.
    pub fn identity() -> Self {
        Projector {
            select: SelectList::identity(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.select.is_identity()
    }

    pub fn project(&self, record: &Value) -> Result<Value, EvalError> {
        self.project_scoped(&EvalScope::new(record), record)
    }

    /// Builds the projected record: one entry per select sublist, keyed by
    /// its alias or derived name. Expressions that resolve to null still
    /// produce an entry.
    pub(crate) fn project_scoped(
        &self,
        scope: &EvalScope<'_>,
        record: &Value,
    ) -> Result<Value, EvalError> {
        if self.is_identity() {
            return Ok(record.clone());
        }
        let mut output = HashMap::with_capacity(self.select.projections.len());
        for projection in &self.select.projections {
            let value = scope.eval_value_expr(&projection.expr)?;
            output.insert(projection.output_key(), value);
        }
        Ok(Value::Object(output))
    }
}

/// Compiled-artifact cache, shared by every read that goes through one
/// [`Configuration`](crate::Configuration).
///
/// Matchers and projectors live in separate LRU namespaces so a `where` and
/// a `select` with the same source text cannot collide. Compilation happens
/// while the lock is held so concurrent readers of the same expression do
/// not race to compile it twice.
pub struct ArtifactCache {
    matchers: Mutex<LruCache<String, Arc<Matcher>>>,
    projectors: Mutex<LruCache<String, Arc<Projector>>>,
}

impl ArtifactCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        ArtifactCache {
            matchers: Mutex::new(LruCache::new(capacity)),
            projectors: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Get-or-compile a matcher. Blank expressions compile to the trivial
    /// accept-all matcher without touching the cache.
    pub fn matcher(&self, expression: &str) -> Result<Arc<Matcher>, ParseError> {
        if expression.trim().is_empty() {
            return Ok(Arc::new(Matcher::accept_all()));
        }
        let mut cache = self.matchers.lock();
        if let Some(found) = cache.get(expression) {
            return Ok(Arc::clone(found));
        }
        debug!("compiling matcher for {:?}", expression);
        let compiled = Arc::new(Matcher::compile(expression)?);
        cache.put(expression.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Get-or-compile a projector. Blank and `*` expressions compile to the
    /// identity projector without touching the cache.
    pub fn projector(&self, expression: &str) -> Result<Arc<Projector>, ParseError> {
        let trimmed = expression.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(Arc::new(Projector::identity()));
        }
        let mut cache = self.projectors.lock();
        if let Some(found) = cache.get(expression) {
            return Ok(Arc::clone(found));
        }
        debug!("compiling projector for {:?}", expression);
        let compiled = Arc::new(Projector::compile(expression)?);
        cache.put(expression.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }
}
