//! # Quell Query Language - Intermediate Model
//!
//! This module defines the intermediate representation for the two Quell
//! clause grammars. Parsed expressions are captured here before being wrapped
//! into executable artifacts by the compiler.
//!
//! ## The Two Clauses
//!
//! A `where` clause is a boolean search condition over a record:
//!
//! ```text
//! quantity = 10 and (name like 'ta' or owner is null)
//! ```
//!
//! It parses into a [`Condition`] tree with structural AND/OR/NOT nodes.
//! Standard precedence applies: NOT binds tighter than AND, AND tighter than
//! OR, and parentheses group explicitly. Negating forms (`not like`,
//! `not in`, `is not null`) become [`Condition::Not`] wrappers around the
//! positive comparison.
//!
//! A `select` clause is a comma-separated list of output columns:
//!
//! ```text
//! name, 2 * price as doublePrice, items[0].name as firstItemName
//! ```
//!
//! It parses into a [`SelectList`] of [`Projection`]s, each a scalar
//! expression plus an optional alias. A bare `*` (or an empty clause) is the
//! identity projection: the record passes through unchanged.
//!
//! ## Field Paths
//!
//! Both grammars reference record fields through [`FieldPath`]s: dotted
//! segments with optional array indices (`items[0].name`) or the any-element
//! quantifier (`items[*].quantity`). Resolution is null-safe throughout;
//! a missing intermediate field yields null, never an error.
//!
//! ## Submodules
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[path]** - Field path segments and the any-element quantifier
//! - **[operators]** - Comparison and arithmetic operators
//! - **[condition]** - The boolean condition tree of a `where` clause
//! - **[projection]** - Output columns of a `select` clause

pub mod condition;
pub mod operators;
pub mod path;
pub mod projection;
pub mod tokens;

pub use condition::{Comparison, Condition, Operand};
pub use operators::{ArithOp, CompareOp};
pub use path::{FieldPath, PathSegment};
pub use projection::{Projection, SelectList, ValueExpr};
pub use tokens::Token;
