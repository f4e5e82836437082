//! A SQL-esque query language for filtering and projecting JSON records.
//!
//! Documents are parsed into a neutral record model, then queried with a
//! `where`-style filter and a `select`-style projection:
//!
//! ```
//! let json = r#"[{"name": "tap", "price": 49.99}, {"name": "sink", "price": 120.0}]"#;
//!
//! let result = quell::read(json, "name", "price < 100").unwrap();
//! assert_eq!(result, r#"{"name":"tap"}"#);
//!
//! let cheap = quell::parse(json).unwrap().exists("price < 50").unwrap();
//! assert!(cheap);
//! ```
//!
//! Expressions are compiled once and cached per [`Configuration`], so
//! repeated reads with the same `select`/`where` text reuse the compiled
//! artifacts.

pub mod ast;
pub mod compiler;
pub mod context;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod mapping;
pub mod parser;
pub mod value;

pub use compiler::{ArtifactCache, Matcher, Projector};
pub use context::{Configuration, ConfigurationBuilder, ParseContext, ReadContext, parse, read, using};
pub use error::Error;
pub use eval::EvalError;
pub use lexer::{Position, SyntaxError};
pub use mapping::{JsonMappingProvider, MappingError, MappingProvider};
pub use parser::{ParseError, parse_select, parse_where};
pub use value::Value;
