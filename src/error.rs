use crate::eval::EvalError;
use crate::mapping::MappingError;
use crate::parser::ParseError;
use std::io;

/// Everything that can go wrong between handing in source text and getting
/// a result back.
#[derive(Debug)]
pub enum Error {
    /// Query expression error, carrying every syntax error found
    Parse(ParseError),
    /// Evaluation error against a record
    Eval(EvalError),
    /// Input or output document error
    Mapping(MappingError),
    /// IO error while reading input
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "Parse error: {}", e),
            Error::Eval(e) => write!(f, "Evaluation error: {}", e),
            Error::Mapping(e) => write!(f, "Mapping error: {}", e),
            Error::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Eval(e) => Some(e),
            Error::Mapping(e) => Some(e),
            Error::Io(e) => Some(e),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<EvalError> for Error {
    fn from(e: EvalError) -> Self {
        Error::Eval(e)
    }
}

impl From<MappingError> for Error {
    fn from(e: MappingError) -> Self {
        Error::Mapping(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
