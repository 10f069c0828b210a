use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    UnexpectedToken(char),
    UnexpectedEnd,
    MissingClosing(char),
    TrailingToken(char),
    TooDeeplyNested(usize),
    ClassTooLarge(usize),
}

#[derive(Debug)]
pub enum Error {
    // Token position (== char index) and what went wrong there
    SyntaxError(usize, SyntaxErrorKind),
    // (input length, configured limit)
    InputTooLong(usize, usize),
    StructuralInvariantViolation(&'static str),
    YamlParsingError(serde_yaml::Error),
    JsonSerializationError(serde_json::Error),
    IOError(std::io::Error),
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Error::SyntaxError(_, _))
    }
}

impl Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxErrorKind::UnexpectedToken(c) => write!(f, "unexpected token '{}'", c),
            SyntaxErrorKind::UnexpectedEnd => write!(f, "unexpected end of expression"),
            SyntaxErrorKind::MissingClosing(c) => write!(f, "expected '{}'", c),
            SyntaxErrorKind::TrailingToken(c) => write!(f, "unexpected trailing token '{}'", c),
            SyntaxErrorKind::TooDeeplyNested(limit) => {
                write!(f, "expression too deeply nested (limit: {})", limit)
            }
            SyntaxErrorKind::ClassTooLarge(limit) => {
                write!(f, "character class too large (limit: {})", limit)
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SyntaxError(pos, kind) => write!(f, "syntax error at position {}: {}", pos, kind),
            Error::InputTooLong(len, limit) => write!(
                f,
                "regex is {} characters long, the limit is {}",
                len, limit
            ),
            Error::StructuralInvariantViolation(msg) => {
                write!(f, "internal automaton invariant violated: {}", msg)
            }
            Error::YamlParsingError(e) => write!(f, "invalid YAML: {}", e),
            Error::JsonSerializationError(e) => write!(f, "failed to serialize: {}", e),
            Error::IOError(e) => write!(f, "I/O error: {}", e),
            Error::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::YamlParsingError(e) => Some(e),
            Error::JsonSerializationError(e) => Some(e),
            Error::IOError(e) => Some(e),
            _ => None,
        }
    }
}
