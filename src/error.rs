//! Error types for tinysql.

use thiserror::Error;

/// What the parser reports when the token stream runs out.
pub const END_OF_INPUT: &str = "end of input";

/// The main error type for tinysql operations.
#[derive(Debug, Error)]
pub enum SqlError {
    /// The query contained no tokens at all.
    #[error("nothing to parse: the query is empty")]
    Empty,

    /// The leading token is not one of the supported statement keywords.
    #[error("could not determine the query type! must be one of: SELECT, INSERT, CREATE (got '{0}')")]
    UnrecognizedStatement(String),

    /// A required keyword, symbol or name was not where the grammar wants it.
    #[error("expected '{expected}' but got '{found}' (token {position})")]
    Expected {
        expected: String,
        found: String,
        position: usize,
    },

    /// A list that needs at least one element was empty.
    #[error("missing at least one {element} {context}!")]
    MissingElement {
        element: &'static str,
        context: &'static str,
    },

    /// A where-clause did not reduce to exactly left operand, operator, right operand.
    #[error("where clause must reduce to exactly 3 parts (left operand, operator, right operand), found {0}")]
    MalformedPredicate(usize),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqlError {
    /// Create an "expected X but got Y" error at the given token index.
    pub fn expected(expected: impl Into<String>, found: Option<&str>, position: usize) -> Self {
        Self::Expected {
            expected: expected.into(),
            found: found.unwrap_or(END_OF_INPUT).to_string(),
            position,
        }
    }

    /// Create a missing list element error.
    pub fn missing(element: &'static str, context: &'static str) -> Self {
        Self::MissingElement { element, context }
    }
}

impl From<toml::de::Error> for SqlError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for tinysql operations.
pub type SqlResult<T> = Result<T, SqlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_display() {
        let err = SqlError::expected("INTO", Some("users"), 1);
        assert_eq!(err.to_string(), "expected 'INTO' but got 'users' (token 1)");
    }

    #[test]
    fn test_expected_at_end_of_input() {
        let err = SqlError::expected(";", None, 4);
        assert_eq!(err.to_string(), "expected ';' but got 'end of input' (token 4)");
    }

    #[test]
    fn test_missing_display() {
        let err = SqlError::missing("column name", "after SELECT");
        assert_eq!(err.to_string(), "missing at least one column name after SELECT!");
    }
}
