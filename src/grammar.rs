//! Grammar tables.
//!
//! Reserved keywords and reserved symbols consulted by the lexer, the
//! comparison operators accepted in a where-clause, and the names of the
//! non-terminals the parser materializes as CST nodes.
//!
//! All tables are process-wide and immutable once initialized.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Reserved keywords. Always stored upper-case.
///
/// Only statement vocabulary is reserved. Type names such as `date` or
/// `text` stay usable as column and table names.
pub const KEYWORDS: &[&str] = &[
    // Statements
    "SELECT", "FROM", "WHERE", "INSERT", "INTO", "VALUES", "CREATE", "TABLE",
    // Connectives and literals
    "AND", "OR", "NOT", "NULL", "TRUE", "FALSE",
];

/// Reserved symbols, two-character forms included.
pub const SYMBOLS: &[&str] = &[
    "<>", "!=", "<=", ">=", // two-character
    ",", ";", "(", ")", "*", "=", "<", ">", "+", "-", "/", ".",
];

/// Operators allowed between the two operands of a where-clause.
pub const COMPARISON_OPERATORS: &[&str] = &["=", "<>", "!=", "<", ">", "<=", ">="];

/// Built-in column data types. Not reserved; matched case-insensitively.
pub const DATA_TYPES: &[&str] = &[
    "INT", "INTEGER", "BIGINT", "SMALLINT", "FLOAT", "REAL", "DOUBLE", "DECIMAL", "CHAR",
    "VARCHAR", "TEXT", "BOOLEAN", "DATE", "TIMESTAMP",
];

/// Keywords that may stand in for a value.
pub const LITERAL_KEYWORDS: &[&str] = &["NULL", "TRUE", "FALSE"];

static KEYWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| KEYWORDS.iter().copied().collect());

static SYMBOL_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| SYMBOLS.iter().copied().collect());

/// CST non-terminal labels, written the way the grammar names them.
pub mod non_terminal {
    pub const QUERY: &str = "<query>";
    pub const COLUMN_LIST: &str = "<column_list>";
    pub const COLUMN_NAME: &str = "<column_name>";
    pub const COLUMN_LIST_TAIL: &str = "<column_list_tail>";
    pub const TABLE_NAME: &str = "<table_name>";
    pub const OPTIONAL_WHERE: &str = "<optional_where>";
    pub const CONDITION: &str = "<condition>";
    pub const VALUE_LIST: &str = "<value_list>";
    pub const VALUE: &str = "<value>";
    pub const VALUE_LIST_TAIL: &str = "<value_list_tail>";
    pub const COLUMN_DEFS_LIST: &str = "<column_defs_list>";
    pub const COLUMN_DEF: &str = "<column_def>";
    pub const COLUMN_DEFS_LIST_TAIL: &str = "<column_defs_list_tail>";
    pub const DATA_TYPE: &str = "<data_type>";
    /// Reserved for column constraints; no rule produces it yet.
    pub const CONSTRAINT: &str = "<constraint>";
}

/// Labels written `<like_this>` name non-terminals; tokens can never look like that.
pub fn is_non_terminal(label: &str) -> bool {
    label.len() > 2 && label.starts_with('<') && label.ends_with('>')
}

/// Check an upper-cased word against the keyword table.
pub fn is_keyword(word: &str) -> bool {
    KEYWORD_SET.contains(word)
}

/// Check a one- or two-character string against the symbol table.
pub fn is_symbol(text: &str) -> bool {
    SYMBOL_SET.contains(text)
}

pub fn is_comparison_operator(token: &str) -> bool {
    COMPARISON_OPERATORS.contains(&token)
}

pub fn is_literal_keyword(token: &str) -> bool {
    LITERAL_KEYWORDS.contains(&token)
}

/// A token that names something: not a keyword, not a symbol, not a literal.
pub fn is_identifier(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && !is_keyword(token)
}

pub fn is_builtin_type(token: &str) -> bool {
    DATA_TYPES.iter().any(|t| t.eq_ignore_ascii_case(token))
}

/// Built-in type or a user-named type.
pub fn is_type_name(token: &str) -> bool {
    is_builtin_type(token) || is_identifier(token)
}

pub fn is_numeric_literal(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Quoted string literal, terminated or not.
pub fn is_string_literal(token: &str) -> bool {
    token.starts_with('\'')
}

/// Anything that can sit on the value side of a comparison or in a VALUES list.
pub fn is_value(token: &str) -> bool {
    is_identifier(token)
        || is_numeric_literal(token)
        || is_string_literal(token)
        || is_literal_keyword(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_upper_case() {
        assert!(KEYWORDS.iter().all(|k| k.to_uppercase() == *k));
        assert!(is_keyword("SELECT"));
        assert!(!is_keyword("select"));
    }

    #[test]
    fn test_two_character_symbols() {
        assert!(is_symbol("<>"));
        assert!(is_symbol("!="));
        assert!(is_symbol(";"));
        assert!(!is_symbol("!"));
    }

    #[test]
    fn test_identifier_classification() {
        assert!(is_identifier("users"));
        assert!(is_identifier("_tmp1"));
        assert!(!is_identifier("FROM"));
        assert!(!is_identifier("42"));
        assert!(!is_identifier(","));
        assert!(!is_identifier("'x'"));
    }

    #[test]
    fn test_value_classification() {
        assert!(is_value("42"));
        assert!(is_value("'hello'"));
        assert!(is_value("'unterminated"));
        assert!(is_value("NULL"));
        assert!(is_value("age"));
        assert!(!is_value("TABLE"));
        assert!(!is_value(")"));
    }

    #[test]
    fn test_non_terminal_labels() {
        assert!(is_non_terminal(non_terminal::COLUMN_LIST));
        assert!(!is_non_terminal("<>"));
        assert!(!is_non_terminal("<"));
        assert!(!is_non_terminal("users"));
    }

    #[test]
    fn test_data_types_are_not_reserved() {
        assert!(DATA_TYPES.iter().all(|t| !is_keyword(t)));
        for word in ["date", "DATE", "text", "real", "key", "primary"] {
            assert!(is_identifier(word), "{word}");
        }
        assert!(is_builtin_type("VARCHAR"));
        assert!(is_builtin_type("varchar"));
        assert!(!is_builtin_type("geometry"));
        assert!(is_type_name("geometry"));
        assert!(!is_type_name("TABLE"));
    }
}
