//! Recursive-descent parser producing a concrete syntax tree.
//!
//! Every grammar rule is a method on [`Parser`] and materializes one CST
//! node labeled with its non-terminal. Keywords and punctuation are kept as
//! leaves so the tree mirrors the input exactly.
//!
//! # Grammar
//!
//! ```text
//! <query>             ::= <select> | <insert> | <create>
//! <select>            ::= SELECT <column_list> FROM <table_name> <optional_where> ;
//! <insert>            ::= INSERT INTO <table_name> ( <column_list> ) VALUES ( <value_list> ) ;
//! <create>            ::= CREATE TABLE <table_name> ( <column_defs_list> ) ;
//! <column_list>       ::= <column_name> <column_list_tail>
//! <column_list_tail>  ::= , <column_name> <column_list_tail> | ε
//! <value_list>        ::= <value> <value_list_tail>
//! <value_list_tail>   ::= , <value> <value_list_tail> | ε
//! <column_defs_list>  ::= <column_def> <column_defs_list_tail>
//! <column_defs_list_tail> ::= , <column_def> <column_defs_list_tail> | ε
//! <column_def>        ::= name <data_type>
//! <data_type>         ::= type_name | type_name ( size )
//! <optional_where>    ::= WHERE <condition> | ε
//! <condition>         ::= operand operator operand
//! ```
//!
//! The parser fails fast: the first mismatch aborts the statement.

use tracing::{debug, trace};

use crate::error::{END_OF_INPUT, SqlError, SqlResult};
use crate::grammar::{self, non_terminal as nt};
use crate::tree::Node;

/// Parse a token sequence into a CST rooted at `<query>`.
///
/// # Example
///
/// ```
/// use tinysql::{lexer::tokenize, parser::parse};
///
/// let cst = parse(&tokenize("SELECT id FROM users;")).unwrap();
/// assert_eq!(cst.label, "<query>");
/// assert_eq!(cst.children[0].label, "SELECT");
/// ```
pub fn parse(tokens: &[String]) -> SqlResult<Node> {
    Parser::new(tokens).parse()
}

/// Item rule used by the list helpers.
type ItemRule<'a> = fn(&mut Parser<'a>) -> SqlResult<Node>;

/// Cursor over a token slice. `pos` always points at the last token read.
pub struct Parser<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [String]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Dispatch on the leading keyword and build the whole tree.
    pub fn parse(mut self) -> SqlResult<Node> {
        let leading = self.current().ok_or(SqlError::Empty)?;
        debug!(statement = leading, tokens = self.tokens.len(), "parsing statement");

        let children = match leading {
            "SELECT" => self.parse_select(),
            "INSERT" => self.parse_insert(),
            "CREATE" => self.parse_create(),
            other => Err(SqlError::UnrecognizedStatement(other.to_string())),
        }
        .and_then(|children| self.expect_end().map(|()| children))
        .inspect_err(|e| debug!(error = %e, "parse failed"))?;

        Ok(Node {
            children,
            ..Node::new(nt::QUERY)
        })
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// SELECT col1, col2 FROM table_name [WHERE left op right];
    fn parse_select(&mut self) -> SqlResult<Vec<Node>> {
        let select = Node::new("SELECT");
        let columns = self.parse_select_column_list()?;
        let from = self.expect("FROM")?;
        let table = self.parse_table_name()?;
        let where_clause = self.parse_optional_where()?;
        let semicolon = self.expect(";")?;

        Ok(vec![select, columns, from, table, where_clause, semicolon])
    }

    /// INSERT INTO table_name (col1, col2) VALUES (val1, val2);
    fn parse_insert(&mut self) -> SqlResult<Vec<Node>> {
        let insert = Node::new("INSERT");
        let into = self.expect("INTO")?;
        let table = self.parse_table_name()?;
        let open_columns = self.expect("(")?;
        let columns = self.parse_insert_column_list()?;
        let close_columns = self.expect(")")?;
        let values = self.expect("VALUES")?;
        let open_values = self.expect("(")?;
        let value_list = self.parse_value_list()?;
        let close_values = self.expect(")")?;
        let semicolon = self.expect(";")?;

        Ok(vec![
            insert,
            into,
            table,
            open_columns,
            columns,
            close_columns,
            values,
            open_values,
            value_list,
            close_values,
            semicolon,
        ])
    }

    /// CREATE TABLE table_name (col1 type1, col2 type2(size));
    fn parse_create(&mut self) -> SqlResult<Vec<Node>> {
        let create = Node::new("CREATE");
        let table_keyword = self.expect("TABLE")?;
        let table = self.parse_table_name()?;
        let open = self.expect("(")?;
        let definitions = self.parse_column_defs_list()?;
        let close = self.expect(")")?;
        let semicolon = self.expect(";")?;

        Ok(vec![create, table_keyword, table, open, definitions, close, semicolon])
    }

    // ------------------------------------------------------------------
    // Lists
    // ------------------------------------------------------------------

    fn parse_select_column_list(&mut self) -> SqlResult<Node> {
        if matches!(self.peek(), None | Some("FROM")) {
            return Err(SqlError::missing("column name", "after SELECT"));
        }
        self.parse_list(nt::COLUMN_LIST, nt::COLUMN_LIST_TAIL, Self::parse_select_column)
    }

    fn parse_insert_column_list(&mut self) -> SqlResult<Node> {
        if self.peek() == Some(")") {
            return Err(SqlError::missing("column name", "in INSERT"));
        }
        self.parse_list(nt::COLUMN_LIST, nt::COLUMN_LIST_TAIL, Self::parse_column_name)
    }

    fn parse_value_list(&mut self) -> SqlResult<Node> {
        if self.peek() == Some(")") {
            return Err(SqlError::missing("value", "in VALUES"));
        }
        self.parse_list(nt::VALUE_LIST, nt::VALUE_LIST_TAIL, Self::parse_value)
    }

    fn parse_column_defs_list(&mut self) -> SqlResult<Node> {
        if self.peek() == Some(")") {
            return Err(SqlError::missing("column definition", "in CREATE TABLE"));
        }
        self.parse_list(nt::COLUMN_DEFS_LIST, nt::COLUMN_DEFS_LIST_TAIL, Self::parse_column_def)
    }

    /// `item tail`, where the tail is always present (possibly empty).
    fn parse_list(&mut self, label: &str, tail_label: &str, item: ItemRule<'a>) -> SqlResult<Node> {
        let mut list = Node::new(label);
        list.add_child(item(self)?);
        list.add_child(self.parse_list_tail(tail_label, item)?);
        Ok(list)
    }

    /// `, item tail` or nothing.
    fn parse_list_tail(&mut self, tail_label: &str, item: ItemRule<'a>) -> SqlResult<Node> {
        let mut tail = Node::new(tail_label);

        if self.peek() == Some(",") {
            tail.add_child(self.expect(",")?);
            tail.add_child(item(self)?);
            tail.add_child(self.parse_list_tail(tail_label, item)?);
        }

        Ok(tail)
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    fn parse_select_column(&mut self) -> SqlResult<Node> {
        let name = self.expect_with("column name", |t| t == "*" || grammar::is_identifier(t))?;
        Ok(Node::new(nt::COLUMN_NAME).with_child(name))
    }

    fn parse_column_name(&mut self) -> SqlResult<Node> {
        let name = self.expect_with("column name", grammar::is_identifier)?;
        Ok(Node::new(nt::COLUMN_NAME).with_child(name))
    }

    fn parse_value(&mut self) -> SqlResult<Node> {
        let value = self.expect_with("value", grammar::is_value)?;
        Ok(Node::new(nt::VALUE).with_child(value))
    }

    fn parse_table_name(&mut self) -> SqlResult<Node> {
        let name = self.expect_with("table name", grammar::is_identifier)?;
        Ok(Node::new(nt::TABLE_NAME).with_child(name))
    }

    fn parse_column_def(&mut self) -> SqlResult<Node> {
        let name = self.expect_with("column name", grammar::is_identifier)?;
        let data_type = self.parse_data_type()?;
        Ok(Node::new(nt::COLUMN_DEF).with_child(name).with_child(data_type))
    }

    /// type_name, optionally followed by `( size )`.
    fn parse_data_type(&mut self) -> SqlResult<Node> {
        let mut data_type = Node::new(nt::DATA_TYPE);
        data_type.add_child(self.expect_with("data type", grammar::is_type_name)?);

        if self.peek() == Some("(") {
            data_type.add_child(self.expect("(")?);
            data_type.add_child(self.expect_with("size", grammar::is_numeric_literal)?);
            data_type.add_child(self.expect(")")?);
        }

        Ok(data_type)
    }

    fn parse_optional_where(&mut self) -> SqlResult<Node> {
        let mut optional_where = Node::new(nt::OPTIONAL_WHERE);

        if self.peek() != Some("WHERE") {
            return Ok(optional_where);
        }

        optional_where.add_child(self.expect("WHERE")?);
        optional_where.add_child(self.parse_condition()?);
        Ok(optional_where)
    }

    /// Exactly one binary comparison; no AND/OR.
    fn parse_condition(&mut self) -> SqlResult<Node> {
        let left = self.expect_with("left operand", grammar::is_value)?;
        let operator = self.expect_with("comparison operator", grammar::is_comparison_operator)?;
        let right = self.expect_with("right operand", grammar::is_value)?;

        Ok(Node::new(nt::CONDITION)
            .with_child(left)
            .with_child(operator)
            .with_child(right))
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    fn current(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    /// The token after the current one, not consumed.
    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos + 1).map(String::as_str)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// One call parses one statement: nothing may follow its `;`.
    fn expect_end(&self) -> SqlResult<()> {
        match self.peek() {
            None => Ok(()),
            found => {
                trace!(found = ?found, position = self.pos + 1, "trailing tokens after statement");
                Err(SqlError::expected(END_OF_INPUT, found, self.pos + 1))
            }
        }
    }

    /// Consume the next token if it is exactly `expected`.
    fn expect(&mut self, expected: &str) -> SqlResult<Node> {
        self.expect_with(expected, |t| t == expected)
    }

    /// Consume the next token if `accept` says so, as a leaf.
    fn expect_with(&mut self, expected: &str, accept: impl Fn(&str) -> bool) -> SqlResult<Node> {
        match self.peek() {
            Some(token) if accept(token) => {
                self.advance();
                Ok(Node::new(token))
            }
            found => {
                trace!(expected, found = ?found, position = self.pos + 1, "rule failed");
                Err(SqlError::expected(expected, found, self.pos + 1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_str(query: &str) -> SqlResult<Node> {
        parse(&tokenize(query))
    }

    fn labels(node: &Node) -> Vec<&str> {
        node.children.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_select_shape() {
        let cst = parse_str("SELECT a, b FROM t;").unwrap();
        assert_eq!(cst.label, nt::QUERY);
        assert!(cst.kind.is_none());
        assert_eq!(
            labels(&cst),
            vec!["SELECT", nt::COLUMN_LIST, "FROM", nt::TABLE_NAME, nt::OPTIONAL_WHERE, ";"]
        );
    }

    #[test]
    fn test_column_list_nests_one_tail_per_element() {
        let cst = parse_str("SELECT a, b, c FROM t;").unwrap();
        let list = &cst.children[1];
        assert_eq!(labels(list), vec![nt::COLUMN_NAME, nt::COLUMN_LIST_TAIL]);
        assert_eq!(list.children[0].children[0].label, "a");

        let tail = &list.children[1];
        assert_eq!(labels(tail), vec![",", nt::COLUMN_NAME, nt::COLUMN_LIST_TAIL]);
        assert_eq!(tail.children[1].children[0].label, "b");

        let tail = &tail.children[2];
        assert_eq!(tail.children[1].children[0].label, "c");
        assert!(tail.children[2].is_leaf());
    }

    #[test]
    fn test_select_star() {
        let cst = parse_str("SELECT * FROM t;").unwrap();
        assert_eq!(cst.children[1].children[0].children[0].label, "*");
    }

    #[test]
    fn test_select_without_where_has_empty_optional_where() {
        let cst = parse_str("SELECT a FROM t;").unwrap();
        assert!(cst.children[4].is_leaf());
    }

    #[test]
    fn test_select_with_where() {
        let cst = parse_str("SELECT a FROM t WHERE a >= 10;").unwrap();
        let optional_where = &cst.children[4];
        assert_eq!(labels(optional_where), vec!["WHERE", nt::CONDITION]);
        assert_eq!(labels(&optional_where.children[1]), vec!["a", ">=", "10"]);
    }

    #[test]
    fn test_insert_shape() {
        let cst = parse_str("INSERT INTO users (id, name) VALUES (1, 'bob');").unwrap();
        assert_eq!(
            labels(&cst),
            vec![
                "INSERT",
                "INTO",
                nt::TABLE_NAME,
                "(",
                nt::COLUMN_LIST,
                ")",
                "VALUES",
                "(",
                nt::VALUE_LIST,
                ")",
                ";"
            ]
        );
        let values = &cst.children[8];
        assert_eq!(values.children[0].children[0].label, "1");
        assert_eq!(values.children[1].children[1].children[0].label, "'bob'");
    }

    #[test]
    fn test_create_shape() {
        let cst = parse_str("CREATE TABLE users (id INT, name VARCHAR(255));").unwrap();
        assert_eq!(
            labels(&cst),
            vec!["CREATE", "TABLE", nt::TABLE_NAME, "(", nt::COLUMN_DEFS_LIST, ")", ";"]
        );

        let defs = &cst.children[4];
        let first = &defs.children[0];
        assert_eq!(labels(first), vec!["id", nt::DATA_TYPE]);
        assert_eq!(labels(&first.children[1]), vec!["INT"]);

        let second = &defs.children[1].children[1];
        assert_eq!(labels(&second.children[1]), vec!["VARCHAR", "(", "255", ")"]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let query = "CREATE TABLE t (a INT, b VARCHAR(10));";
        assert_eq!(parse_str(query).unwrap(), parse_str(query).unwrap());
    }

    #[test]
    fn test_missing_select_columns() {
        let err = parse_str("SELECT FROM t;").unwrap_err();
        assert_eq!(err.to_string(), "missing at least one column name after SELECT!");
    }

    #[test]
    fn test_missing_insert_columns() {
        let err = parse_str("INSERT INTO t () VALUES (1);").unwrap_err();
        assert_eq!(err.to_string(), "missing at least one column name in INSERT!");
    }

    #[test]
    fn test_missing_insert_values() {
        let err = parse_str("INSERT INTO t (a) VALUES ();").unwrap_err();
        assert_eq!(err.to_string(), "missing at least one value in VALUES!");
    }

    #[test]
    fn test_missing_column_definitions() {
        let err = parse_str("CREATE TABLE t ();").unwrap_err();
        assert_eq!(err.to_string(), "missing at least one column definition in CREATE TABLE!");
    }

    #[test]
    fn test_insert_keyword_order() {
        let err = parse_str("INSERT table_name INTO (a) VALUES (1);").unwrap_err();
        assert!(err.to_string().starts_with("expected 'INTO' but got 'table_name'"));
    }

    #[test]
    fn test_create_requires_table_keyword() {
        let err = parse_str("CREATE users (a INT);").unwrap_err();
        assert!(matches!(err, SqlError::Expected { ref expected, .. } if expected == "TABLE"));
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_str("SELECT a FROM t").unwrap_err();
        match err {
            SqlError::Expected { expected, found, position } => {
                assert_eq!(expected, ";");
                assert_eq!(found, "end of input");
                assert_eq!(position, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_close_paren() {
        let err = parse_str("INSERT INTO t (a, b VALUES (1);").unwrap_err();
        assert!(err.to_string().starts_with("expected ')' but got 'VALUES'"));
    }

    #[test]
    fn test_trailing_comma() {
        let err = parse_str("SELECT a, FROM t;").unwrap_err();
        assert!(err.to_string().starts_with("expected 'column name' but got 'FROM'"));
    }

    #[test]
    fn test_where_requires_operator() {
        let err = parse_str("SELECT a FROM t WHERE a 1;").unwrap_err();
        assert!(err.to_string().starts_with("expected 'comparison operator' but got '1'"));
    }

    #[test]
    fn test_where_truncated() {
        let err = parse_str("SELECT a FROM t WHERE a =").unwrap_err();
        assert!(err.to_string().contains("end of input"));
    }

    #[test]
    fn test_constraints_are_not_grammar() {
        let err = parse_str("CREATE TABLE t (id INT NOT NULL);").unwrap_err();
        assert!(err.to_string().starts_with("expected ')' but got 'NOT'"));
    }

    #[test]
    fn test_data_type_size_must_be_numeric() {
        let err = parse_str("CREATE TABLE t (name VARCHAR(big));").unwrap_err();
        assert!(err.to_string().starts_with("expected 'size' but got 'big'"));
    }

    #[test]
    fn test_unrecognized_statement() {
        let err = parse_str("DELETE FROM t;").unwrap_err();
        assert!(matches!(err, SqlError::UnrecognizedStatement(ref t) if t == "DELETE"));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_str("   ").unwrap_err(), SqlError::Empty));
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = parse_str("SELECT a FROM t; DROP TABLE users;").unwrap_err();
        match err {
            SqlError::Expected { expected, found, position } => {
                assert_eq!(expected, END_OF_INPUT);
                assert_eq!(found, "DROP");
                assert_eq!(position, 5);
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = parse_str("SELECT a FROM t;;;;").unwrap_err();
        assert_eq!(err.to_string(), "expected 'end of input' but got ';' (token 5)");

        let err = parse_str("INSERT INTO t (a) VALUES (1); x").unwrap_err();
        assert!(err.to_string().starts_with("expected 'end of input' but got 'x'"));
    }

    #[test]
    fn test_type_words_are_names() {
        let cst = parse_str("SELECT date, key FROM t WHERE real = 1;").unwrap();
        let list = &cst.children[1];
        assert_eq!(list.children[0].children[0].label, "date");
        assert_eq!(list.children[1].children[1].children[0].label, "key");
        assert_eq!(labels(&cst.children[4].children[1]), vec!["real", "=", "1"]);

        let cst = parse_str("CREATE TABLE e (text TEXT, date date);").unwrap();
        let defs = &cst.children[4];
        assert_eq!(labels(&defs.children[0]), vec!["text", nt::DATA_TYPE]);
        assert_eq!(labels(&defs.children[0].children[1]), vec!["TEXT"]);
        let second = &defs.children[1].children[1];
        assert_eq!(labels(second), vec!["date", nt::DATA_TYPE]);
        assert_eq!(labels(&second.children[1]), vec!["date"]);
    }

    #[test]
    fn test_lowercase_keywords() {
        let cst = parse_str("select a from t where a = 'x';").unwrap();
        assert_eq!(cst.children[0].label, "SELECT");
        assert_eq!(cst.children[2].label, "FROM");
    }
}
