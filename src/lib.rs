//! # tinysql — a tiny SQL front-end
//!
//! Turns one SQL statement into tokens, a concrete syntax tree that mirrors
//! the grammar, and a compact abstract syntax tree.
//!
//! ## Quick Example
//!
//! ```
//! use tinysql::prelude::*;
//!
//! let analysis = tinysql::analyze("SELECT id, email FROM users WHERE id = 7;").unwrap();
//! assert_eq!(analysis.tokens[0], "SELECT");
//! assert_eq!(analysis.ast.kind, Some(NodeKind::Select));
//! ```
//!
//! ## Supported statements
//!
//! | Statement      | Shape                                              |
//! |----------------|----------------------------------------------------|
//! | `SELECT`       | `SELECT a, b FROM t [WHERE x op y];`               |
//! | `INSERT`       | `INSERT INTO t (a, b) VALUES (1, 'x');`            |
//! | `CREATE TABLE` | `CREATE TABLE t (a INT, b VARCHAR(255));`          |

pub mod config;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod transformer;
pub mod tree;

use serde::Serialize;

pub mod prelude {
    pub use crate::config::{Config, OutputFormat};
    pub use crate::error::*;
    pub use crate::lexer::tokenize;
    pub use crate::parser::parse as parse_tokens;
    pub use crate::transformer::to_ast;
    pub use crate::tree::{Node, NodeKind};
    pub use crate::{Analysis, analyze};
}

pub use lexer::tokenize;
pub use parser::parse as parse_tokens;
pub use transformer::to_ast;

/// Every stage of the pipeline for one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub tokens: Vec<String>,
    pub cst: tree::Node,
    pub ast: tree::Node,
}

/// Tokenize, parse and transform a single statement.
///
/// # Example
///
/// ```
/// let err = tinysql::analyze("SELECT FROM t;").unwrap_err();
/// assert_eq!(err.to_string(), "missing at least one column name after SELECT!");
/// ```
pub fn analyze(query: &str) -> Result<Analysis, error::SqlError> {
    let tokens = lexer::tokenize(query);
    let cst = parser::parse(&tokens)?;
    let ast = transformer::to_ast(&cst)?;
    Ok(Analysis { tokens, cst, ast })
}
