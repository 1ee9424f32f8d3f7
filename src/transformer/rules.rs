//! CST label -> transformation rule table.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::grammar::non_terminal as nt;
use crate::tree::NodeKind;

/// What the transformer does with a CST node carrying a given label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Keyword or punctuation; dropped from the AST.
    Delete,
    /// Non-terminal that becomes an AST node of this kind.
    Relabel(NodeKind),
    /// Wrapper non-terminals are unwrapped into their parent; terminals
    /// surface as leaves.
    PassThrough,
}

static RULES: LazyLock<HashMap<&'static str, Rule>> = LazyLock::new(|| {
    HashMap::from([
        (nt::COLUMN_LIST, Rule::Relabel(NodeKind::ColumnList)),
        (nt::TABLE_NAME, Rule::Relabel(NodeKind::TableName)),
        (nt::OPTIONAL_WHERE, Rule::Relabel(NodeKind::BinaryPredicate)),
        (nt::VALUE_LIST, Rule::Relabel(NodeKind::ValueList)),
        (nt::COLUMN_DEFS_LIST, Rule::Relabel(NodeKind::ColumnDefinitions)),
        (nt::COLUMN_DEF, Rule::Relabel(NodeKind::ColumnDefinition)),
        (nt::DATA_TYPE, Rule::Relabel(NodeKind::DataType)),
        (nt::CONSTRAINT, Rule::Relabel(NodeKind::Constraint)),
        // wrappers
        (nt::COLUMN_NAME, Rule::PassThrough),
        (nt::COLUMN_LIST_TAIL, Rule::PassThrough),
        (nt::CONDITION, Rule::PassThrough),
        (nt::VALUE, Rule::PassThrough),
        (nt::VALUE_LIST_TAIL, Rule::PassThrough),
        (nt::COLUMN_DEFS_LIST_TAIL, Rule::PassThrough),
        // keywords
        ("SELECT", Rule::Delete),
        ("FROM", Rule::Delete),
        ("WHERE", Rule::Delete),
        ("INSERT", Rule::Delete),
        ("INTO", Rule::Delete),
        ("VALUES", Rule::Delete),
        ("CREATE", Rule::Delete),
        ("TABLE", Rule::Delete),
        // punctuation
        (",", Rule::Delete),
        (";", Rule::Delete),
        ("(", Rule::Delete),
        (")", Rule::Delete),
    ])
});

/// Rule for a label; anything unlisted passes through.
pub fn rule_for(label: &str) -> Rule {
    RULES.get(label).copied().unwrap_or(Rule::PassThrough)
}

/// Statement kind named by a leading keyword.
pub fn statement_kind(label: &str) -> Option<NodeKind> {
    match label {
        "SELECT" => Some(NodeKind::Select),
        "CREATE" => Some(NodeKind::CreateTable),
        "INSERT" => Some(NodeKind::Insert),
        _ => None,
    }
}
