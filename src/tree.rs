//! Tree node shared by the concrete and the abstract syntax tree.
//!
//! A CST node carries a grammar label (`<column_list>`) or a token's text and
//! no kind. Once the transformer has run, nodes carry a [`NodeKind`] and,
//! for leaves, the token text they stand for.

use std::fmt;

use serde::Serialize;

/// Semantic role of a node after AST transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    // Statement roots
    Select,
    CreateTable,
    Insert,
    // Clauses
    ColumnList,
    TableName,
    BinaryPredicate,
    ValueList,
    ColumnDefinitions,
    ColumnDefinition,
    DataType,
    Constraint,
    // Leaves
    Identifier,
    Value,
    LeftOperand,
    Operator,
    RightOperand,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Select => "select",
            NodeKind::CreateTable => "create-table",
            NodeKind::Insert => "insert",
            NodeKind::ColumnList => "column-list",
            NodeKind::TableName => "table-name",
            NodeKind::BinaryPredicate => "binary-predicate",
            NodeKind::ValueList => "value-list",
            NodeKind::ColumnDefinitions => "column-definitions",
            NodeKind::ColumnDefinition => "column-definition",
            NodeKind::DataType => "data-type",
            NodeKind::Constraint => "constraint",
            NodeKind::Identifier => "identifier",
            NodeKind::Value => "value",
            NodeKind::LeftOperand => "left-operand",
            NodeKind::Operator => "operator",
            NodeKind::RightOperand => "right-operand",
        }
    }

    /// Statement kinds tag the AST root.
    pub fn is_statement(&self) -> bool {
        matches!(self, NodeKind::Select | NodeKind::CreateTable | NodeKind::Insert)
    }

    /// Leaf roles never own children.
    pub fn is_leaf_role(&self) -> bool {
        matches!(
            self,
            NodeKind::Identifier
                | NodeKind::Value
                | NodeKind::LeftOperand
                | NodeKind::Operator
                | NodeKind::RightOperand
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the CST or the AST. Parents own their children exclusively.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Node {
    /// Grammar label, token text, or empty for relabeled AST nodes.
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Create an untagged node with no children.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: None,
            children: Vec::new(),
        }
    }

    /// Create a tagged leaf.
    pub fn leaf(label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            label: label.into(),
            kind: Some(kind),
            children: Vec::new(),
        }
    }

    /// Create a tagged node with an empty label.
    pub fn tagged(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            label: String::new(),
            kind: Some(kind),
            children,
        }
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Builder form of [`Node::add_child`].
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// First direct child with the given kind.
    pub fn child_of_kind(&self, kind: NodeKind) -> Option<&Node> {
        self.children.iter().find(|c| c.kind == Some(kind))
    }

    /// Total number of nodes in this subtree, this one included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Node::size).sum::<usize>()
    }

    /// Indented rendering, one node per line, two spaces per level.
    pub fn pretty(&self) -> String {
        self.to_string()
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{}", "  ".repeat(depth))?;
        match (&self.kind, self.label.is_empty()) {
            (Some(kind), true) => writeln!(f, "[{}]", kind)?,
            (Some(kind), false) => writeln!(f, "[{}] {}", kind, self.label)?,
            (None, _) => writeln!(f, "{}", self.label)?,
        }
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
