//! CST -> AST transformation.
//!
//! One top-down pass over the CST, driven by the [`rules`] table:
//! keywords and punctuation disappear, list and tail wrappers are
//! flattened into their parent, and the surviving non-terminals are
//! relabeled by semantic role.
//!
//! The CST is only borrowed. Every AST node is built fresh, so the
//! concrete tree stays intact for printing or reuse.
//!
//! ```text
//! <query>                          [select]
//!   SELECT                           [column-list]
//!   <column_list>                      [identifier] a
//!     <column_name>                    [identifier] b
//!       a                  ==>       [table-name] t
//!     <column_list_tail>
//!       ,
//!       <column_name>
//!         b
//!       <column_list_tail>
//!   FROM
//!   <table_name>
//!     t
//!   <optional_where>
//!   ;
//! ```

pub mod rules;

use tracing::debug;

use crate::error::{SqlError, SqlResult};
use crate::grammar;
use crate::tree::{Node, NodeKind};
use rules::{Rule, rule_for};

/// Transform a CST produced by [`crate::parser::parse`] into an AST.
///
/// The root's kind is the statement type and its label is cleared.
///
/// # Example
///
/// ```
/// use tinysql::{lexer::tokenize, parser::parse, transformer::to_ast};
/// use tinysql::tree::NodeKind;
///
/// let cst = parse(&tokenize("SELECT id FROM users;")).unwrap();
/// let ast = to_ast(&cst).unwrap();
/// assert_eq!(ast.kind, Some(NodeKind::Select));
/// assert_eq!(ast.children.len(), 2);
/// ```
pub fn to_ast(cst: &Node) -> SqlResult<Node> {
    let kind = cst
        .children
        .iter()
        .find_map(|child| rules::statement_kind(&child.label))
        .ok_or_else(|| {
            let leading = cst.children.first().map(|c| c.label.clone());
            SqlError::UnrecognizedStatement(leading.unwrap_or_default())
        })?;

    let mut children = Vec::with_capacity(cst.children.len());
    for child in &cst.children {
        children.extend(transform_node(child)?);
    }

    debug!(%kind, children = children.len(), "built AST");
    Ok(Node::tagged(kind, children))
}

/// Transform one child of the root. Returns the nodes it splices into the
/// root: none for deleted nodes and an absent where-clause, several for an
/// unwrapped wrapper.
fn transform_node(node: &Node) -> SqlResult<Vec<Node>> {
    let transformed = match rule_for(&node.label) {
        Rule::Delete => return Ok(Vec::new()),
        Rule::Relabel(NodeKind::TableName) => table_name(node),
        Rule::Relabel(NodeKind::BinaryPredicate) => return Ok(predicate(node)?.into_iter().collect()),
        Rule::Relabel(kind) => Node::tagged(kind, collect(node, leaf_kind_for(kind))),
        Rule::PassThrough if grammar::is_non_terminal(&node.label) => {
            return Ok(collect(node, NodeKind::Identifier));
        }
        Rule::PassThrough => Node::leaf(node.label.clone(), NodeKind::Identifier),
    };
    Ok(vec![transformed])
}

/// Leaves surfacing under a value list are values; everything else names something.
fn leaf_kind_for(kind: NodeKind) -> NodeKind {
    match kind {
        NodeKind::ValueList => NodeKind::Value,
        _ => NodeKind::Identifier,
    }
}

/// `<table_name>` collapses to a single leaf carrying the name.
fn table_name(node: &Node) -> Node {
    match node.children.first() {
        Some(name) => Node::leaf(name.label.clone(), NodeKind::TableName),
        None => Node::tagged(NodeKind::TableName, Vec::new()),
    }
}

/// `<optional_where>` becomes a binary predicate with exactly three
/// positional children, or nothing when the clause is absent.
fn predicate(node: &Node) -> SqlResult<Option<Node>> {
    if node.is_leaf() {
        return Ok(None);
    }

    let operands = collect(node, NodeKind::Identifier);
    let [left, operator, right]: [Node; 3] = operands
        .try_into()
        .map_err(|found: Vec<Node>| SqlError::MalformedPredicate(found.len()))?;

    Ok(Some(Node::tagged(
        NodeKind::BinaryPredicate,
        vec![
            retag(left, NodeKind::LeftOperand),
            retag(operator, NodeKind::Operator),
            retag(right, NodeKind::RightOperand),
        ],
    )))
}

/// Flatten the subtree under `node` into the nodes that carry meaning.
fn collect(node: &Node, leaf_kind: NodeKind) -> Vec<Node> {
    let mut result = Vec::new();

    for child in &node.children {
        match rule_for(&child.label) {
            Rule::Delete => {}
            Rule::Relabel(NodeKind::ColumnDefinition) => result.push(column_definition(child)),
            Rule::Relabel(NodeKind::DataType) => {
                let (data_type, values) = data_type(child);
                result.push(data_type);
                result.extend(values);
            }
            Rule::Relabel(NodeKind::Constraint) => {
                result.push(retag(child.clone(), NodeKind::Constraint));
            }
            Rule::PassThrough if !grammar::is_non_terminal(&child.label) => {
                result.push(Node::leaf(child.label.clone(), leaf_kind));
            }
            Rule::Relabel(_) | Rule::PassThrough => result.extend(collect(child, leaf_kind)),
        }
    }

    result
}

/// Child 0 is the column name; the data type's size is lifted to be its
/// sibling; constraints are kept as they are.
fn column_definition(node: &Node) -> Node {
    let mut children = Vec::with_capacity(node.children.len() + 1);

    for (i, child) in node.children.iter().enumerate() {
        if i == 0 {
            children.push(Node::leaf(child.label.clone(), NodeKind::Identifier));
            continue;
        }

        match rule_for(&child.label) {
            Rule::Relabel(NodeKind::DataType) => {
                let (data_type, values) = data_type(child);
                children.push(data_type);
                children.extend(values);
            }
            Rule::Relabel(NodeKind::Constraint) => {
                children.push(retag(child.clone(), NodeKind::Constraint));
            }
            _ => {}
        }
    }

    Node::tagged(NodeKind::ColumnDefinition, children)
}

/// The type name becomes the node's label; the remaining non-parenthesis
/// children come back separately as values.
fn data_type(node: &Node) -> (Node, Vec<Node>) {
    let Some((name, rest)) = node.children.split_first() else {
        return (Node::tagged(NodeKind::DataType, Vec::new()), Vec::new());
    };

    let values = rest
        .iter()
        .filter(|c| c.label != "(" && c.label != ")")
        .map(|c| Node::leaf(c.label.clone(), NodeKind::Value))
        .collect();

    (Node::leaf(name.label.clone(), NodeKind::DataType), values)
}

fn retag(node: Node, kind: NodeKind) -> Node {
    Node {
        kind: Some(kind),
        ..node
    }
}
