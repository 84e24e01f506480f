//! Node and text helpers shared by detection and extraction.

use tree_sitter::Node;
use vet_lang_api::{NodeTypeTable, Visibility};

/// Source text of a node. Malformed byte ranges yield an empty string
/// rather than a panic.
pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Start line, 1-indexed.
pub fn start_line(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

/// Start column, 0-indexed.
pub fn start_column(node: Node<'_>) -> usize {
    node.start_position().column
}

/// End line, 1-indexed.
pub fn end_line(node: Node<'_>) -> usize {
    node.end_position().row + 1
}

/// First direct child whose kind is in `kinds`.
pub fn find_child_of_kinds<'tree>(node: Node<'tree>, kinds: &[&str]) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|child| kinds.contains(&child.kind()));
    found
}

/// Breadth-first search for the first identifier-kind descendant, bounded
/// by `max_depth` so a method receiver's type doesn't shadow the name.
pub fn first_identifier<'tree>(
    table: &NodeTypeTable,
    node: Node<'tree>,
    max_depth: usize,
) -> Option<Node<'tree>> {
    let mut queue: Vec<(Node<'tree>, usize)> = vec![(node, 0)];
    let mut index = 0;
    while index < queue.len() {
        let (current, depth) = queue[index];
        index += 1;
        if depth > 0 && table.is_identifier(current.kind()) {
            return Some(current);
        }
        if depth < max_depth {
            let mut cursor = current.walk();
            for child in current.children(&mut cursor) {
                queue.push((child, depth + 1));
            }
        }
    }
    None
}

/// Whether any ancestor of `node` has a kind in `kinds`.
pub fn has_ancestor_of_kinds(node: Node<'_>, kinds: &[&str]) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if kinds.contains(&parent.kind()) {
            return true;
        }
        current = parent.parent();
    }
    false
}

/// The callee text of a call node: the first child's text, truncated at the
/// argument list. `db.Query(x)` yields `db.Query`.
pub fn callee_name(node: Node<'_>, source: &str) -> String {
    let Some(first) = node.child(0) else {
        return String::new();
    };
    let text = node_text(first, source);
    text.split('(').next().unwrap_or("").trim().to_string()
}

/// Comment text immediately preceding `node` (a doc comment candidate),
/// collected across consecutive comment siblings.
pub fn preceding_comment(table: &NodeTypeTable, node: Node<'_>, source: &str) -> Option<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = node.prev_sibling();
    let mut expected_row = node.start_position().row;
    while let Some(sibling) = current {
        if !table.is_comment(sibling.kind()) {
            break;
        }
        // Only adjacent comments count as documentation.
        if sibling.end_position().row + 1 < expected_row {
            break;
        }
        expected_row = sibling.start_position().row;
        lines.push(node_text(sibling, source).to_string());
        current = sibling.prev_sibling();
    }
    if lines.is_empty() {
        None
    } else {
        lines.reverse();
        Some(lines.join("\n"))
    }
}

/// How a language decides symbol visibility from a name and its
/// declaration node.
pub type VisibilityFn = fn(&str, Node<'_>, &NodeTypeTable) -> Visibility;

/// Default visibility rule: underscore-prefixed names are private
/// (scripting convention); declarations under an export statement are
/// exported; everything else is public. Languages with different rules
/// (Go's uppercase convention) supply their own function.
pub fn default_visibility(name: &str, node: Node<'_>, table: &NodeTypeTable) -> Visibility {
    if name.starts_with('_') {
        return Visibility::Private;
    }
    if !table.export_nodes.is_empty() && has_ancestor_of_kinds(node, table.export_nodes) {
        return Visibility::Exported;
    }
    Visibility::Public
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_js(source: &str) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .expect("load javascript grammar");
        parser.parse(source, None).expect("parse")
    }

    #[test]
    fn callee_of_member_call() {
        let tree = parse_js("db.query(sql);\n");
        let root = tree.root_node();
        let mut callee = String::new();
        crate::traverse(root, &mut |node| {
            if node.kind() == "call_expression" && callee.is_empty() {
                callee = callee_name(node, "db.query(sql);\n");
            }
            true
        });
        assert_eq!(callee, "db.query");
    }

    #[test]
    fn line_and_column_are_one_and_zero_indexed() {
        let source = "const a = 1;\nconst b = 2;\n";
        let tree = parse_js(source);
        let second = tree.root_node().child(1).unwrap();
        assert_eq!(start_line(second), 2);
        assert_eq!(start_column(second), 0);
    }
}
