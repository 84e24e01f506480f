//! Generic tree traversal.
//!
//! Every detection module and extraction routine builds on this one
//! utility; nothing else in the workspace walks trees by hand.

use tree_sitter::Node;

/// Pre-order depth-first walk.
///
/// `visit` returning `false` stops descent into that subtree only, not the
/// whole walk, which makes early-exit searches ("does this subtree mention
/// symbol X") cheap.
pub fn traverse<'tree, F>(node: Node<'tree>, visit: &mut F)
where
    F: FnMut(Node<'tree>) -> bool,
{
    if !visit(node) {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        traverse(child, visit);
    }
}

/// Total node count under (and including) `node`.
pub fn count_nodes(node: Node<'_>) -> usize {
    let mut count = 0;
    traverse(node, &mut |_| {
        count += 1;
        true
    });
    count
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse_go(source: &str) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .expect("load go grammar");
        parser.parse(source, None).expect("parse")
    }

    #[test]
    fn visits_every_node() {
        let tree = parse_go("package main\nfunc main() {}\n");
        let total = count_nodes(tree.root_node());
        assert!(total > 5, "expected a real tree, got {total} nodes");
    }

    #[test]
    fn false_prunes_subtree_not_walk() {
        let tree = parse_go("package main\nfunc a() {}\nfunc b() {}\n");
        let root = tree.root_node();

        let mut functions_seen = 0;
        let mut nodes_after_prune = 0;
        traverse(root, &mut |node| {
            if node.kind() == "function_declaration" {
                functions_seen += 1;
                return false; // skip the function's children
            }
            nodes_after_prune += 1;
            true
        });

        // Both sibling functions are still visited even though each
        // subtree was pruned.
        assert_eq!(functions_seen, 2);
        assert!(nodes_after_prune > 0);
    }
}
