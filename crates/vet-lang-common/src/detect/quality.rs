//! Code-quality detection: duplicates, unused variables, unreachable code,
//! orphaned functions, empty catch blocks.

use rustc_hash::FxHashMap;
use tree_sitter::Node;
use vet_foundation::{Finding, FixKind, Severity};
use vet_lang_api::{NodeTypeTable, Visibility};

use crate::body_hash::{is_meaningful_body, normalized_body_hash};
use crate::node_utils::{
    callee_name, end_line, find_child_of_kinds, first_identifier, node_text, start_column,
    start_line,
};
use crate::{traverse, DetectionConfig, VisibilityFn};

/// The name of a function-like node, if it has one.
pub(crate) fn function_name(table: &NodeTypeTable, node: Node<'_>, source: &str) -> Option<String> {
    first_identifier(table, node, 2).map(|id| node_text(id, source).to_string())
}

/// Functions whose normalized bodies hash equal. One finding per duplicate
/// group, anchored at the first member and referencing every location.
pub(crate) fn detect_duplicates(
    table: &NodeTypeTable,
    root: Node<'_>,
    source: &str,
) -> Vec<Finding> {
    struct FunctionBody {
        name: String,
        line: usize,
        column: usize,
        end_line: usize,
        code_head: String,
    }

    let mut order: Vec<u64> = Vec::new();
    let mut groups: FxHashMap<u64, Vec<FunctionBody>> = FxHashMap::default();

    traverse(root, &mut |node| {
        if !table.is_function(node.kind()) {
            return true;
        }
        let Some(name) = function_name(table, node, source) else {
            return true;
        };
        let body = find_child_of_kinds(node, table.block_nodes).unwrap_or(node);
        let body_text = node_text(body, source);
        if !is_meaningful_body(body_text) {
            return true;
        }
        let hash = normalized_body_hash(body_text);
        let entry = groups.entry(hash).or_insert_with(|| {
            order.push(hash);
            Vec::new()
        });
        entry.push(FunctionBody {
            name,
            line: start_line(node),
            column: start_column(node),
            end_line: end_line(node),
            code_head: node_text(node, source).lines().next().unwrap_or("").to_string(),
        });
        true
    });

    let mut findings = Vec::new();
    for hash in order {
        let members = &groups[&hash];
        if members.len() < 2 {
            continue;
        }
        let locations: Vec<String> = members
            .iter()
            .map(|m| format!("'{}' (line {})", m.name, m.line))
            .collect();
        let severity = if members.len() > 2 {
            Severity::High
        } else {
            Severity::Medium
        };
        let first = &members[0];
        let mut finding = Finding::quality(
            "duplicate_function",
            severity,
            first.line,
            first.column,
            format!(
                "{} functions share an identical body: {}",
                members.len(),
                locations.join(", ")
            ),
        )
        .with_span(first.end_line, 0)
        .with_code(first.code_head.clone())
        .with_suggestion("Keep one implementation and delete or delegate the others")
        .with_confidence(0.8);
        finding.fix_kind = Some(FixKind::Refactor);
        findings.push(finding);
    }
    findings
}

/// Declaration statements whose declared identifier is never read anywhere
/// else in the file. Externally visible symbols are skipped; multi-file
/// analysis owns that question.
pub(crate) fn detect_unused_variables(
    table: &NodeTypeTable,
    visibility: VisibilityFn,
    root: Node<'_>,
    source: &str,
) -> Vec<Finding> {
    struct Declaration<'tree> {
        name: String,
        node: Node<'tree>,
    }

    let mut declarations: Vec<Declaration<'_>> = Vec::new();
    traverse(root, &mut |node| {
        if table.is_variable_decl(node.kind()) {
            if let Some(id) = first_identifier(table, node, 3) {
                declarations.push(Declaration {
                    name: node_text(id, source).to_string(),
                    node,
                });
            }
        }
        true
    });

    let mut findings = Vec::new();
    for decl in &declarations {
        if decl.name.is_empty() {
            continue;
        }
        // Exported declarations are the cross-file resolver's business;
        // flagging them here would contradict references we cannot see.
        if visibility(&decl.name, decl.node, table) == Visibility::Exported {
            continue;
        }

        let mut used = false;
        traverse(root, &mut |node| {
            if used {
                return false;
            }
            if table.is_identifier(node.kind()) && node_text(node, source) == decl.name {
                let inside_decl = node.start_byte() >= decl.node.start_byte()
                    && node.end_byte() <= decl.node.end_byte();
                if !inside_decl {
                    used = true;
                    return false;
                }
            }
            true
        });

        if !used {
            let mut finding = Finding::quality(
                "unused_variable",
                Severity::Medium,
                start_line(decl.node),
                start_column(decl.node),
                format!("Variable '{}' is declared but never used", decl.name),
            )
            .with_span(end_line(decl.node), 0)
            .with_code(node_text(decl.node, source).to_string())
            .with_suggestion(format!("Remove the unused variable '{}'", decl.name))
            .with_confidence(0.5);
            finding.fix_kind = Some(FixKind::Delete);
            finding.reasoning = "Pending codebase validation".to_string();
            findings.push(finding);
        }
    }
    findings
}

fn terminator_word(kind: &str) -> &'static str {
    if kind.contains("throw") {
        "throw"
    } else if kind.contains("raise") {
        "raise"
    } else if kind.contains("break") {
        "break"
    } else {
        "return"
    }
}

/// Statements following an unconditional terminator in the same block.
/// Reports the first unreachable statement per block.
pub(crate) fn detect_unreachable(
    table: &NodeTypeTable,
    root: Node<'_>,
    source: &str,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    traverse(root, &mut |node| {
        if !table.is_block(node.kind()) {
            return true;
        }
        let mut terminator: Option<&'static str> = None;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if let Some(word) = terminator {
                if table.is_comment(child.kind()) {
                    continue;
                }
                if table.is_statement(child.kind()) || table.is_terminator(child.kind()) {
                    let mut finding = Finding::quality(
                        "unreachable_code",
                        Severity::Medium,
                        start_line(child),
                        start_column(child),
                        format!("Unreachable code after {word} statement"),
                    )
                    .with_span(end_line(child), 0)
                    .with_code(node_text(child, source).to_string())
                    .with_suggestion(format!(
                        "Remove the unreachable code or move it before the {word}"
                    ))
                    .with_confidence(0.9);
                    finding.fix_kind = Some(FixKind::Delete);
                    findings.push(finding);
                    break;
                }
            } else if table.is_terminator(child.kind()) {
                terminator = Some(terminator_word(child.kind()));
            }
        }
        true
    });
    findings
}

/// Functions defined but never called within this source, subject to the
/// exclusion config.
pub(crate) fn detect_orphaned(
    table: &NodeTypeTable,
    config: &DetectionConfig,
    visibility: VisibilityFn,
    root: Node<'_>,
    source: &str,
) -> Vec<Finding> {
    struct Definition<'tree> {
        name: String,
        node: Node<'tree>,
    }

    let mut definitions: Vec<Definition<'_>> = Vec::new();
    let mut called: Vec<String> = Vec::new();

    traverse(root, &mut |node| {
        let kind = node.kind();
        if table.is_function(kind) {
            if let Some(name) = function_name(table, node, source) {
                definitions.push(Definition { name, node });
            }
        } else if table.is_call(kind) {
            let callee = callee_name(node, source);
            if let Some(last) = callee.rsplit(['.', ':']).next() {
                called.push(last.to_string());
            }
        }
        true
    });

    let mut findings = Vec::new();
    for def in definitions {
        if config.excludes(&def.name) {
            continue;
        }
        if config.trust_exported && visibility(&def.name, def.node, table) == Visibility::Exported {
            continue;
        }
        if called.iter().any(|c| c == &def.name) {
            continue;
        }
        let mut finding = Finding::quality(
            "orphaned_code",
            Severity::Info,
            start_line(def.node),
            start_column(def.node),
            format!("Function '{}' is defined but never called", def.name),
        )
        .with_span(end_line(def.node), 0)
        .with_code(
            node_text(def.node, source)
                .lines()
                .next()
                .unwrap_or("")
                .to_string(),
        )
        .with_suggestion(format!(
            "Remove '{}' if it is dead, or add the missing call site",
            def.name
        ))
        .with_confidence(0.5);
        finding.fix_kind = Some(FixKind::Delete);
        finding.reasoning = "Pending codebase validation".to_string();
        findings.push(finding);
    }
    findings
}

/// Catch/except bodies with no meaningful statements. A bare `pass` counts
/// as empty.
pub(crate) fn detect_empty_catch(
    table: &NodeTypeTable,
    root: Node<'_>,
    source: &str,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    traverse(root, &mut |node| {
        if !table.is_catch(node.kind()) {
            return true;
        }
        let Some(body) = find_child_of_kinds(node, table.block_nodes) else {
            return true;
        };
        let mut has_statements = false;
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            if table.is_comment(child.kind()) || child.kind() == "pass_statement" {
                continue;
            }
            has_statements = true;
            break;
        }
        if !has_statements {
            let mut finding = Finding::quality(
                "empty_catch",
                Severity::Medium,
                start_line(node),
                start_column(node),
                "Empty catch block silently swallows errors",
            )
            .with_span(end_line(node), 0)
            .with_code(node_text(node, source).to_string())
            .with_suggestion("Handle the error, log it, or document why it is ignored")
            .with_confidence(0.5);
            finding.fix_kind = Some(FixKind::Refactor);
            finding.reasoning = "Pending codebase validation".to_string();
            findings.push(finding);
        }
        true
    });
    findings
}
