//! Async-misuse detection helpers.
//!
//! Deliberately shallow and pattern-based: no data-flow analysis. Only
//! languages with an `await` keyword get a signal; their crates call these
//! from their `detect_async_misuse` override.

use tree_sitter::Node;
use vet_foundation::{Finding, FixKind, Severity};
use vet_lang_api::NodeTypeTable;

use crate::node_utils::{callee_name, end_line, node_text, start_column, start_line};
use crate::{traverse, DetectorHooks};

fn has_token_child(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == token);
    found
}

fn missing_await_finding(node: Node<'_>, source: &str, message: String) -> Finding {
    let mut finding = Finding::quality(
        "missing_await",
        Severity::High,
        start_line(node),
        start_column(node),
        message,
    )
    .with_span(end_line(node), 0)
    .with_code(node_text(node, source).to_string())
    .with_suggestion("Add 'await' before the call, or handle the returned promise")
    .with_confidence(0.7);
    finding.fix_kind = Some(FixKind::Refactor);
    finding
}

/// JavaScript/TypeScript: promise-looking calls inside `async` functions
/// that aren't awaited.
pub fn detect_missing_await(
    table: &NodeTypeTable,
    hooks: &DetectorHooks,
    root: Node<'_>,
    source: &str,
) -> Vec<Finding> {
    let mut async_bodies: Vec<Node<'_>> = Vec::new();
    traverse(root, &mut |node| {
        if table.is_function_like(node.kind()) && has_token_child(node, "async") {
            async_bodies.push(node);
        }
        true
    });

    let mut findings = Vec::new();
    for body in async_bodies {
        traverse(body, &mut |node| {
            if !table.is_call(node.kind()) {
                return true;
            }
            let awaited = node
                .parent()
                .map(|p| p.kind() == "await_expression")
                .unwrap_or(false);
            if awaited {
                return true;
            }
            let call_lower = node_text(node, source).to_ascii_lowercase();
            if DetectorHooks::matches_any(hooks.promise_hints, &call_lower) {
                // `.then`/`.catch` chains handle the promise explicitly;
                // don't descend, or the chained call would be re-flagged.
                if call_lower.contains(".then") || call_lower.contains(".catch") {
                    return false;
                }
                findings.push(missing_await_finding(
                    node,
                    source,
                    "Promise-returning call is not awaited inside an async function".to_string(),
                ));
                return false;
            }
            true
        });
    }
    findings
}

/// Python: bare calls to locally defined `async def` functions that are
/// neither awaited nor scheduled.
pub fn detect_unawaited_coroutines(
    table: &NodeTypeTable,
    root: Node<'_>,
    source: &str,
) -> Vec<Finding> {
    let mut coroutine_names: Vec<String> = Vec::new();
    traverse(root, &mut |node| {
        if table.is_function(node.kind()) && has_token_child(node, "async") {
            if let Some(name) = crate::detect::quality::function_name(table, node, source) {
                coroutine_names.push(name);
            }
        }
        true
    });
    if coroutine_names.is_empty() {
        return Vec::new();
    }

    let mut findings = Vec::new();
    traverse(root, &mut |node| {
        if !table.is_call(node.kind()) {
            return true;
        }
        let callee = callee_name(node, source);
        let simple = callee.rsplit('.').next().unwrap_or(&callee);
        if !coroutine_names.iter().any(|n| n == simple) {
            return true;
        }
        let mut ancestor = node.parent();
        let mut handled = false;
        while let Some(parent) = ancestor {
            match parent.kind() {
                "await" => {
                    handled = true;
                    break;
                }
                // asyncio.run(coro()), gather(coro()), create_task(coro())
                kind if table.is_call(kind) => {
                    let outer = callee_name(parent, source).to_ascii_lowercase();
                    if outer.contains("run") || outer.contains("gather") || outer.contains("task") {
                        handled = true;
                    }
                    break;
                }
                _ => ancestor = parent.parent(),
            }
        }
        if !handled {
            findings.push(missing_await_finding(
                node,
                source,
                format!("Coroutine '{simple}' called without await"),
            ));
            return false;
        }
        true
    });
    findings
}
