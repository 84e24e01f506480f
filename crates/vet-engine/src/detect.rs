//! Pass dispatch with per-module failure isolation.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tree_sitter::Node;
use vet_foundation::{Finding, VetError, VetResult};
use vet_lang_api::LanguageDetector;

use crate::passes::Pass;

/// Run one detection pass over an already-parsed tree.
///
/// A panicking module is converted into a `ModuleFailure` error so the
/// orchestrator can log it, record a warning, and carry on with the
/// sibling modules.
pub fn run_pass(
    pass: Pass,
    detector: &dyn LanguageDetector,
    root: Node<'_>,
    source: &str,
) -> VetResult<Vec<Finding>> {
    let outcome = catch_unwind(AssertUnwindSafe(|| match pass {
        Pass::Duplicates => detector.detect_duplicates(root, source),
        Pass::UnusedVariables => detector.detect_unused_variables(root, source),
        Pass::Unreachable => detector.detect_unreachable(root, source),
        Pass::Orphaned => detector.detect_orphaned(root, source),
        Pass::EmptyCatch => detector.detect_empty_catch(root, source),
        Pass::AsyncMisuse => detector.detect_async_misuse(root, source),
        Pass::SqlInjection => detector.detect_sql_injection(root, source),
        Pass::Xss => detector.detect_xss(root, source),
        Pass::CommandInjection => detector.detect_command_injection(root, source),
        Pass::WeakCrypto => detector.detect_weak_crypto(root, source),
        Pass::SecurityMiddleware => detector.detect_security_middleware(root, source),
        // Cross-file passes never reach the per-file dispatcher.
        Pass::UnusedExports | Pass::CrossFileDuplicates | Pass::CircularDependencies => Vec::new(),
    }));

    match outcome {
        Ok(mut findings) => {
            for finding in &mut findings {
                finding.clamp_confidence();
            }
            Ok(findings)
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(VetError::module_failure(pass.name(), message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vet_lang_api::NodeTypeTable;

    static EMPTY_TABLE: NodeTypeTable = NodeTypeTable {
        function_nodes: &[],
        method_nodes: &[],
        lambda_nodes: &[],
        variable_nodes: &[],
        assignment_nodes: &[],
        class_nodes: &[],
        import_nodes: &[],
        export_nodes: &[],
        call_nodes: &[],
        identifier_nodes: &[],
        string_nodes: &[],
        comment_nodes: &[],
        block_nodes: &[],
        terminator_nodes: &[],
        catch_nodes: &[],
        parameter_nodes: &[],
        statement_nodes: &[],
    };

    struct PanickingDetector;

    impl LanguageDetector for PanickingDetector {
        fn node_types(&self) -> &'static NodeTypeTable {
            &EMPTY_TABLE
        }
        fn detect_duplicates(&self, _: Node<'_>, _: &str) -> Vec<Finding> {
            panic!("unexpected tree shape")
        }
        fn detect_unused_variables(&self, _: Node<'_>, _: &str) -> Vec<Finding> {
            Vec::new()
        }
        fn detect_unreachable(&self, _: Node<'_>, _: &str) -> Vec<Finding> {
            Vec::new()
        }
        fn detect_orphaned(&self, _: Node<'_>, _: &str) -> Vec<Finding> {
            Vec::new()
        }
        fn detect_empty_catch(&self, _: Node<'_>, _: &str) -> Vec<Finding> {
            Vec::new()
        }
        fn detect_sql_injection(&self, _: Node<'_>, _: &str) -> Vec<Finding> {
            Vec::new()
        }
        fn detect_xss(&self, _: Node<'_>, _: &str) -> Vec<Finding> {
            Vec::new()
        }
        fn detect_command_injection(&self, _: Node<'_>, _: &str) -> Vec<Finding> {
            Vec::new()
        }
        fn detect_weak_crypto(&self, _: Node<'_>, _: &str) -> Vec<Finding> {
            Vec::new()
        }
        fn detect_security_middleware(&self, _: Node<'_>, _: &str) -> Vec<Finding> {
            Vec::new()
        }
    }

    #[test]
    fn panic_becomes_module_failure() {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&(vet_lang_go::support().grammar)())
            .unwrap();
        let tree = parser.parse("package main\n", None).unwrap();

        let detector = PanickingDetector;
        let err = run_pass(Pass::Duplicates, &detector, tree.root_node(), "package main\n")
            .unwrap_err();
        match err {
            VetError::ModuleFailure { pass, message } => {
                assert_eq!(pass, "duplicates");
                assert!(message.contains("unexpected tree shape"));
            }
            other => panic!("expected ModuleFailure, got {other:?}"),
        }

        // Sibling modules on the same detector still run.
        let ok = run_pass(Pass::Xss, &detector, tree.root_node(), "package main\n").unwrap();
        assert!(ok.is_empty());
    }
}
