//! End-to-end tests for the analysis engine entry points.

use pretty_assertions::assert_eq;
use vet_engine::{
    Analyzer, CancelFlag, FALLBACK_MAX_CONFIDENCE, MultiFileOptions, SourceFile, WarningKind,
};

fn passes(names: &[&str]) -> Vec<String> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn duplicate_functions_reported_once_per_group() {
    let code = r#"
package main

func addOne(x int) int {
	y := x + 1
	return y
}

func addTwo(x int) int {
	y := x + 1
	return y
}
"#;
    let analyzer = Analyzer::new();
    let output = analyzer
        .analyze(code, "go", &passes(&["duplicates"]))
        .await
        .unwrap();

    let duplicates: Vec<_> = output
        .findings
        .iter()
        .filter(|f| f.kind == "duplicate_function")
        .collect();
    assert_eq!(duplicates.len(), 1, "got {:?}", output.findings);
    assert!(duplicates[0].message.contains("'addOne'"));
    assert!(duplicates[0].message.contains("'addTwo'"));
}

#[tokio::test]
async fn unused_private_variable_is_auto_fix_safe() {
    let code = r#"
package main

func compute() int {
	unused := 42
	total := 7
	return total
}
"#;
    let analyzer = Analyzer::new();
    let output = analyzer
        .analyze(code, "go", &passes(&["unused"]))
        .await
        .unwrap();

    assert_eq!(output.findings.len(), 1, "got {:?}", output.findings);
    let finding = &output.findings[0];
    assert_eq!(finding.kind, "unused_variable");
    assert!(finding.confidence >= 0.85, "got {}", finding.confidence);
    assert!(finding.auto_fix_safe);
    assert!(finding.validated);
}

#[tokio::test]
async fn sql_injection_is_never_auto_fix_safe() {
    let code = "db.query(\"SELECT * FROM users WHERE id=\" + userInput);\n";
    let analyzer = Analyzer::new();
    let output = analyzer
        .analyze(code, "javascript", &passes(&["sql_injection"]))
        .await
        .unwrap();

    assert_eq!(output.findings.len(), 1, "got {:?}", output.findings);
    let finding = &output.findings[0];
    assert_eq!(finding.kind, "sql_injection");
    assert!(finding.security.is_some());
    assert!(!finding.auto_fix_safe);
}

#[tokio::test]
async fn exported_symbol_used_across_files_is_not_flagged() {
    let file_a = SourceFile::new("a.ts", "export function Foo() {\n  return 1;\n}\n")
        .with_language("typescript");
    let file_b = SourceFile::new(
        "b.ts",
        "import { Foo } from './a';\nexport function bar() {\n  return Foo();\n}\n",
    )
    .with_language("typescript");

    let analyzer = Analyzer::new();
    let analysis = analyzer
        .analyze_multi_file(vec![file_a, file_b])
        .await
        .unwrap();

    assert!(
        !analysis
            .findings
            .iter()
            .any(|f| f.kind == "unused_export" && f.message.contains("'Foo'")),
        "Foo is referenced from b.ts and must not be flagged: {:?}",
        analysis.findings
    );
    assert!(analysis.dependency_graph().has_edge("b.ts", "a.ts"));
    assert!(!analysis.symbol_table().symbols("Foo").is_empty());
}

#[tokio::test]
async fn partial_parse_still_detects_duplicates() {
    let code = r#"
package main

func dupA() {
	println("hello")
	println("world")
}

func dupB() {
	println("hello")
	println("world")
}

func broken() {
	if true {
}
"#;
    let analyzer = Analyzer::new();
    let output = analyzer
        .analyze(code, "go", &passes(&["duplicates"]))
        .await
        .unwrap();

    assert!(output.stats.partial_parse);
    assert!(!output.stats.used_fallback);
    assert!(
        output.findings.iter().any(|f| f.kind == "duplicate_function"),
        "expected duplicates from the parseable portion: {:?}",
        output.findings
    );
}

#[tokio::test]
async fn unknown_language_falls_back_with_capped_confidence() {
    let code = "query = \"SELECT * FROM users WHERE id=\" + params[:id]\n";
    let analyzer = Analyzer::new();
    let output = analyzer.analyze(code, "ruby", &[]).await.unwrap();

    assert!(output.stats.used_fallback);
    assert!(output
        .stats
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::FallbackUsed));
    assert!(!output.findings.is_empty(), "fallback should catch the SQL line");
    for finding in &output.findings {
        assert!(finding.confidence <= FALLBACK_MAX_CONFIDENCE);
        assert!(!finding.auto_fix_safe);
    }
}

#[tokio::test]
async fn analyze_is_deterministic() {
    let code = r#"
function first(a) {
  const sql = "SELECT name FROM users WHERE id=" + a;
  return db.query(sql);
}

function second(a) {
  const sql = "SELECT name FROM users WHERE id=" + a;
  return db.query(sql);
}

function lonely() {
  const leftover = 3;
  return 0;
}
"#;
    let analyzer = Analyzer::new();
    let all_passes: Vec<String> = Vec::new();
    let first = analyzer.analyze(code, "javascript", &all_passes).await.unwrap();
    let second = analyzer.analyze(code, "javascript", &all_passes).await.unwrap();

    assert_eq!(first.findings, second.findings);
    assert!(!first.findings.is_empty());
}

#[tokio::test]
async fn confidence_bounds_hold_for_every_finding() {
    let code = r#"
const password = "hunter2-hardcoded";

async function refresh() {
  fetch("/api/refresh");
}

function run(cmd) {
  exec("convert " + cmd);
}
"#;
    let analyzer = Analyzer::new();
    let output = analyzer.analyze(code, "javascript", &[]).await.unwrap();

    assert!(!output.findings.is_empty());
    for finding in &output.findings {
        assert!(
            (0.0..=1.0).contains(&finding.confidence),
            "confidence out of bounds: {finding:?}"
        );
        if finding.auto_fix_safe {
            assert!(finding.confidence >= 0.85, "{finding:?}");
            assert!(finding.security.is_none(), "{finding:?}");
        }
    }
}

#[tokio::test]
async fn missing_language_is_an_error() {
    let analyzer = Analyzer::new();
    let err = analyzer.analyze("x = 1", "", &[]).await.unwrap_err();
    assert!(matches!(err, vet_engine::VetError::LanguageRequired));
}

#[tokio::test]
async fn unknown_pass_names_are_ignored() {
    let analyzer = Analyzer::new();
    let output = analyzer
        .analyze(
            "package main\nfunc main() {}\n",
            "go",
            &passes(&["astrology", "numerology"]),
        )
        .await
        .unwrap();
    assert!(output.findings.is_empty());
}

#[tokio::test]
async fn empty_multi_file_request_is_empty_ok() {
    let analyzer = Analyzer::new();
    let analysis = analyzer.analyze_multi_file(Vec::new()).await.unwrap();
    assert!(analysis.findings.is_empty());
    assert_eq!(analysis.symbol_table().symbol_count(), 0);
}

#[tokio::test]
async fn unresolvable_language_is_skipped_with_warning() {
    let files = vec![
        SourceFile::new("data.bin", "\u{1}\u{2}\u{3} not code at all"),
        SourceFile::new("ok.go", "package main\nfunc main() {}\n"),
    ];
    let analyzer = Analyzer::new();
    let analysis = analyzer.analyze_multi_file(files).await.unwrap();

    assert!(analysis
        .stats
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::LanguageUnresolved
            && w.file.as_deref() == Some("data.bin")));
}

#[tokio::test]
async fn language_resolved_from_extension() {
    let files = vec![SourceFile::new(
        "script.py",
        "def used():\n    return 1\n\nvalue = used()\n",
    )];
    let analyzer = Analyzer::new();
    let analysis = analyzer.analyze_multi_file(files).await.unwrap();

    assert!(!analysis.symbol_table().symbols("used").is_empty());
}

#[tokio::test]
async fn cancelled_request_returns_promptly_with_warnings() {
    let cancel = CancelFlag::new();
    cancel.cancel();
    let options = MultiFileOptions {
        cancel,
        ..Default::default()
    };
    let files = vec![
        SourceFile::new("a.go", "package main\nfunc main() {}\n").with_language("go"),
        SourceFile::new("b.go", "package main\nfunc other() {}\n").with_language("go"),
    ];

    let analyzer = Analyzer::new();
    let analysis = analyzer.analyze_multi_file_with(files, options).await.unwrap();

    assert!(analysis.findings.is_empty());
    assert!(analysis
        .stats
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::Cancelled));
}

#[tokio::test]
async fn circular_dependencies_reported() {
    let file_a = SourceFile::new("a.ts", "import { b } from './b';\nexport function a() { return b(); }\n")
        .with_language("typescript");
    let file_b = SourceFile::new("b.ts", "import { a } from './a';\nexport function b() { return a(); }\n")
        .with_language("typescript");

    let analyzer = Analyzer::new();
    let analysis = analyzer
        .analyze_multi_file_with(
            vec![file_a, file_b],
            MultiFileOptions {
                passes: passes(&["circular_deps"]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(
        analysis
            .findings
            .iter()
            .any(|f| f.kind == "circular_dependency"),
        "got {:?}",
        analysis.findings
    );
}

#[tokio::test]
async fn introspection_lists_languages_and_passes() {
    let analyzer = Analyzer::new();
    assert_eq!(
        analyzer.supported_languages(),
        vec!["go", "javascript", "python", "typescript"]
    );
    let passes = analyzer.supported_passes();
    assert!(passes.contains(&"duplicates"));
    assert!(passes.contains(&"sql_injection"));
    assert!(passes.contains(&"unused_exports"));
}
