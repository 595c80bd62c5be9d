use std::fs;

use jrewrite::resolve::IterationKind;
use jrewrite::{rewrite_file, Config, Document, Error, IntentionOutcome, SkipReason};

const SOURCE: &str = r#"import java.util.List;
import java.util.Set;

class Report {
    void print(List<String> lines, int[] widths, Set<String> tags) {
        for (String line : lines) {
            emit(line);
        }
        for (int w : widths) pad(w);
        for (String tag : tags) {
            emit(tag);
        }
    }
}
"#;

#[test]
fn eligible_loops_are_listed_in_source_order() {
    let document = Document::parse(SOURCE, Config::default()).expect("Failed to parse");
    let loops = document.eligible_loops();
    let found: Vec<_> = loops
        .iter()
        .map(|l| (l.location.line, l.location.column, l.kind))
        .collect();
    assert_eq!(found, vec![(6, 9, IterationKind::List), (9, 9, IterationKind::Array)]);
}

#[test]
fn rewrite_at_picks_the_loop_under_the_cursor() {
    let mut document = Document::parse(SOURCE, Config::default()).expect("Failed to parse");
    let outcome = document.rewrite_at(9, 20).expect("rewrite");
    assert!(outcome.is_rewritten());

    let text = document.text();
    assert!(text.contains("for (String line : lines) {"));
    assert!(text.contains(
        "        for (int i = 0; i < widths.length; i++) {\n            int w = widths[i];\n            pad(w);\n        }\n"
    ));
}

#[test]
fn rewrite_at_outside_any_header_does_nothing() {
    let mut document = Document::parse(SOURCE, Config::default()).expect("Failed to parse");
    assert_eq!(
        document.rewrite_at(7, 13).expect("rewrite"),
        IntentionOutcome::Skipped(SkipReason::NotApplicable)
    );
    assert_eq!(
        document.rewrite_at(100, 1).expect("rewrite"),
        IntentionOutcome::Skipped(SkipReason::NotApplicable)
    );
    assert_eq!(document.text(), SOURCE);
    assert_eq!(document.revision(), 0);
}

#[test]
fn rewrite_all_leaves_other_loops_alone() {
    let mut document = Document::parse(SOURCE, Config::default()).expect("Failed to parse");
    let outcomes = document.rewrite_all().expect("rewrite");
    assert_eq!(outcomes.iter().filter(|o| o.is_rewritten()).count(), 2);
    assert!(document.eligible_loops().is_empty());

    let text = document.text();
    assert!(text.contains("String line = lines.get(i);"));
    assert!(text.contains("int w = widths[i1];"));
    assert!(text.contains("for (String tag : tags) {"));
}

#[test]
fn anchors_go_stale_after_any_rewrite() {
    let mut document = Document::parse(SOURCE, Config::default()).expect("Failed to parse");
    let loops = document.eligible_loops();
    document.apply(loops[0].anchor).expect("rewrite");
    assert!(matches!(document.apply(loops[1].anchor), Err(Error::StaleNode { .. })));

    let fresh = document.eligible_loops();
    assert_eq!(fresh.len(), 1);
    assert!(document.apply(fresh[0].anchor).expect("rewrite").is_rewritten());
}

#[test]
fn files_are_rewritten_in_place() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("Report.java");
    fs::write(&path, SOURCE).expect("write source");

    let rewritten = rewrite_file(&path, &Config::default()).expect("rewrite");
    assert_eq!(rewritten, 2);

    let text = fs::read_to_string(&path).expect("read back");
    assert!(text.contains("for (int i = 0; i < lines.size(); i++) {"));

    let document = Document::open(&path, Config::default()).expect("reopen");
    assert_eq!(document.path(), Some(path.as_path()));
    assert!(document.eligible_loops().is_empty());
}

#[test]
fn save_without_a_path_fails() {
    let document = Document::parse(SOURCE, Config::default()).expect("Failed to parse");
    assert!(matches!(document.save(), Err(Error::Io(_))));
}

#[test]
fn invalid_config_is_rejected() {
    let config = Config { index_name: String::new(), ..Config::default() };
    assert!(matches!(Document::parse(SOURCE, config), Err(Error::Config { .. })));
}
