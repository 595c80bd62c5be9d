use jrewrite::ast::NodeKind;
use jrewrite::intention::{Intention, ReplaceForEachWithIndexedFor};
use jrewrite::parser::parse_java;
use jrewrite::{rewrite_source, Config, IntentionOutcome, SkipReason};

fn rewrite_first(source: &str) -> (IntentionOutcome, String) {
    rewrite_first_with(source, &Config::default())
}

fn rewrite_first_with(source: &str, config: &Config) -> (IntentionOutcome, String) {
    let mut tree = parse_java(source).expect("Failed to parse");
    let target = tree
        .descendants(tree.root())
        .find(|&id| tree.is_kind(id, NodeKind::ForEachStmt))
        .expect("no for-each loop in source");
    let outcome = ReplaceForEachWithIndexedFor::new()
        .invoke(&mut tree, target, config)
        .expect("rewrite failed");
    (outcome, tree.source())
}

#[test]
fn array_loop_uses_length_and_subscript() {
    let source = r#"class A {
    void m(String[] names) {
        for (String s : names) {
            print(s);
        }
    }
}
"#;
    let expected = r#"class A {
    void m(String[] names) {
        for (int i = 0; i < names.length; i++) {
            String s = names[i];
            print(s);
        }
    }
}
"#;
    let (outcome, text) = rewrite_first(source);
    match outcome {
        IntentionOutcome::Rewritten { index_name, .. } => assert_eq!(index_name, "i"),
        other => panic!("expected a rewrite, got {:?}", other),
    }
    assert_eq!(text, expected);
}

#[test]
fn list_loop_uses_size_and_get() {
    let source = r#"import java.util.List;

class A {
    void m(List<String> names) {
        for (String s : names) {
            print(s);
        }
    }
}
"#;
    let expected = r#"import java.util.List;

class A {
    void m(List<String> names) {
        for (int i = 0; i < names.size(); i++) {
            String s = names.get(i);
            print(s);
        }
    }
}
"#;
    let (outcome, text) = rewrite_first(source);
    assert!(outcome.is_rewritten());
    assert_eq!(text, expected);
}

#[test]
fn existing_index_name_is_not_reused() {
    let source = r#"class A {
    void m(int[] xs) {
        int i = 0;
        for (int x : xs) {
            i += x;
        }
    }
}
"#;
    let (outcome, text) = rewrite_first(source);
    match outcome {
        IntentionOutcome::Rewritten { index_name, .. } => assert_eq!(index_name, "i1"),
        other => panic!("expected a rewrite, got {:?}", other),
    }
    assert!(text.contains("for (int i1 = 0; i1 < xs.length; i1++) {"));
    assert!(text.contains("int x = xs[i1];"));
    assert!(text.contains("i += x;"));
}

#[test]
fn block_body_keeps_its_statements_in_order() {
    let source = r#"class A {
    void m(int[] xs) {
        for (int x : xs) {
            first(x);
            second(x);
            third(x);
        }
    }
}
"#;
    let expected = r#"class A {
    void m(int[] xs) {
        for (int i = 0; i < xs.length; i++) {
            int x = xs[i];
            first(x);
            second(x);
            third(x);
        }
    }
}
"#;
    let (_, text) = rewrite_first(source);
    assert_eq!(text, expected);
    assert_eq!(text.matches('{').count(), source.matches('{').count());
    assert_eq!(text.matches("second(x);").count(), 1);
}

#[test]
fn single_statement_body_is_transplanted_verbatim() {
    let source = r#"class A {
    void m(String[] names) {
        for (String s : names) print( s );
    }
}
"#;
    let expected = r#"class A {
    void m(String[] names) {
        for (int i = 0; i < names.length; i++) {
            String s = names[i];
            print( s );
        }
    }
}
"#;
    let (_, text) = rewrite_first(source);
    assert_eq!(text, expected);
}

#[test]
fn comments_in_the_body_survive() {
    let source = r#"class A {
    void m(int[] xs) {
        for (int x : xs) {
            // keep me
            use(x); /* and me */
        }
    }
}
"#;
    let (_, text) = rewrite_first(source);
    assert!(text.contains("            int x = xs[i];\n            // keep me\n            use(x); /* and me */\n        }"));
}

#[test]
fn crlf_sources_keep_crlf_line_breaks() {
    let source = "class A {\r\n    void m(int[] xs) {\r\n        for (int x : xs) {\r\n            f(x);\r\n        }\r\n    }\r\n}\r\n";
    let expected = "class A {\r\n    void m(int[] xs) {\r\n        for (int i = 0; i < xs.length; i++) {\r\n            int x = xs[i];\r\n            f(x);\r\n        }\r\n    }\r\n}\r\n";
    let (outcome, text) = rewrite_first(source);
    assert!(outcome.is_rewritten());
    assert_eq!(text, expected);
}

#[test]
fn comment_between_header_and_block_moves_into_the_body() {
    let source = r#"class A {
    void m(int[] xs) {
        for (int x : xs) /* keep me */ {
            f(x);
        }
    }
}
"#;
    let expected = r#"class A {
    void m(int[] xs) {
        for (int i = 0; i < xs.length; i++) {
            int x = xs[i];
            /* keep me */
            f(x);
        }
    }
}
"#;
    let (outcome, text) = rewrite_first(source);
    assert!(outcome.is_rewritten());
    assert_eq!(text, expected);
}

#[test]
fn comment_before_single_statement_body_is_kept() {
    let source = r#"class A {
    void m(int[] xs) {
        for (int x : xs) // keep me
            f(x);
    }
}
"#;
    let expected = r#"class A {
    void m(int[] xs) {
        for (int i = 0; i < xs.length; i++) {
            int x = xs[i];
            // keep me
            f(x);
        }
    }
}
"#;
    let (outcome, text) = rewrite_first(source);
    assert!(outcome.is_rewritten());
    assert_eq!(text, expected);
}

#[test]
fn final_modifier_and_generic_type_are_preserved() {
    let source = r#"import java.util.*;

class A {
    void m(ArrayList<Map.Entry<String, Integer>> entries) {
        for (final Map.Entry<String, Integer> e : entries) {
            use(e);
        }
    }
}
"#;
    let (outcome, text) = rewrite_first(source);
    assert!(outcome.is_rewritten());
    assert!(text.contains("final Map.Entry<String, Integer> e = entries.get(i);"));
}

#[test]
fn field_receiver_through_this() {
    let source = r#"import java.util.ArrayList;
import java.util.List;

class A {
    private final List<Integer> items = new ArrayList<>();

    int total() {
        int sum = 0;
        for (Integer n : this.items) sum += n;
        return sum;
    }
}
"#;
    let (outcome, text) = rewrite_first(source);
    assert!(outcome.is_rewritten());
    assert!(text.contains("for (int i = 0; i < this.items.size(); i++) {"));
    assert!(text.contains("Integer n = this.items.get(i);"));
}

#[test]
fn conditional_receiver_is_parenthesized() {
    let source = r#"class A {
    void m(boolean flag, int[] a, int[] b) {
        for (int x : flag ? a : b) {
            use(x);
        }
    }
}
"#;
    let (_, text) = rewrite_first(source);
    assert!(text.contains("for (int i = 0; i < (flag ? a : b).length; i++) {"));
    assert!(text.contains("int x = (flag ? a : b)[i];"));
}

#[test]
fn qualified_names_are_shortened_when_imported() {
    let source = r#"import java.util.List;

class A {
    void m(List<java.util.List<String>> rows) {
        for (java.util.List<String> row : rows) {
            use(row);
        }
    }
}
"#;
    let (_, text) = rewrite_first(source);
    assert!(text.contains("            List<String> row = rows.get(i);"));

    let config = Config { shorten_references: false, ..Config::default() };
    let (_, text) = rewrite_first_with(source, &config);
    assert!(text.contains("            java.util.List<String> row = rows.get(i);"));
}

#[test]
fn configured_index_name_and_type() {
    let source = "class A {\n    void m(long[] xs) {\n        for (long x : xs) use(x);\n    }\n}\n";
    let config = Config {
        index_name: "idx".to_string(),
        index_type: "long".to_string(),
        ..Config::default()
    };
    let (_, text) = rewrite_first_with(source, &config);
    assert!(text.contains("for (long idx = 0; idx < xs.length; idx++) {"));
    assert!(text.contains("long x = xs[idx];"));
}

#[test]
fn loop_over_iterable_is_not_rewritten() {
    let source = r#"import java.util.Set;

class A {
    void m(Set<String> names) {
        for (String s : names) {
            print(s);
        }
    }
}
"#;
    let (outcome, text) = rewrite_first(source);
    assert_eq!(outcome, IntentionOutcome::Skipped(SkipReason::NotApplicable));
    assert_eq!(text, source);
}

#[test]
fn record_component_is_iterated_by_index() {
    let source = r#"import java.util.List;

record Names(List<String> items) {
    void print() {
        for (String s : items) {
            System.out.println(s);
        }
    }
}
"#;
    let expected = r#"import java.util.List;

record Names(List<String> items) {
    void print() {
        for (int i = 0; i < items.size(); i++) {
            String s = items.get(i);
            System.out.println(s);
        }
    }
}
"#;
    assert_eq!(rewrite_source(source, &Config::default()).expect("rewrite"), expected);
}

#[test]
fn class_shadowing_a_list_name_is_not_rewritten() {
    let source = r#"class Stack<T> implements Iterable<T> {
    public java.util.Iterator<T> iterator() { return null; }
}

class A {
    void m(Stack<String> st) {
        for (String s : st) {
            print(s);
        }
    }
}
"#;
    assert_eq!(rewrite_source(source, &Config::default()).expect("rewrite"), source);
}

#[test]
fn nested_loops_are_rewritten_outside_in() {
    let source = r#"class A {
    int sum(int[][] grid) {
        int sum = 0;
        for (int[] row : grid) {
            for (int v : row) {
                sum += v;
            }
        }
        return sum;
    }
}
"#;
    let expected = r#"class A {
    int sum(int[][] grid) {
        int sum = 0;
        for (int i = 0; i < grid.length; i++) {
            int[] row = grid[i];
            for (int i1 = 0; i1 < row.length; i1++) {
                int v = row[i1];
                sum += v;
            }
        }
        return sum;
    }
}
"#;
    assert_eq!(rewrite_source(source, &Config::default()).expect("rewrite"), expected);
}
