use jrewrite::ast::{AstNode, CompilationUnit, ForEachStmt, NodeKind, TreePrinter, TypeDecl};
use jrewrite::parser::{parse_java, parse_statement};
use jrewrite::Error;

#[test]
fn parse_simple_class_with_main() {
    let source = r#"
package com.example;

public class HelloWorld {
    public static void main(String[] args) {
        for (String arg : args) {
            System.out.println("Hello, " + arg);
        }
    }
}
"#;
    let tree = parse_java(source).expect("Failed to parse");
    let output = TreePrinter::new().print(&tree, tree.root());

    assert!(output.contains("ClassDecl"));
    assert!(output.contains("MethodDecl"));
    assert!(output.contains("ForEachStmt"));
    assert_eq!(tree.source(), source);
}

#[test]
fn parse_with_imports_and_field_init() {
    let source = r#"
package com.example;

import java.util.List;
import java.util.ArrayList;
import static java.util.Collections.*;

public class TestClass {
    private List<String> items = new ArrayList<>();
}
"#;
    let tree = parse_java(source).expect("Failed to parse");
    let unit = CompilationUnit::cast(&tree, tree.root()).expect("compilation unit");

    assert_eq!(unit.package_name(&tree).as_deref(), Some("com.example"));
    let imports: Vec<(String, bool, bool)> = unit
        .imports(&tree)
        .iter()
        .map(|i| (i.path(&tree), i.is_static(&tree), i.is_wildcard(&tree)))
        .collect();
    assert_eq!(
        imports,
        vec![
            ("java.util.List".to_string(), false, false),
            ("java.util.ArrayList".to_string(), false, false),
            ("java.util.Collections".to_string(), true, true),
        ]
    );

    let decl: TypeDecl = unit.type_decls(&tree)[0];
    assert_eq!(decl.name(&tree).as_deref(), Some("TestClass"));
    let fields = decl.fields(&tree);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].declarators(&tree)[0].name(&tree).as_deref(), Some("items"));
}

#[test]
fn foreach_parts_are_addressable() {
    let tree = parse_statement("for (final int[] row : grid) total += row.length;").expect("Failed to parse");
    let stmt = ForEachStmt::cast(&tree, tree.fragment_statement().expect("statement")).expect("for-each");

    let parameter = stmt.parameter(&tree).expect("parameter");
    assert_eq!(parameter.name(&tree).as_deref(), Some("row"));
    assert_eq!(parameter.type_ref(&tree).map(|t| t.text(&tree)).as_deref(), Some("int[]"));
    assert!(parameter.modifiers(&tree).is_some());

    let value = stmt.iterated_value(&tree).expect("iterated value");
    assert_eq!(tree.text(value), "grid");
    let body = stmt.body(&tree).expect("body");
    assert!(tree.is_kind(body, NodeKind::ExprStmt));
    assert_eq!(tree.text(body), "total += row.length;");
}

#[test]
fn modern_syntax_round_trips() {
    let source = r#"
@SuppressWarnings("unchecked")
class Modern<T extends Comparable<? super T>> {
    enum Color { RED, GREEN; Color next() { return values()[(ordinal() + 1) % 3]; } }

    void run(java.util.List<T> xs) throws Exception {
        var copy = new java.util.ArrayList<T>(xs);
        copy.sort(T::compareTo);
        try (var in = open()) {
            switch (copy.size()) {
                case 0 -> System.out.println("none");
                default -> copy.forEach(x -> System.out.println(x));
            }
        } catch (IllegalStateException | IllegalArgumentException e) {
            throw e;
        } finally {
            label: for (int i = 0, j = 10; i < j; i++, j--) { if (i > 3) break label; }
        }
        Object o = copy;
        if (o instanceof java.util.List<?> l && !l.isEmpty()) { int[][] grid = new int[2][]; }
    }
}
"#;
    let tree = parse_java(source).expect("Failed to parse");
    assert_eq!(tree.source(), source);
}

#[test]
fn records_and_text_blocks_parse() {
    let source = r#"
record Point(int x, int y) implements Comparable<Point> {
    Point {
        if (x < 0) throw new IllegalArgumentException();
    }
    public int compareTo(Point other) { return Integer.compare(x, other.x); }
}

class Uses {
    String query = """
        SELECT "name" FROM t
        """;
    void m() {
        record Pair<A, B>(A first, B second) {}
        int record = 1;
    }
}
"#;
    let tree = parse_java(source).expect("Failed to parse");
    assert_eq!(tree.source(), source);

    let unit = CompilationUnit::cast(&tree, tree.root()).expect("compilation unit");
    let decls = unit.type_decls(&tree);
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[0].kind(&tree), NodeKind::RecordDecl);
    assert_eq!(decls[0].name(&tree).as_deref(), Some("Point"));
    let components: Vec<_> = decls[0]
        .record_components(&tree)
        .iter()
        .filter_map(|c| c.name(&tree))
        .collect();
    assert_eq!(components, vec!["x", "y"]);
    assert_eq!(decls[0].callables(&tree).len(), 2);

    let local = tree
        .descendants(tree.root())
        .filter_map(|id| TypeDecl::cast(&tree, id))
        .find(|decl| decl.name(&tree).as_deref() == Some("Pair"));
    assert!(local.is_some());
}

#[test]
fn syntax_errors_report_a_location() {
    let err = parse_java("class A {\n    void m() {\n        for (int x : ) {}\n    }\n}\n").unwrap_err();
    match err {
        Error::Parse { line, .. } => assert_eq!(line, 3),
        other => panic!("expected a parse error, got {:?}", other),
    }
}
