//! Static types of expressions inside one compilation unit
//!
//! Resolution is local: declared types of variables, fields and methods in
//! the tree, plus a handful of well-known library calls that produce lists
//! or arrays. Anything else is reported as unknown.

mod hierarchy;
mod scope;
mod types;

pub use hierarchy::Hierarchy;
pub use scope::{
    declared_names, enclosing_code_owner, enclosing_type_decls, field_bindings, lookup_variable,
    parameter_binding, Binding,
};
pub use types::{JavaType, TypeArg};

use crate::ast::{
    AstNode, FieldAccess, MethodCall, NameRef, NodeId, NodeKind, SyntaxTree, TypeDecl, TypeRef,
};
use crate::config::Config;
use crate::consts::{ARRAY_LENGTH_FIELD, LIST_ELEMENT_ACCESSOR};
use crate::parser::lexer::Token;

const MAX_RESOLVE_DEPTH: usize = 64;

/// How a for-each loop walks its iterated value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IterationKind {
    /// Indexed with `[i]`, bounded by `.length`
    Array,
    /// Indexed with `.get(i)`, bounded by `.size()`
    List,
}

impl IterationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IterationKind::Array => "array",
            IterationKind::List => "list",
        }
    }
}

pub struct TypeResolver<'a> {
    tree: &'a SyntaxTree,
    config: &'a Config,
    hierarchy: Hierarchy,
}

impl<'a> TypeResolver<'a> {
    pub fn new(tree: &'a SyntaxTree, config: &'a Config) -> Self {
        Self {
            tree,
            config,
            hierarchy: Hierarchy::collect(tree),
        }
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Static type of an expression node, if it can be determined
    pub fn type_of(&self, expr: NodeId) -> Option<JavaType> {
        self.resolve(expr, 0)
    }

    /// Array or list classification of an iterated value
    pub fn iteration_kind(&self, expr: NodeId) -> Option<IterationKind> {
        let ty = self.type_of(expr)?;
        if ty.is_array() {
            Some(IterationKind::Array)
        } else if self.hierarchy.is_list_type(&ty, self.config) {
            Some(IterationKind::List)
        } else {
            None
        }
    }

    fn resolve(&self, expr: NodeId, depth: usize) -> Option<JavaType> {
        if depth > MAX_RESOLVE_DEPTH {
            log::debug!("giving up on {} past depth {}", expr, MAX_RESOLVE_DEPTH);
            return None;
        }
        let tree = self.tree;
        match tree.node_kind(expr)? {
            NodeKind::ParenExpr => self.resolve(tree.child_nodes(expr).next()?, depth + 1),
            NodeKind::NameRef => {
                let name = NameRef::from_id(expr).name(tree)?;
                let binding = lookup_variable(tree, expr, &name)?;
                self.binding_type(&binding, depth)
            }
            NodeKind::FieldAccess => self.resolve_field_access(FieldAccess::from_id(expr), depth),
            NodeKind::MethodCall => self.resolve_method_call(MethodCall::from_id(expr), depth),
            NodeKind::ArrayAccess => {
                let array = tree.child_nodes(expr).next()?;
                self.resolve(array, depth + 1)?.component().cloned()
            }
            NodeKind::NewExpr => {
                let type_ref = TypeRef::cast(tree, tree.child_of_kind(expr, NodeKind::TypeRef)?)?;
                JavaType::from_type_ref(tree, type_ref)
            }
            NodeKind::NewArrayExpr => {
                let type_ref = TypeRef::cast(tree, tree.child_of_kind(expr, NodeKind::TypeRef)?)?;
                let dims = tree
                    .children(expr)
                    .iter()
                    .filter(|&&child| tree.is_token(child, Token::LBracket))
                    .count();
                Some(JavaType::from_type_ref(tree, type_ref)?.with_dims(dims))
            }
            NodeKind::CastExpr => {
                let type_ref = TypeRef::cast(tree, tree.child_of_kind(expr, NodeKind::TypeRef)?)?;
                JavaType::from_type_ref(tree, type_ref)
            }
            NodeKind::ConditionalExpr => {
                let mut branches = tree.child_nodes(expr).skip(1);
                let then_branch = branches.next()?;
                let else_branch = branches.next();
                self.resolve(then_branch, depth + 1)
                    .or_else(|| else_branch.and_then(|e| self.resolve(e, depth + 1)))
            }
            NodeKind::AssignExpr => self.resolve(tree.child_nodes(expr).next()?, depth + 1),
            NodeKind::Literal => {
                let token = tree.first_token(expr).and_then(|t| tree.token_kind(t))?;
                literal_type(token)
            }
            _ => None,
        }
    }

    fn binding_type(&self, binding: &Binding, depth: usize) -> Option<JavaType> {
        match &binding.declared {
            Some(ty) => Some(ty.clone()),
            None => self.resolve(binding.initializer?, depth + 1),
        }
    }

    fn resolve_field_access(&self, access: FieldAccess, depth: usize) -> Option<JavaType> {
        let tree = self.tree;
        let name = access.name(tree)?;
        let receiver = access.receiver(tree)?;

        if tree.is_kind(receiver, NodeKind::ThisExpr) {
            let decl = enclosing_type_decls(tree, access.syntax()).into_iter().next()?;
            return self.field_type(decl, &name, depth);
        }

        let receiver_type = self.resolve(receiver, depth + 1);
        match receiver_type {
            Some(ty) if ty.is_array() => {
                (name == ARRAY_LENGTH_FIELD).then(|| JavaType::Primitive("int".to_string()))
            }
            Some(ty) => {
                let decl = self.local_type_decl(ty.simple_name()?)?;
                self.field_type(decl, &name, depth)
            }
            None => {
                // `Outer.FIELD` style access through a class name
                let class_name = NameRef::cast(tree, receiver)?.name(tree)?;
                let decl = self.local_type_decl(&class_name)?;
                self.field_type(decl, &name, depth)
            }
        }
    }

    fn field_type(&self, decl: TypeDecl, name: &str, depth: usize) -> Option<JavaType> {
        let binding = field_bindings(self.tree, decl).into_iter().find(|b| b.name == name)?;
        self.binding_type(&binding, depth)
    }

    fn resolve_method_call(&self, call: MethodCall, depth: usize) -> Option<JavaType> {
        let tree = self.tree;
        let name = call.name(tree)?;
        let args = call.arguments(tree);

        let Some(receiver) = call.receiver(tree) else {
            let decls = enclosing_type_decls(tree, call.syntax());
            return decls
                .into_iter()
                .find_map(|decl| self.method_return_type(decl, &name, args.len()));
        };

        if tree.is_kind(receiver, NodeKind::ThisExpr) {
            let decl = enclosing_type_decls(tree, call.syntax()).into_iter().next()?;
            return self.method_return_type(decl, &name, args.len());
        }

        if let Some(receiver_type) = self.resolve(receiver, depth + 1) {
            return self.instance_method_type(&receiver_type, &name, &args);
        }

        let class_name = NameRef::cast(tree, receiver)?.name(tree)?;
        self.static_method_type(&class_name, &name, &args, depth)
    }

    fn instance_method_type(&self, receiver: &JavaType, name: &str, args: &[NodeId]) -> Option<JavaType> {
        if let Some(list) = self.hierarchy.list_supertype(receiver, self.config) {
            match name {
                LIST_ELEMENT_ACCESSOR if args.len() == 1 => return list.first_type_arg(),
                "subList" => return Some(receiver.clone()),
                _ => {}
            }
        }
        if receiver.simple_name() == Some("String") {
            match name {
                "split" => return Some(JavaType::class("String").with_dims(1)),
                "toCharArray" => return Some(JavaType::Primitive("char".to_string()).with_dims(1)),
                "getBytes" => return Some(JavaType::Primitive("byte".to_string()).with_dims(1)),
                _ => {}
            }
        }
        if receiver.is_array() && name == "clone" {
            return Some(receiver.clone());
        }
        let decl = self.local_type_decl(receiver.simple_name()?)?;
        self.method_return_type(decl, name, args.len())
    }

    /// Calls qualified by a class name rather than an expression
    fn static_method_type(
        &self,
        class_name: &str,
        name: &str,
        args: &[NodeId],
        depth: usize,
    ) -> Option<JavaType> {
        let library = !self.hierarchy.shadows_library_type(class_name);
        match (class_name, name) {
            ("Arrays", "asList") | ("List", "of") if library => {
                let element = args
                    .first()
                    .and_then(|&arg| self.resolve(arg, depth + 1))
                    .map(|ty| {
                        if args.len() == 1 && ty.is_array() {
                            ty.component().cloned().unwrap_or(ty)
                        } else {
                            ty
                        }
                    })
                    .map(JavaType::boxed)
                    .unwrap_or_else(|| JavaType::class("Object"));
                Some(JavaType::generic("java.util.List", vec![element]))
            }
            ("List", "copyOf")
            | ("Collections", "unmodifiableList")
            | ("Collections", "synchronizedList")
                if library =>
            {
                let source = self.resolve(*args.first()?, depth + 1)?;
                let element = self
                    .hierarchy
                    .list_element_type(&source, self.config)
                    .unwrap_or_else(|| JavaType::class("Object"));
                Some(JavaType::generic("java.util.List", vec![element]))
            }
            ("Collections", "emptyList") | ("Collections", "nCopies") if library => {
                Some(JavaType::class("java.util.List"))
            }
            _ => {
                let decl = self.local_type_decl(class_name)?;
                if decl.kind(self.tree) == NodeKind::EnumDecl && name == "values" && args.is_empty() {
                    return Some(JavaType::class(class_name).with_dims(1));
                }
                self.method_return_type(decl, name, args.len())
            }
        }
    }

    /// Return type of a method declared in `decl`, preferring a matching arity
    fn method_return_type(&self, decl: TypeDecl, name: &str, arity: usize) -> Option<JavaType> {
        let tree = self.tree;
        let candidates: Vec<_> = decl
            .callables(tree)
            .into_iter()
            .filter(|callable| callable.name(tree).as_deref() == Some(name))
            .filter(|callable| !callable.is_constructor(tree))
            .collect();
        let chosen = candidates
            .iter()
            .find(|callable| callable.parameters(tree).len() == arity)
            .or_else(|| candidates.first())?;
        JavaType::from_type_ref(tree, chosen.return_type(tree)?)
    }

    fn local_type_decl(&self, simple_name: &str) -> Option<TypeDecl> {
        if !self.hierarchy.is_local_type(simple_name) {
            return None;
        }
        let tree = self.tree;
        tree.descendants(tree.root())
            .filter_map(|node| TypeDecl::cast(tree, node))
            .find(|decl| decl.name(tree).as_deref() == Some(simple_name))
    }
}

fn literal_type(token: Token) -> Option<JavaType> {
    let name = match token {
        Token::StringLiteral => return Some(JavaType::class("String")),
        Token::CharLiteral => "char",
        Token::IntegerLiteral => "int",
        Token::FloatLiteral => "double",
        Token::True | Token::False => "boolean",
        _ => return None,
    };
    Some(JavaType::Primitive(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ForEachStmt;
    use crate::parser::parse_java;

    fn iterated_kinds(source: &str) -> Vec<Option<IterationKind>> {
        let tree = parse_java(source).expect("parse");
        let config = Config::default();
        let resolver = TypeResolver::new(&tree, &config);
        tree.descendants(tree.root())
            .filter_map(|id| ForEachStmt::cast(&tree, id))
            .map(|stmt| resolver.iteration_kind(stmt.iterated_value(&tree).expect("iterated value")))
            .collect()
    }

    #[test]
    fn test_locals_fields_and_parameters() {
        let source = r#"
class A {
    private int[] counts;
    void m(java.util.List<String> names, Iterable<String> things) {
        String[] words = new String[3];
        for (int c : counts) {}
        for (int c : this.counts) {}
        for (String n : names) {}
        for (String w : words) {}
        for (String t : things) {}
    }
}
"#;
        assert_eq!(
            iterated_kinds(source),
            vec![
                Some(IterationKind::Array),
                Some(IterationKind::Array),
                Some(IterationKind::List),
                Some(IterationKind::Array),
                None,
            ]
        );
    }

    #[test]
    fn test_calls_and_inference() {
        let source = r#"
class A {
    enum Color { RED, GREEN }
    java.util.ArrayList<String> load() { return null; }
    void m(String line, java.util.List<java.util.List<Integer>> rows) {
        var parsed = load();
        for (String s : load()) {}
        for (String s : parsed) {}
        for (String s : line.split(",")) {}
        for (Color c : Color.values()) {}
        for (Integer x : rows.get(0)) {}
        for (String s : Arrays.asList("a", "b")) {}
    }
}
"#;
        let kinds = iterated_kinds(source);
        assert_eq!(kinds.len(), 6);
        assert_eq!(kinds[0], Some(IterationKind::List));
        assert_eq!(kinds[1], Some(IterationKind::List));
        assert_eq!(kinds[2], Some(IterationKind::Array));
        assert_eq!(kinds[3], Some(IterationKind::Array));
        assert_eq!(kinds[4], Some(IterationKind::List));
        assert_eq!(kinds[5], Some(IterationKind::List));
    }

    #[test]
    fn test_unknown_names_resolve_to_nothing() {
        let source = "class A { void m() { for (String s : mystery) {} for (String s : other()) {} } }";
        assert_eq!(iterated_kinds(source), vec![None, None]);
    }

    #[test]
    fn test_array_length_is_int() {
        let tree = parse_java("class A { int[] xs; int n = xs.length; }").expect("parse");
        let config = Config::default();
        let resolver = TypeResolver::new(&tree, &config);
        let access = tree
            .descendants(tree.root())
            .find(|&id| tree.is_kind(id, NodeKind::FieldAccess))
            .expect("field access");
        assert_eq!(resolver.type_of(access), Some(JavaType::Primitive("int".into())));
    }
}
