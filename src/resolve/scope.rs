//! Variable lookup by walking outward from a use site
//!
//! Each enclosing construct contributes the names it declares: preceding
//! local declarations of a block, for-loop and for-each variables, catch
//! and resource variables, lambda and method parameters, then the fields of
//! every enclosing type, innermost first.

use super::types::JavaType;
use crate::ast::{
    ident_text, AstNode, Callable, NodeId, NodeKind, Parameter, SyntaxTree, TypeDecl, TypeRef,
    VarDecl,
};
use crate::parser::lexer::Token;

/// A variable visible at some point of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    /// `None` when the type is inferred (`var`, untyped lambda parameters)
    pub declared: Option<JavaType>,
    pub initializer: Option<NodeId>,
    /// Declarator, parameter or constant that introduces the name
    pub node: NodeId,
}

/// Innermost declaration of `name` visible from `at`
pub fn lookup_variable(tree: &SyntaxTree, at: NodeId, name: &str) -> Option<Binding> {
    let mut child = at;
    for scope in tree.ancestors(at).skip(1) {
        if let Some(binding) = find_in_scope(tree, scope, child, name) {
            return Some(binding);
        }
        child = scope;
    }
    None
}

fn find_in_scope(tree: &SyntaxTree, scope: NodeId, child: NodeId, name: &str) -> Option<Binding> {
    match tree.node_kind(scope)? {
        NodeKind::Block | NodeKind::SwitchStmt | NodeKind::Fragment => {
            let preceding: Vec<NodeId> = tree
                .child_nodes(scope)
                .take_while(|&statement| statement != child)
                .collect();
            preceding
                .into_iter()
                .rev()
                .filter(|&statement| tree.is_kind(statement, NodeKind::LocalVarDecl))
                .find_map(|statement| declarator_binding(tree, VarDecl::from_id(statement), name))
        }
        NodeKind::ForStmt => {
            let init = tree.child_of_kind(scope, NodeKind::ForInit)?;
            let decl = tree.child_of_kind(init, NodeKind::LocalVarDecl)?;
            declarator_binding(tree, VarDecl::from_id(decl), name)
        }
        NodeKind::ForEachStmt => {
            let parameter = tree.child_of_kind(scope, NodeKind::Parameter)?;
            if parameter == child {
                return None;
            }
            parameter_binding(tree, Parameter::from_id(parameter)).filter(|b| b.name == name)
        }
        NodeKind::CatchClause => {
            let parameter = tree.child_of_kind(scope, NodeKind::Parameter)?;
            parameter_binding(tree, Parameter::from_id(parameter)).filter(|b| b.name == name)
        }
        NodeKind::TryStmt => {
            let spec = tree.child_of_kind(scope, NodeKind::ResourceSpec)?;
            tree.children_of_kind(spec, NodeKind::Resource)
                .find_map(|resource| resource_binding(tree, resource))
                .filter(|b| b.name == name)
        }
        NodeKind::LambdaExpr => {
            let params = tree.child_of_kind(scope, NodeKind::LambdaParams)?;
            lambda_bindings(tree, params).into_iter().find(|b| b.name == name)
        }
        NodeKind::MethodDecl | NodeKind::ConstructorDecl => Callable::from_id(scope)
            .parameters(tree)
            .into_iter()
            .filter_map(|parameter| parameter_binding(tree, parameter))
            .find(|b| b.name == name),
        kind if kind.is_type_decl() => field_bindings(tree, TypeDecl::from_id(scope))
            .into_iter()
            .find(|b| b.name == name),
        _ => None,
    }
}

fn declarator_binding(tree: &SyntaxTree, decl: VarDecl, name: &str) -> Option<Binding> {
    let base = decl
        .type_ref(tree)
        .and_then(|type_ref| JavaType::from_type_ref(tree, type_ref));
    decl.declarators(tree).into_iter().find_map(|declarator| {
        if declarator.name(tree)? != name {
            return None;
        }
        Some(Binding {
            name: name.to_string(),
            declared: base.clone().map(|ty| ty.with_dims(declarator.extra_dims(tree))),
            initializer: declarator.initializer(tree),
            node: declarator.syntax(),
        })
    })
}

/// Binding introduced by a method, catch, lambda or for-each parameter
pub fn parameter_binding(tree: &SyntaxTree, parameter: Parameter) -> Option<Binding> {
    let name = parameter.name(tree)?;
    let declared = parameter
        .type_ref(tree)
        .and_then(|type_ref| JavaType::from_type_ref(tree, type_ref))
        .map(|ty| {
            let ty = ty.with_dims(parameter.extra_dims(tree));
            if parameter.is_varargs(tree) {
                ty.with_dims(1)
            } else {
                ty
            }
        });
    Some(Binding { name, declared, initializer: None, node: parameter.syntax() })
}

fn resource_binding(tree: &SyntaxTree, resource: NodeId) -> Option<Binding> {
    let type_ref = tree.child_of_kind(resource, NodeKind::TypeRef)?;
    let name = ident_text(tree, resource)?;
    Some(Binding {
        name,
        declared: JavaType::from_type_ref(tree, TypeRef::from_id(type_ref)),
        initializer: tree
            .child_nodes(resource)
            .filter(|&child| tree.node_kind(child).map_or(false, NodeKind::is_expression))
            .last(),
        node: resource,
    })
}

fn lambda_bindings(tree: &SyntaxTree, params: NodeId) -> Vec<Binding> {
    let mut bindings = Vec::new();
    for &child in tree.children(params) {
        if tree.is_token(child, Token::Identifier) {
            if let Some(name) = tree.token_text(child) {
                bindings.push(Binding {
                    name: name.to_string(),
                    declared: None,
                    initializer: None,
                    node: child,
                });
            }
        } else if let Some(parameter) = Parameter::cast(tree, child) {
            bindings.extend(parameter_binding(tree, parameter));
        }
    }
    bindings
}

/// Fields and enum constants declared directly in a type
pub fn field_bindings(tree: &SyntaxTree, decl: TypeDecl) -> Vec<Binding> {
    let mut bindings: Vec<Binding> = decl
        .record_components(tree)
        .into_iter()
        .filter_map(|component| parameter_binding(tree, component))
        .collect();
    for field in decl.fields(tree) {
        for declarator in field.declarators(tree) {
            if let Some(name) = declarator.name(tree) {
                if let Some(binding) = declarator_binding(tree, field, &name) {
                    bindings.push(binding);
                }
            }
        }
    }
    if let Some(enum_name) = decl.name(tree).filter(|_| decl.kind(tree) == NodeKind::EnumDecl) {
        for constant in decl.members(tree) {
            if !tree.is_kind(constant, NodeKind::EnumConstant) {
                continue;
            }
            if let Some(name) = ident_text(tree, constant) {
                bindings.push(Binding {
                    name,
                    declared: Some(JavaType::class(enum_name.clone())),
                    initializer: None,
                    node: constant,
                });
            }
        }
    }
    bindings
}

/// Type declarations enclosing `at`, innermost first
pub fn enclosing_type_decls(tree: &SyntaxTree, at: NodeId) -> Vec<TypeDecl> {
    tree.ancestors(at)
        .skip(1)
        .filter_map(|ancestor| TypeDecl::cast(tree, ancestor))
        .collect()
}

/// Nearest method, constructor, initializer or field that owns the code at `at`
pub fn enclosing_code_owner(tree: &SyntaxTree, at: NodeId) -> Option<NodeId> {
    tree.ancestors(at)
        .skip(1)
        .find(|&ancestor| tree.node_kind(ancestor).map_or(false, NodeKind::is_code_owner))
}

/// Every variable name declared anywhere inside `owner`
pub fn declared_names(tree: &SyntaxTree, owner: NodeId) -> Vec<String> {
    let mut names = Vec::new();
    for node in tree.descendants(owner) {
        let Some(kind) = tree.node_kind(node) else {
            continue;
        };
        match kind {
            NodeKind::VarDeclarator | NodeKind::Resource | NodeKind::InstanceOfExpr => {
                names.extend(ident_text(tree, node));
            }
            NodeKind::Parameter => {
                names.extend(Parameter::from_id(node).name(tree));
            }
            NodeKind::LambdaParams => {
                names.extend(
                    tree.children(node)
                        .iter()
                        .filter(|&&child| tree.is_token(child, Token::Identifier))
                        .filter_map(|&child| tree.token_text(child))
                        .map(str::to_string),
                );
            }
            _ => {}
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_java;

    fn find_name_ref(tree: &SyntaxTree, name: &str) -> NodeId {
        tree.descendants(tree.root())
            .filter(|&id| tree.is_kind(id, NodeKind::NameRef))
            .find(|&id| ident_text(tree, id).as_deref() == Some(name))
            .expect("name reference")
    }

    #[test]
    fn test_local_shadows_field() {
        let source = "class A { long n; void m() { String n = \"\"; use(n); } }";
        let tree = parse_java(source).expect("parse");
        let binding = lookup_variable(&tree, find_name_ref(&tree, "n"), "n").expect("binding");
        assert_eq!(binding.declared, Some(JavaType::class("String")));
    }

    #[test]
    fn test_later_declaration_is_not_visible() {
        let source = "class A { int[] n; void m() { use(n); String n = \"\"; } }";
        let tree = parse_java(source).expect("parse");
        let binding = lookup_variable(&tree, find_name_ref(&tree, "n"), "n").expect("binding");
        assert_eq!(binding.declared, Some(JavaType::Primitive("int".into()).with_dims(1)));
    }

    #[test]
    fn test_varargs_parameter_is_an_array() {
        let source = "class A { void m(String... names) { use(names); } }";
        let tree = parse_java(source).expect("parse");
        let binding = lookup_variable(&tree, find_name_ref(&tree, "names"), "names").expect("binding");
        assert!(binding.declared.expect("declared").is_array());
    }

    #[test]
    fn test_declared_names_cover_nested_constructs() {
        let source = "class A { void m(int a) { int b = 0; for (int c : xs) { } try { } catch (Exception d) { } run(e -> e); } }";
        let tree = parse_java(source).expect("parse");
        let method = tree
            .descendants(tree.root())
            .find(|&id| tree.is_kind(id, NodeKind::MethodDecl))
            .expect("method");
        let mut names = declared_names(&tree, method);
        names.sort();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
    }
}
