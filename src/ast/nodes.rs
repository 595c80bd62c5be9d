//! Typed views over syntax nodes
//!
//! A view is a `NodeId` whose kind has been checked. Accessors read the
//! underlying tree on demand; they never cache, so a view stays valid for as
//! long as its node is attached.

use super::{NodeId, NodeKind, SyntaxTree};
use crate::parser::lexer::Token;

/// Typed handle for a node of a known kind
pub trait AstNode: Copy + Sized {
    fn can_cast(kind: NodeKind) -> bool;

    fn from_id(id: NodeId) -> Self;

    fn syntax(&self) -> NodeId;

    fn cast(tree: &SyntaxTree, id: NodeId) -> Option<Self> {
        match tree.node_kind(id) {
            Some(kind) if Self::can_cast(kind) => Some(Self::from_id(id)),
            _ => None,
        }
    }

    fn text(&self, tree: &SyntaxTree) -> String {
        tree.text(self.syntax())
    }
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(NodeId);

        impl AstNode for $name {
            fn can_cast(kind: NodeKind) -> bool {
                matches!(kind, $(NodeKind::$kind)|+)
            }

            fn from_id(id: NodeId) -> Self {
                $name(id)
            }

            fn syntax(&self) -> NodeId {
                self.0
            }
        }
    };
}

/// Text of the first identifier token directly under `node`
pub fn ident_text(tree: &SyntaxTree, node: NodeId) -> Option<String> {
    tree.child_token(node, Token::Identifier)
        .and_then(|id| tree.token_text(id))
        .map(str::to_string)
}

/// Dotted name spelled by the identifier tokens directly under `node`
pub fn dotted_name(tree: &SyntaxTree, node: NodeId) -> String {
    tree.children(node)
        .iter()
        .filter(|&&child| tree.is_token(child, Token::Identifier))
        .filter_map(|&child| tree.token_text(child))
        .collect::<Vec<_>>()
        .join(".")
}

fn count_tokens(tree: &SyntaxTree, node: NodeId, token: Token) -> usize {
    tree.children(node).iter().filter(|&&child| tree.is_token(child, token)).count()
}

/// First interior child that follows the token `after`
fn node_after(tree: &SyntaxTree, node: NodeId, after: Token) -> Option<NodeId> {
    tree.children(node)
        .iter()
        .skip_while(|&&child| !tree.is_token(child, after))
        .copied()
        .find(|&child| tree.node_kind(child).is_some())
}

ast_node!(CompilationUnit, CompilationUnit);

impl CompilationUnit {
    pub fn package_name(&self, tree: &SyntaxTree) -> Option<String> {
        tree.child_of_kind(self.0, NodeKind::PackageDecl)
            .map(|decl| dotted_name(tree, decl))
    }

    pub fn imports(&self, tree: &SyntaxTree) -> Vec<ImportDecl> {
        tree.children_of_kind(self.0, NodeKind::ImportDecl).map(ImportDecl).collect()
    }

    pub fn type_decls(&self, tree: &SyntaxTree) -> Vec<TypeDecl> {
        tree.child_nodes(self.0).filter_map(|id| TypeDecl::cast(tree, id)).collect()
    }
}

ast_node!(ImportDecl, ImportDecl);

impl ImportDecl {
    pub fn is_static(&self, tree: &SyntaxTree) -> bool {
        tree.child_token(self.0, Token::Static).is_some()
    }

    /// `import a.b.*;`
    pub fn is_wildcard(&self, tree: &SyntaxTree) -> bool {
        tree.child_token(self.0, Token::Star).is_some()
    }

    /// Imported name without the trailing `.*`
    pub fn path(&self, tree: &SyntaxTree) -> String {
        dotted_name(tree, self.0)
    }
}

ast_node!(
    /// Class, interface, enum, record or annotation type declaration
    TypeDecl, ClassDecl | InterfaceDecl | EnumDecl | RecordDecl | AnnotationTypeDecl
);

impl TypeDecl {
    pub fn name(&self, tree: &SyntaxTree) -> Option<String> {
        // `record` itself lexes as an identifier
        let skip = usize::from(tree.is_kind(self.0, NodeKind::RecordDecl));
        tree.children(self.0)
            .iter()
            .filter(|&&child| tree.is_token(child, Token::Identifier))
            .nth(skip)
            .and_then(|&child| tree.token_text(child))
            .map(str::to_string)
    }

    pub fn kind(&self, tree: &SyntaxTree) -> NodeKind {
        tree.node_kind(self.0).unwrap_or(NodeKind::ClassDecl)
    }

    /// Types named after `extends` and `implements`
    pub fn supertypes(&self, tree: &SyntaxTree) -> Vec<TypeRef> {
        tree.children_of_kind(self.0, NodeKind::TypeRef).map(TypeRef).collect()
    }

    pub fn body(&self, tree: &SyntaxTree) -> Option<NodeId> {
        tree.child_of_kind(self.0, NodeKind::ClassBody)
    }

    /// Header components of a record; empty for other declarations
    pub fn record_components(&self, tree: &SyntaxTree) -> Vec<Parameter> {
        if !tree.is_kind(self.0, NodeKind::RecordDecl) {
            return Vec::new();
        }
        tree.child_of_kind(self.0, NodeKind::ParameterList)
            .map(|list| tree.children_of_kind(list, NodeKind::Parameter).map(Parameter).collect())
            .unwrap_or_default()
    }

    pub fn members(&self, tree: &SyntaxTree) -> Vec<NodeId> {
        match self.body(tree) {
            Some(body) => tree.child_nodes(body).collect(),
            None => Vec::new(),
        }
    }

    pub fn fields(&self, tree: &SyntaxTree) -> Vec<VarDecl> {
        self.members(tree)
            .into_iter()
            .filter(|&member| tree.is_kind(member, NodeKind::FieldDecl))
            .map(VarDecl)
            .collect()
    }

    pub fn callables(&self, tree: &SyntaxTree) -> Vec<Callable> {
        self.members(tree)
            .into_iter()
            .filter_map(|member| Callable::cast(tree, member))
            .collect()
    }

    pub fn enum_constants(&self, tree: &SyntaxTree) -> Vec<String> {
        self.members(tree)
            .into_iter()
            .filter(|&member| tree.is_kind(member, NodeKind::EnumConstant))
            .filter_map(|member| ident_text(tree, member))
            .collect()
    }

    pub fn nested_types(&self, tree: &SyntaxTree) -> Vec<TypeDecl> {
        self.members(tree)
            .into_iter()
            .filter_map(|member| TypeDecl::cast(tree, member))
            .collect()
    }
}

ast_node!(
    /// Field or local variable declaration, possibly with several declarators
    VarDecl, FieldDecl | LocalVarDecl
);

impl VarDecl {
    pub fn type_ref(&self, tree: &SyntaxTree) -> Option<TypeRef> {
        tree.child_of_kind(self.0, NodeKind::TypeRef).map(TypeRef)
    }

    pub fn declarators(&self, tree: &SyntaxTree) -> Vec<VarDeclarator> {
        tree.children_of_kind(self.0, NodeKind::VarDeclarator).map(VarDeclarator).collect()
    }

    pub fn is_static(&self, tree: &SyntaxTree) -> bool {
        tree.child_of_kind(self.0, NodeKind::Modifiers)
            .map_or(false, |mods| tree.child_token(mods, Token::Static).is_some())
    }
}

ast_node!(VarDeclarator, VarDeclarator);

impl VarDeclarator {
    pub fn name(&self, tree: &SyntaxTree) -> Option<String> {
        ident_text(tree, self.0)
    }

    /// `[]` pairs written after the name, as in `int xs[]`
    pub fn extra_dims(&self, tree: &SyntaxTree) -> usize {
        count_tokens(tree, self.0, Token::LBracket)
    }

    pub fn initializer(&self, tree: &SyntaxTree) -> Option<NodeId> {
        node_after(tree, self.0, Token::Assign)
    }
}

ast_node!(
    /// Method or constructor
    Callable, MethodDecl | ConstructorDecl
);

impl Callable {
    pub fn name(&self, tree: &SyntaxTree) -> Option<String> {
        ident_text(tree, self.0)
    }

    pub fn is_constructor(&self, tree: &SyntaxTree) -> bool {
        tree.is_kind(self.0, NodeKind::ConstructorDecl)
    }

    pub fn return_type(&self, tree: &SyntaxTree) -> Option<TypeRef> {
        if self.is_constructor(tree) {
            return None;
        }
        tree.child_of_kind(self.0, NodeKind::TypeRef).map(TypeRef)
    }

    pub fn parameters(&self, tree: &SyntaxTree) -> Vec<Parameter> {
        tree.child_of_kind(self.0, NodeKind::ParameterList)
            .map(|list| tree.children_of_kind(list, NodeKind::Parameter).map(Parameter).collect())
            .unwrap_or_default()
    }

    pub fn body(&self, tree: &SyntaxTree) -> Option<Block> {
        tree.child_of_kind(self.0, NodeKind::Block).map(Block)
    }
}

ast_node!(Parameter, Parameter);

impl Parameter {
    /// `final`, annotations and other modifiers, if any were written
    pub fn modifiers(&self, tree: &SyntaxTree) -> Option<NodeId> {
        tree.child_of_kind(self.0, NodeKind::Modifiers)
    }

    pub fn type_ref(&self, tree: &SyntaxTree) -> Option<TypeRef> {
        tree.child_of_kind(self.0, NodeKind::TypeRef).map(TypeRef)
    }

    pub fn name(&self, tree: &SyntaxTree) -> Option<String> {
        tree.children(self.0)
            .iter()
            .rev()
            .find(|&&child| tree.is_token(child, Token::Identifier))
            .and_then(|&child| tree.token_text(child))
            .map(str::to_string)
    }

    pub fn is_varargs(&self, tree: &SyntaxTree) -> bool {
        tree.child_token(self.0, Token::Ellipsis).is_some()
    }

    pub fn extra_dims(&self, tree: &SyntaxTree) -> usize {
        count_tokens(tree, self.0, Token::LBracket)
    }
}

ast_node!(TypeRef, TypeRef);

impl TypeRef {
    /// Primitive keyword, when the type is one
    pub fn primitive(&self, tree: &SyntaxTree) -> Option<Token> {
        tree.significant_children(self.0)
            .filter_map(|child| tree.token_kind(child))
            .find(|token| token.is_primitive_type())
    }

    /// Name segments, type arguments stripped
    pub fn segments(&self, tree: &SyntaxTree) -> Vec<String> {
        if let Some(primitive) = self.primitive(tree) {
            let text = tree
                .children(self.0)
                .iter()
                .find(|&&child| tree.is_token(child, primitive))
                .and_then(|&child| tree.token_text(child))
                .unwrap_or_default();
            return vec![text.to_string()];
        }
        tree.children(self.0)
            .iter()
            .filter(|&&child| tree.is_token(child, Token::Identifier))
            .filter_map(|&child| tree.token_text(child))
            .map(str::to_string)
            .collect()
    }

    pub fn qualified_name(&self, tree: &SyntaxTree) -> String {
        self.segments(tree).join(".")
    }

    pub fn simple_name(&self, tree: &SyntaxTree) -> String {
        self.segments(tree).pop().unwrap_or_default()
    }

    /// Arguments of the last type-argument list (`Outer<A>.Inner<B>` yields `B`)
    pub fn type_args(&self, tree: &SyntaxTree) -> Vec<NodeId> {
        tree.children_of_kind(self.0, NodeKind::TypeArgs)
            .last()
            .map(|args| tree.child_nodes(args).collect())
            .unwrap_or_default()
    }

    pub fn has_type_args(&self, tree: &SyntaxTree) -> bool {
        tree.child_of_kind(self.0, NodeKind::TypeArgs).is_some()
    }

    pub fn array_dims(&self, tree: &SyntaxTree) -> usize {
        count_tokens(tree, self.0, Token::LBracket)
    }

    /// The contextual `var` of local variable type inference
    pub fn is_var(&self, tree: &SyntaxTree) -> bool {
        self.array_dims(tree) == 0
            && !self.has_type_args(tree)
            && self.segments(tree) == ["var"]
    }
}

ast_node!(Wildcard, Wildcard);

impl Wildcard {
    /// Bound type together with whether it is an upper (`extends`) bound
    pub fn bound(&self, tree: &SyntaxTree) -> Option<(bool, TypeRef)> {
        let bound = tree.child_of_kind(self.0, NodeKind::TypeRef)?;
        let upper = tree.child_token(self.0, Token::Extends).is_some();
        Some((upper, TypeRef(bound)))
    }
}

ast_node!(ForEachStmt, ForEachStmt);

impl ForEachStmt {
    pub fn for_keyword(&self, tree: &SyntaxTree) -> Option<NodeId> {
        tree.child_token(self.0, Token::For)
    }

    pub fn parameter(&self, tree: &SyntaxTree) -> Option<Parameter> {
        tree.child_of_kind(self.0, NodeKind::Parameter).map(Parameter)
    }

    /// Expression after the colon
    pub fn iterated_value(&self, tree: &SyntaxTree) -> Option<NodeId> {
        node_after(tree, self.0, Token::Colon)
    }

    /// Statement after the closing parenthesis
    pub fn body(&self, tree: &SyntaxTree) -> Option<NodeId> {
        node_after(tree, self.0, Token::RParen)
    }

    /// Byte range from `for` through the closing parenthesis of the header
    pub fn header_range(&self, tree: &SyntaxTree) -> Option<(usize, usize)> {
        let start = tree.offset_of(self.for_keyword(tree)?)?;
        let close = tree.child_token(self.0, Token::RParen)?;
        let (_, end) = tree.text_range(close)?;
        Some((start, end))
    }
}

ast_node!(Block, Block);

impl Block {
    /// Opening brace, if the block starts with one
    pub fn l_brace(&self, tree: &SyntaxTree) -> Option<NodeId> {
        tree.significant_children(self.0)
            .next()
            .filter(|&first| tree.is_token(first, Token::LBrace))
    }

    /// Closing brace, if the block ends with one
    pub fn r_brace(&self, tree: &SyntaxTree) -> Option<NodeId> {
        tree.significant_children(self.0)
            .last()
            .filter(|&last| tree.is_token(last, Token::RBrace))
    }

    pub fn statements(&self, tree: &SyntaxTree) -> Vec<NodeId> {
        tree.child_nodes(self.0).collect()
    }
}

ast_node!(MethodCall, MethodCall);

impl MethodCall {
    /// Qualifier before the dot, absent for unqualified calls
    pub fn receiver(&self, tree: &SyntaxTree) -> Option<NodeId> {
        tree.child_token(self.0, Token::Dot)?;
        tree.children(self.0)
            .iter()
            .take_while(|&&child| !tree.is_token(child, Token::Dot))
            .copied()
            .find(|&child| tree.node_kind(child).is_some())
    }

    pub fn name(&self, tree: &SyntaxTree) -> Option<String> {
        tree.children(self.0)
            .iter()
            .rev()
            .find(|&&child| tree.is_token(child, Token::Identifier))
            .and_then(|&child| tree.token_text(child))
            .map(str::to_string)
    }

    pub fn arguments(&self, tree: &SyntaxTree) -> Vec<NodeId> {
        tree.child_of_kind(self.0, NodeKind::ArgList)
            .map(|args| tree.child_nodes(args).collect())
            .unwrap_or_default()
    }
}

ast_node!(FieldAccess, FieldAccess);

impl FieldAccess {
    pub fn receiver(&self, tree: &SyntaxTree) -> Option<NodeId> {
        tree.child_nodes(self.0).next()
    }

    pub fn name(&self, tree: &SyntaxTree) -> Option<String> {
        ident_text(tree, self.0)
    }
}

ast_node!(NameRef, NameRef);

impl NameRef {
    pub fn name(&self, tree: &SyntaxTree) -> Option<String> {
        ident_text(tree, self.0)
    }
}
