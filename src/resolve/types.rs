use std::fmt;

use crate::ast::{AstNode, NodeId, NodeKind, SyntaxTree, TypeRef, Wildcard};

/// Static type of a declaration or expression, as far as it can be read off the source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JavaType {
    /// `int`, `boolean`, ... and `void`
    Primitive(String),
    /// Class or interface type; `name` is spelled as written, possibly qualified
    Class { name: String, type_args: Vec<TypeArg> },
    Array(Box<JavaType>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArg {
    Type(JavaType),
    /// `?`, `? extends T` (upper) or `? super T`
    Wildcard { upper: bool, bound: Option<Box<JavaType>> },
}

impl JavaType {
    pub fn class(name: impl Into<String>) -> Self {
        JavaType::Class { name: name.into(), type_args: Vec::new() }
    }

    pub fn generic(name: impl Into<String>, args: Vec<JavaType>) -> Self {
        JavaType::Class {
            name: name.into(),
            type_args: args.into_iter().map(TypeArg::Type).collect(),
        }
    }

    /// Read a written type; `None` for `var`, whose type has to be inferred
    pub fn from_type_ref(tree: &SyntaxTree, type_ref: TypeRef) -> Option<JavaType> {
        if type_ref.is_var(tree) {
            return None;
        }
        let segments = type_ref.segments(tree);
        if segments.is_empty() {
            return None;
        }
        let base = if type_ref.primitive(tree).is_some() {
            JavaType::Primitive(segments.join("."))
        } else {
            let type_args = type_ref
                .type_args(tree)
                .into_iter()
                .filter_map(|arg| TypeArg::from_node(tree, arg))
                .collect();
            JavaType::Class { name: segments.join("."), type_args }
        };
        Some(base.with_dims(type_ref.array_dims(tree)))
    }

    /// Wrap in `dims` array levels
    pub fn with_dims(self, dims: usize) -> JavaType {
        (0..dims).fold(self, |ty, _| JavaType::Array(Box::new(ty)))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, JavaType::Array(_))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, JavaType::Primitive(_))
    }

    /// Component type of an array
    pub fn component(&self) -> Option<&JavaType> {
        match self {
            JavaType::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Class name as written
    pub fn name(&self) -> Option<&str> {
        match self {
            JavaType::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Last segment of a class name
    pub fn simple_name(&self) -> Option<&str> {
        self.name().map(|name| name.rsplit('.').next().unwrap_or(name))
    }

    pub fn type_args(&self) -> &[TypeArg] {
        match self {
            JavaType::Class { type_args, .. } => type_args,
            _ => &[],
        }
    }

    /// First type argument, reading `? extends T` as `T`
    pub fn first_type_arg(&self) -> Option<JavaType> {
        match self.type_args().first()? {
            TypeArg::Type(ty) => Some(ty.clone()),
            TypeArg::Wildcard { upper: true, bound: Some(bound) } => Some((**bound).clone()),
            TypeArg::Wildcard { .. } => Some(JavaType::class("Object")),
        }
    }

    /// Reference type used for a primitive in generic position
    pub fn boxed(self) -> JavaType {
        let JavaType::Primitive(name) = &self else {
            return self;
        };
        let boxed = match name.as_str() {
            "int" => "Integer",
            "char" => "Character",
            "boolean" => "Boolean",
            "byte" => "Byte",
            "short" => "Short",
            "long" => "Long",
            "float" => "Float",
            "double" => "Double",
            _ => return self,
        };
        JavaType::class(boxed)
    }

    /// Short human-readable form: simple class names, arguments included
    pub fn presentable_text(&self) -> String {
        match self {
            JavaType::Primitive(name) => name.clone(),
            JavaType::Array(component) => format!("{}[]", component.presentable_text()),
            JavaType::Class { name, type_args } => {
                let simple = name.rsplit('.').next().unwrap_or(name);
                if type_args.is_empty() {
                    simple.to_string()
                } else {
                    let args: Vec<String> = type_args.iter().map(TypeArg::presentable_text).collect();
                    format!("{}<{}>", simple, args.join(", "))
                }
            }
        }
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.presentable_text())
    }
}

impl TypeArg {
    fn from_node(tree: &SyntaxTree, node: NodeId) -> Option<TypeArg> {
        match tree.node_kind(node)? {
            NodeKind::TypeRef => {
                let ty = JavaType::from_type_ref(tree, TypeRef::cast(tree, node)?)?;
                Some(TypeArg::Type(ty))
            }
            NodeKind::Wildcard => {
                let wildcard = Wildcard::cast(tree, node)?;
                match wildcard.bound(tree) {
                    Some((upper, bound)) => Some(TypeArg::Wildcard {
                        upper,
                        bound: JavaType::from_type_ref(tree, bound).map(Box::new),
                    }),
                    None => Some(TypeArg::Wildcard { upper: true, bound: None }),
                }
            }
            _ => None,
        }
    }

    pub fn presentable_text(&self) -> String {
        match self {
            TypeArg::Type(ty) => ty.presentable_text(),
            TypeArg::Wildcard { bound: None, .. } => "?".to_string(),
            TypeArg::Wildcard { upper, bound: Some(bound) } => format!(
                "? {} {}",
                if *upper { "extends" } else { "super" },
                bound.presentable_text()
            ),
        }
    }
}
