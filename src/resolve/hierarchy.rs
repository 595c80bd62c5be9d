use std::collections::{HashMap, HashSet, VecDeque};

use once_cell::sync::Lazy;

use super::types::JavaType;
use crate::ast::{AstNode, SyntaxTree, TypeDecl};
use crate::config::Config;
use crate::consts::{KNOWN_LIST_TYPES, LIST_PACKAGE, RESOLVE_MAX_HIERARCHY_STEPS};
use crate::format::ImportContext;

static KNOWN_LISTS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| KNOWN_LIST_TYPES.iter().copied().collect());

/// Supertypes of the classes declared in one compilation unit
///
/// A simple name declared in the unit, or bound by a single-type import,
/// refers to that type and never to the `java.util` class of the same name.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    supertypes: HashMap<String, Vec<JavaType>>,
    imports: ImportContext,
}

impl Hierarchy {
    /// Collect every type declared anywhere in the tree, nested and local ones included
    pub fn collect(tree: &SyntaxTree) -> Self {
        let mut supertypes = HashMap::new();
        for node in tree.descendants(tree.root()) {
            let Some(decl) = TypeDecl::cast(tree, node) else {
                continue;
            };
            let Some(name) = decl.name(tree) else {
                continue;
            };
            let parents = decl
                .supertypes(tree)
                .into_iter()
                .filter_map(|type_ref| JavaType::from_type_ref(tree, type_ref))
                .collect();
            supertypes.entry(name).or_insert(parents);
        }
        log::debug!("collected {} local type declarations", supertypes.len());
        Self {
            supertypes,
            imports: ImportContext::from_tree(tree),
        }
    }

    pub fn is_local_type(&self, simple_name: &str) -> bool {
        self.supertypes.contains_key(simple_name)
    }

    /// Whether an unqualified `simple_name` means something other than a `java.util` class
    pub fn shadows_library_type(&self, simple_name: &str) -> bool {
        if self.is_local_type(simple_name) {
            return true;
        }
        self.imports
            .single_import(simple_name)
            .map_or(false, |imported| !in_list_package(imported))
    }

    /// Walk the supertype graph breadth first and return the first known list type reached
    pub fn list_supertype(&self, ty: &JavaType, config: &Config) -> Option<JavaType> {
        let mut queue = VecDeque::from([ty.clone()]);
        let mut seen = HashSet::new();
        let mut steps = 0;

        while let Some(current) = queue.pop_front() {
            steps += 1;
            if steps > RESOLVE_MAX_HIERARCHY_STEPS {
                log::warn!("supertype walk from {} exceeded the step limit", ty);
                return None;
            }
            let Some(simple) = current.simple_name() else {
                continue;
            };
            if self.is_known_list(&current, config) {
                return Some(current);
            }
            if !seen.insert(simple.to_string()) {
                continue;
            }
            if let Some(parents) = self.supertypes.get(simple) {
                queue.extend(parents.iter().cloned());
            }
        }
        None
    }

    /// Whether `ty` supports `size()` and `get(int)`
    pub fn is_list_type(&self, ty: &JavaType, config: &Config) -> bool {
        self.list_supertype(ty, config).is_some()
    }

    /// Element type produced by `get(int)`, when the type arguments say
    pub fn list_element_type(&self, ty: &JavaType, config: &Config) -> Option<JavaType> {
        self.list_supertype(ty, config)?.first_type_arg()
    }

    fn is_known_list(&self, ty: &JavaType, config: &Config) -> bool {
        let (Some(name), Some(simple)) = (ty.name(), ty.simple_name()) else {
            return false;
        };
        let qualified = if name.contains('.') {
            Some(name)
        } else if self.is_local_type(simple) {
            // decided by the declaration's own supertypes
            return false;
        } else {
            self.imports.single_import(simple)
        };

        match qualified {
            Some(qualified) => {
                (in_list_package(qualified) && KNOWN_LISTS.contains(simple))
                    || config
                        .extra_list_types
                        .iter()
                        .any(|extra| extra == qualified || (!extra.contains('.') && extra == simple))
            }
            None => {
                KNOWN_LISTS.contains(simple)
                    || config
                        .extra_list_types
                        .iter()
                        .any(|extra| extra.rsplit('.').next() == Some(simple))
            }
        }
    }
}

fn in_list_package(qualified: &str) -> bool {
    let Some((package, _)) = qualified.rsplit_once('.') else {
        return false;
    };
    package
        .strip_prefix(LIST_PACKAGE)
        .map_or(false, |rest| rest.is_empty() || rest.starts_with('.'))
}
