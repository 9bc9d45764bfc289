//! Host capabilities for nominal type introspection.
//!
//! The dispatch engine never inspects values directly. It asks the value
//! for its primitive kind or nominal type tag ([`Dispatchable`]) and asks
//! the host for the ancestor chain of a tag ([`Ancestry`]).
//!
//! [`TypeTable`] is a ready-made [`Ancestry`]: a table of registered type
//! names with explicit parent links below a single universal root.

use indexmap::IndexMap;

use crate::dispatch::{PrimitiveKind, TypeTag};
use crate::error::HierarchyError;

/// A value the engine can dispatch on.
pub trait Dispatchable {
    /// The value's primitive kind, if it is a primitive.
    fn primitive_kind(&self) -> Option<PrimitiveKind>;

    /// The value's own declared type name, if it is a typed structured object.
    fn nominal_tag(&self) -> Option<TypeTag>;
}

/// Ancestry of nominal types.
pub trait Ancestry: Send + Sync {
    /// The chain from `tag` (first) up to, but not including, the universal
    /// root, nearest first. Unknown tags yield just `[tag]`.
    fn ancestor_chain(&self, tag: &TypeTag) -> Vec<TypeTag>;

    /// The universal root type, if the hierarchy has a named one.
    fn root(&self) -> Option<&TypeTag> {
        None
    }
}

/// Registered type names with explicit parent links.
#[derive(Debug, Clone)]
pub struct TypeTable {
    root: TypeTag,
    /// Type name -> parent (`None` = directly below the root).
    parents: IndexMap<TypeTag, Option<TypeTag>>,
}

impl TypeTable {
    /// Create an empty table below the given root type.
    pub fn new(root: impl Into<TypeTag>) -> Self {
        Self {
            root: root.into(),
            parents: IndexMap::new(),
        }
    }

    /// Create a table rooted at `Object` with the builtin `Array` type.
    pub fn with_builtins() -> Self {
        let mut table = TypeTable::new("Object");
        table.parents.insert(TypeTag::new("Array"), None);
        table
    }

    /// Define a type. `parent` must already be defined (or be the root);
    /// `None` places the type directly below the root.
    pub fn define(&mut self, name: &str, parent: Option<&str>) -> Result<TypeTag, HierarchyError> {
        if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c == ',') {
            return Err(HierarchyError::InvalidName(name.to_string()));
        }
        if self.root == *name || self.parents.contains_key(name) {
            return Err(HierarchyError::AlreadyDefined(name.to_string()));
        }

        let parent = match parent {
            None => None,
            Some(p) if self.root == *p => None,
            Some(p) => match self.parents.get_key_value(p) {
                Some((tag, _)) => Some(tag.clone()),
                None => {
                    return Err(HierarchyError::UnknownParent {
                        name: name.to_string(),
                        parent: p.to_string(),
                    })
                }
            },
        };

        let tag = TypeTag::new(name);
        self.parents.insert(tag.clone(), parent);
        Ok(tag)
    }

    /// Whether `name` is the root or a defined type.
    pub fn contains(&self, name: &str) -> bool {
        self.root == *name || self.parents.contains_key(name)
    }

    /// The direct parent of a defined type (`None` for the root and for
    /// types directly below it).
    pub fn parent(&self, name: &str) -> Option<&TypeTag> {
        self.parents.get(name).and_then(Option::as_ref)
    }

    /// Defined types in definition order, root excluded.
    pub fn types(&self) -> impl Iterator<Item = &TypeTag> {
        self.parents.keys()
    }
}

impl Ancestry for TypeTable {
    fn ancestor_chain(&self, tag: &TypeTag) -> Vec<TypeTag> {
        let mut chain = vec![tag.clone()];
        let mut current = self.parent(tag.as_str());
        while let Some(parent) = current {
            chain.push(parent.clone());
            current = self.parent(parent.as_str());
        }
        chain
    }

    fn root(&self) -> Option<&TypeTag> {
        Some(&self.root)
    }
}
