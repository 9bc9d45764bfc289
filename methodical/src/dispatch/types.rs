//! Core type definitions for dispatch (type tags, specializers, roles).

use std::borrow::Borrow;
use std::fmt;
use std::ops::Add;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Nominal type name as reported by the host environment.
///
/// Cheap to clone; compared by string content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(Arc<str>);

impl TypeTag {
    /// Create a tag from a type name.
    pub fn new(name: impl AsRef<str>) -> Self {
        TypeTag(Arc::from(name.as_ref()))
    }

    /// The type name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        TypeTag::new(name)
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        TypeTag(Arc::from(name))
    }
}

impl Borrow<str> for TypeTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TypeTag {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

/// Runtime primitive kind of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// A text string.
    String,
    /// A number.
    Number,
    /// A boolean.
    Boolean,
    /// The absent value.
    Null,
}

impl PrimitiveKind {
    /// All primitive kinds, in declaration order.
    pub const ALL: [PrimitiveKind; 4] = [
        PrimitiveKind::String,
        PrimitiveKind::Number,
        PrimitiveKind::Boolean,
        PrimitiveKind::Null,
    ];

    /// The lowercase keyword used in signature text.
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Null => "null",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for PrimitiveKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.keyword() == s)
            .ok_or(())
    }
}

/// The declared type constraint for one parameter position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Specializer {
    /// `*`: matches every value, least specific.
    Wildcard,
    /// A lowercase primitive keyword such as `string` or `number`.
    Primitive(PrimitiveKind),
    /// A nominal type name, matched by identity or ancestry.
    Nominal(TypeTag),
}

impl fmt::Display for Specializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Specializer::Wildcard => f.write_str("*"),
            Specializer::Primitive(kind) => write!(f, "{}", kind),
            Specializer::Nominal(tag) => write!(f, "{}", tag),
        }
    }
}

/// How specifically a signature matches one call's arguments.
///
/// Lower is more specific. Only comparable within one role's candidates
/// for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(u64);

impl Specificity {
    /// Exact nominal match.
    pub const EXACT: Specificity = Specificity(0);

    /// Score of a wildcard (and, by default, primitive) position.
    pub const LEAST_SPECIFIC: Specificity = Specificity(1 << 32);

    /// Score for a match `hops` ancestry steps above the value's own type.
    pub fn hops(hops: usize) -> Self {
        Specificity(hops as u64)
    }

    /// The raw score.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl Add for Specificity {
    type Output = Specificity;

    fn add(self, rhs: Specificity) -> Specificity {
        Specificity(self.0.saturating_add(rhs.0))
    }
}

impl std::iter::Sum for Specificity {
    fn sum<I: Iterator<Item = Specificity>>(iter: I) -> Self {
        iter.fold(Specificity::EXACT, Add::add)
    }
}

/// Method combination role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Runs after the before methods; its result is the call's result.
    Primary,
    /// Runs ahead of the primary method, most specific first.
    Before,
    /// Runs after the primary method, least specific first.
    After,
    /// Wraps the whole combination.
    Around,
}

impl Role {
    /// All roles, in registry order.
    pub const ALL: [Role; 4] = [Role::Primary, Role::Before, Role::After, Role::Around];

    pub(crate) fn index(self) -> usize {
        match self {
            Role::Primary => 0,
            Role::Before => 1,
            Role::After => 2,
            Role::Around => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Primary => "primary",
            Role::Before => "before",
            Role::After => "after",
            Role::Around => "around",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown method role `{}`", s))
    }
}
