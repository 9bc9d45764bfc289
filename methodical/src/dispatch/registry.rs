//! Per-generic-function method storage.

use std::fmt;

use tracing::debug;

use crate::hierarchy::Dispatchable;

use super::combination::Method;
use super::matcher::TypeMatcher;
use super::signature::Signature;
use super::types::Role;

/// Unique identifier for a method within one registry.
///
/// Ids increase with registration order and serve as the tie-break between
/// equally specific methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub u32);

/// A registered method.
pub struct MethodEntry<V> {
    /// Registration id.
    pub id: MethodId,
    /// The combination role.
    pub role: Role,
    /// Parameter specializers.
    pub signature: Signature,
    /// The implementation.
    pub(crate) method: Method<V>,
}

impl<V> Clone for MethodEntry<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            role: self.role,
            signature: self.signature.clone(),
            method: self.method.clone(),
        }
    }
}

impl<V> fmt::Debug for MethodEntry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("signature", &self.signature.to_string())
            .finish_non_exhaustive()
    }
}

/// Role -> insertion-ordered methods.
pub struct MethodRegistry<V> {
    roles: [Vec<MethodEntry<V>>; 4],
    next_id: u32,
}

impl<V> Default for MethodRegistry<V> {
    fn default() -> Self {
        Self {
            roles: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
            next_id: 0,
        }
    }
}

impl<V> MethodRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a method to a role. Duplicates are kept.
    pub fn register(&mut self, role: Role, signature: Signature, method: Method<V>) -> MethodId {
        let id = MethodId(self.next_id);
        self.next_id += 1;

        debug!(role = %role, signature = %signature, id = id.0, "registering method");
        self.roles[role.index()].push(MethodEntry {
            id,
            role,
            signature,
            method,
        });
        id
    }

    /// Methods of one role in registration order.
    pub fn entries(&self, role: Role) -> &[MethodEntry<V>] {
        &self.roles[role.index()]
    }

    /// Total number of methods across all roles.
    pub fn len(&self) -> usize {
        self.roles.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.iter().all(Vec::is_empty)
    }

    /// Remove before, primary and after methods whose signature names the
    /// arguments' own types exactly. Around methods are kept.
    ///
    /// Returns the number of removed methods.
    pub fn remove<T: Dispatchable>(&mut self, args: &[T], matcher: &TypeMatcher<'_>) -> usize {
        let mut removed = 0;
        for role in [Role::Before, Role::Primary, Role::After] {
            let entries = &mut self.roles[role.index()];
            let before = entries.len();
            entries.retain(|entry| !matcher.is_exact(&entry.signature, args));
            removed += before - entries.len();
        }

        debug!(removed, "removed methods matching arguments exactly");
        removed
    }

    /// Remove the methods of one role whose signature equals `signature`.
    pub fn remove_signature(&mut self, role: Role, signature: &Signature) -> usize {
        let entries = &mut self.roles[role.index()];
        let before = entries.len();
        entries.retain(|entry| entry.signature != *signature);
        let removed = before - entries.len();

        debug!(role = %role, signature = %signature, removed, "removed methods by signature");
        removed
    }
}

impl<V> fmt::Debug for MethodRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for role in Role::ALL {
            map.entry(&role, &self.entries(role));
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::combination::method;
    use crate::hierarchy::TypeTable;
    use crate::value::Value;

    fn noop() -> Method<Value> {
        method(|_, _| Ok(None))
    }

    fn sig(text: &str) -> Signature {
        Signature::parse(text).unwrap()
    }

    fn signatures(registry: &MethodRegistry<Value>, role: Role) -> Vec<String> {
        registry
            .entries(role)
            .iter()
            .map(|e| e.signature.to_string())
            .collect()
    }

    #[test]
    fn test_register_preserves_order_and_duplicates() {
        let mut registry = MethodRegistry::new();
        let a = registry.register(Role::Primary, sig("Array"), noop());
        let b = registry.register(Role::Primary, sig("Array"), noop());
        let c = registry.register(Role::After, sig("*"), noop());

        assert!(a < b && b < c);
        assert_eq!(signatures(&registry, Role::Primary), vec!["Array", "Array"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.entries(Role::Around).is_empty());
    }

    #[test]
    fn test_remove_only_exact_matches_outside_around() {
        let table = TypeTable::with_builtins();
        let matcher = TypeMatcher::new(&table);
        let mut registry = MethodRegistry::new();
        registry.register(Role::Primary, sig("Array, Array"), noop());
        registry.register(Role::Primary, sig("*, Array"), noop());
        registry.register(Role::Before, sig("Array, Array"), noop());
        registry.register(Role::After, sig("Array, Array"), noop());
        registry.register(Role::Around, sig("Array, Array"), noop());

        let removed = registry.remove(&[Value::numbers([1.0]), Value::numbers([2.0])], &matcher);

        assert_eq!(removed, 3);
        assert_eq!(signatures(&registry, Role::Primary), vec!["*, Array"]);
        assert!(registry.entries(Role::Before).is_empty());
        assert!(registry.entries(Role::After).is_empty());
        assert_eq!(signatures(&registry, Role::Around), vec!["Array, Array"]);
    }

    #[test]
    fn test_remove_signature_targets_one_role() {
        let mut registry = MethodRegistry::new();
        registry.register(Role::Around, sig("Array"), noop());
        registry.register(Role::Primary, sig("Array"), noop());
        registry.register(Role::Around, sig("*"), noop());

        assert_eq!(registry.remove_signature(Role::Around, &sig("Array")), 1);
        assert_eq!(signatures(&registry, Role::Around), vec!["*"]);
        assert_eq!(signatures(&registry, Role::Primary), vec!["Array"]);
        assert_eq!(registry.remove_signature(Role::Before, &sig("Array")), 0);
    }
}
