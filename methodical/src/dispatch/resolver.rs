//! Applicable-method selection and ranking.

use std::cmp::Reverse;
use std::fmt;

use tracing::trace;

use crate::config::{AfterOrder, DispatchConfig};
use crate::hierarchy::{Ancestry, Dispatchable};

use super::matcher::TypeMatcher;
use super::registry::{MethodEntry, MethodRegistry};
use super::types::{Role, Specificity};

/// A method that applies to one call, with its score for that call.
pub struct RankedMethod<V> {
    pub entry: MethodEntry<V>,
    pub specificity: Specificity,
}

impl<V> Clone for RankedMethod<V> {
    fn clone(&self) -> Self {
        Self {
            entry: self.entry.clone(),
            specificity: self.specificity,
        }
    }
}

impl<V> fmt::Debug for RankedMethod<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankedMethod")
            .field("entry", &self.entry)
            .field("specificity", &self.specificity)
            .finish()
    }
}

/// Applicable methods of one call, ordered per role for execution.
pub struct ApplicableMethods<V> {
    roles: [Vec<RankedMethod<V>>; 4],
}

impl<V> ApplicableMethods<V> {
    /// The ordered methods of one role.
    pub fn get(&self, role: Role) -> &[RankedMethod<V>] {
        &self.roles[role.index()]
    }

    /// True when no role has an applicable method.
    pub fn is_empty(&self) -> bool {
        self.roles.iter().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.roles.iter().map(Vec::len).sum()
    }
}

impl<V> Clone for ApplicableMethods<V> {
    fn clone(&self) -> Self {
        Self {
            roles: self.roles.clone(),
        }
    }
}

impl<V> fmt::Debug for ApplicableMethods<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for role in Role::ALL {
            map.entry(&role, &self.get(role));
        }
        map.finish()
    }
}

/// Dispatch resolution context.
#[derive(Debug)]
pub struct DispatchResolver<'a> {
    matcher: TypeMatcher<'a>,
    after_order: AfterOrder,
}

impl<'a> DispatchResolver<'a> {
    /// Create a resolver with default configuration.
    pub fn new(ancestry: &'a dyn Ancestry) -> Self {
        Self::with_config(ancestry, &DispatchConfig::default())
    }

    pub fn with_config(ancestry: &'a dyn Ancestry, config: &DispatchConfig) -> Self {
        Self {
            matcher: TypeMatcher::new(ancestry)
                .with_primitive_specificity(config.primitive_specificity),
            after_order: config.after_order,
        }
    }

    pub fn matcher(&self) -> &TypeMatcher<'a> {
        &self.matcher
    }

    /// Resolve the applicable methods of every role for a call.
    ///
    /// Before, primary and around methods run most specific first. After
    /// methods run least specific first unless configured otherwise. Equal
    /// scores keep registration order in every role.
    pub fn resolve<V: Dispatchable>(
        &self,
        args: &[V],
        registry: &MethodRegistry<V>,
    ) -> ApplicableMethods<V> {
        let roles = Role::ALL.map(|role| self.rank(role, args, registry.entries(role)));
        let applicable = ApplicableMethods { roles };

        trace!(
            primary = applicable.get(Role::Primary).len(),
            before = applicable.get(Role::Before).len(),
            after = applicable.get(Role::After).len(),
            around = applicable.get(Role::Around).len(),
            considered = registry.len(),
            "resolved applicable methods"
        );
        applicable
    }

    fn rank<V: Dispatchable>(
        &self,
        role: Role,
        args: &[V],
        entries: &[MethodEntry<V>],
    ) -> Vec<RankedMethod<V>> {
        let mut ranked: Vec<_> = entries
            .iter()
            .filter_map(|entry| {
                self.matcher
                    .score(&entry.signature, args)
                    .map(|specificity| RankedMethod {
                        entry: entry.clone(),
                        specificity,
                    })
            })
            .collect();

        // Stable sorts: entries arrive in registration order.
        if role == Role::After && self.after_order == AfterOrder::LeastSpecificFirst {
            ranked.sort_by_key(|m| Reverse(m.specificity));
        } else {
            ranked.sort_by_key(|m| m.specificity);
        }
        ranked
    }
}
