//! Type matching: applicability and specificity of one argument position.
//!
//! | specializer | matches when                          | depth                      |
//! |-------------|---------------------------------------|----------------------------|
//! | `*`         | always                                | least specific             |
//! | primitive   | the value has that primitive kind     | least specific, or 0 under `exact` |
//! | nominal     | the name is on the value's chain      | hops from the value's type |
//!
//! A nominal specializer naming the hierarchy's root matches every nominally
//! typed value, one hop past the end of its ancestor chain.

use crate::config::PrimitiveSpecificity;
use crate::hierarchy::{Ancestry, Dispatchable};

use super::signature::Signature;
use super::types::{Specializer, Specificity};

/// Matches values against specializers using a host hierarchy.
#[derive(Clone, Copy)]
pub struct TypeMatcher<'a> {
    ancestry: &'a dyn Ancestry,
    primitive: PrimitiveSpecificity,
}

impl<'a> TypeMatcher<'a> {
    /// Create a matcher with the default primitive policy.
    pub fn new(ancestry: &'a dyn Ancestry) -> Self {
        Self {
            ancestry,
            primitive: PrimitiveSpecificity::default(),
        }
    }

    pub fn with_primitive_specificity(mut self, policy: PrimitiveSpecificity) -> Self {
        self.primitive = policy;
        self
    }

    /// Match one value against one specializer.
    ///
    /// Returns `None` when the specializer does not apply.
    pub fn match_value<V: Dispatchable>(
        &self,
        value: &V,
        specializer: &Specializer,
    ) -> Option<Specificity> {
        match specializer {
            Specializer::Wildcard => Some(Specificity::LEAST_SPECIFIC),
            Specializer::Primitive(kind) => {
                if value.primitive_kind() != Some(*kind) {
                    return None;
                }
                Some(match self.primitive {
                    PrimitiveSpecificity::LeastSpecific => Specificity::LEAST_SPECIFIC,
                    PrimitiveSpecificity::Exact => Specificity::EXACT,
                })
            }
            Specializer::Nominal(name) => {
                let tag = value.nominal_tag()?;
                let chain = self.ancestry.ancestor_chain(&tag);
                if let Some(hops) = chain.iter().position(|ancestor| ancestor == name) {
                    return Some(Specificity::hops(hops));
                }
                match self.ancestry.root() {
                    Some(root) if root == name => Some(Specificity::hops(chain.len())),
                    _ => None,
                }
            }
        }
    }

    /// Total specificity of a signature against a call's arguments.
    ///
    /// `None` on arity mismatch or when any position does not match.
    pub fn score<V: Dispatchable>(&self, signature: &Signature, args: &[V]) -> Option<Specificity> {
        if signature.arity() != args.len() {
            return None;
        }

        signature
            .specializers()
            .iter()
            .zip(args)
            .map(|(specializer, arg)| self.match_value(arg, specializer))
            .sum()
    }

    /// Check if a signature applies to the arguments.
    pub fn is_applicable<V: Dispatchable>(&self, signature: &Signature, args: &[V]) -> bool {
        self.score(signature, args).is_some()
    }

    /// Check if every position names the argument's own type exactly.
    ///
    /// Nominal positions must match at depth 0 and primitive positions must
    /// equal the argument's kind; wildcards never match exactly.
    pub fn is_exact<V: Dispatchable>(&self, signature: &Signature, args: &[V]) -> bool {
        signature.arity() == args.len()
            && signature
                .specializers()
                .iter()
                .zip(args)
                .all(|(specializer, arg)| match specializer {
                    Specializer::Wildcard => false,
                    Specializer::Primitive(kind) => arg.primitive_kind() == Some(*kind),
                    Specializer::Nominal(name) => arg.nominal_tag().as_ref() == Some(name),
                })
    }
}

impl std::fmt::Debug for TypeMatcher<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeMatcher")
            .field("root", &self.ancestry.root())
            .field("primitive", &self.primitive)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{PrimitiveKind, TypeTag};
    use crate::hierarchy::TypeTable;
    use crate::value::Value;

    fn table() -> TypeTable {
        let mut table = TypeTable::with_builtins();
        table.define("Root", None).unwrap();
        table.define("Mid", Some("Root")).unwrap();
        table.define("Leaf", Some("Mid")).unwrap();
        table
    }

    fn nominal(name: &str) -> Specializer {
        Specializer::Nominal(TypeTag::new(name))
    }

    #[test]
    fn test_nominal_depth_counts_hops() {
        let table = table();
        let matcher = TypeMatcher::new(&table);
        let leaf = Value::object("Leaf");

        assert_eq!(matcher.match_value(&leaf, &nominal("Leaf")), Some(Specificity::hops(0)));
        assert_eq!(matcher.match_value(&leaf, &nominal("Mid")), Some(Specificity::hops(1)));
        assert_eq!(matcher.match_value(&leaf, &nominal("Root")), Some(Specificity::hops(2)));
        assert_eq!(matcher.match_value(&leaf, &nominal("Array")), None);
    }

    #[test]
    fn test_root_matches_past_chain_end() {
        let table = table();
        let matcher = TypeMatcher::new(&table);

        assert_eq!(
            matcher.match_value(&Value::object("Leaf"), &nominal("Object")),
            Some(Specificity::hops(3))
        );
        assert_eq!(
            matcher.match_value(&Value::numbers([1.0]), &nominal("Object")),
            Some(Specificity::hops(1))
        );
        // Primitives have no nominal type at all.
        assert_eq!(matcher.match_value(&Value::Number(1.0), &nominal("Object")), None);
    }

    #[test]
    fn test_wildcard_matches_everything_least_specifically() {
        let table = table();
        let matcher = TypeMatcher::new(&table);

        for value in [Value::Null, Value::Number(3.0), Value::object("Leaf")] {
            assert_eq!(
                matcher.match_value(&value, &Specializer::Wildcard),
                Some(Specificity::LEAST_SPECIFIC)
            );
        }
    }

    #[test]
    fn test_primitive_policy() {
        let table = table();
        let string = Specializer::Primitive(PrimitiveKind::String);
        let text = Value::text("hi");

        let matcher = TypeMatcher::new(&table);
        assert_eq!(matcher.match_value(&text, &string), Some(Specificity::LEAST_SPECIFIC));
        assert_eq!(matcher.match_value(&Value::Number(1.0), &string), None);

        let exact = matcher.with_primitive_specificity(PrimitiveSpecificity::Exact);
        assert_eq!(exact.match_value(&text, &string), Some(Specificity::EXACT));
    }

    #[test]
    fn test_score_sums_positions() {
        let table = table();
        let matcher = TypeMatcher::new(&table);
        let args = [Value::object("Leaf"), Value::numbers([1.0])];

        let sig = Signature::parse("Mid, Array").unwrap();
        assert_eq!(matcher.score(&sig, &args), Some(Specificity::hops(1)));

        let sig = Signature::parse("Root, *").unwrap();
        assert_eq!(
            matcher.score(&sig, &args),
            Some(Specificity::hops(2) + Specificity::LEAST_SPECIFIC)
        );
    }

    #[test]
    fn test_score_rejects_any_mismatch_and_arity() {
        let table = table();
        let matcher = TypeMatcher::new(&table);
        let args = [Value::object("Leaf"), Value::Number(1.0)];

        assert_eq!(matcher.score(&Signature::parse("Leaf, Array").unwrap(), &args), None);
        assert_eq!(matcher.score(&Signature::parse("Leaf").unwrap(), &args), None);
        assert!(matcher.is_applicable(&Signature::parse("Leaf, number").unwrap(), &args));
    }

    #[test]
    fn test_is_exact() {
        let table = table();
        let matcher = TypeMatcher::new(&table);
        let args = [Value::object("Leaf"), Value::Number(1.0)];

        assert!(matcher.is_exact(&Signature::parse("Leaf, number").unwrap(), &args));
        assert!(!matcher.is_exact(&Signature::parse("Mid, number").unwrap(), &args));
        assert!(!matcher.is_exact(&Signature::parse("Leaf, *").unwrap(), &args));
        assert!(!matcher.is_exact(&Signature::parse("Leaf").unwrap(), &args));
    }
}
