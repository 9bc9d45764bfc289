//! Signature parsing.
//!
//! Signatures are written as comma-separated specializer names:
//!
//! ```text
//! Array, *          nominal `Array`, then anything
//! string,number     two primitive kinds
//! ```
//!
//! `*` is the wildcard, lowercase words name primitive kinds, and every
//! other token is a nominal type name.

use std::fmt;
use std::str::FromStr;

use crate::error::DispatchError;

use super::types::{PrimitiveKind, Specializer, TypeTag};

/// Ordered parameter specializers of one method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    specializers: Vec<Specializer>,
}

impl Signature {
    /// Build a signature from already-parsed specializers.
    pub fn new(specializers: Vec<Specializer>) -> Self {
        Self { specializers }
    }

    /// Parse signature text.
    pub fn parse(text: &str) -> Result<Self, DispatchError> {
        if text.trim().is_empty() {
            return Err(DispatchError::invalid_signature(text, "signature is empty"));
        }

        let specializers = text
            .split(',')
            .enumerate()
            .map(|(position, element)| parse_specializer(text, position, element.trim()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { specializers })
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.specializers.len()
    }

    pub fn specializers(&self) -> &[Specializer] {
        &self.specializers
    }
}

fn parse_specializer(
    text: &str,
    position: usize,
    element: &str,
) -> Result<Specializer, DispatchError> {
    if element.is_empty() {
        return Err(DispatchError::invalid_signature(
            text,
            format!("parameter {} is empty", position + 1),
        ));
    }

    if element == "*" {
        return Ok(Specializer::Wildcard);
    }

    if let Some(bad) = element
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == ':'))
    {
        return Err(DispatchError::invalid_signature(
            text,
            format!("unexpected character `{}` in `{}`", bad, element),
        ));
    }

    let is_keyword = element
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if is_keyword {
        return element
            .parse::<PrimitiveKind>()
            .map(Specializer::Primitive)
            .map_err(|()| {
                DispatchError::invalid_signature(
                    text,
                    format!("unknown primitive kind `{}`", element),
                )
            });
    }

    Ok(Specializer::Nominal(TypeTag::new(element)))
}

impl FromStr for Signature {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Signature::parse(s)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, specializer) in self.specializers.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", specializer)?;
        }
        Ok(())
    }
}
