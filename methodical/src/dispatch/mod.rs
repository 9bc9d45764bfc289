//! Multiple dispatch with standard method combination.
//!
//! This module selects and sequences the methods of a generic function based
//! on the runtime types of all arguments, not just the first.
//!
//! # Algorithm Overview
//!
//! 1. **Score candidates**: Match every registered signature position by
//!    position; any mismatch or arity difference discards the method
//! 2. **Order by specificity**: Sum the per-position depths, lower first;
//!    equal scores keep registration order
//! 3. **Combine**: Run around methods outermost, then before methods, the
//!    most specific primary (with the rest reachable through "call next
//!    method"), and after methods least specific first
//!
//! # Module Structure
//!
//! - [`types`] - Core type definitions (TypeTag, Specializer, Role, etc.)
//! - [`signature`] - Signature text parsing
//! - [`matcher`] - Per-argument applicability and specificity
//! - [`registry`] - Method storage per generic function
//! - [`resolver`] - Applicable-method selection and ranking
//! - [`combination`] - Effective method chains and "call next method"
//! - [`result`] - Invocation result types

pub mod combination;
pub mod matcher;
pub mod registry;
pub mod resolver;
pub mod result;
pub mod signature;
pub mod types;


pub use types::{
    PrimitiveKind,
    Role,
    Specializer,
    Specificity,
    TypeTag,
};

pub use signature::Signature;

pub use matcher::TypeMatcher;

pub use registry::{
    MethodEntry,
    MethodId,
    MethodRegistry,
};

pub use resolver::{
    ApplicableMethods,
    DispatchResolver,
    RankedMethod,
};

pub use combination::{
    method,
    DispatchContext,
    EffectiveMethod,
    Method,
    MethodFn,
    MethodResult,
};

pub use result::InvokeResult;
