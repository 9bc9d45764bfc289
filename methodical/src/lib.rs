//! Multiple-dispatch generic functions with standard method combination.
//!
//! A [`GenericFunction`] is a named operation whose behavior is chosen by the
//! runtime types of all of its arguments. Methods are registered against
//! signatures such as `"Array, *"` in one of four roles (primary, before,
//! after, around) and combined on every call:
//!
//! ```text
//! around (most specific first)
//!   before (most specific first)
//!   primary (most specific first, rest via call_next_method)
//!   after (least specific first)
//! ```
//!
//! The host supplies the type model through [`Dispatchable`] and
//! [`Ancestry`]; [`TypeTable`] and [`Value`] are a ready-made model for
//! tests, demos and embedders without one of their own.
//!
//! ```
//! use std::sync::Arc;
//! use methodical::{GenericFunction, TypeTable, Value};
//!
//! let append: GenericFunction<Value> =
//!     GenericFunction::new("append", Arc::new(TypeTable::with_builtins()));
//! append
//!     .defmethod("*, Array", |args, _| {
//!         let mut items = vec![args[0].clone()];
//!         items.extend(args[1].as_list().unwrap_or_default().iter().cloned());
//!         Ok(Some(Value::List(items)))
//!     })
//!     .unwrap();
//!
//! let result = append
//!     .call(vec![Value::Number(1.0), Value::numbers([2.0, 3.0])])
//!     .unwrap();
//! assert_eq!(result, Some(Value::numbers([1.0, 2.0, 3.0])));
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod generic;
pub mod hierarchy;
pub mod value;

pub use config::{AfterOrder, DispatchConfig, PrimitiveSpecificity};
pub use dispatch::{
    DispatchContext, EffectiveMethod, InvokeResult, MethodResult, PrimitiveKind, Role, Signature,
    Specializer, Specificity, TypeTag,
};
pub use error::{ConfigError, DispatchError, DispatchResult, HierarchyError, NoApplicableMethodError};
pub use generic::GenericFunction;
pub use hierarchy::{Ancestry, Dispatchable, TypeTable};
pub use value::{Object, Value};
