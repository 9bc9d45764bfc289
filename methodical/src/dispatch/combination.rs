//! Standard method combination.
//!
//! The effective method of a call is an explicit chain of links:
//!
//! ```text
//! around[0] -> around[1] -> ... -> inner
//! inner = before[..] ; primary[0] -> primary[1] -> ... ; after[..]
//! ```
//!
//! Every method receives a [`DispatchContext`] holding the chain it lives in
//! and a cursor past its own position. "Call next method" runs the link at
//! the cursor with a fresh context advanced by one, so contexts are plain
//! immutable values that can be cloned, sent to other threads, or kept
//! across suspension points.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::{BoxError, DispatchError};

use super::registry::MethodEntry;
use super::resolver::{ApplicableMethods, RankedMethod};
use super::types::Role;

/// Result of running one method: a value, no value, or an error.
pub type MethodResult<V> = Result<Option<V>, DispatchError>;

/// Signature of a method implementation.
pub type MethodFn<V> = dyn Fn(&[V], &DispatchContext<V>) -> MethodResult<V> + Send + Sync;

/// Shared handle to a method implementation.
pub type Method<V> = Arc<MethodFn<V>>;

/// Wrap a closure as a [`Method`].
pub fn method<V, F>(f: F) -> Method<V>
where
    F: Fn(&[V], &DispatchContext<V>) -> MethodResult<V> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// One step of an effective method chain.
enum Link<V> {
    /// A single around or primary method.
    Method(Method<V>),
    /// The before/primary/after combination below the around methods.
    Inner(Arc<InnerStep<V>>),
}

impl<V> Clone for Link<V> {
    fn clone(&self) -> Self {
        match self {
            Link::Method(m) => Link::Method(Arc::clone(m)),
            Link::Inner(inner) => Link::Inner(Arc::clone(inner)),
        }
    }
}

struct InnerStep<V> {
    before: Vec<Method<V>>,
    primary: Arc<[Link<V>]>,
    after: Vec<Method<V>>,
}

impl<V: fmt::Debug> Link<V> {
    fn run(&self, ctx: &DispatchContext<V>) -> MethodResult<V> {
        match self {
            Link::Method(m) => m(ctx.arguments(), ctx),
            Link::Inner(inner) => inner.run(ctx),
        }
    }
}

impl<V: fmt::Debug> InnerStep<V> {
    fn run(&self, ctx: &DispatchContext<V>) -> MethodResult<V> {
        // Before and after methods have no next method.
        let detached = ctx.detached();
        for before in &self.before {
            before(detached.arguments(), &detached)?;
        }

        let result = if self.primary.is_empty() {
            None
        } else {
            let head = DispatchContext {
                generic: Arc::clone(&ctx.generic),
                args: Arc::clone(&ctx.args),
                chain: Arc::clone(&self.primary),
                cursor: 0,
            };
            head.run_next(Arc::clone(&ctx.args))?
        };

        for after in &self.after {
            after(detached.arguments(), &detached)?;
        }
        Ok(result)
    }
}

/// Per-invocation state handed to every running method.
pub struct DispatchContext<V> {
    generic: Arc<str>,
    args: Arc<[V]>,
    chain: Arc<[Link<V>]>,
    cursor: usize,
}

impl<V> Clone for DispatchContext<V> {
    fn clone(&self) -> Self {
        Self {
            generic: Arc::clone(&self.generic),
            args: Arc::clone(&self.args),
            chain: Arc::clone(&self.chain),
            cursor: self.cursor,
        }
    }
}

impl<V> DispatchContext<V> {
    /// Name of the generic function being invoked.
    pub fn generic_name(&self) -> &str {
        &self.generic
    }

    /// Arguments the running method was called with.
    pub fn arguments(&self) -> &[V] {
        &self.args
    }

    /// Whether "call next method" has a method to run (`next-method-p`).
    pub fn has_next_method(&self) -> bool {
        self.cursor < self.chain.len()
    }

    /// Number of links left in this method's chain.
    pub fn remaining(&self) -> usize {
        self.chain.len().saturating_sub(self.cursor)
    }

    /// Build a failure attributed to this generic function.
    pub fn fail(&self, source: impl Into<BoxError>) -> DispatchError {
        DispatchError::MethodFailed {
            generic: self.generic.to_string(),
            source: source.into(),
        }
    }

    fn detached(&self) -> Self {
        Self {
            generic: Arc::clone(&self.generic),
            args: Arc::clone(&self.args),
            chain: Arc::from(Vec::new()),
            cursor: 0,
        }
    }
}

impl<V: fmt::Debug> DispatchContext<V> {
    /// Run the next method with the current arguments.
    ///
    /// Fails with [`DispatchError::NoNextMethod`] when the chain is exhausted.
    pub fn call_next_method(&self) -> MethodResult<V> {
        self.run_next(Arc::clone(&self.args))
    }

    /// Run the next method with replacement arguments.
    ///
    /// The chain is not recomputed for the new arguments.
    pub fn call_next_method_with(&self, args: Vec<V>) -> MethodResult<V> {
        self.run_next(Arc::from(args))
    }

    fn run_next(&self, args: Arc<[V]>) -> MethodResult<V> {
        let Some(link) = self.chain.get(self.cursor) else {
            return Err(DispatchError::NoNextMethod {
                generic: self.generic.to_string(),
                arguments: render_arguments(&args[..]),
            });
        };

        let next = DispatchContext {
            generic: Arc::clone(&self.generic),
            args,
            chain: Arc::clone(&self.chain),
            cursor: self.cursor + 1,
        };
        link.run(&next)
    }
}

impl<V> fmt::Debug for DispatchContext<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchContext")
            .field("generic", &self.generic)
            .field("remaining", &self.remaining())
            .finish_non_exhaustive()
    }
}

pub(crate) fn render_arguments<V: fmt::Debug>(args: &[V]) -> Vec<String> {
    args.iter().map(|arg| format!("{:?}", arg)).collect()
}

/// The resolved, not yet executed, combination of methods for one call.
///
/// Produced by `GenericFunction::find_method`; [`EffectiveMethod::call`]
/// runs it. The registry may change in between without affecting it.
pub struct EffectiveMethod<V> {
    generic: Arc<str>,
    args: Arc<[V]>,
    applicable: ApplicableMethods<V>,
    chain: Arc<[Link<V>]>,
}

impl<V> EffectiveMethod<V> {
    /// Assemble the effective method. `None` when no method applies.
    pub(crate) fn assemble(
        generic: Arc<str>,
        args: Arc<[V]>,
        applicable: ApplicableMethods<V>,
    ) -> Option<Self> {
        if applicable.is_empty() {
            return None;
        }

        let implementations = |role: Role| -> Vec<Method<V>> {
            applicable
                .get(role)
                .iter()
                .map(|m| Arc::clone(&m.entry.method))
                .collect()
        };

        let inner = InnerStep {
            before: implementations(Role::Before),
            primary: implementations(Role::Primary)
                .into_iter()
                .map(Link::Method)
                .collect(),
            after: implementations(Role::After),
        };

        let chain: Arc<[Link<V>]> = implementations(Role::Around)
            .into_iter()
            .map(Link::Method)
            .chain(std::iter::once(Link::Inner(Arc::new(inner))))
            .collect();

        trace!(
            generic = %generic,
            around = applicable.get(Role::Around).len(),
            "assembled effective method"
        );

        Some(Self {
            generic,
            args,
            applicable,
            chain,
        })
    }

    pub fn generic_name(&self) -> &str {
        &self.generic
    }

    pub fn arguments(&self) -> &[V] {
        &self.args
    }

    /// The applicable methods of one role, in execution order.
    pub fn methods(&self, role: Role) -> &[RankedMethod<V>] {
        self.applicable.get(role)
    }

    /// The most specific primary method, if any applies.
    pub fn primary(&self) -> Option<&MethodEntry<V>> {
        self.applicable.get(Role::Primary).first().map(|m| &m.entry)
    }
}

impl<V: fmt::Debug> EffectiveMethod<V> {
    /// Run the combination with the captured arguments.
    pub fn call(&self) -> MethodResult<V> {
        let start = DispatchContext {
            generic: Arc::clone(&self.generic),
            args: Arc::clone(&self.args),
            chain: Arc::clone(&self.chain),
            cursor: 0,
        };
        start.run_next(Arc::clone(&self.args))
    }
}

impl<V> Clone for EffectiveMethod<V> {
    fn clone(&self) -> Self {
        Self {
            generic: Arc::clone(&self.generic),
            args: Arc::clone(&self.args),
            applicable: self.applicable.clone(),
            chain: Arc::clone(&self.chain),
        }
    }
}

impl<V> fmt::Debug for EffectiveMethod<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectiveMethod")
            .field("generic", &self.generic)
            .field("applicable", &self.applicable)
            .finish_non_exhaustive()
    }
}
