//! Generic functions: the user-facing handle over a method registry.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::config::DispatchConfig;
use crate::dispatch::combination::render_arguments;
use crate::dispatch::{
    method, DispatchContext, DispatchResolver, EffectiveMethod, InvokeResult, MethodRegistry,
    MethodResult, Role, Signature,
};
use crate::error::{DispatchError, NoApplicableMethodError};
use crate::hierarchy::{Ancestry, Dispatchable};

/// A named operation dispatched on the runtime types of all its arguments.
///
/// Methods are registered with [`defmethod`](Self::defmethod) and friends;
/// [`invoke`](Self::invoke) selects and runs the applicable ones. The
/// registry sits behind a read-write lock: invocation holds the read lock
/// only while resolving, so running methods may register or remove methods
/// on the same generic function.
pub struct GenericFunction<V> {
    name: Arc<str>,
    ancestry: Arc<dyn Ancestry>,
    config: DispatchConfig,
    registry: RwLock<MethodRegistry<V>>,
}

impl<V> GenericFunction<V>
where
    V: Dispatchable + fmt::Debug + 'static,
{
    /// Create a generic function with the default configuration.
    pub fn new(name: impl AsRef<str>, ancestry: Arc<dyn Ancestry>) -> Self {
        Self::with_config(name, ancestry, DispatchConfig::default())
    }

    pub fn with_config(
        name: impl AsRef<str>,
        ancestry: Arc<dyn Ancestry>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            ancestry,
            config,
            registry: RwLock::new(MethodRegistry::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Register a primary method.
    ///
    /// Returns `self` so definitions can be chained with `?`.
    pub fn defmethod<F>(&self, signature: &str, f: F) -> Result<&Self, DispatchError>
    where
        F: Fn(&[V], &DispatchContext<V>) -> MethodResult<V> + Send + Sync + 'static,
    {
        self.defmethod_with_role(Role::Primary, signature, f)
    }

    /// Register a method for the given combination role.
    pub fn defmethod_with_role<F>(
        &self,
        role: Role,
        signature: &str,
        f: F,
    ) -> Result<&Self, DispatchError>
    where
        F: Fn(&[V], &DispatchContext<V>) -> MethodResult<V> + Send + Sync + 'static,
    {
        let signature = Signature::parse(signature)?;
        self.registry.write().register(role, signature, method(f));
        Ok(self)
    }

    /// Invoke with the given arguments.
    ///
    /// "No applicable method" is returned as [`InvokeResult::NoApplicableMethod`];
    /// the error side carries `NoNextMethod` and method failures.
    pub fn invoke(&self, args: Vec<V>) -> Result<InvokeResult<V>, DispatchError> {
        let args: Arc<[V]> = Arc::from(args);
        match self.resolve(Arc::clone(&args)) {
            Ok(effective) => effective.call().map(InvokeResult::Returned),
            Err(err) => Ok(InvokeResult::NoApplicableMethod(err)),
        }
    }

    /// Invoke, treating "no applicable method" as an error.
    pub fn call(&self, args: Vec<V>) -> MethodResult<V> {
        self.invoke(args)?.into_result()
    }

    /// Resolve without executing.
    ///
    /// The returned effective method runs later through
    /// [`EffectiveMethod::call`]. `None` when no method applies.
    pub fn find_method(&self, args: Vec<V>) -> Option<EffectiveMethod<V>> {
        self.resolve(Arc::from(args)).ok()
    }

    /// Remove before, primary and after methods whose signature names the
    /// arguments' own types exactly. Around methods are never removed.
    ///
    /// Returns the number of removed methods.
    pub fn remove_method(&self, args: &[V]) -> usize {
        let resolver = DispatchResolver::with_config(self.ancestry.as_ref(), &self.config);
        self.registry.write().remove(args, resolver.matcher())
    }

    /// Remove the methods of one role registered with an equal signature.
    pub fn undefmethod(&self, role: Role, signature: &str) -> Result<usize, DispatchError> {
        let signature = Signature::parse(signature)?;
        Ok(self.registry.write().remove_signature(role, &signature))
    }

    /// Signatures registered for a role, in registration order.
    pub fn methods(&self, role: Role) -> Vec<Signature> {
        self.registry
            .read()
            .entries(role)
            .iter()
            .map(|entry| entry.signature.clone())
            .collect()
    }

    /// Total number of registered methods.
    pub fn method_count(&self) -> usize {
        self.registry.read().len()
    }

    fn resolve(&self, args: Arc<[V]>) -> Result<EffectiveMethod<V>, NoApplicableMethodError> {
        let resolver = DispatchResolver::with_config(self.ancestry.as_ref(), &self.config);
        let (applicable, candidates) = {
            let registry = self.registry.read();
            (resolver.resolve(&args[..], &*registry), registry.len())
        };

        match EffectiveMethod::assemble(Arc::clone(&self.name), Arc::clone(&args), applicable) {
            Some(effective) => Ok(effective),
            None => {
                let err = NoApplicableMethodError {
                    generic: self.name.to_string(),
                    arguments: render_arguments(&args[..]),
                    candidates,
                };
                debug!("{}", err);
                Err(err)
            }
        }
    }
}

impl<V> fmt::Debug for GenericFunction<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericFunction")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("registry", &*self.registry.read())
            .finish_non_exhaustive()
    }
}
