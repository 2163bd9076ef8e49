use std::{any::type_name, fmt::Debug, sync::Arc};

use crate::{
    config::{DuplicatePolicy, InjectorConfig},
    errors::{InjectorError, RegisterError, ResolveError, SignatureError},
    factories::{erase, Factory},
    registry::{Entry, Registry},
    resolver::Resolution,
    signature::{parse_param_names, Signature},
    types::{Injectable, Instance},
};

/// Registry of named values and services
///
/// Services are singletons: a factory runs at most once, on the first successful `get`
/// of its name, and every later `get` returns the same instance.
///
/// Cloning an injector copies the list of registrations but shares the registrations
/// themselves. Names registered afterwards are private to each side, while a service
/// resolved through one side is resolved for both.
#[derive(Clone, Default)]
pub struct Injector {
    registry: Registry,
    config: InjectorConfig,
}

impl Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("Injector");
        for entry in self.registry.iter() {
            let val = if entry.resolved().is_some() {
                "resolved"
            } else {
                "pending"
            };
            map.field(&entry.name, &val);
        }
        map.finish()
    }
}

impl Injector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InjectorConfig) -> Self {
        Self {
            registry: Registry::default(),
            config,
        }
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }
}

// Registration
impl Injector {
    /// Registers a value, it is resolved from the start
    pub fn value<T: Injectable>(
        &mut self,
        name: impl Into<String>,
        value: T,
    ) -> Result<&mut Self, RegisterError> {
        let name = name.into();
        self.check_name(&name)?;

        tracing::debug!("Registering value '{name}' of type {}", type_name::<T>());
        self.registry.push(Entry::value(name, Instance::new(value)));
        Ok(self)
    }

    /// Registers a service with an explicit, ordered list of dependency names
    ///
    /// The factory receives the resolved dependencies in the same order.
    pub fn service_with<Args, F, I, S>(
        &mut self,
        name: impl Into<String>,
        dependencies: I,
        factory: F,
    ) -> Result<&mut Self, RegisterError>
    where
        Args: 'static,
        F: Factory<Args>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let dependencies = dependencies.into_iter().map(Into::into).collect();
        self.register_service::<Args, F>(name, dependencies, factory)
    }

    /// Registers a service whose dependencies are named after the factory's parameters
    ///
    /// A list attached with [Signature::inject] takes precedence over the inferred names.
    pub fn service<Args, F>(
        &mut self,
        name: impl Into<String>,
        factory: Signature<F>,
    ) -> Result<&mut Self, RegisterError>
    where
        Args: 'static,
        F: Factory<Args>,
    {
        let name = name.into();
        let dependencies = match factory.injected() {
            Some(injected) => injected.to_vec(),
            None => {
                let arity = <Signature<F> as Factory<Args>>::arity(&factory);
                parse_param_names(factory.source(), arity).map_err(|source| {
                    RegisterError::Signature {
                        service: name.clone(),
                        source,
                    }
                })?
            }
        };
        self.register_service::<Args, Signature<F>>(name, dependencies, factory)
    }

    fn register_service<Args: 'static, F: Factory<Args>>(
        &mut self,
        name: String,
        dependencies: Vec<String>,
        factory: F,
    ) -> Result<&mut Self, RegisterError> {
        self.check_name(&name)?;

        let expected = <F as Factory<Args>>::arity(&factory);
        if dependencies.len() != expected {
            return Err(RegisterError::ArityMismatch {
                service: name,
                declared: dependencies.len(),
                expected,
            });
        }

        tracing::debug!("Registering service '{name}' depending on {dependencies:?}");
        self.registry
            .push(Entry::service(name, dependencies, erase::<Args, F>(factory)));
        Ok(self)
    }

    fn check_name(&self, name: &str) -> Result<(), RegisterError> {
        if self.config.reserved.is_reserved(name) {
            return Err(RegisterError::ReservedName(name.to_string()));
        }

        if self.registry.contains(name) {
            match self.config.duplicates {
                DuplicatePolicy::Reject => {
                    return Err(RegisterError::Duplicate(name.to_string()));
                }
                DuplicatePolicy::FirstWins => {
                    tracing::warn!("'{name}' is already registered, the new entry is shadowed");
                }
            }
        }

        Ok(())
    }
}

// Resolution
impl Injector {
    /// Resolves `name`, constructing it and its dependencies if needed
    ///
    /// Returns `Ok(None)` if nothing is registered under `name`.
    pub fn get(&self, name: &str) -> Result<Option<Instance>, ResolveError> {
        Resolution::new(&self.registry).resolve(name)
    }

    /// Alias of [Injector::get]
    pub fn inject(&self, name: &str) -> Result<Option<Instance>, ResolveError> {
        self.get(name)
    }

    /// Resolves `name` and downcasts it to `T`
    pub fn get_as<T: Injectable>(&self, name: &str) -> Result<Option<Arc<T>>, ResolveError> {
        let Some(instance) = self.get(name)? else {
            return Ok(None);
        };

        instance
            .downcast::<T>()
            .map(Some)
            .map_err(|actual_type| ResolveError::Downcast {
                name: name.to_string(),
                required_type: type_name::<T>(),
                actual_type,
            })
    }

    /// Parameter names of a factory signature, in declaration order
    pub fn get_function_arg_names<Args, F: Factory<Args>>(
        &self,
        func: &Signature<F>,
    ) -> Result<Vec<String>, SignatureError> {
        parse_param_names(func.source(), <Signature<F> as Factory<Args>>::arity(func))
    }

    /// Resolves every parameter of a factory signature by name
    ///
    /// Unregistered names yield `None` instead of failing.
    pub fn get_function_arg_values<Args, F: Factory<Args>>(
        &self,
        func: &Signature<F>,
    ) -> Result<Vec<Option<Instance>>, InjectorError> {
        let values = self
            .get_function_arg_names::<Args, F>(func)?
            .iter()
            .map(|name| self.get(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }
}

// Introspection
impl Injector {
    /// True if anything is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Number of registrations, shadowed duplicates included
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.registry.iter().map(|entry| entry.name.as_str())
    }
}
