use std::sync::Arc;

use crate::{
    errors::{ConstructError, ResolveError},
    registry::{Entry, Registry},
    types::Instance,
};

/// A single resolution run over a registry
///
/// Keeps the chain of names currently being resolved, re-entering one of them is a cycle.
pub(crate) struct Resolution<'a> {
    registry: &'a Registry,
    chain: Vec<String>,
}

impl<'a> Resolution<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            chain: Vec::new(),
        }
    }

    /// Resolves `name` depth-first, left to right through its dependencies
    ///
    /// Returns `None` if nothing is registered under `name`.
    pub fn resolve(&mut self, name: &str) -> Result<Option<Instance>, ResolveError> {
        let registry = self.registry;
        let Some(entry) = registry.find(name) else {
            tracing::trace!("'{name}' is not registered");
            return Ok(None);
        };

        if let Some(instance) = entry.resolved() {
            tracing::trace!("'{name}' is already resolved");
            return Ok(Some(instance.clone()));
        }

        // Values are resolved on registration
        let Some(factory) = entry.factory.as_ref() else {
            return Ok(None);
        };

        if self.chain.iter().any(|resolving| resolving == name) {
            let mut chain = self.chain.clone();
            chain.push(name.to_string());
            tracing::warn!("Circular dependency detected: {}", chain.join(" -> "));
            return Err(ResolveError::CycleDetected {
                name: name.to_string(),
                chain,
            });
        }

        tracing::debug!(
            "Resolving '{name}' with dependencies {:?}",
            entry.dependencies
        );

        self.chain.push(name.to_string());
        let args = self.resolve_dependencies(entry);
        self.chain.pop();
        let args = args?;

        let instance = factory
            .construct(&args)
            .map_err(|error| construct_error(entry, error))?;

        tracing::debug!("Constructed '{name}' of type {}", instance.info);
        Ok(Some(entry.resolve_with(instance)))
    }

    fn resolve_dependencies(&mut self, entry: &Arc<Entry>) -> Result<Vec<Instance>, ResolveError> {
        let mut args = Vec::with_capacity(entry.dependencies.len());
        for dependency in &entry.dependencies {
            match self.resolve(dependency)? {
                Some(instance) => args.push(instance),
                None => {
                    tracing::error!(
                        "'{}' requires '{dependency}' which is not registered",
                        entry.name
                    );
                    return Err(ResolveError::MissingDependency {
                        dependency: dependency.clone(),
                        required_by: entry.name.clone(),
                    });
                }
            }
        }
        Ok(args)
    }
}

fn construct_error(entry: &Entry, error: ConstructError) -> ResolveError {
    match error {
        ConstructError::Argument {
            position,
            required_type,
            actual_type,
        } => ResolveError::ArgumentType {
            service: entry.name.clone(),
            dependency: entry
                .dependencies
                .get(position)
                .cloned()
                .unwrap_or_else(|| format!("#{position}")),
            required_type,
            actual_type,
        },
        ConstructError::Failed(error) => {
            tracing::error!("Factory for '{}' failed - error: {error}", entry.name);
            ResolveError::FactoryFailed {
                service: entry.name.clone(),
                error: Arc::new(error),
            }
        }
    }
}
