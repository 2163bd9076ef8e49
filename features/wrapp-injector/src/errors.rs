use std::sync::Arc;

use thiserror::Error;

use crate::types::DynError;

/// Any error the injector can return
#[derive(Error, Debug, Clone)]
pub enum InjectorError {
    #[error(transparent)]
    Register(#[from] RegisterError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

/// Errors when registering a value or a service
#[derive(Error, Debug, Clone)]
pub enum RegisterError {
    /// The name collides with one of the injector's own operations
    #[error("'{0}' is a reserved name")]
    ReservedName(String),
    /// The name is already registered and duplicates are rejected
    #[error("'{0}' is already registered")]
    Duplicate(String),
    /// The dependency list does not fit the factory's parameters
    #[error("'{service}' declares {declared} dependencies but its factory takes {expected}")]
    ArityMismatch {
        service: String,
        declared: usize,
        expected: usize,
    },
    /// Dependency names could not be inferred from the factory signature
    #[error("Could not infer the dependencies of '{service}': {source}")]
    Signature {
        service: String,
        source: SignatureError,
    },
}

/// Errors while resolving a name
///
/// A name which is not registered at all is not an error, `get` returns `None` for it.
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    /// A dependency of a service is not registered
    #[error("Service '{dependency}' not found in '{required_by}'")]
    MissingDependency {
        dependency: String,
        required_by: String,
    },
    /// Resolution came back to a name which is still being resolved
    #[error("Circular dependency on '{name}' through {}", .chain.join(" -> "))]
    CycleDetected { name: String, chain: Vec<String> },
    /// A resolved dependency does not have the type the factory expects
    #[error("'{service}' expects '{required_type}' for '{dependency}' but got '{actual_type}'")]
    ArgumentType {
        service: String,
        dependency: String,
        required_type: &'static str,
        actual_type: &'static str,
    },
    /// The factory itself returned an error
    #[error("Factory for '{service}' failed - error: {error}")]
    FactoryFailed {
        service: String,
        error: Arc<DynError>,
    },
    /// The resolved value is not of the requested type
    #[error("Failed to downcast '{name}', required: '{required_type}' actual: '{actual_type}'")]
    Downcast {
        name: String,
        required_type: &'static str,
        actual_type: &'static str,
    },
}

/// Errors while inferring parameter names from a signature
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("No parameter list found in '{0}'")]
    NoParameterList(String),
    #[error("Parameter {position} of '{signature}' has no usable name")]
    InvalidName { signature: String, position: usize },
    #[error("'{signature}' names {found} parameters but the factory takes {expected}")]
    ArityMismatch {
        signature: String,
        found: usize,
        expected: usize,
    },
}

/// Failure of a single factory invocation, before it is tied to a service name
#[derive(Debug)]
pub enum ConstructError {
    /// Argument at `position` could not be converted to the parameter type
    Argument {
        position: usize,
        required_type: &'static str,
        actual_type: &'static str,
    },
    /// The factory returned an error
    Failed(DynError),
}
