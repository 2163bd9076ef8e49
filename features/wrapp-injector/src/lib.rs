//! Wrapp Injector is a registry of named values and services which resolves a name into a
//! fully constructed, shared instance.
//!
//! Services are registered with a factory and the names of its dependencies. Nothing is built
//! on registration: the first `get` of a service resolves its dependencies depth-first, calls
//! the factory with them and caches the result, every later `get` returns the same instance.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use wrapp_injector::{signature, Injector, InjectorError};
//!
//! struct Db {
//!     host: String,
//! }
//!
//! struct Repo {
//!     db: Arc<Db>,
//! }
//!
//! fn main() -> Result<(), InjectorError> {
//!     let mut injector = Injector::new();
//!     injector
//!         .value("db", Db { host: "x".to_string() })?
//!         // Dependencies listed explicitly
//!         .service_with("repo", ["db"], |db: Arc<Db>| Repo { db })?
//!         // Dependencies named after the parameters
//!         .service("label", signature!(|repo: Arc<Repo>| repo.db.host.clone()))?;
//!
//!     let repo = injector.get_as::<Repo>("repo")?.expect("registered");
//!     assert_eq!(repo.db.host, "x");
//!
//!     let again = injector.get_as::<Repo>("repo")?.expect("registered");
//!     assert!(Arc::ptr_eq(&repo, &again));
//!
//!     let label = injector.get_as::<String>("label")?.expect("registered");
//!     assert_eq!(*label, "x");
//!
//!     // Unknown names are not an error
//!     assert!(injector.get("missing")?.is_none());
//!     Ok(())
//! }
//! ```
//!
//! Wrapp Injector consists of the following components:
//!
//! 1. Injector - registration, resolution and introspection
//! 2. Factories - typed factories and their type erased form
//! 3. Signature - parameter name inference for factories
//! 4. Config - duplicate and reserved name policies
//! 5. Errors - registration, resolution and inference errors

pub mod config;
pub mod errors;
pub mod factories;
pub mod injector;
mod registry;
mod resolver;
pub mod signature;
pub mod types;

pub use config::{DuplicatePolicy, InjectorConfig, ReservedNames};
pub use errors::{InjectorError, RegisterError, ResolveError, SignatureError};
pub use factories::{Factory, Fallible, FromInstance};
pub use injector::Injector;
pub use signature::Signature;
pub use types::{DynError, Injectable, Instance, TypeInfo};

#[cfg(test)]
mod tests;
