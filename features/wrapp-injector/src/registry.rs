use std::sync::{Arc, OnceLock};

use crate::{factories::DynFactory, types::Instance};

/// One registration: a value, or a service with its dependencies and factory
pub(crate) struct Entry {
    pub name: String,
    pub dependencies: Vec<String>,
    pub factory: Option<Box<dyn DynFactory>>,
    /// Set on registration for values, on first successful resolution for services
    resolved: OnceLock<Instance>,
}

impl Entry {
    pub fn value(name: String, instance: Instance) -> Self {
        Entry {
            name,
            dependencies: Vec::new(),
            factory: None,
            resolved: OnceLock::from(instance),
        }
    }

    pub fn service(name: String, dependencies: Vec<String>, factory: Box<dyn DynFactory>) -> Self {
        Entry {
            name,
            dependencies,
            factory: Some(factory),
            resolved: OnceLock::new(),
        }
    }

    pub fn resolved(&self) -> Option<&Instance> {
        self.resolved.get()
    }

    /// Caches the instance and returns the cached one
    ///
    /// If the entry was resolved in the meantime the earlier instance is kept.
    pub fn resolve_with(&self, instance: Instance) -> Instance {
        self.resolved.get_or_init(|| instance).clone()
    }
}

/// Ordered registrations of one injector
///
/// Entries are shared by reference, a cloned registry sees the resolution state
/// of every entry it was cloned with.
#[derive(Clone, Default)]
pub(crate) struct Registry {
    entries: Vec<Arc<Entry>>,
}

impl Registry {
    /// First entry registered under `name`
    pub fn find(&self, name: &str) -> Option<&Arc<Entry>> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(Arc::new(entry));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Entry>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
