use std::borrow::Cow;

/// Registration rules of an [crate::Injector]
#[derive(Debug, Clone, Default)]
pub struct InjectorConfig {
    /// What happens when a name is registered twice
    pub duplicates: DuplicatePolicy,
    /// Names which can not be registered
    pub reserved: ReservedNames,
}

impl InjectorConfig {
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn reserved(mut self, reserved: ReservedNames) -> Self {
        self.reserved = reserved;
        self
    }
}

/// Handling of a second registration under an existing name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The registration is kept but lookups keep returning the first entry
    #[default]
    FirstWins,
    /// The registration fails with [crate::RegisterError::Duplicate]
    Reject,
}

/// Names which collide with the injector's own operations
///
/// The default set rejects `clone`, `get`, `set`, `service`, `value`
/// and any name starting with `$`.
#[derive(Debug, Clone)]
pub struct ReservedNames {
    exact: Vec<Cow<'static, str>>,
    prefixes: Vec<Cow<'static, str>>,
}

impl Default for ReservedNames {
    fn default() -> Self {
        Self {
            exact: ["clone", "get", "set", "service", "value"]
                .into_iter()
                .map(Cow::Borrowed)
                .collect(),
            prefixes: vec![Cow::Borrowed("$")],
        }
    }
}

impl ReservedNames {
    /// Nothing is reserved
    pub fn none() -> Self {
        Self {
            exact: Vec::new(),
            prefixes: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.exact.push(name.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.exact.iter().any(|reserved| reserved == name)
            || self
                .prefixes
                .iter()
                .any(|prefix| name.starts_with(prefix.as_ref()))
    }
}
