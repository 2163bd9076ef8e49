//! Parameter name inference
//!
//! Rust functions carry no parameter names at runtime, so a factory whose dependencies should
//! be inferred is registered together with the text of its parameter list as a [Signature].
//! The [signature!](crate::signature) macro builds one from a function or closure so the text
//! always matches the code.

use std::borrow::Cow;

use crate::{
    errors::{ConstructError, SignatureError},
    factories::Factory,
    types::Instance,
};

/// A factory together with the textual form of its parameter list
pub struct Signature<F> {
    source: Cow<'static, str>,
    inject: Option<Vec<String>>,
    factory: F,
}

impl<F> Signature<F> {
    /// `source` must contain the parameter list in parentheses, e.g. `fn repo(db, cache)`
    pub fn new(source: impl Into<Cow<'static, str>>, factory: F) -> Self {
        Self {
            source: source.into(),
            inject: None,
            factory,
        }
    }

    /// Attach an explicit dependency list, it is used instead of the inferred names
    pub fn inject<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inject = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn injected(&self) -> Option<&[String]> {
        self.inject.as_deref()
    }
}

impl<Args, F: Factory<Args>> Factory<Args> for Signature<F> {
    fn arity(&self) -> usize {
        <F as Factory<Args>>::arity(&self.factory)
    }

    fn construct(&self, args: &[Instance]) -> Result<Instance, ConstructError> {
        <F as Factory<Args>>::construct(&self.factory, args)
    }
}

/// Builds a [Signature] from a function item or a closure with annotated parameters
///
/// ```
/// # use std::sync::Arc;
/// # use wrapp_injector::signature;
/// let sig = signature!(fn greeting(name: Arc<String>) -> String {
///     format!("Hello {name}")
/// });
/// assert!(sig.source().starts_with("fn greeting("));
///
/// let sig = signature!(|host: Arc<String>, port: Arc<u16>| format!("{host}:{port}"));
/// assert!(sig.source().starts_with('('));
/// ```
#[macro_export]
macro_rules! signature {
    (fn $name:ident ( $($arg:ident : $ty:ty),* $(,)? ) $(-> $ret:ty)? $body:block) => {{
        fn $name($($arg: $ty),*) $(-> $ret)? $body
        $crate::Signature::new(
            concat!("fn ", stringify!($name), "(", stringify!($($arg: $ty),*), ")"),
            $name,
        )
    }};
    (|| $body:expr) => {
        $crate::Signature::new("()", || $body)
    };
    (| $($arg:ident : $ty:ty),* $(,)? | $body:expr) => {
        $crate::Signature::new(
            concat!("(", stringify!($($arg: $ty),*), ")"),
            |$($arg: $ty),*| $body,
        )
    };
}

/// Extracts the parameter names of `source`, expecting exactly `arity` of them
pub(crate) fn parse_param_names(source: &str, arity: usize) -> Result<Vec<String>, SignatureError> {
    if arity == 0 {
        return Ok(Vec::new());
    }

    let stripped = strip_comments(source);
    let list = parameter_list(&stripped)
        .ok_or_else(|| SignatureError::NoParameterList(source.to_string()))?;

    let mut parts = split_top_level(list);
    if parts.last().is_some_and(|last| last.trim().is_empty()) {
        parts.pop();
    }

    let names = parts
        .iter()
        .enumerate()
        .map(|(position, part)| {
            param_name(part).ok_or_else(|| SignatureError::InvalidName {
                signature: source.to_string(),
                position,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if names.len() != arity {
        return Err(SignatureError::ArityMismatch {
            signature: source.to_string(),
            found: names.len(),
            expected: arity,
        });
    }

    Ok(names)
}

/// Removes `/* */` and `//` comments, multi-line and nested block comments included
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('/', Some('*')) => {
                chars.next();
                let mut depth = 1usize;
                while depth > 0 {
                    match (chars.next(), chars.peek()) {
                        (Some('/'), Some('*')) => {
                            chars.next();
                            depth += 1;
                        }
                        (Some('*'), Some('/')) => {
                            chars.next();
                            depth -= 1;
                        }
                        (Some(_), _) => {}
                        (None, _) => break,
                    }
                }
            }
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Text between the first `(` and its matching `)`
fn parameter_list(source: &str) -> Option<&str> {
    let open = source.find('(')?;
    let mut depth = 0usize;
    for (idx, c) in source[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&source[open + 1..open + idx]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits on commas which are not nested in brackets, generics or tuples
fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut prev = '\0';

    for (idx, c) in list.char_indices() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            // `->` in `impl Fn() -> T` does not close a generic
            '>' if prev == '-' => {}
            ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&list[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
        prev = c;
    }
    parts.push(&list[start..]);

    parts
}

fn param_name(part: &str) -> Option<String> {
    let part = part.trim();
    let part = part
        .strip_prefix("mut ")
        .map(str::trim_start)
        .unwrap_or(part);
    let name = match part.split_once(':') {
        Some((name, _ty)) => name.trim(),
        None => part,
    };

    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    valid.then(|| name.to_string())
}
