//! Credential handling for backend API keys.
//!
//! Keys are held in a [`SecretValue`], which is zeroized on drop and never
//! shows its contents in `Debug` output. Resolution follows a fixed order:
//! the explicit config field first, then the provider's environment
//! variable.

use std::fmt;

use zeroize::Zeroize;

/// Looks up an environment variable by name.
///
/// Adapters take this as a plain function pointer so tests can supply a
/// fixed environment instead of mutating the process one.
pub type EnvLookup = fn(&str) -> Option<String>;

/// Reads from the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// A credential with automatic zeroization.
#[derive(Clone)]
pub struct SecretValue {
    inner: String,
}

impl SecretValue {
    /// Wrap a credential.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Borrow the raw credential, e.g. to build an auth header.
    pub fn expose(&self) -> &str {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretValue")
            .field("inner", &"[REDACTED]")
            .field("len", &self.inner.len())
            .finish()
    }
}

impl Drop for SecretValue {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

/// Resolve a credential from an explicit value or the named env var.
///
/// Blank values count as absent in both places.
pub fn resolve_credential(
    explicit: Option<&str>,
    env_var: &str,
    env: EnvLookup,
) -> Option<SecretValue> {
    explicit
        .map(str::to_string)
        .filter(|k| !k.trim().is_empty())
        .or_else(|| env(env_var).filter(|k| !k.trim().is_empty()))
        .map(SecretValue::new)
}
