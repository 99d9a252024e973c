//! Environment lookups used to seed flag defaults.

use std::collections::HashMap;

/// Source of environment overrides for flags that declare an `env_key`.
pub trait EnvSource {
    /// Returns the value stored under `key`, if any.
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
