//! Runtime configuration overrides.
//!
//! A configuration parameter `NAME` maps to two directory lists consulted by
//! the resolver: `NAME_HINT` (tried, then falls through) and `NAME` (tried,
//! and final when set).

use std::collections::HashMap;
use std::env;

/// Suffix appended to a parameter name to form its supplementary hint list.
pub const HINT_SUFFIX: &str = "_HINT";

/// Source of configuration parameter values.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigSource {
    /// Ordered directory list for `name`, empty when the parameter is unset.
    fn paths(&self, name: &str) -> Vec<String>;
}

/// Reads parameters from the process environment.
///
/// Values are split on the platform path-list separator (`:` on Unix, `;` on
/// Windows). Unset and empty variables both yield an empty list.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfig;

impl ConfigSource for EnvConfig {
    fn paths(&self, name: &str) -> Vec<String> {
        match env::var_os(name) {
            Some(value) if !value.is_empty() => env::split_paths(&value)
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// In-memory parameter table.
///
/// Lets embedders pin overrides without touching the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticConfig {
    values: HashMap<String, Vec<String>>,
}

impl StaticConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory list for `name`, replacing any previous value.
    #[must_use]
    pub fn with<I, S>(mut self, name: &str, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(name, paths);
        self
    }

    pub fn set<I, S>(&mut self, name: &str, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values
            .insert(name.to_string(), paths.into_iter().map(Into::into).collect());
    }
}

impl ConfigSource for StaticConfig {
    fn paths(&self, name: &str) -> Vec<String> {
        self.values.get(name).cloned().unwrap_or_default()
    }
}

/// Name of the hint parameter belonging to `name`.
pub fn hint_name(name: &str) -> String {
    format!("{name}{HINT_SUFFIX}")
}
