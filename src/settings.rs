//! Injector settings.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Fixed depth ceiling used by the default injector.
pub const MAX_DEPTH: usize = 10;

/// Environment variable overriding [`InjectorSettings::max_depth`].
pub const MAX_DEPTH_ENV: &str = "FERROUS_INJECT_MAX_DEPTH";

/// Tunables of an [`Injector`](crate::Injector)
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{InjectorSettings, MAX_DEPTH};
///
/// assert_eq!(InjectorSettings::default().max_depth, MAX_DEPTH);
/// assert_eq!(InjectorSettings::default().with_max_depth(4).max_depth, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct InjectorSettings {
    /// Deepest nesting of newly created instances a single injection may reach
    pub max_depth: usize,
}

impl Default for InjectorSettings {
    fn default() -> Self {
        Self { max_depth: MAX_DEPTH }
    }
}

impl InjectorSettings {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Defaults, overridden by `FERROUS_INJECT_MAX_DEPTH` when it holds a
    /// valid number.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(raw) = env::var(MAX_DEPTH_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(depth) => settings.max_depth = depth,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid {}", MAX_DEPTH_ENV),
            }
        }
        settings
    }
}
