//! Lifecycle policies and configuration stages.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::DiError;

/// Lifecycle policy of a type declaration
///
/// Controls how many instances a declaration hands out and whether a
/// resolved instance still needs wiring.
///
/// - **Singleton**: created lazily on first resolution, shared afterwards
/// - **Prototype**: a fresh instance per resolution, built from the call's parameters
/// - **Pool**: a fixed set created at load time, handed out round-robin
///
/// Policies can also be parsed from their names; anything else is rejected:
///
/// ```rust
/// use ferrous_inject::{Lifecycle, DiError};
///
/// assert_eq!("singleton".parse::<Lifecycle>(), Ok(Lifecycle::Singleton));
/// assert_eq!("prototype".parse::<Lifecycle>(), Ok(Lifecycle::Prototype));
/// assert_eq!(
///     "request".parse::<Lifecycle>(),
///     Err(DiError::UnknownPolicy("request".to_string()))
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Lifecycle {
    /// At most one instance, cached in the declaration
    Singleton,
    /// New instance on every resolution, never cached
    Prototype,
    /// Pre-created instances reused round-robin
    Pool(usize),
}

impl Lifecycle {
    /// Policy name as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Lifecycle::Singleton => "singleton",
            Lifecycle::Prototype => "prototype",
            Lifecycle::Pool(_) => "pool",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Pool(size) => write!(f, "pool({})", size),
            other => f.write_str(other.name()),
        }
    }
}

/// Parses `singleton`, `prototype` and `pool` (size 1; see
/// [`Config::add_with_policy`](crate::Config::add_with_policy) for sized pools).
impl FromStr for Lifecycle {
    type Err = DiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "singleton" => Ok(Lifecycle::Singleton),
            "prototype" => Ok(Lifecycle::Prototype),
            "pool" => Ok(Lifecycle::Pool(1)),
            _ => Err(DiError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Configuration stage of a type declaration
///
/// Moves from `New` to `Configured` once, when a configuration-processor
/// pipeline run claims the declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub enum Stage {
    /// Declared but not yet offered to configuration processors
    New,
    /// Claimed by a configuration-processor pipeline run
    Configured,
}
