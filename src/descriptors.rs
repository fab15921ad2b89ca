//! Type descriptors for introspection and diagnostics.

#[cfg(feature = "config")]
use serde::Serialize;

use crate::lifetime::{Lifecycle, Stage};

/// Snapshot of a registry entry
///
/// Detached from the live declaration: the stage is the one observed when
/// the descriptor was taken.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Component, Config, Injectable, Lifecycle, Parameters, Stage, DiResult};
///
/// struct Database;
/// impl Component for Database {}
/// impl Injectable for Database {
///     fn type_key() -> &'static str { "database" }
///     fn create(_: &Parameters) -> DiResult<Self> { Ok(Database) }
/// }
///
/// let config = Config::empty();
/// config.add_singleton::<Database>();
///
/// let descriptors = config.descriptors();
/// let db = descriptors.iter().find(|d| d.name == "database").unwrap();
/// assert_eq!(db.lifecycle, Lifecycle::Singleton);
/// assert_eq!(db.stage, Stage::New);
/// assert!(db.type_name.contains("Database"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize))]
pub struct TypeDescriptor {
    /// Registry name
    pub name: String,
    /// Rust type behind the declaration
    pub type_name: &'static str,
    /// Lifecycle policy
    pub lifecycle: Lifecycle,
    /// Configuration stage at snapshot time
    pub stage: Stage,
}

impl TypeDescriptor {
    pub fn is_configured(&self) -> bool {
        self.stage == Stage::Configured
    }
}
