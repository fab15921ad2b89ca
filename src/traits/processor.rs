//! Processor traits for the configuration and instance pipelines.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DiResult;
use crate::registration::TypeConfig;
use crate::registry::Config;
use crate::traits::component::{Component, Instance};

/// Inspects type declarations before the registry becomes usable.
///
/// Registered with [`Config::add_config_processor`], which also declares the
/// processor as a singleton, so it may carry its own injection points.
/// `unconfigured` holds only the declarations no earlier processor claimed.
/// Returning an error aborts finalization.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Component, Config, ConfigProcessor, Injectable, Parameters, TypeConfig, DiResult};
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// struct Audit;
/// impl Component for Audit {}
/// impl Injectable for Audit {
///     fn create(_: &Parameters) -> DiResult<Self> { Ok(Audit) }
/// }
///
/// #[async_trait]
/// impl ConfigProcessor for Audit {
///     async fn process_config(&self, _config: &Config, unconfigured: &[Arc<TypeConfig>]) -> DiResult<()> {
///         for type_config in unconfigured {
///             println!("declared {}", type_config.name());
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ConfigProcessor: Component {
    async fn process_config(&self, config: &Config, unconfigured: &[Arc<TypeConfig>]) -> DiResult<()>;
}

/// Acts on every freshly resolved instance once its fields are wired.
#[async_trait]
pub trait InstanceProcessor: Component {
    async fn process(&self, instance: &Instance) -> DiResult<()>;
}
