//! Lazy providers for breaking instantiation cycles.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::{DiError, DiResult};
use crate::injector::Injector;
use crate::parameters::Parameters;
use crate::registry::{Config, ConfigInner};
use crate::traits::{downcast, Component, Instance};

/// On-demand resolution handle
///
/// Injected in place of the instance for provider-kind injection points.
/// Nothing is resolved until [`get`](Self::get) is called, which lets one
/// side of a cycle (A needs B, B needs A) be wired after construction.
///
/// A provider remembers only the registry name and a weak reference to the
/// registry, so it never keeps the registry alive. Every `get` looks the name
/// up again, so a re-declared or merged entry is picked up. Once the registry
/// is dropped `get` fails with [`DiError::MissingRegistry`].
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Component, Config, Inject, InjectionPoint, Injectable, Parameters, DiResult};
/// use std::sync::Arc;
///
/// struct Report;
/// impl Component for Report {}
/// impl Injectable for Report {
///     fn create(_: &Parameters) -> DiResult<Self> { Ok(Report) }
/// }
///
/// struct Dashboard { report: Inject }
/// impl Component for Dashboard {
///     fn injection_points(&self) -> Vec<(&'static str, &Inject)> {
///         vec![("report", &self.report)]
///     }
/// }
///
/// # async fn example() -> DiResult<()> {
/// let config = Config::new();
/// config.add_prototype::<Report>();
/// config.finalize().await?;
///
/// let dashboard = Arc::new(Dashboard { report: InjectionPoint::provider::<Report>().into() });
/// ferrous_inject::inject(dashboard.clone(), &config).await?;
///
/// let provider = dashboard.report.provider().unwrap();
/// let report: Arc<Report> = provider.get_as(Parameters::new()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Provider {
    name: String,
    injector: Injector,
    config: Weak<ConfigInner>,
}

impl Provider {
    pub(crate) fn new(name: impl Into<String>, injector: Injector, config: &Config) -> Self {
        Self {
            name: name.into(),
            injector,
            config: config.downgrade(),
        }
    }

    /// Registry name of the bound declaration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolves the bound name through the registry and wires the result if
    /// it was freshly created.
    pub async fn get(&self, parameters: Parameters) -> DiResult<Instance> {
        let config = Config::upgrade(&self.config).ok_or_else(|| {
            tracing::error!(name = %self.name, "provider outlived its registry");
            DiError::MissingRegistry
        })?;
        self.injector.resolve(&self.name, &config, &parameters).await
    }

    /// [`get`](Self::get) downcast to `T`.
    pub async fn get_as<T: Component>(&self, parameters: Parameters) -> DiResult<Arc<T>> {
        let instance = self.get(parameters).await?;
        downcast(&instance)
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("registry_alive", &(self.config.strong_count() > 0))
            .finish()
    }
}
