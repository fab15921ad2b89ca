//! The resolution and field-injection engine.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::holder::{HolderKind, InstanceHolder};
use crate::injection::{InjectionKind, Wired};
use crate::internal::BoxFuture;
use crate::parameters::Parameters;
use crate::pipeline::InstanceProcessorExecutor;
use crate::provider::Provider;
use crate::registry::Config;
use crate::settings::InjectorSettings;
use crate::traits::{downcast, Component, Instance};

/// Wires injection points into components
///
/// Stateless apart from its settings, so it is cheap to clone and pass
/// around. Fields are wired one at a time, in the order the component lists
/// them; a freshly created dependency is fully wired (recursively, with the
/// depth incremented) before the next field is looked at.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Component, Config, Inject, InjectionPoint, Injectable, Injector, Parameters, DiResult};
/// use std::sync::Arc;
///
/// struct Repo;
/// impl Component for Repo {}
/// impl Injectable for Repo {
///     fn create(_: &Parameters) -> DiResult<Self> { Ok(Repo) }
/// }
///
/// struct Service { repo: Inject }
/// impl Component for Service {
///     fn injection_points(&self) -> Vec<(&'static str, &Inject)> {
///         vec![("repo", &self.repo)]
///     }
/// }
///
/// # async fn example() -> DiResult<()> {
/// let config = Config::new();
/// config.add_singleton::<Repo>();
/// config.finalize().await?;
///
/// let service = Arc::new(Service { repo: InjectionPoint::instance::<Repo>().into() });
/// Injector::new().inject(service.clone(), &config).await?;
/// assert!(service.repo.get::<Repo>().is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Injector {
    settings: InjectorSettings,
}

impl Injector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: InjectorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &InjectorSettings {
        &self.settings
    }

    /// Wires `target` against a finalized `config` and returns it.
    pub async fn inject(&self, target: Instance, config: &Config) -> DiResult<Instance> {
        self.inject_target(Some(target), Some(config), 0).await
    }

    /// [`inject`](Self::inject) for a concrete `Arc<T>`, handing back the same `Arc`.
    pub async fn inject_arc<T: Component>(&self, target: Arc<T>, config: &Config) -> DiResult<Arc<T>> {
        self.inject(target.clone(), config).await?;
        Ok(target)
    }

    /// Checks the preconditions, then wires `target` at `depth`.
    ///
    /// Fails fast, before touching any field, with `MissingTarget`,
    /// `MissingRegistry`, `NotFinalized` or `InjectionTooDeep`.
    pub fn inject_target<'a>(
        &'a self,
        target: Option<Instance>,
        config: Option<&'a Config>,
        depth: usize,
    ) -> BoxFuture<'a, DiResult<Instance>> {
        Box::pin(async move {
            let target = target.ok_or_else(|| {
                tracing::error!("injection requested without a target");
                DiError::MissingTarget
            })?;
            let config = config.ok_or_else(|| {
                tracing::error!("injection requested without a registry");
                DiError::MissingRegistry
            })?;
            if !config.is_finalized() {
                tracing::error!("injection requested before the registry was finalized");
                return Err(DiError::NotFinalized);
            }
            self.wire(target, config, depth).await
        })
    }

    /// Resolves `name` and wires the result if it was freshly created.
    pub async fn resolve(&self, name: &str, config: &Config, parameters: &Parameters) -> DiResult<Instance> {
        if !config.is_finalized() {
            tracing::error!(name, "resolution requested before the registry was finalized");
            return Err(DiError::NotFinalized);
        }
        let holder = config.instance_holder_for(name, parameters)?;
        self.complete(name, holder, config, 0).await
    }

    /// [`resolve`](Self::resolve) downcast to `T`.
    pub async fn resolve_as<T: Component>(&self, name: &str, config: &Config, parameters: &Parameters) -> DiResult<Arc<T>> {
        let instance = self.resolve(name, config, parameters).await?;
        downcast(&instance)
    }

    /// Wires a freshly created instance at `depth`; existing instances pass
    /// through. A singleton whose wiring fails is evicted from its
    /// declaration so it is never handed out half-wired.
    pub(crate) async fn complete(
        &self,
        name: &str,
        holder: InstanceHolder,
        config: &Config,
        depth: usize,
    ) -> DiResult<Instance> {
        if holder.kind == HolderKind::Existing {
            return Ok(holder.instance);
        }
        let instance = holder.instance;
        match self.wire(Arc::clone(&instance), config, depth).await {
            Ok(wired) => Ok(wired),
            Err(err) => {
                if let Some(type_config) = config.type_config(name) {
                    if type_config.evict(&instance) {
                        tracing::debug!(name, error = %err, "evicted singleton after failed wiring");
                    }
                }
                Err(err)
            }
        }
    }

    /// Field injection without the finalization check; the pipelines use it
    /// to wire processors and pool members while finalization is running.
    pub(crate) fn wire<'a>(&'a self, target: Instance, config: &'a Config, depth: usize) -> BoxFuture<'a, DiResult<Instance>> {
        Box::pin(async move {
            if depth > self.settings.max_depth {
                tracing::error!(depth, max_depth = self.settings.max_depth, "injection too deep");
                return Err(DiError::InjectionTooDeep(depth));
            }

            for (slot, inject) in target.injection_points() {
                if inject.is_wired() {
                    continue;
                }
                let point = inject.point();

                let wired = match point.kind() {
                    InjectionKind::Provider => {
                        let type_config = config.type_config(point.name()).ok_or_else(|| {
                            tracing::error!(slot, name = point.name(), "no type config for provider");
                            DiError::UnknownTypeConfig(point.name().to_string())
                        })?;
                        tracing::debug!(slot, name = point.name(), depth, "provider bound");
                        Wired::Provider(Provider::new(type_config.name(), self.clone(), config))
                    }
                    InjectionKind::Instance => {
                        let holder = config.instance_holder_for(point.name(), point.parameters())?;
                        let instance = self.complete(point.name(), holder, config, depth + 1).await?;
                        tracing::debug!(slot, name = point.name(), depth, "instance injected");
                        Wired::Instance(instance)
                    }
                };

                if !inject.fill(wired) {
                    tracing::debug!(slot, "slot filled concurrently; keeping the first value");
                }
            }

            InstanceProcessorExecutor::execute(&target, self, config).await?;
            Ok(target)
        })
    }
}

/// Wires `target` with a default [`Injector`].
///
/// Equivalent to `Injector::default().inject(target, config)`.
pub async fn inject(target: Instance, config: &Config) -> DiResult<Instance> {
    Injector::default().inject(target, config).await
}
