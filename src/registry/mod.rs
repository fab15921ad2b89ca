//! The type-configuration registry.
//!
//! [`Config`] holds the name-to-declaration map, the ordered processor name
//! lists, and the finalized flag. It is a cheap handle around shared state,
//! so every builder method takes `&self`.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::descriptors::TypeDescriptor;
use crate::error::{DiError, DiResult};
use crate::holder::InstanceHolder;
use crate::injector::Injector;
use crate::lifetime::{Lifecycle, Stage};
use crate::parameters::Parameters;
use crate::pipeline::{ConfigProcessorExecutor, PostConstructProcessor};
use crate::registration::{factory_of, Factory, TypeConfig};
use crate::traits::{downcast, ConfigProcessor, Injectable, Instance, InstanceProcessor};

pub mod module;
pub use module::{ConfigExt, ConfigModule};

/// A processor's registry name plus the cast from the resolved instance to
/// its processor trait object.
pub struct ProcessorEntry<P: ?Sized> {
    name: String,
    pub(crate) cast: fn(&Instance) -> DiResult<Arc<P>>,
}

impl<P: ?Sized> ProcessorEntry<P> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<P: ?Sized> Clone for ProcessorEntry<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            cast: self.cast,
        }
    }
}

impl<P: ?Sized> fmt::Debug for ProcessorEntry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProcessorEntry").field(&self.name).finish()
    }
}

fn cast_config_processor<P: ConfigProcessor>(instance: &Instance) -> DiResult<Arc<dyn ConfigProcessor>> {
    let processor: Arc<P> = downcast(instance)?;
    Ok(processor)
}

fn cast_instance_processor<P: InstanceProcessor>(instance: &Instance) -> DiResult<Arc<dyn InstanceProcessor>> {
    let processor: Arc<P> = downcast(instance)?;
    Ok(processor)
}

pub(crate) struct ConfigInner {
    types: RwLock<IndexMap<String, Arc<TypeConfig>>>,
    config_processors: RwLock<Vec<ProcessorEntry<dyn ConfigProcessor>>>,
    instance_processors: RwLock<Vec<ProcessorEntry<dyn InstanceProcessor>>>,
    finalized: AtomicBool,
}

/// Registry of type declarations and processors
///
/// Declare entries, call [`finalize`](Self::finalize), then inject. Adding
/// an entry after finalization clears the finalized flag until the next
/// `finalize()`, which only offers the new entries to configuration processors.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Component, Config, Injectable, Parameters, DiResult};
///
/// struct Settings;
/// impl Component for Settings {}
/// impl Injectable for Settings {
///     fn create(_: &Parameters) -> DiResult<Self> { Ok(Settings) }
/// }
///
/// # async fn example() -> DiResult<()> {
/// let config = Config::new();
/// config.add_singleton::<Settings>();
/// assert!(!config.is_finalized());
///
/// config.finalize().await?;
/// assert!(config.is_finalized());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Config {
    inner: Arc<ConfigInner>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates a registry with the built-in [`PostConstructProcessor`] as its
    /// first instance processor.
    pub fn new() -> Self {
        let config = Self::empty();
        config.add_instance_processor::<PostConstructProcessor>();
        config
    }

    /// Creates a registry with no declarations and no processors.
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(ConfigInner {
                types: RwLock::new(IndexMap::new()),
                config_processors: RwLock::new(Vec::new()),
                instance_processors: RwLock::new(Vec::new()),
                finalized: AtomicBool::new(false),
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<ConfigInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(inner: &Weak<ConfigInner>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    // ----- Type declarations -----

    /// Declares `T` as a singleton under `T::type_key()`.
    pub fn add_singleton<T: Injectable>(&self) -> &Self {
        self.add_declared::<T>(T::type_key(), Lifecycle::Singleton)
    }

    pub fn add_named_singleton<T: Injectable>(&self, name: impl Into<String>) -> &Self {
        self.add_declared::<T>(name, Lifecycle::Singleton)
    }

    /// Declares `T` as a prototype under `T::type_key()`.
    pub fn add_prototype<T: Injectable>(&self) -> &Self {
        self.add_declared::<T>(T::type_key(), Lifecycle::Prototype)
    }

    pub fn add_named_prototype<T: Injectable>(&self, name: impl Into<String>) -> &Self {
        self.add_declared::<T>(name, Lifecycle::Prototype)
    }

    /// Declares a pool of `size` instances of `T`, constructed immediately.
    pub fn add_pool<T: Injectable>(&self, size: usize) -> DiResult<&Self> {
        self.add_named_pool::<T>(T::type_key(), size)
    }

    pub fn add_named_pool<T: Injectable>(&self, name: impl Into<String>, size: usize) -> DiResult<&Self> {
        let type_config = TypeConfig::of::<T>(name, Lifecycle::Pool(size))?;
        Ok(self.add_type_config(type_config))
    }

    /// Declares `T` with a policy given by name (`singleton`, `prototype` or
    /// `pool`). `pool_size` is only read for pools and defaults to 1.
    ///
    /// ```rust
    /// use ferrous_inject::{Component, Config, Injectable, Parameters, DiError, DiResult};
    ///
    /// struct Worker;
    /// impl Component for Worker {}
    /// impl Injectable for Worker {
    ///     fn create(_: &Parameters) -> DiResult<Self> { Ok(Worker) }
    /// }
    ///
    /// let config = Config::empty();
    /// assert!(config.add_with_policy::<Worker>(Some("workers"), "pool", Some(4)).is_ok());
    /// assert_eq!(
    ///     config.add_with_policy::<Worker>(None, "per-thread", None).err(),
    ///     Some(DiError::UnknownPolicy("per-thread".to_string()))
    /// );
    /// ```
    pub fn add_with_policy<T: Injectable>(
        &self,
        name: Option<&str>,
        policy: &str,
        pool_size: Option<usize>,
    ) -> DiResult<&Self> {
        let lifecycle = match policy.parse::<Lifecycle>() {
            Ok(Lifecycle::Pool(_)) => Lifecycle::Pool(pool_size.unwrap_or(1)),
            Ok(lifecycle) => lifecycle,
            Err(err) => {
                tracing::error!(policy, "unknown lifecycle policy");
                return Err(err);
            }
        };
        let type_config = TypeConfig::of::<T>(name.unwrap_or(T::type_key()), lifecycle)?;
        Ok(self.add_type_config(type_config))
    }

    /// Declares a singleton built by a closure.
    pub fn add_singleton_factory<F>(&self, name: impl Into<String>, factory: F) -> &Self
    where
        F: Fn(&Parameters) -> DiResult<Instance> + Send + Sync + 'static,
    {
        self.add_factory(name, Lifecycle::Singleton, Arc::new(factory))
    }

    /// Declares a prototype built by a closure.
    pub fn add_prototype_factory<F>(&self, name: impl Into<String>, factory: F) -> &Self
    where
        F: Fn(&Parameters) -> DiResult<Instance> + Send + Sync + 'static,
    {
        self.add_factory(name, Lifecycle::Prototype, Arc::new(factory))
    }

    /// Declares a pool built by a closure.
    pub fn add_pool_factory<F>(&self, name: impl Into<String>, size: usize, factory: F) -> DiResult<&Self>
    where
        F: Fn(&Parameters) -> DiResult<Instance> + Send + Sync + 'static,
    {
        let type_config = TypeConfig::new(name, "closure", Lifecycle::Pool(size), Arc::new(factory))?;
        Ok(self.add_type_config(type_config))
    }

    fn add_factory(&self, name: impl Into<String>, lifecycle: Lifecycle, factory: Factory) -> &Self {
        self.add_type_config(TypeConfig::lazy(name.into(), "closure", lifecycle, factory))
    }

    fn add_declared<T: Injectable>(&self, name: impl Into<String>, lifecycle: Lifecycle) -> &Self {
        self.add_type_config(TypeConfig::lazy(
            name.into(),
            std::any::type_name::<T>(),
            lifecycle,
            factory_of::<T>(),
        ))
    }

    /// Inserts a prepared declaration, replacing any entry of the same name.
    pub fn add_type_config(&self, type_config: TypeConfig) -> &Self {
        self.insert(Arc::new(type_config));
        self
    }

    fn insert(&self, type_config: Arc<TypeConfig>) {
        let name = type_config.name().to_string();
        tracing::debug!(name = %name, lifecycle = %type_config.lifecycle(), "type declared");
        if self.inner.types.write().insert(name.clone(), type_config).is_some() {
            tracing::warn!(name = %name, "type declaration replaced");
        }
        self.inner.finalized.store(false, Ordering::Release);
    }

    // ----- Processors -----

    /// Appends `P` to the configuration-processor list and declares it as a
    /// singleton, so it is wired before it runs.
    pub fn add_config_processor<P: ConfigProcessor + Injectable>(&self) -> &Self {
        self.add_singleton::<P>();
        let entry = ProcessorEntry {
            name: P::type_key().to_string(),
            cast: cast_config_processor::<P>,
        };
        push_unique(&mut self.inner.config_processors.write(), entry);
        self
    }

    /// Appends `P` to the instance-processor list and declares it as a singleton.
    pub fn add_instance_processor<P: InstanceProcessor + Injectable>(&self) -> &Self {
        self.add_singleton::<P>();
        let entry = ProcessorEntry {
            name: P::type_key().to_string(),
            cast: cast_instance_processor::<P>,
        };
        push_unique(&mut self.inner.instance_processors.write(), entry);
        self
    }

    pub fn config_processors(&self) -> Vec<ProcessorEntry<dyn ConfigProcessor>> {
        self.inner.config_processors.read().clone()
    }

    pub fn instance_processors(&self) -> Vec<ProcessorEntry<dyn InstanceProcessor>> {
        self.inner.instance_processors.read().clone()
    }

    // ----- Merge -----

    /// Unions `other`'s declarations and processor lists into this registry.
    ///
    /// Own entries keep their position; `other`'s follow. A name present in
    /// both takes `other`'s declaration. `other` must be finalized.
    pub fn merge(&self, other: &Config) -> DiResult<&Self> {
        if !other.is_finalized() {
            tracing::error!("refusing to merge an unfinalized registry");
            return Err(DiError::NotFinalized);
        }
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return Ok(self);
        }

        for type_config in other.type_configs() {
            self.insert(type_config);
        }
        {
            let mut own = self.inner.config_processors.write();
            for entry in other.config_processors() {
                push_unique(&mut own, entry);
            }
        }
        {
            let mut own = self.inner.instance_processors.write();
            for entry in other.instance_processors() {
                push_unique(&mut own, entry);
            }
        }
        tracing::debug!(types = self.len(), "registries merged");
        Ok(self)
    }

    // ----- Finalization -----

    /// Runs the configuration-processor pipeline, wires pending pool members,
    /// and marks the registry finalized.
    ///
    /// A no-op when already finalized. On error the registry stays unfinalized.
    pub async fn finalize(&self) -> DiResult<()> {
        self.finalize_with(&Injector::default()).await
    }

    /// Like [`finalize`](Self::finalize), wiring processors and pool members
    /// with `injector`.
    pub async fn finalize_with(&self, injector: &Injector) -> DiResult<()> {
        if self.is_finalized() {
            tracing::debug!("registry already finalized");
            return Ok(());
        }

        let processors = self.config_processors();
        ConfigProcessorExecutor::execute(&processors, injector, self).await?;

        // entries declared by the last processor have no one left to see them
        let late = self.claim_unconfigured().len();
        if late > 0 {
            tracing::debug!(count = late, "declarations configured without a processor");
        }

        for type_config in self.type_configs() {
            let members = type_config.unwired_members();
            if members.is_empty() {
                continue;
            }
            for member in members {
                injector.wire(member, self, 0).await?;
            }
            type_config.mark_wired();
        }

        self.inner.finalized.store(true, Ordering::Release);
        tracing::info!(types = self.len(), processors = processors.len(), "registry finalized");
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.inner.finalized.load(Ordering::Acquire)
    }

    /// Every declaration still in stage `New`, each flipped to `Configured`
    /// before it is returned.
    pub(crate) fn claim_unconfigured(&self) -> Vec<Arc<TypeConfig>> {
        let types = self.inner.types.read();
        types
            .values()
            .filter(|type_config| type_config.claim())
            .cloned()
            .collect()
    }

    // ----- Lookup -----

    /// Looks up `name` and resolves it through its policy.
    ///
    /// The single resolution choke point for the injector and providers.
    pub fn instance_holder_for(&self, name: &str, parameters: &Parameters) -> DiResult<InstanceHolder> {
        let type_config = self.type_config(name).ok_or_else(|| {
            tracing::error!(name, "no type config registered");
            DiError::UnknownTypeConfig(name.to_string())
        })?;
        type_config.resolve(parameters).map_err(|err| {
            tracing::error!(name, error = %err, "resolution failed");
            err
        })
    }

    pub fn type_config(&self, name: &str) -> Option<Arc<TypeConfig>> {
        self.inner.types.read().get(name).cloned()
    }

    /// Declarations in insertion order.
    pub fn type_configs(&self) -> Vec<Arc<TypeConfig>> {
        self.inner.types.read().values().cloned().collect()
    }

    pub fn descriptors(&self) -> Vec<TypeDescriptor> {
        self.inner.types.read().values().map(|tc| tc.descriptor()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.types.read().contains_key(name)
    }

    /// Number of declarations still waiting for a configuration pass.
    pub fn unconfigured_count(&self) -> usize {
        self.inner
            .types
            .read()
            .values()
            .filter(|tc| tc.stage() == Stage::New)
            .count()
    }

    pub fn len(&self) -> usize {
        self.inner.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.types.read().is_empty()
    }
}

fn push_unique<P: ?Sized>(entries: &mut Vec<ProcessorEntry<P>>, entry: ProcessorEntry<P>) {
    if !entries.iter().any(|existing| existing.name == entry.name) {
        entries.push(entry);
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("types", &self.len())
            .field("config_processors", &self.inner.config_processors.read().len())
            .field("instance_processors", &self.inner.instance_processors.read().len())
            .field("finalized", &self.is_finalized())
            .finish()
    }
}
