//! Injection points and the slots consumers embed in their fields.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::parameters::Parameters;
use crate::provider::Provider;
use crate::traits::{downcast, Component, Injectable, Instance};

/// What a slot receives once wired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionKind {
    /// The resolved instance itself
    Instance,
    /// A lazy [`Provider`] resolving on demand
    Provider,
}

/// Declaration of a dependency
///
/// Pure data: building one never touches a registry. The registry name
/// defaults to the requested type's [`Injectable::type_key`].
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Component, InjectionPoint, InjectionKind, Injectable, Parameters, DiResult};
///
/// struct Connection;
/// impl Component for Connection {}
/// impl Injectable for Connection {
///     fn type_key() -> &'static str { "connection" }
///     fn create(_: &Parameters) -> DiResult<Self> { Ok(Connection) }
/// }
///
/// let by_type = InjectionPoint::instance::<Connection>();
/// assert_eq!(by_type.name(), "connection");
/// assert_eq!(by_type.kind(), InjectionKind::Instance);
///
/// let lazy = InjectionPoint::provider_by_name::<Connection>("replica");
/// assert_eq!(lazy.name(), "replica");
/// assert_eq!(lazy.kind(), InjectionKind::Provider);
/// ```
#[derive(Debug, Clone)]
pub struct InjectionPoint {
    name: String,
    type_name: &'static str,
    kind: InjectionKind,
    parameters: Parameters,
}

impl InjectionPoint {
    /// Instance of `T`, looked up under `T::type_key()`.
    pub fn instance<T: Injectable>() -> Self {
        Self::build::<T>(T::type_key(), InjectionKind::Instance, Parameters::new())
    }

    /// Instance registered under `name`, constructed with `parameters` when
    /// the declaration is a prototype.
    pub fn instance_by_name<T: Component>(name: impl Into<String>, parameters: Parameters) -> Self {
        Self::build::<T>(name, InjectionKind::Instance, parameters)
    }

    /// Provider for `T`, looked up under `T::type_key()`.
    pub fn provider<T: Injectable>() -> Self {
        Self::build::<T>(T::type_key(), InjectionKind::Provider, Parameters::new())
    }

    /// Provider for the declaration registered under `name`.
    pub fn provider_by_name<T: Component>(name: impl Into<String>) -> Self {
        Self::build::<T>(name, InjectionKind::Provider, Parameters::new())
    }

    fn build<T: Component>(name: impl Into<String>, kind: InjectionKind, parameters: Parameters) -> Self {
        Self {
            name: name.into(),
            type_name: std::any::type_name::<T>(),
            kind,
            parameters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rust type the point was declared for.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn kind(&self) -> InjectionKind {
        self.kind
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

/// Value a slot holds after wiring
#[derive(Clone)]
pub enum Wired {
    Instance(Instance),
    Provider(Provider),
}

/// A dependency slot embedded in a consumer's struct
///
/// Starts out holding only its [`InjectionPoint`]. The injector fills it
/// exactly once; later injections of the same consumer skip it.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Component, Inject, InjectionPoint, Injectable, Parameters, DiResult};
///
/// struct Mailer;
/// impl Component for Mailer {}
/// impl Injectable for Mailer {
///     fn create(_: &Parameters) -> DiResult<Self> { Ok(Mailer) }
/// }
///
/// let slot: Inject = InjectionPoint::instance::<Mailer>().into();
/// assert!(!slot.is_wired());
/// assert!(slot.get::<Mailer>().is_none());
/// ```
pub struct Inject {
    point: InjectionPoint,
    wired: OnceCell<Wired>,
}

impl Inject {
    pub fn new(point: InjectionPoint) -> Self {
        Self {
            point,
            wired: OnceCell::new(),
        }
    }

    pub fn point(&self) -> &InjectionPoint {
        &self.point
    }

    pub fn is_wired(&self) -> bool {
        self.wired.get().is_some()
    }

    pub fn wired(&self) -> Option<&Wired> {
        self.wired.get()
    }

    /// The injected instance, if this slot was wired with one.
    pub fn instance(&self) -> Option<&Instance> {
        match self.wired.get() {
            Some(Wired::Instance(instance)) => Some(instance),
            _ => None,
        }
    }

    /// The injected instance as `T`; `None` when unwired, wired with a
    /// provider, or holding another type.
    pub fn get<T: Component>(&self) -> Option<Arc<T>> {
        self.instance().and_then(|instance| downcast::<T>(instance).ok())
    }

    /// The injected provider, if this slot was declared with provider kind.
    pub fn provider(&self) -> Option<&Provider> {
        match self.wired.get() {
            Some(Wired::Provider(provider)) => Some(provider),
            _ => None,
        }
    }

    /// Stores the wired value. Returns `false` if the slot was already filled.
    pub(crate) fn fill(&self, value: Wired) -> bool {
        self.wired.set(value).is_ok()
    }
}

impl From<InjectionPoint> for Inject {
    fn from(point: InjectionPoint) -> Self {
        Self::new(point)
    }
}

impl fmt::Debug for Inject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("point", &self.point)
            .field("wired", &self.is_wired())
            .finish()
    }
}
