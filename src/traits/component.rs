//! Component traits implemented by injectable types.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{DiError, DiResult};
use crate::injection::Inject;
use crate::parameters::Parameters;

/// A resolved, type-erased component instance.
pub type Instance = Arc<dyn Component>;

/// Upcasting helpers so `dyn Component` can be downcast to its concrete type.
///
/// Implemented for every `Any + Send + Sync` type; there is no reason to
/// implement it by hand.
pub trait AsAny: Any + Send + Sync {
    /// Borrow as `dyn Any`.
    fn as_any(&self) -> &(dyn Any + Send + Sync);
    /// Convert an `Arc` of this value into `Arc<dyn Any>`.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Object-safe base trait of everything the container wires.
///
/// A component exposes its own dependency slots through
/// [`injection_points`](Self::injection_points). The injector walks them in
/// the returned order, fills each one, and then runs the instance processors
/// on the component. The built-in
/// [`PostConstructProcessor`](crate::PostConstructProcessor) calls
/// [`post_construct`](Self::post_construct) at that point.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Component, Inject, InjectionPoint, Injectable, Parameters, DiResult};
///
/// struct Clock;
/// impl Component for Clock {}
/// impl Injectable for Clock {
///     fn create(_: &Parameters) -> DiResult<Self> { Ok(Clock) }
/// }
///
/// struct Scheduler {
///     clock: Inject,
/// }
///
/// impl Component for Scheduler {
///     fn injection_points(&self) -> Vec<(&'static str, &Inject)> {
///         vec![("clock", &self.clock)]
///     }
/// }
///
/// let scheduler = Scheduler { clock: InjectionPoint::instance::<Clock>().into() };
/// assert_eq!(scheduler.injection_points().len(), 1);
/// ```
#[async_trait]
pub trait Component: AsAny {
    /// The component's own dependency slots, in wiring order.
    fn injection_points(&self) -> Vec<(&'static str, &Inject)> {
        Vec::new()
    }

    /// Post-construction hook, run once after the component is fully wired.
    async fn post_construct(&self) -> DiResult<()> {
        Ok(())
    }
}

/// A component type that can be registered by type.
///
/// `type_key` is the default registry name; `create` is the factory captured
/// at registration time and receives the resolution's parameters.
pub trait Injectable: Component + Sized {
    /// Default registry name for this type.
    fn type_key() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Builds a new, unwired instance.
    fn create(parameters: &Parameters) -> DiResult<Self>;
}

/// Downcasts a resolved instance to its concrete type.
///
/// ```rust
/// use ferrous_inject::{downcast, Component, Instance};
/// use std::sync::Arc;
///
/// struct Cache;
/// impl Component for Cache {}
///
/// struct Queue;
/// impl Component for Queue {}
///
/// let instance: Instance = Arc::new(Cache);
/// assert!(downcast::<Cache>(&instance).is_ok());
/// assert!(downcast::<Queue>(&instance).is_err());
/// ```
pub fn downcast<T: Component>(instance: &Instance) -> DiResult<Arc<T>> {
    AsAny::into_any(Arc::clone(instance))
        .downcast::<T>()
        .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>().to_string()))
}
