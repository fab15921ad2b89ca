//! Type declarations and their lifecycle policies.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::descriptors::TypeDescriptor;
use crate::error::{DiError, DiResult};
use crate::holder::InstanceHolder;
use crate::lifetime::{Lifecycle, Stage};
use crate::parameters::Parameters;
use crate::traits::{Injectable, Instance};

/// Constructor captured at registration time.
pub type Factory = Arc<dyn Fn(&Parameters) -> DiResult<Instance> + Send + Sync>;

/// Builds the factory for an [`Injectable`] type.
pub(crate) fn factory_of<T: Injectable>() -> Factory {
    Arc::new(|parameters: &Parameters| -> DiResult<Instance> {
        Ok(Arc::new(T::create(parameters)?))
    })
}

enum Policy {
    Singleton {
        factory: Factory,
        cached: Mutex<Option<Instance>>,
    },
    Prototype {
        factory: Factory,
    },
    Pool {
        members: Vec<Instance>,
        cursor: Mutex<usize>,
        wired: AtomicBool,
    },
}

/// A registry entry binding a name to a factory and a lifecycle policy
///
/// Owned by the registry behind an `Arc`; singleton and pool instances live
/// as long as the declaration does.
pub struct TypeConfig {
    name: String,
    type_name: &'static str,
    lifecycle: Lifecycle,
    stage: Mutex<Stage>,
    policy: Policy,
}

impl TypeConfig {
    /// Creates a declaration. Pool members are constructed here, with empty
    /// parameters; a failing member construction fails the declaration.
    pub fn new(
        name: impl Into<String>,
        type_name: &'static str,
        lifecycle: Lifecycle,
        factory: Factory,
    ) -> DiResult<Self> {
        let name = name.into();
        let size = match lifecycle {
            Lifecycle::Pool(size) => size,
            _ => return Ok(Self::lazy(name, type_name, lifecycle, factory)),
        };

        let empty = Parameters::new();
        let members = (0..size)
            .map(|_| factory(&empty))
            .collect::<DiResult<Vec<_>>>()?;
        tracing::debug!(name = %name, size, "pool members constructed");

        Ok(Self::with_policy(
            name,
            type_name,
            lifecycle,
            Policy::Pool {
                members,
                cursor: Mutex::new(0),
                wired: AtomicBool::new(false),
            },
        ))
    }

    /// Singleton or prototype declaration; nothing is constructed yet.
    /// A pool lifecycle passed here is treated as a prototype.
    pub(crate) fn lazy(name: String, type_name: &'static str, lifecycle: Lifecycle, factory: Factory) -> Self {
        match lifecycle {
            Lifecycle::Singleton => Self::with_policy(
                name,
                type_name,
                lifecycle,
                Policy::Singleton {
                    factory,
                    cached: Mutex::new(None),
                },
            ),
            _ => Self::with_policy(name, type_name, Lifecycle::Prototype, Policy::Prototype { factory }),
        }
    }

    fn with_policy(name: String, type_name: &'static str, lifecycle: Lifecycle, policy: Policy) -> Self {
        Self {
            name,
            type_name,
            lifecycle,
            stage: Mutex::new(Stage::New),
            policy,
        }
    }

    /// Declaration for an [`Injectable`] type.
    pub fn of<T: Injectable>(name: impl Into<String>, lifecycle: Lifecycle) -> DiResult<Self> {
        Self::new(name, std::any::type_name::<T>(), lifecycle, factory_of::<T>())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rust type behind the declaration, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn stage(&self) -> Stage {
        *self.stage.lock()
    }

    /// Resolves an instance according to the policy.
    ///
    /// - Singleton: constructs on first call (tagged new), then hands out the
    ///   cached instance (tagged existing). The instance is cached before it
    ///   is wired so cycles through it terminate; a failed wiring evicts it.
    /// - Prototype: constructs with `parameters` every time (tagged new).
    /// - Pool: returns the member at the cursor (tagged existing) and advances
    ///   the cursor, wrapping after the last member.
    pub fn resolve(&self, parameters: &Parameters) -> DiResult<InstanceHolder> {
        match &self.policy {
            Policy::Singleton { factory, cached } => {
                let mut cached = cached.lock();
                match cached.as_ref() {
                    Some(instance) => Ok(InstanceHolder::existing(Arc::clone(instance))),
                    None => {
                        let instance = factory(parameters)?;
                        *cached = Some(Arc::clone(&instance));
                        Ok(InstanceHolder::new_instance(instance))
                    }
                }
            }
            Policy::Prototype { factory } => Ok(InstanceHolder::new_instance(factory(parameters)?)),
            Policy::Pool { members, cursor, .. } => {
                if members.is_empty() {
                    return Err(DiError::ResolutionFailed(self.name.clone()));
                }
                let mut cursor = cursor.lock();
                let instance = Arc::clone(&members[*cursor]);
                *cursor = (*cursor + 1) % members.len();
                Ok(InstanceHolder::existing(instance))
            }
        }
    }

    /// Whether a singleton has been constructed; pools always are.
    pub fn is_instantiated(&self) -> bool {
        match &self.policy {
            Policy::Singleton { cached, .. } => cached.lock().is_some(),
            Policy::Prototype { .. } => false,
            Policy::Pool { .. } => true,
        }
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor {
            name: self.name.clone(),
            type_name: self.type_name,
            lifecycle: self.lifecycle,
            stage: self.stage(),
        }
    }

    /// Flips `New` to `Configured`. Returns `true` only for the caller that
    /// performed the transition.
    pub(crate) fn claim(&self) -> bool {
        let mut stage = self.stage.lock();
        match *stage {
            Stage::New => {
                *stage = Stage::Configured;
                true
            }
            Stage::Configured => false,
        }
    }

    /// Pool members that still need wiring; empty once [`mark_wired`](Self::mark_wired)
    /// has been called.
    pub(crate) fn unwired_members(&self) -> Vec<Instance> {
        match &self.policy {
            Policy::Pool { members, wired, .. } if !wired.load(Ordering::Acquire) => members.clone(),
            _ => Vec::new(),
        }
    }

    /// Records that every pool member was wired successfully.
    pub(crate) fn mark_wired(&self) {
        if let Policy::Pool { wired, .. } = &self.policy {
            wired.store(true, Ordering::Release);
        }
    }

    /// Drops a cached singleton whose wiring failed, so the next resolution
    /// constructs it again. Another cached instance is left alone.
    pub(crate) fn evict(&self, instance: &Instance) -> bool {
        match &self.policy {
            Policy::Singleton { cached, .. } => {
                let mut cached = cached.lock();
                if cached.as_ref().is_some_and(|current| Arc::ptr_eq(current, instance)) {
                    *cached = None;
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}

impl fmt::Debug for TypeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeConfig")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("lifecycle", &self.lifecycle)
            .field("stage", &self.stage())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holder::HolderKind;
    use crate::traits::Component;
    use std::sync::atomic::AtomicUsize;

    fn counting_factory(counter: Arc<AtomicUsize>) -> Factory {
        struct Counted(#[allow(dead_code)] usize);
        impl Component for Counted {}

        Arc::new(move |_: &Parameters| -> DiResult<Instance> {
            Ok(Arc::new(Counted(counter.fetch_add(1, Ordering::SeqCst))))
        })
    }

    #[test]
    fn singleton_is_new_once_then_existing() {
        let counter = Arc::new(AtomicUsize::new(0));
        let tc = TypeConfig::new("s", "Counted", Lifecycle::Singleton, counting_factory(counter.clone())).unwrap();
        assert!(!tc.is_instantiated());

        let first = tc.resolve(&Parameters::new()).unwrap();
        let second = tc.resolve(&Parameters::new()).unwrap();
        assert_eq!(first.kind, HolderKind::New);
        assert_eq!(second.kind, HolderKind::Existing);
        assert!(Arc::ptr_eq(&first.instance, &second.instance));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn pool_cursor_wraps() {
        let counter = Arc::new(AtomicUsize::new(0));
        let tc = TypeConfig::new("p", "Counted", Lifecycle::Pool(3), counting_factory(counter.clone())).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 3);

        let picks: Vec<_> = (0..4).map(|_| tc.resolve(&Parameters::new()).unwrap()).collect();
        assert!(picks.iter().all(|h| h.kind == HolderKind::Existing));
        assert!(Arc::ptr_eq(&picks[0].instance, &picks[3].instance));
        assert!(!Arc::ptr_eq(&picks[0].instance, &picks[1].instance));
        assert!(!Arc::ptr_eq(&picks[1].instance, &picks[2].instance));
    }

    #[test]
    fn empty_pool_fails_resolution() {
        let tc = TypeConfig::new("empty", "Counted", Lifecycle::Pool(0), counting_factory(Arc::default())).unwrap();
        assert_eq!(
            tc.resolve(&Parameters::new()).unwrap_err(),
            DiError::ResolutionFailed("empty".to_string())
        );
    }

    #[test]
    fn claim_happens_once() {
        let tc = TypeConfig::new("c", "Counted", Lifecycle::Prototype, counting_factory(Arc::default())).unwrap();
        assert_eq!(tc.stage(), Stage::New);
        assert!(tc.claim());
        assert!(!tc.claim());
        assert_eq!(tc.stage(), Stage::Configured);
    }

    #[test]
    fn pool_members_stay_unwired_until_marked() {
        let tc = TypeConfig::new("p", "Counted", Lifecycle::Pool(2), counting_factory(Arc::default())).unwrap();
        assert_eq!(tc.unwired_members().len(), 2);
        assert_eq!(tc.unwired_members().len(), 2);
        tc.mark_wired();
        assert!(tc.unwired_members().is_empty());
    }

    #[test]
    fn evict_only_drops_the_matching_singleton() {
        let counter = Arc::new(AtomicUsize::new(0));
        let tc = TypeConfig::new("s", "Counted", Lifecycle::Singleton, counting_factory(counter.clone())).unwrap();
        let first = tc.resolve(&Parameters::new()).unwrap().instance;

        let stranger = counting_factory(Arc::default())(&Parameters::new()).unwrap();
        assert!(!tc.evict(&stranger));
        assert!(tc.evict(&first));
        assert!(!tc.is_instantiated());

        let second = tc.resolve(&Parameters::new()).unwrap();
        assert_eq!(second.kind, HolderKind::New);
        assert!(!Arc::ptr_eq(&first, &second.instance));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
