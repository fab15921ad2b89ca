//! Tagged resolution result.

use crate::traits::Instance;

/// Whether a resolved instance still needs wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderKind {
    /// Freshly constructed; field injection and instance processing pending
    New,
    /// Already wired; must not be processed again
    Existing,
}

/// Instance returned by a type declaration's policy
#[derive(Clone)]
pub struct InstanceHolder {
    pub instance: Instance,
    pub kind: HolderKind,
}

impl InstanceHolder {
    pub fn new_instance(instance: Instance) -> Self {
        Self { instance, kind: HolderKind::New }
    }

    pub fn existing(instance: Instance) -> Self {
        Self { instance, kind: HolderKind::Existing }
    }

    pub fn is_new(&self) -> bool {
        self.kind == HolderKind::New
    }

    pub fn into_instance(self) -> Instance {
        self.instance
    }
}

impl std::fmt::Debug for InstanceHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceHolder").field("kind", &self.kind).finish_non_exhaustive()
    }
}
