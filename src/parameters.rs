//! Constructor parameters passed through resolution.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};

/// Ordered, type-erased constructor arguments
///
/// Only prototype declarations construct with caller-supplied parameters;
/// singletons use whatever the first resolution passed, and pool members are
/// always built with an empty list.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::Parameters;
///
/// let params = Parameters::new().with(8080u16).with("localhost".to_string());
/// assert_eq!(params.len(), 2);
/// assert_eq!(*params.get::<u16>(0).unwrap(), 8080);
/// assert_eq!(params.get::<String>(1).unwrap(), "localhost");
/// assert!(params.get::<u32>(0).is_err());
/// ```
#[derive(Clone, Default)]
pub struct Parameters {
    values: Vec<Arc<dyn Any + Send + Sync>>,
}

impl Parameters {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Appends a value.
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.values.push(Arc::new(value));
        self
    }

    /// Appends a value in place.
    pub fn push<T: Any + Send + Sync>(&mut self, value: T) {
        self.values.push(Arc::new(value));
    }

    /// Typed access to the value at `index`.
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> DiResult<&T> {
        self.values
            .get(index)
            .and_then(|v| v.downcast_ref::<T>())
            .ok_or(DiError::InvalidParameter {
                index,
                expected: std::any::type_name::<T>(),
            })
    }

    /// Like [`get`](Self::get), but a missing or mistyped value yields `None`.
    pub fn get_opt<T: Any + Send + Sync>(&self, index: usize) -> Option<&T> {
        self.values.get(index).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameters").field("len", &self.values.len()).finish()
    }
}
