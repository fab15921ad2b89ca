//! Internal implementation details.

use std::future::Future;
use std::pin::Pin;

/// Boxed `Send` future returned where async steps recurse.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
