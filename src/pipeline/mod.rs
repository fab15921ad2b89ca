//! The two ordered processing pipelines.
//!
//! Configuration processors run once per `finalize()` against the
//! declarations nobody has claimed yet; instance processors run against
//! every freshly wired instance. Both run their processors strictly one
//! after the other, each awaited before the next starts.

use std::sync::Arc;

use crate::error::DiResult;
use crate::injector::Injector;
use crate::parameters::Parameters;
use crate::registry::{Config, ProcessorEntry};

mod config;
mod instance;
mod post_construct;

pub use config::ConfigProcessorExecutor;
pub use instance::InstanceProcessorExecutor;
pub use post_construct::PostConstructProcessor;

/// Resolves a processor singleton, wiring it first if it was just created.
async fn resolve_processor<P: ?Sized>(
    entry: &ProcessorEntry<P>,
    injector: &Injector,
    config: &Config,
) -> DiResult<Arc<P>> {
    let holder = config.instance_holder_for(entry.name(), &Parameters::new())?;
    if holder.is_new() {
        tracing::debug!(processor = entry.name(), "wiring processor");
    }
    let instance = injector.complete(entry.name(), holder, config, 0).await?;
    (entry.cast)(&instance)
}
