use crate::error::DiResult;
use crate::injector::Injector;
use crate::registry::Config;
use crate::traits::Instance;

use super::resolve_processor;

/// Runs instance processors over a freshly wired instance
pub struct InstanceProcessorExecutor;

impl InstanceProcessorExecutor {
    /// Hands `instance` to every registered instance processor, in
    /// registration order. Errors propagate unchanged.
    pub async fn execute(instance: &Instance, injector: &Injector, config: &Config) -> DiResult<()> {
        for entry in config.instance_processors() {
            let processor = resolve_processor(&entry, injector, config).await?;
            processor.process(instance).await?;
        }
        Ok(())
    }
}
