use crate::error::{DiError, DiResult};
use crate::injector::Injector;
use crate::registry::{Config, ProcessorEntry};
use crate::traits::ConfigProcessor;

use super::resolve_processor;

/// Runs configuration processors over unclaimed declarations
pub struct ConfigProcessorExecutor;

impl ConfigProcessorExecutor {
    /// Runs `processors` in order.
    ///
    /// Before each processor is invoked, every declaration still in stage
    /// `New` is flipped to `Configured` and handed to that processor alone.
    /// The first rejection aborts the run as
    /// [`DiError::ConfigProcessorFailure`]; later processors do not run.
    pub async fn execute(
        processors: &[ProcessorEntry<dyn ConfigProcessor>],
        injector: &Injector,
        config: &Config,
    ) -> DiResult<()> {
        for entry in processors {
            let processor = resolve_processor(entry, injector, config).await?;
            let unconfigured = config.claim_unconfigured();
            tracing::debug!(
                processor = entry.name(),
                unconfigured = unconfigured.len(),
                "running config processor"
            );

            if let Err(err) = processor.process_config(config, &unconfigured).await {
                tracing::error!(processor = entry.name(), error = %err, "config processor failed");
                return Err(DiError::ConfigProcessorFailure {
                    processor: entry.name().to_string(),
                    reason: err.to_string(),
                });
            }
        }
        Ok(())
    }
}
