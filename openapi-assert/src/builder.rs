//! Assembly of [OpenApiAssertions] and their collaborators.

use slog::{Logger, debug};
use std::sync::Arc;

use crate::StdResult;
use crate::assertions::OpenApiAssertions;
use crate::cache::{JsonFileValidatorCacheBuilder, ValidatorCache};
use crate::configuration::AssertionConfiguration;
use crate::failure_sink::{FailureSink, PanicFailureSink};
use crate::logging::{LoggerExtensions, discard_logger};
use crate::registry::ValidatorRegistry;
use crate::validator::SpecificationCompiler;
use crate::validator::openapi::OpenApiSpecificationCompiler;

/// Builder of [OpenApiAssertions].
///
/// Defaults to the OpenAPI compiler, no persistent cache, a panicking failure sink and a
/// discarding logger.
pub struct OpenApiAssertionsBuilder {
    compiler: Option<Arc<dyn SpecificationCompiler>>,
    validator_cache: Option<Arc<dyn ValidatorCache>>,
    failure_sink: Arc<dyn FailureSink>,
    logger: Logger,
}

impl OpenApiAssertionsBuilder {
    /// [OpenApiAssertionsBuilder] factory
    pub fn new() -> Self {
        Self {
            compiler: None,
            validator_cache: None,
            failure_sink: Arc::new(PanicFailureSink),
            logger: discard_logger(),
        }
    }

    /// Builder preconfigured with a persistent cache when the configuration asks for one.
    pub fn from_configuration(
        configuration: &AssertionConfiguration,
        logger: &Logger,
    ) -> StdResult<Self> {
        let mut builder = Self::new().with_logger(logger);

        if let Some(cache_dir) = &configuration.validator_cache_directory {
            let cache = JsonFileValidatorCacheBuilder::new(cache_dir)
                .ensure_dir_exist()
                .should_reset_cache(configuration.reset_validator_cache)
                .with_logger(logger)
                .build()?;
            builder = builder.with_validator_cache(Arc::new(cache));
        }

        Ok(builder)
    }

    /// Set the compiler producing the validators.
    pub fn with_compiler(mut self, compiler: Arc<dyn SpecificationCompiler>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Set the persistent cache given to the compiler.
    pub fn with_validator_cache(mut self, validator_cache: Arc<dyn ValidatorCache>) -> Self {
        self.validator_cache = Some(validator_cache);
        self
    }

    /// Set the sink receiving the failures.
    pub fn with_failure_sink(mut self, failure_sink: Arc<dyn FailureSink>) -> Self {
        self.failure_sink = failure_sink;
        self
    }

    /// Set the logger.
    pub fn with_logger(mut self, logger: &Logger) -> Self {
        self.logger = logger.clone();
        self
    }

    /// Build the [OpenApiAssertions].
    pub fn build(self) -> OpenApiAssertions {
        let logger = self.logger.new_with_component_name::<Self>();
        debug!(logger, "Building OpenAPI assertions"; "has_validator_cache" => self.validator_cache.is_some());

        let compiler = self
            .compiler
            .unwrap_or_else(|| Arc::new(OpenApiSpecificationCompiler::new(&self.logger)));
        let registry = Arc::new(ValidatorRegistry::new(
            compiler,
            self.validator_cache,
            &self.logger,
        ));

        OpenApiAssertions::new(registry, self.failure_sink, &self.logger)
    }
}

impl Default for OpenApiAssertionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
