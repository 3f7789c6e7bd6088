//! Process-lifetime cache of the compiled validators, by schema identifier.

use anyhow::Context;
use slog::{Logger, debug};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::StdResult;
use crate::cache::ValidatorCache;
use crate::entities::SchemaId;
use crate::http_adapter::HttpMessageAdapter;
use crate::logging::LoggerExtensions;
use crate::validator::{CompiledValidatorSet, SpecificationCompiler};

/// Registry of the [CompiledValidatorSet] of each document, compiled on first use.
///
/// A document is compiled at most once until [ValidatorRegistry::reset] is called, concurrent
/// callers asking for the same document only ever observe a fully built set.
pub struct ValidatorRegistry {
    compiler: Arc<dyn SpecificationCompiler>,
    persistent_cache: Option<Arc<dyn ValidatorCache>>,
    validator_sets: RwLock<HashMap<SchemaId, Arc<CompiledValidatorSet>>>,
    http_adapter: OnceLock<Arc<HttpMessageAdapter>>,
    logger: Logger,
}

impl ValidatorRegistry {
    /// [ValidatorRegistry] factory
    pub fn new(
        compiler: Arc<dyn SpecificationCompiler>,
        persistent_cache: Option<Arc<dyn ValidatorCache>>,
        logger: &Logger,
    ) -> Self {
        Self {
            compiler,
            persistent_cache,
            validator_sets: RwLock::new(HashMap::new()),
            http_adapter: OnceLock::new(),
            logger: logger.new_with_component_name::<Self>(),
        }
    }

    /// Get the validators of the given document, compiling them if needed.
    ///
    /// Compilation failures are not kept: the next call will try again.
    pub fn get_validators(&self, schema_id: &SchemaId) -> StdResult<Arc<CompiledValidatorSet>> {
        if let Some(validators) = self
            .validator_sets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(schema_id)
        {
            debug!(self.logger, "Validators found in registry"; "schema_id" => schema_id.as_str());
            return Ok(validators.clone());
        }

        let mut validator_sets = self
            .validator_sets
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // Another caller may have compiled the document while waiting for the lock
        if let Some(validators) = validator_sets.get(schema_id) {
            return Ok(validators.clone());
        }

        debug!(self.logger, "Validators not in registry, compiling them"; "schema_id" => schema_id.as_str());
        let validators = Arc::new(
            self.compiler
                .compile(schema_id, self.persistent_cache.clone())
                .with_context(|| format!("Could not compile validators of '{schema_id}'"))?,
        );
        validator_sets.insert(schema_id.clone(), validators.clone());

        Ok(validators)
    }

    /// Shared http message adapter, built on first use.
    pub fn http_adapter(&self) -> Arc<HttpMessageAdapter> {
        self.http_adapter
            .get_or_init(|| Arc::new(HttpMessageAdapter::new(&self.logger)))
            .clone()
    }

    /// Drop every compiled validator set.
    pub fn reset(&self) {
        debug!(self.logger, "Reset registry");
        self.validator_sets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of documents with compiled validators.
    pub fn compiled_schemas_count(&self) -> usize {
        self.validator_sets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
