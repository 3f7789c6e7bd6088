use anyhow::Context;
use slog::{Logger, info};
use std::path::Path;

use crate::StdResult;
use crate::cache::JsonFileValidatorCache;
use crate::logging::{LoggerExtensions, discard_logger};

/// A [JsonFileValidatorCache] builder.
pub struct JsonFileValidatorCacheBuilder<'a> {
    cache_dir: &'a Path,
    ensure_dir_exist: bool,
    reset_cache: bool,
    logger: Logger,
}

impl<'a> JsonFileValidatorCacheBuilder<'a> {
    /// [JsonFileValidatorCacheBuilder] factory.
    pub fn new(cache_dir: &'a Path) -> Self {
        Self {
            cache_dir,
            ensure_dir_exist: false,
            reset_cache: false,
            logger: discard_logger(),
        }
    }

    /// If set will create the cache directory if it doesn't already exist.
    pub fn ensure_dir_exist(&mut self) -> &mut Self {
        self.ensure_dir_exist = true;
        self
    }

    /// Set if existing cached values must be removed.
    pub fn should_reset_cache(&mut self, should_reset: bool) -> &mut Self {
        self.reset_cache = should_reset;
        self
    }

    /// Set the [Logger] to use.
    pub fn with_logger(&mut self, logger: &Logger) -> &mut Self {
        self.logger = logger.new_with_component_name::<Self>();
        self
    }

    /// Build a [JsonFileValidatorCache] based on the parameters previously set.
    pub fn build(&self) -> StdResult<JsonFileValidatorCache> {
        if self.ensure_dir_exist {
            std::fs::create_dir_all(self.cache_dir).with_context(|| {
                format!(
                    "Failure when creating validator cache directory `{}`",
                    self.cache_dir.display(),
                )
            })?;
        }

        let cache = JsonFileValidatorCache::new(self.cache_dir);

        if self.reset_cache {
            cache.reset().with_context(|| {
                format!(
                    "Failure when resetting validator cache directory `{}`",
                    self.cache_dir.display(),
                )
            })?;
        }

        info!(
            self.logger,
            "Storing/Getting compiled validators artifacts from: {}",
            self.cache_dir.display()
        );

        Ok(cache)
    }
}
