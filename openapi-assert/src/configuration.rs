//! Configuration of the assertions, read from the environment.

use anyhow::Context;
use config::Source;
use serde::Deserialize;
use std::path::PathBuf;

use crate::StdResult;

/// Assertions configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssertionConfiguration {
    /// Directory where the compiled validators artifacts are persisted between runs.
    ///
    /// No persistent cache is used if not set.
    #[serde(default)]
    pub validator_cache_directory: Option<PathBuf>,

    /// If set, the persisted artifacts are removed when the assertions are built.
    #[serde(default)]
    pub reset_validator_cache: bool,
}

impl AssertionConfiguration {
    /// Prefix of the environment variables read by [Self::load_from_environment], ie:
    /// `OPENAPI_ASSERT_VALIDATOR_CACHE_DIRECTORY`.
    pub const ENVIRONMENT_PREFIX: &'static str = "OPENAPI_ASSERT";

    /// Read the configuration from the `OPENAPI_ASSERT_*` environment variables.
    pub fn load_from_environment() -> StdResult<Self> {
        Self::load_from_source(config::Environment::with_prefix(Self::ENVIRONMENT_PREFIX))
    }

    /// Read the configuration from the given source.
    pub fn load_from_source<T>(source: T) -> StdResult<Self>
    where
        T: Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(source)
            .build()
            .with_context(|| "Could not build OpenAPI assertions configuration")?
            .try_deserialize()
            .with_context(|| "Could not deserialize OpenAPI assertions configuration")
    }
}
