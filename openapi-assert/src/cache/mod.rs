//! Persistent storage of costly artifacts produced when compiling validators, allowing to reuse
//! them across test runs.

mod json_file_provider;
mod json_file_provider_builder;
mod memory_provider;
mod provider;

pub use json_file_provider::JsonFileValidatorCache;
pub use json_file_provider_builder::JsonFileValidatorCacheBuilder;
pub use memory_provider::MemoryValidatorCache;
#[cfg(test)]
pub use provider::MockValidatorCache;
pub use provider::ValidatorCache;
