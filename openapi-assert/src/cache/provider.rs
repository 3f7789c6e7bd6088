use crate::StdResult;

/// A key-value store of compilation artifacts.
#[cfg_attr(test, mockall::automock)]
pub trait ValidatorCache: Send + Sync {
    /// Get the value stored for the given key, if any.
    fn get(&self, key: &str) -> StdResult<Option<Vec<u8>>>;

    /// Store a value, replacing the previous one for this key.
    fn set(&self, key: &str, value: Vec<u8>) -> StdResult<()>;
}
