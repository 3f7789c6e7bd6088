use anyhow::anyhow;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::StdResult;
use crate::cache::ValidatorCache;

/// A in memory [ValidatorCache], its content is lost when dropped.
#[derive(Default)]
pub struct MemoryValidatorCache {
    store: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryValidatorCache {
    /// Build a new [MemoryValidatorCache] that contains the given values.
    pub fn from(values: HashMap<String, Vec<u8>>) -> Self {
        Self {
            store: RwLock::new(values),
        }
    }
}

impl ValidatorCache for MemoryValidatorCache {
    fn get(&self, key: &str) -> StdResult<Option<Vec<u8>>> {
        let store = self
            .store
            .read()
            .map_err(|e| anyhow!("Memory validator cache lock poisoned: {e}"))?;

        Ok(store.get(key).cloned())
    }

    fn set(&self, key: &str, value: Vec<u8>) -> StdResult<()> {
        let mut store = self
            .store
            .write()
            .map_err(|e| anyhow!("Memory validator cache lock poisoned: {e}"))?;
        store.insert(key.to_string(), value);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_none_for_unknown_key() {
        let cache = MemoryValidatorCache::default();

        assert_eq!(None, cache.get("unknown").unwrap());
    }

    #[test]
    fn can_store_and_get_values() {
        let cache = MemoryValidatorCache::default();

        cache.set("key", b"value".to_vec()).unwrap();

        assert_eq!(Some(b"value".to_vec()), cache.get("key").unwrap());
    }

    #[test]
    fn set_erase_existing_value() {
        let cache = MemoryValidatorCache::from(HashMap::from([
            ("to-erase".to_string(), b"old".to_vec()),
            ("keep-me".to_string(), b"kept".to_vec()),
        ]));

        cache.set("to-erase", b"updated".to_vec()).unwrap();

        assert_eq!(Some(b"updated".to_vec()), cache.get("to-erase").unwrap());
        assert_eq!(Some(b"kept".to_vec()), cache.get("keep-me").unwrap());
    }
}
