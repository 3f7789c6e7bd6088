use anyhow::Context;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::StdResult;
use crate::cache::ValidatorCache;

const CACHE_FILE_EXTENSION: &str = "json";

/// A [ValidatorCache] storing each value in its own json file of a directory.
pub struct JsonFileValidatorCache {
    cache_dir: PathBuf,
}

impl JsonFileValidatorCache {
    /// [JsonFileValidatorCache] factory, the directory must exist.
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    /// Directory holding the cache files
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Remove every cache file of the directory.
    pub fn reset(&self) -> StdResult<()> {
        let entries = match std::fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(()),
            Err(error) => {
                return Err(error).with_context(|| {
                    format!("Could not list cache directory `{}`", self.cache_dir.display())
                });
            }
        };

        for entry in entries {
            let path = entry
                .with_context(|| {
                    format!("Could not list cache directory `{}`", self.cache_dir.display())
                })?
                .path();
            if path.extension().is_some_and(|ext| ext == CACHE_FILE_EXTENSION) {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Could not remove cache file `{}`", path.display()))?;
            }
        }

        Ok(())
    }

    fn file_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        self.cache_dir
            .join(format!("{file_name}.{CACHE_FILE_EXTENSION}"))
    }
}

impl ValidatorCache for JsonFileValidatorCache {
    fn get(&self, key: &str) -> StdResult<Option<Vec<u8>>> {
        let path = self.file_path(key);
        match std::fs::read(&path) {
            Ok(content) => Ok(Some(content)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error)
                .with_context(|| format!("Could not read cache file `{}`", path.display())),
        }
    }

    fn set(&self, key: &str, value: Vec<u8>) -> StdResult<()> {
        let path = self.file_path(key);
        std::fs::write(&path, value)
            .with_context(|| format!("Could not write cache file `{}`", path.display()))
    }
}
