use std::path::PathBuf;

const TEMP_DIR_ROOT_NAME: &str = "openapi_assert_test";

/// Temporary directories for tests, cleaned on creation.
pub struct TempDir;

impl TempDir {
    /// Create an empty directory dedicated to the given test in the system temp folder.
    ///
    /// An existing directory at this location is removed first.
    pub fn create<T: AsRef<str>>(module: T, name: T) -> PathBuf {
        let path = std::env::temp_dir()
            .join(TEMP_DIR_ROOT_NAME)
            .join(module.as_ref())
            .join(name.as_ref());

        if path.exists() {
            std::fs::remove_dir_all(&path)
                .unwrap_or_else(|e| panic!("Could not remove dir {path:?}: {e}"));
        }
        std::fs::create_dir_all(&path)
            .unwrap_or_else(|e| panic!("Could not create dir {path:?}: {e}"));

        path
    }
}
