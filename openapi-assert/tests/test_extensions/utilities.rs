use std::path::{Path, PathBuf};
use std::sync::Arc;

use openapi_assert::{OpenApiAssertions, OpenApiAssertionsBuilder, SchemaId};

use crate::test_extensions::RecordingSink;

/// Identifier of a document of the `tests/fixtures` directory.
pub fn fixture(file_name: &str) -> SchemaId {
    SchemaId::from(fixtures_dir().join(file_name).as_path())
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Create a directory to save test artefacts. This directory is cleaned if it
/// already exists, it is created if not.
pub fn get_test_dir(subdir_name: &str) -> PathBuf {
    let parent_dir = std::env::temp_dir()
        .join("openapi_assert_integration_test")
        .join(subdir_name);

    if parent_dir.exists() {
        std::fs::remove_dir_all(&parent_dir)
            .unwrap_or_else(|e| panic!("Could not remove dir {parent_dir:?}: {e}"));
    }
    std::fs::create_dir_all(&parent_dir)
        .unwrap_or_else(|e| panic!("Could not create dir {parent_dir:?}: {e}"));

    parent_dir
}

/// Assertions reporting their failures to a [RecordingSink] instead of panicking.
pub fn recording_assertions() -> (OpenApiAssertions, Arc<RecordingSink>) {
    recording_assertions_from(OpenApiAssertionsBuilder::new())
}

pub fn recording_assertions_from(
    builder: OpenApiAssertionsBuilder,
) -> (OpenApiAssertions, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let assertions = builder.with_failure_sink(sink.clone()).build();

    (assertions, sink)
}
