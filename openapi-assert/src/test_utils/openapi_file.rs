use std::path::Path;

/// Write an OpenAPI 3.0 document with the given (already indented) paths and component schemas.
pub fn write_minimal_open_api_file(path: &Path, openapi_paths: &str, openapi_components: &str) {
    std::fs::write(
        path,
        format!(
            r#"openapi: "3.0.0"
info:
  version: 1.0.0
  title: Minimal Open Api File

paths:
{openapi_paths}

components:
  schemas:
{openapi_components}
"#
        ),
    )
    .unwrap()
}
