//! Helpers for the unit tests of this crate.

mod failure_sink;
mod openapi_file;
mod temp_dir;
mod test_logger;

pub use failure_sink::RecordingFailureSink;
pub use openapi_file::write_minimal_open_api_file;
pub use temp_dir::TempDir;
pub use test_logger::TestLogger;
