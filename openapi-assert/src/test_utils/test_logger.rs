use slog::{Drain, Logger};
use slog_async::Async;
use slog_term::{CompactFormat, PlainDecorator};
use std::io;
use std::sync::Arc;

/// Logger printing to the test output.
pub struct TestLogger;

impl TestLogger {
    fn from_writer<W: io::Write + Send + 'static>(writer: W) -> Logger {
        let decorator = PlainDecorator::new(writer);
        let drain = CompactFormat::new(decorator).build().fuse();
        let drain = Async::new(drain).build().fuse();
        Logger::root(Arc::new(drain), slog::o!())
    }

    /// Logger writing to stdout, captured by the test harness
    pub fn stdout() -> Logger {
        Self::from_writer(slog_term::TestStdoutWriter)
    }
}
