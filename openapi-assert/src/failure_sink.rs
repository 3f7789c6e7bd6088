//! Bridge between the assertions and the test framework.

/// Receive the message of a failed assertion.
pub trait FailureSink: Send + Sync {
    /// Report the failure, implementations for test frameworks are not expected to return.
    fn raise(&self, message: &str);
}

/// A [FailureSink] panicking with the failure message, failing the running Rust test.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicFailureSink;

impl FailureSink for PanicFailureSink {
    fn raise(&self, message: &str) {
        panic!("{message}");
    }
}
