use std::sync::Mutex;

use crate::failure_sink::FailureSink;

/// A [FailureSink] keeping the raised messages instead of failing the test.
#[derive(Default)]
pub struct RecordingFailureSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingFailureSink {
    /// Messages raised so far
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl FailureSink for RecordingFailureSink {
    fn raise(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
