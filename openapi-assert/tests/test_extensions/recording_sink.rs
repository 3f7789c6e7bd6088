use std::sync::Mutex;

use openapi_assert::FailureSink;

/// Keep the raised failures so the tests can check them.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// The single raised failure, panics if there's none or more than one.
    pub fn single_message(&self) -> String {
        let messages = self.messages();
        assert_eq!(1, messages.len(), "expected a single failure, got: {messages:#?}");
        messages[0].clone()
    }
}

impl FailureSink for RecordingSink {
    fn raise(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
