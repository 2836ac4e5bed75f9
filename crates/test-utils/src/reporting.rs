//! A progress reporter that keeps every message for later assertions.

use catalog_synth::ProgressReporter;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message reported so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .expect("RecordingReporter mutex poisoned")
            .clone()
    }

    pub fn contains(&self, message: &str) -> bool {
        self.messages().iter().any(|m| m == message)
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, message: &str) {
        self.messages
            .lock()
            .expect("RecordingReporter mutex poisoned")
            .push(message.to_string());
    }
}
