//! The publish callback the host hands to the engine.
//!
//! Publication is fire-and-forget: the engine never inspects what the host
//! does with a value.

use crate::answer::AnswerValue;

/// Receives every newly published answer.
pub trait AnswerSink {
    fn publish(&mut self, answer: AnswerValue);
}

impl<F> AnswerSink for F
where
    F: FnMut(AnswerValue),
{
    fn publish(&mut self, answer: AnswerValue) {
        self(answer)
    }
}

/// Sink that discards everything.
pub struct NoopSink;

impl AnswerSink for NoopSink {
    fn publish(&mut self, _: AnswerValue) {}
}

/// Sink that keeps every published value, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    published: Vec<AnswerValue>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All values published so far.
    pub fn published(&self) -> &[AnswerValue] {
        &self.published
    }

    /// The most recent value, i.e. what a host would have stored.
    pub fn last(&self) -> Option<&AnswerValue> {
        self.published.last()
    }

    pub fn len(&self) -> usize {
        self.published.len()
    }

    pub fn is_empty(&self) -> bool {
        self.published.is_empty()
    }

    /// Drain the recorded values.
    pub fn take(&mut self) -> Vec<AnswerValue> {
        std::mem::take(&mut self.published)
    }
}

impl AnswerSink for RecordingSink {
    fn publish(&mut self, answer: AnswerValue) {
        self.published.push(answer);
    }
}
