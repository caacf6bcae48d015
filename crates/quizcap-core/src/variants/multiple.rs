//! Multiple choice selector.

use crate::answer::AnswerValue;
use crate::descriptor::Payload;

#[derive(Debug, Clone)]
pub struct MultipleChoice {
    options: Vec<String>,
    selected: Vec<usize>,
}

impl MultipleChoice {
    pub fn new(payload: &Payload, stored: Option<&AnswerValue>) -> Self {
        let options = payload.listed_options();
        let mut selected = Vec::new();
        if let Some(AnswerValue::MultipleChoice(indices)) = stored {
            for &i in indices {
                if i < options.len() && !selected.contains(&i) {
                    selected.push(i);
                }
            }
        }
        Self { options, selected }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Selected indices in toggle order.
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Add or remove `index` and publish the full set.
    pub fn toggle(&mut self, index: usize) -> Option<AnswerValue> {
        if index >= self.options.len() {
            tracing::debug!(index, "ignoring toggle of out-of-range option");
            return None;
        }
        match self.selected.iter().position(|&i| i == index) {
            Some(pos) => {
                self.selected.remove(pos);
            }
            None => self.selected.push(index),
        }
        Some(AnswerValue::MultipleChoice(self.selected.clone()))
    }
}
