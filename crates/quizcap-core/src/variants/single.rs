//! Single choice selector.

use crate::answer::AnswerValue;
use crate::descriptor::Payload;

/// Options keyed by display letter; selecting replaces the answer.
#[derive(Debug, Clone)]
pub struct SingleChoice {
    options: Vec<(String, String)>,
    selected: Option<String>,
}

impl SingleChoice {
    pub fn new(payload: &Payload, stored: Option<&AnswerValue>) -> Self {
        let selected = match stored {
            Some(AnswerValue::SingleChoice(key)) => key.clone(),
            _ => None,
        };
        Self {
            options: payload.keyed_options(),
            selected,
        }
    }

    /// `(key, text)` pairs in display order.
    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select an option. Re-selecting the current key publishes the same
    /// value again. Unknown keys are ignored.
    pub fn select(&mut self, key: &str) -> Option<AnswerValue> {
        if !self.options.iter().any(|(k, _)| k == key) {
            tracing::debug!(key, "ignoring selection of unknown option");
            return None;
        }
        self.selected = Some(key.to_string());
        Some(AnswerValue::SingleChoice(self.selected.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Options;
    use std::collections::BTreeMap;

    fn water() -> Payload {
        Payload {
            options: Some(Options::Keyed(BTreeMap::from([
                ("A".to_string(), "H2O".to_string()),
                ("B".to_string(), "CO2".to_string()),
            ]))),
            ..Payload::default()
        }
    }

    #[test]
    fn select_publishes_key() {
        let mut view = SingleChoice::new(&water(), None);
        assert_eq!(
            view.select("B"),
            Some(AnswerValue::SingleChoice(Some("B".into())))
        );
        assert_eq!(view.selected(), Some("B"));
    }

    #[test]
    fn reselect_is_idempotent() {
        let mut view = SingleChoice::new(&water(), None);
        let first = view.select("A");
        let second = view.select("A");
        assert_eq!(first, second);
        assert_eq!(view.selected(), Some("A"));
    }

    #[test]
    fn unknown_key_ignored() {
        let mut view = SingleChoice::new(&water(), None);
        assert!(view.select("Z").is_none());
        assert!(view.selected().is_none());
    }

    #[test]
    fn seeded_from_stored() {
        let stored = AnswerValue::SingleChoice(Some("A".into()));
        let view = SingleChoice::new(&water(), Some(&stored));
        assert_eq!(view.selected(), Some("A"));
    }
}
