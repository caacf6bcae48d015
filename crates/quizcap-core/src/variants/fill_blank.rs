//! Fill-blank composer.
//!
//! Two input shapes, chosen by what the payload contains:
//!
//! - **Legacy**: a `blank_answers` list, one labeled input per entry. Labels
//!   come from the `{{name}}` placeholder at the same position in the
//!   question text, falling back to `blank N`.
//! - **Template**: a `template` string whose `{{...}}` placeholders pair
//!   positionally with `blanks` descriptors. A slot exists only where both a
//!   placeholder and a descriptor exist.

use std::sync::OnceLock;

use regex::Regex;

use crate::answer::AnswerValue;
use crate::descriptor::Payload;
use crate::error::ConfigError;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{[^}]+\}\}").expect("placeholder pattern is valid"))
}

/// Number of `{{...}}` placeholder tokens in `text`.
pub fn count_placeholders(text: &str) -> usize {
    placeholder_pattern().find_iter(text).count()
}

/// Piece of a rendered template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Text(String),
    Slot(Slot),
}

/// An input slot of a template question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub index: usize,
    /// The blank's placeholder hint, or `Blank N`.
    pub placeholder: String,
    pub hints: Vec<String>,
}

/// A labeled input of a legacy question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledInput {
    pub index: usize,
    pub label: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    Legacy(Vec<LabeledInput>),
    Template(Vec<TemplatePart>),
}

#[derive(Debug, Clone)]
pub struct FillBlank {
    layout: Layout,
    blank_count: usize,
    values: Vec<String>,
    hints_visible: Vec<bool>,
}

impl FillBlank {
    /// Build the composer. Also returns the value to publish immediately, if
    /// any: an empty-string array when no usable stored answer exists.
    pub fn new(
        text: &str,
        payload: &Payload,
        stored: Option<&AnswerValue>,
    ) -> Result<(Self, Option<AnswerValue>), ConfigError> {
        let layout = if !payload.blank_answers.is_empty() {
            Layout::Legacy(legacy_inputs(text, payload.blank_answers.len()))
        } else if let (Some(template), false) = (&payload.template, payload.blanks.is_empty()) {
            Layout::Template(template_parts(template, payload))
        } else {
            return Err(ConfigError::NoBlanks);
        };

        let blank_count = match &layout {
            Layout::Legacy(inputs) => inputs.len(),
            Layout::Template(parts) => parts
                .iter()
                .filter(|p| matches!(p, TemplatePart::Slot(_)))
                .count(),
        };
        if blank_count == 0 {
            return Err(ConfigError::NoBlanks);
        }

        let (values, initial) = match stored {
            Some(AnswerValue::FillBlank(values)) if !values.is_empty() => (values.clone(), None),
            _ => {
                let empty = vec![String::new(); blank_count];
                (empty.clone(), Some(AnswerValue::FillBlank(empty)))
            }
        };

        Ok((
            Self {
                layout,
                blank_count,
                values,
                hints_visible: vec![false; blank_count],
            },
            initial,
        ))
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn blank_count(&self) -> usize {
        self.blank_count
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Replace the text of one blank and publish the whole array.
    pub fn edit(&mut self, index: usize, value: &str) -> Option<AnswerValue> {
        if index >= self.blank_count {
            tracing::debug!(index, "ignoring edit of nonexistent blank");
            return None;
        }
        let mut values = self.values.clone();
        if values.len() < self.blank_count {
            values.resize(self.blank_count, String::new());
        }
        values[index] = value.to_string();
        self.values = values;
        Some(AnswerValue::FillBlank(self.values.clone()))
    }

    /// Flip hint visibility of a template blank that has hints. Returns the
    /// new visibility, or `None` when the blank has no hints.
    pub fn toggle_hint(&mut self, index: usize) -> Option<bool> {
        let Layout::Template(parts) = &self.layout else {
            return None;
        };
        let has_hints = parts.iter().any(|p| {
            matches!(p, TemplatePart::Slot(slot) if slot.index == index && !slot.hints.is_empty())
        });
        if !has_hints {
            return None;
        }
        let visible = self.hints_visible.get_mut(index)?;
        *visible = !*visible;
        Some(*visible)
    }

    pub fn hint_visible(&self, index: usize) -> bool {
        self.hints_visible.get(index).copied().unwrap_or(false)
    }

    /// `(filled, total)`; a blank counts as filled when it is not blank after
    /// trimming.
    pub fn progress(&self) -> (usize, usize) {
        let filled = self
            .values
            .iter()
            .take(self.blank_count)
            .filter(|v| !v.trim().is_empty())
            .count();
        (filled, self.blank_count)
    }
}

fn legacy_inputs(text: &str, count: usize) -> Vec<LabeledInput> {
    let names: Vec<String> = placeholder_pattern()
        .find_iter(text)
        .map(|m| m.as_str().replace(['{', '}'], "").trim().to_string())
        .collect();

    (0..count)
        .map(|index| {
            let label = names
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("blank {}", index + 1));
            LabeledInput {
                index,
                prompt: format!("Enter answer for {label}"),
                label,
            }
        })
        .collect()
}

fn template_parts(template: &str, payload: &Payload) -> Vec<TemplatePart> {
    let pattern = placeholder_pattern();
    let placeholders = count_placeholders(template);
    let mut parts = Vec::new();

    for (i, segment) in pattern.split(template).enumerate() {
        if !segment.is_empty() {
            parts.push(TemplatePart::Text(segment.to_string()));
        }
        if i < placeholders {
            if let Some(blank) = payload.blanks.get(i) {
                parts.push(TemplatePart::Slot(Slot {
                    index: i,
                    placeholder: blank
                        .placeholder
                        .clone()
                        .unwrap_or_else(|| format!("Blank {}", i + 1)),
                    hints: blank.options.hints.clone(),
                }));
            }
        }
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{BlankOptions, BlankSpec};

    fn blank(placeholder: &str, hints: &[&str]) -> BlankSpec {
        BlankSpec {
            id: None,
            placeholder: Some(placeholder.to_string()),
            options: BlankOptions {
                hints: hints.iter().map(|h| h.to_string()).collect(),
            },
        }
    }

    fn periodic_table() -> Payload {
        Payload {
            enhanced: true,
            template: Some(
                "The table has {{count}} elements, ordered by {{method}}, made by {{who}}.".into(),
            ),
            blanks: vec![
                blank("number of elements", &["More than 100"]),
                blank("organization method", &[]),
                blank("scientist name", &["Russian chemist"]),
            ],
            ..Payload::default()
        }
    }

    #[test]
    fn template_slots_interleave_text() {
        let (view, initial) = FillBlank::new("", &periodic_table(), None).unwrap();
        assert_eq!(view.blank_count(), 3);
        assert_eq!(initial, Some(AnswerValue::FillBlank(vec![String::new(); 3])));
        let Layout::Template(parts) = view.layout() else {
            panic!("expected template layout");
        };
        assert_eq!(parts[0], TemplatePart::Text("The table has ".into()));
        assert!(matches!(&parts[1], TemplatePart::Slot(s) if s.index == 0));
        assert_eq!(parts.len(), 7);
    }

    #[test]
    fn length_fixed_regardless_of_edits() {
        let (mut view, _) = FillBlank::new("", &periodic_table(), None).unwrap();
        let published = view.edit(1, "atomic number").unwrap();
        assert_eq!(
            published,
            AnswerValue::FillBlank(vec!["".into(), "atomic number".into(), "".into()])
        );
        assert!(view.edit(3, "overflow").is_none());
        assert_eq!(view.values().len(), 3);
        assert_eq!(view.progress(), (1, 3));
    }

    #[test]
    fn trailing_placeholder_without_descriptor_ignored() {
        let mut payload = periodic_table();
        payload.blanks.truncate(2);
        let (view, _) = FillBlank::new("", &payload, None).unwrap();
        assert_eq!(view.blank_count(), 2);
        let Layout::Template(parts) = view.layout() else {
            panic!("expected template layout");
        };
        assert_eq!(parts.last(), Some(&TemplatePart::Text(".".into())));
    }

    #[test]
    fn extra_descriptors_without_placeholders_ignored() {
        let mut payload = periodic_table();
        payload.blanks.push(blank("unused", &[]));
        let (view, _) = FillBlank::new("", &payload, None).unwrap();
        assert_eq!(view.blank_count(), 3);
    }

    #[test]
    fn legacy_labels_from_question_text() {
        let payload = Payload {
            blank_answers: vec!["2HCl".into(), "heat".into()],
            ..Payload::default()
        };
        let (view, _) = FillBlank::new("H2 + Cl2 → {{ product }}", &payload, None).unwrap();
        let Layout::Legacy(inputs) = view.layout() else {
            panic!("expected legacy layout");
        };
        assert_eq!(inputs[0].label, "product");
        assert_eq!(inputs[0].prompt, "Enter answer for product");
        assert_eq!(inputs[1].label, "blank 2");
    }

    #[test]
    fn stored_answer_used_verbatim_without_publish() {
        let stored = AnswerValue::FillBlank(vec!["118".into()]);
        let (mut view, initial) = FillBlank::new("", &periodic_table(), Some(&stored)).unwrap();
        assert!(initial.is_none());
        assert_eq!(view.values(), &["118".to_string()]);
        assert_eq!(
            view.edit(2, "Mendeleev"),
            Some(AnswerValue::FillBlank(vec![
                "118".into(),
                "".into(),
                "Mendeleev".into()
            ]))
        );
    }

    #[test]
    fn empty_stored_answer_reseeds() {
        let stored = AnswerValue::FillBlank(vec![]);
        let (_, initial) = FillBlank::new("", &periodic_table(), Some(&stored)).unwrap();
        assert!(initial.is_some());
    }

    #[test]
    fn no_blanks_is_config_error() {
        assert_eq!(
            FillBlank::new("", &Payload::default(), None).unwrap_err(),
            ConfigError::NoBlanks
        );
        let payload = Payload {
            template: Some("no placeholders here".into()),
            blanks: vec![blank("x", &[])],
            ..Payload::default()
        };
        assert_eq!(
            FillBlank::new("", &payload, None).unwrap_err(),
            ConfigError::NoBlanks
        );
    }

    #[test]
    fn hints_toggle_only_where_present() {
        let (mut view, _) = FillBlank::new("", &periodic_table(), None).unwrap();
        assert_eq!(view.toggle_hint(0), Some(true));
        assert!(view.hint_visible(0));
        assert_eq!(view.toggle_hint(0), Some(false));
        assert_eq!(view.toggle_hint(1), None);
    }
}
