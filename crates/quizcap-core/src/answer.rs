//! The answer value contract.
//!
//! Every variant emits and accepts exactly one shape of [`AnswerValue`]. The
//! union carries no tag on the wire; the question's type tag decides how a
//! stored JSON value is read back.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::descriptor::QuestionType;

/// The current answer of one question.
#[derive(Debug, Clone)]
pub enum AnswerValue {
    /// The selected option key, if any.
    SingleChoice(Option<String>),
    /// Selected option indices in toggle order.
    MultipleChoice(Vec<usize>),
    /// One string per detected blank.
    FillBlank(Vec<String>),
    /// Fragment contents of the assembled chain, in order.
    Puzzle(Vec<String>),
    /// Left index → right index. Partial maps are valid.
    Matching(BTreeMap<usize, usize>),
}

impl AnswerValue {
    /// The variant that produces this shape.
    pub fn question_type(&self) -> QuestionType {
        match self {
            AnswerValue::SingleChoice(_) => QuestionType::SingleChoice,
            AnswerValue::MultipleChoice(_) => QuestionType::MultipleChoice,
            AnswerValue::FillBlank(_) => QuestionType::FillBlank,
            AnswerValue::Puzzle(_) => QuestionType::PuzzleGame,
            AnswerValue::Matching(_) => QuestionType::MatchingTask,
        }
    }

    /// The wire shape. Index sets serialize in ascending order, pair maps as
    /// objects with stringified left indices.
    pub fn to_json(&self) -> Value {
        match self {
            AnswerValue::SingleChoice(Some(key)) => Value::String(key.clone()),
            AnswerValue::SingleChoice(None) => Value::Null,
            AnswerValue::MultipleChoice(indices) => {
                Value::Array(sorted_unique(indices).into_iter().map(Value::from).collect())
            }
            AnswerValue::FillBlank(values) | AnswerValue::Puzzle(values) => {
                Value::Array(values.iter().cloned().map(Value::String).collect())
            }
            AnswerValue::Matching(pairs) => Value::Object(
                pairs
                    .iter()
                    .map(|(left, right)| (left.to_string(), Value::from(*right)))
                    .collect::<Map<_, _>>(),
            ),
        }
    }

    /// Read a stored value back for the given question type. Returns `None`
    /// when the value does not have the expected shape.
    pub fn from_json(question_type: QuestionType, value: &Value) -> Option<Self> {
        match question_type {
            QuestionType::SingleChoice => match value {
                Value::String(key) => Some(AnswerValue::SingleChoice(Some(key.clone()))),
                Value::Number(n) => Some(AnswerValue::SingleChoice(Some(n.to_string()))),
                Value::Null => Some(AnswerValue::SingleChoice(None)),
                _ => None,
            },
            QuestionType::MultipleChoice => value
                .as_array()?
                .iter()
                .map(|v| v.as_u64().map(|n| n as usize))
                .collect::<Option<Vec<_>>>()
                .map(AnswerValue::MultipleChoice),
            QuestionType::FillBlank => string_list(value).map(AnswerValue::FillBlank),
            QuestionType::PuzzleGame => string_list(value).map(AnswerValue::Puzzle),
            QuestionType::MatchingTask => value
                .as_object()?
                .iter()
                .map(|(left, right)| {
                    let left = left.parse::<usize>().ok()?;
                    let right = right.as_u64()? as usize;
                    Some((left, right))
                })
                .collect::<Option<BTreeMap<_, _>>>()
                .map(AnswerValue::Matching),
        }
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

fn sorted_unique(indices: &[usize]) -> Vec<usize> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}

/// Multiple-choice answers compare as sets; everything else compares
/// structurally.
impl PartialEq for AnswerValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AnswerValue::SingleChoice(a), AnswerValue::SingleChoice(b)) => a == b,
            (AnswerValue::MultipleChoice(a), AnswerValue::MultipleChoice(b)) => {
                sorted_unique(a) == sorted_unique(b)
            }
            (AnswerValue::FillBlank(a), AnswerValue::FillBlank(b)) => a == b,
            (AnswerValue::Puzzle(a), AnswerValue::Puzzle(b)) => a == b,
            (AnswerValue::Matching(a), AnswerValue::Matching(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for AnswerValue {}

impl Serialize for AnswerValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn multiple_choice_is_set_equal() {
        assert_eq!(
            AnswerValue::MultipleChoice(vec![2, 0]),
            AnswerValue::MultipleChoice(vec![0, 2])
        );
        assert_ne!(
            AnswerValue::MultipleChoice(vec![0]),
            AnswerValue::MultipleChoice(vec![0, 1])
        );
    }

    #[test]
    fn multiple_choice_serializes_ascending() {
        let value = AnswerValue::MultipleChoice(vec![4, 0, 2]);
        assert_eq!(value.to_json(), json!([0, 2, 4]));
        assert_eq!(serde_json::to_string(&value).unwrap(), "[0,2,4]");
    }

    #[test]
    fn matching_wire_shape() {
        let value = AnswerValue::Matching(BTreeMap::from([(0, 2), (3, 1)]));
        assert_eq!(value.to_json(), json!({"0": 2, "3": 1}));
        assert_eq!(
            AnswerValue::from_json(QuestionType::MatchingTask, &json!({"0": 2, "3": 1})),
            Some(value)
        );
    }

    #[test]
    fn from_json_rejects_wrong_shapes() {
        assert!(AnswerValue::from_json(QuestionType::PuzzleGame, &json!("x")).is_none());
        assert!(AnswerValue::from_json(QuestionType::FillBlank, &json!([1, 2])).is_none());
        assert!(AnswerValue::from_json(QuestionType::MultipleChoice, &json!([-1])).is_none());
        assert!(AnswerValue::from_json(QuestionType::MatchingTask, &json!({"a": 1})).is_none());
    }

    #[test]
    fn single_choice_from_json() {
        assert_eq!(
            AnswerValue::from_json(QuestionType::SingleChoice, &json!("B")),
            Some(AnswerValue::SingleChoice(Some("B".into())))
        );
        assert_eq!(
            AnswerValue::from_json(QuestionType::SingleChoice, &Value::Null),
            Some(AnswerValue::SingleChoice(None))
        );
    }

    #[test]
    fn variants_never_equal_across_types() {
        assert_ne!(
            AnswerValue::FillBlank(vec!["a".into()]),
            AnswerValue::Puzzle(vec!["a".into()])
        );
    }
}
