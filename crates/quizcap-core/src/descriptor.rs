//! Question descriptor model.
//!
//! A read-only, normalized view over a raw question record. Raw records come
//! in two generations: a legacy flat shape where type-specific fields sit at
//! the top level, and a newer shape where they live in `question_data`,
//! either as a structured object or as an embedded JSON string. Resolution
//! never fails; anything unusable becomes an empty payload.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The five question variants the engine can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    FillBlank,
    PuzzleGame,
    MatchingTask,
}

impl QuestionType {
    /// Resolve a raw type tag, falling back to single choice for missing or
    /// unrecognized tags.
    pub fn from_tag(tag: Option<&str>) -> Self {
        tag.and_then(|t| t.parse().ok())
            .unwrap_or(QuestionType::SingleChoice)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::SingleChoice => write!(f, "single_choice"),
            QuestionType::MultipleChoice => write!(f, "multiple_choice"),
            QuestionType::FillBlank => write!(f, "fill_blank"),
            QuestionType::PuzzleGame => write!(f, "puzzle_game"),
            QuestionType::MatchingTask => write!(f, "matching_task"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "single_choice" => Ok(QuestionType::SingleChoice),
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "fill_blank" => Ok(QuestionType::FillBlank),
            "puzzle_game" => Ok(QuestionType::PuzzleGame),
            "matching_task" => Ok(QuestionType::MatchingTask),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// Choice options, either keyed (`{"A": "H2O"}`) or positional.
///
/// Keyed slots that are null or blank are unused and dropped. Positional
/// nulls become empty strings so indices stay stable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Options {
    Keyed(BTreeMap<String, String>),
    Listed(Vec<String>),
}

impl Options {
    /// Read options from a JSON value. Returns `None` for other shapes and
    /// for keyed options with no usable slot.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => {
                let keyed: BTreeMap<String, String> = map
                    .iter()
                    .filter_map(|(key, text)| Some((key.clone(), option_text(text)?)))
                    .collect();
                (!keyed.is_empty()).then_some(Options::Keyed(keyed))
            }
            Value::Array(list) => Some(Options::Listed(
                list.iter()
                    .map(|text| option_text(text).unwrap_or_default())
                    .collect(),
            )),
            _ => None,
        }
    }
}

fn option_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Options {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Options::from_value(&value)
            .ok_or_else(|| de::Error::custom("options must be a non-empty object or an array"))
    }
}

/// Legacy records spell the four choice slots as `option_a` .. `option_d`.
const LETTERED_OPTIONS: [(&str, &str); 4] = [
    ("A", "option_a"),
    ("B", "option_b"),
    ("C", "option_c"),
    ("D", "option_d"),
];

fn lettered_options(map: &Map<String, Value>) -> Option<Options> {
    let keyed: Map<String, Value> = LETTERED_OPTIONS
        .iter()
        .filter_map(|(letter, field)| Some((letter.to_string(), map.get(*field)?.clone())))
        .collect();
    Options::from_value(&Value::Object(keyed))
}

/// Reads one payload field on its own: null or a value of the wrong shape
/// yields the field's default instead of failing the whole payload.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::debug!("ignoring malformed payload field: {e}");
        T::default()
    }))
}

/// One blank descriptor of a template fill-blank question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlankSpec {
    #[serde(deserialize_with = "opt_id_from_any")]
    pub id: Option<String>,
    /// Hint text shown inside the empty input.
    #[serde(deserialize_with = "lenient")]
    pub placeholder: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub options: BlankOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlankOptions {
    #[serde(deserialize_with = "lenient")]
    pub hints: Vec<String>,
}

/// A canonical left → right association of a matching question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPair {
    pub left: usize,
    pub right: usize,
}

/// Type-specific question data. Every field is optional and read on its
/// own; each variant reads only the fields it understands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payload {
    #[serde(deserialize_with = "lenient")]
    pub options: Option<Options>,
    #[serde(deserialize_with = "lenient")]
    pub blank_answers: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub enhanced: bool,
    #[serde(deserialize_with = "lenient")]
    pub template: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub blanks: Vec<BlankSpec>,
    #[serde(deserialize_with = "lenient")]
    pub puzzle_fragments: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub puzzle_solution: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub left_items: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub right_items: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub correct_matches: Vec<MatchPair>,
}

impl Payload {
    /// Parse a `question_data` value: structured object first, then an
    /// embedded JSON string. Anything else, or a parse failure, yields the
    /// empty payload.
    pub fn from_question_data(data: Option<&Value>) -> Self {
        match data {
            Some(Value::Object(map)) => Self::from_map(map),
            Some(Value::String(text)) if !text.trim().is_empty() => {
                match serde_json::from_str::<Value>(text) {
                    Ok(Value::Object(map)) => Self::from_map(&map),
                    Ok(_) => {
                        tracing::warn!("question_data string is not a JSON object, using empty payload");
                        Self::default()
                    }
                    Err(e) => {
                        tracing::warn!("failed to parse question_data: {e}");
                        Self::default()
                    }
                }
            }
            _ => Self::default(),
        }
    }

    /// Parse a payload from loose key/value pairs, ignoring unknown keys.
    /// Choice options fall back to the lettered `option_a` .. `option_d`
    /// fields.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut payload: Self = match serde_json::from_value(Value::Object(map.clone())) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("malformed question payload, using empty payload: {e}");
                Self::default()
            }
        };
        if payload.options.is_none() {
            payload.options = lettered_options(map);
        }
        payload
    }

    /// Fill every field this payload leaves empty from `legacy`.
    pub fn or_legacy(self, legacy: Payload) -> Self {
        fn pick<T>(primary: Vec<T>, fallback: Vec<T>) -> Vec<T> {
            if primary.is_empty() {
                fallback
            } else {
                primary
            }
        }

        Self {
            options: self.options.or(legacy.options),
            blank_answers: pick(self.blank_answers, legacy.blank_answers),
            enhanced: self.enhanced || legacy.enhanced,
            template: self.template.or(legacy.template),
            blanks: pick(self.blanks, legacy.blanks),
            puzzle_fragments: pick(self.puzzle_fragments, legacy.puzzle_fragments),
            puzzle_solution: self.puzzle_solution.or(legacy.puzzle_solution),
            left_items: pick(self.left_items, legacy.left_items),
            right_items: pick(self.right_items, legacy.right_items),
            correct_matches: pick(self.correct_matches, legacy.correct_matches),
        }
    }

    /// Options as `(key, text)` pairs. Positional options are keyed by their
    /// index.
    pub fn keyed_options(&self) -> Vec<(String, String)> {
        match &self.options {
            Some(Options::Keyed(map)) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            Some(Options::Listed(list)) => list
                .iter()
                .enumerate()
                .map(|(i, text)| (i.to_string(), text.clone()))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Options as a positional list. Keyed options are listed in key order.
    pub fn listed_options(&self) -> Vec<String> {
        match &self.options {
            Some(Options::Listed(list)) => list.clone(),
            Some(Options::Keyed(map)) => map.values().cloned().collect(),
            None => Vec::new(),
        }
    }
}

/// A raw question record as stored by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawQuestion {
    #[serde(default, deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub question_type: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub question_text: Option<String>,
    #[serde(default)]
    pub question_data: Option<Value>,
    /// Legacy flat fields and anything else the record carries.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

fn id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn opt_id_from_any<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = id_from_any(deserializer)?;
    Ok((!id.is_empty()).then_some(id))
}

/// Normalized, read-only view over a question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDescriptor {
    /// Opaque identifier; the reset boundary for all interaction state.
    pub id: String,
    pub question_type: QuestionType,
    /// The tag as written in the record, if any.
    pub raw_type: Option<String>,
    /// Question prose. Legacy fill-blank labels are read from it.
    pub text: String,
    pub payload: Payload,
}

impl QuestionDescriptor {
    /// Build a descriptor directly, mostly useful for tests and hosts that
    /// already hold typed data.
    pub fn new(id: impl Into<String>, question_type: QuestionType, payload: Payload) -> Self {
        Self {
            id: id.into(),
            question_type,
            raw_type: Some(question_type.to_string()),
            text: String::new(),
            payload,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Normalize a raw record.
    pub fn from_raw(raw: RawQuestion) -> Self {
        let structured = Payload::from_question_data(raw.question_data.as_ref());
        let legacy = Payload::from_map(&raw.rest);
        let question_type = QuestionType::from_tag(raw.question_type.as_deref());

        if let Some(tag) = raw.question_type.as_deref() {
            if tag.parse::<QuestionType>().is_err() {
                tracing::debug!(id = %raw.id, tag, "unrecognized question type, rendering as single choice");
            }
        }

        Self {
            id: raw.id,
            question_type,
            raw_type: raw.question_type,
            text: raw.question.or(raw.question_text).unwrap_or_default(),
            payload: structured.or_legacy(legacy),
        }
    }

    /// Normalize an arbitrary JSON value. Values that are not question
    /// records produce a descriptor with an empty id and payload.
    pub fn from_json(value: Value) -> Self {
        match serde_json::from_value::<RawQuestion>(value) {
            Ok(raw) => Self::from_raw(raw),
            Err(e) => {
                tracing::warn!("unusable question record: {e}");
                Self::from_raw(RawQuestion::default())
            }
        }
    }

    /// Whether the record's type tag named a known variant.
    pub fn has_recognized_type(&self) -> bool {
        self.raw_type
            .as_deref()
            .is_some_and(|t| t.parse::<QuestionType>().is_ok())
    }
}
