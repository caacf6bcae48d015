//! Question set loader.
//!
//! Loads question sets from TOML or JSON files and directories, and checks
//! them for problems a host would otherwise only notice at render time.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::config::EngineConfig;
use crate::descriptor::{QuestionDescriptor, QuestionType, RawQuestion};
use crate::engine::Renderer;
use crate::error::ConfigError;
use crate::variants::fill_blank::count_placeholders;

/// A named collection of questions.
#[derive(Debug, Clone)]
pub struct QuestionSet {
    pub id: String,
    pub name: String,
    pub description: String,
    pub questions: Vec<QuestionDescriptor>,
}

impl QuestionSet {
    pub fn find(&self, id: &str) -> Option<&QuestionDescriptor> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Intermediate structure for question set files.
#[derive(Debug, Deserialize)]
struct QuestionSetFile {
    question_set: QuestionSetHeader,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct QuestionSetHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Format::Toml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Parse a single question set file; the format follows the extension.
pub fn parse_question_set(path: &Path) -> Result<QuestionSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question set file: {}", path.display()))?;
    let format = Format::from_path(path).with_context(|| {
        format!("unsupported question set extension: {}", path.display())
    })?;

    parse_question_set_str(&content, format, path)
}

/// Parse a question set document (useful for testing).
pub fn parse_question_set_str(
    content: &str,
    format: Format,
    source_path: &Path,
) -> Result<QuestionSet> {
    let parsed: QuestionSetFile = match format {
        Format::Toml => toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?,
        Format::Json => serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?,
    };

    Ok(QuestionSet {
        id: parsed.question_set.id,
        name: parsed.question_set.name,
        description: parsed.question_set.description,
        questions: parsed
            .questions
            .into_iter()
            .map(QuestionDescriptor::from_raw)
            .collect(),
    })
}

/// Recursively load all question set files from a directory.
pub fn load_question_directory(dir: &Path) -> Result<Vec<QuestionSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();

        if path.is_dir() {
            sets.extend(load_question_directory(&path)?);
        } else if Format::from_path(&path).is_some() {
            match parse_question_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    sets.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(sets)
}

/// Load a file or every set under a directory.
pub fn load_question_sets(path: &Path) -> Result<Vec<QuestionSet>> {
    if path.is_dir() {
        load_question_directory(path)
    } else {
        Ok(vec![parse_question_set(path)?])
    }
}

/// The configuration error a question would render with, if any.
pub fn config_status(question: &QuestionDescriptor) -> Option<ConfigError> {
    let (renderer, _) = Renderer::build(
        question,
        None,
        &EngineConfig::default(),
        &mut StdRng::seed_from_u64(0),
    );
    renderer.config_error().cloned()
}

/// A warning from question set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    pub message: String,
}

impl ValidationWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a question set for common issues.
pub fn validate_question_set(set: &QuestionSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if set.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "question set has no questions".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for q in &set.questions {
        if q.id.is_empty() {
            warnings.push(ValidationWarning {
                question_id: None,
                message: "question without an id".into(),
            });
        } else if !seen_ids.insert(q.id.as_str()) {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("duplicate question ID: {}", q.id),
            ));
        }
    }

    for q in &set.questions {
        if q.text.trim().is_empty() {
            warnings.push(ValidationWarning::question(&q.id, "question text is empty"));
        }

        match q.raw_type.as_deref() {
            None => warnings.push(ValidationWarning::question(
                &q.id,
                "no question_type, rendering as single_choice",
            )),
            Some(tag) if !q.has_recognized_type() => warnings.push(ValidationWarning::question(
                &q.id,
                format!("unknown question_type '{tag}', rendering as single_choice"),
            )),
            Some(_) => {}
        }

        if let Some(e) = config_status(q) {
            warnings.push(ValidationWarning::question(&q.id, e.to_string()));
        }

        warnings.extend(payload_warnings(q));
    }

    warnings
}

fn payload_warnings(q: &QuestionDescriptor) -> Vec<ValidationWarning> {
    let p = &q.payload;
    let mut warnings = Vec::new();

    match q.question_type {
        QuestionType::SingleChoice | QuestionType::MultipleChoice => {
            if p.options.is_none() {
                warnings.push(ValidationWarning::question(&q.id, "no options to choose from"));
            }
        }
        QuestionType::FillBlank => {
            if let Some(template) = &p.template {
                let placeholders = count_placeholders(template);
                if p.blank_answers.is_empty() && placeholders != p.blanks.len() {
                    warnings.push(ValidationWarning::question(
                        &q.id,
                        format!(
                            "template has {placeholders} placeholder(s) but {} blank descriptor(s); unpaired ones are not rendered",
                            p.blanks.len()
                        ),
                    ));
                }
            }
        }
        QuestionType::PuzzleGame => {
            if p.puzzle_fragments.is_empty() {
                warnings.push(ValidationWarning::question(&q.id, "puzzle has no fragments"));
            }
            if p.puzzle_solution.as_deref().map_or(true, |s| s.trim().is_empty()) {
                warnings.push(ValidationWarning::question(
                    &q.id,
                    "puzzle has no solution; self-check always fails",
                ));
            }
        }
        QuestionType::MatchingTask => {
            for m in &p.correct_matches {
                if m.left >= p.left_items.len() || m.right >= p.right_items.len() {
                    warnings.push(ValidationWarning::question(
                        &q.id,
                        format!("correct match {} -> {} is out of range", m.left, m.right),
                    ));
                }
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[question_set]
id = "chemistry"
name = "Chemistry Basics"
description = "Mixed question types"

[[questions]]
id = 1
question_type = "single_choice"
question = "What is the chemical formula for water?"
options = { A = "H2O", B = "CO2", C = "NaCl" }

[[questions]]
id = 2
question_type = "puzzle_game"
question = "Assemble the equation"

[questions.question_data]
puzzle_fragments = ["x", "+", "1", "=", "0"]
puzzle_solution = "x + 1 = 0"

[[questions]]
id = 3
question_type = "matching_task"
question = "Match countries to capitals"
question_data = '{"left_items":["France","Japan"],"right_items":["Tokyo","Paris"],"correct_matches":[{"left":0,"right":1},{"left":1,"right":0}]}'
"#;

    #[test]
    fn parse_valid_toml() {
        let set =
            parse_question_set_str(VALID_TOML, Format::Toml, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(set.id, "chemistry");
        assert_eq!(set.questions.len(), 3);
        assert_eq!(set.questions[0].id, "1");
        assert_eq!(set.questions[0].payload.keyed_options().len(), 3);
        assert_eq!(set.questions[1].payload.puzzle_fragments.len(), 5);
        assert_eq!(set.find("3").unwrap().payload.left_items, vec!["France", "Japan"]);
        assert!(validate_question_set(&set).is_empty());
    }

    #[test]
    fn parse_json() {
        let json = r#"{
            "question_set": {"id": "j", "name": "JSON set"},
            "questions": [
                {"id": "a", "question_type": "multiple_choice", "question": "Pick",
                 "question_data": {"options": ["He", "O2", "Ne"]}}
            ]
        }"#;
        let set = parse_question_set_str(json, Format::Json, &PathBuf::from("t.json")).unwrap();
        assert_eq!(set.questions[0].question_type, QuestionType::MultipleChoice);
        assert_eq!(set.questions[0].payload.listed_options().len(), 3);
    }

    #[test]
    fn validate_reports_problems() {
        let toml = r#"
[question_set]
id = "broken"
name = "Broken"

[[questions]]
id = "dup"
question_type = "fill_blank"
question = "Nothing to fill"

[[questions]]
id = "dup"
question_type = "error_spotting"
question = "Spot it"
options = { A = "here" }

[[questions]]
id = "m"
question_type = "matching_task"
question = "Match"

[questions.question_data]
left_items = ["a"]
right_items = []
"#;
        let set = parse_question_set_str(toml, Format::Toml, &PathBuf::from("b.toml")).unwrap();
        let warnings = validate_question_set(&set);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("duplicate")));
        assert!(messages.iter().any(|m| m.contains("no blank answers")));
        assert!(messages.iter().any(|m| m.contains("unknown question_type 'error_spotting'")));
        assert!(messages.iter().any(|m| m.contains("0 right item(s)")));
    }

    #[test]
    fn config_status_of_valid_question() {
        let set =
            parse_question_set_str(VALID_TOML, Format::Toml, &PathBuf::from("test.toml")).unwrap();
        assert!(set.questions.iter().all(|q| config_status(q).is_none()));
    }

    #[test]
    fn parse_malformed_toml() {
        let result = parse_question_set_str("not [valid }{", Format::Toml, &PathBuf::from("x.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("bad.toml"), "[[[").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sets = load_question_directory(dir.path()).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].id, "chemistry");
    }
}
