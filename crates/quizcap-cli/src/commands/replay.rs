//! The `quizcap replay` command.
//!
//! Activates one question, applies a scripted list of gestures, and prints
//! one JSON line per event on stdout: every published answer, the feedback
//! of every gesture, and the final answer.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{json, Value};

use quizcap_core::config::load_config_from;
use quizcap_core::question_set::load_question_sets;
use quizcap_core::{Engine, Gesture, RecordingSink};

pub fn execute(
    questions_path: PathBuf,
    id: String,
    script_path: PathBuf,
    answer_path: Option<PathBuf>,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if seed.is_some() {
        config.shuffle_seed = seed;
    }

    let sets = load_question_sets(&questions_path)?;
    let descriptor = sets
        .iter()
        .find_map(|set| set.find(&id))
        .cloned()
        .with_context(|| format!("question '{id}' not found in {}", questions_path.display()))?;

    let stored = answer_path.as_deref().map(read_json).transpose()?;
    let gestures: Vec<Gesture> = serde_json::from_value(read_json(&script_path)?)
        .with_context(|| format!("invalid gesture script: {}", script_path.display()))?;

    tracing::info!(
        id = %descriptor.id,
        question_type = %descriptor.question_type,
        gestures = gestures.len(),
        "replaying"
    );

    let mut engine = Engine::with_config(config, RecordingSink::new());
    let renderer = engine.activate_json(descriptor, stored.as_ref());
    if let Some(e) = renderer.config_error() {
        emit(json!({ "event": "error", "code": e.code(), "message": e.to_string() }));
    }
    drain(&mut engine, None);

    for (step, gesture) in gestures.into_iter().enumerate() {
        let feedback = engine.apply(gesture);
        drain(&mut engine, Some(step));
        emit(json!({ "event": "feedback", "step": step, "result": feedback }));
    }

    let answer = engine
        .renderer()
        .and_then(|r| r.answer())
        .map(|a| a.to_json())
        .unwrap_or(Value::Null);
    emit(json!({ "event": "final", "answer": answer }));

    Ok(())
}

fn drain(engine: &mut Engine<RecordingSink>, step: Option<usize>) {
    for value in engine.sink_mut().take() {
        emit(json!({ "event": "publish", "step": step, "answer": value.to_json() }));
    }
}

fn emit(line: Value) {
    println!("{line}");
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON: {}", path.display()))
}
