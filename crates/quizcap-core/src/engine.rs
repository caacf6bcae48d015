//! Dispatch gate and per-question state.
//!
//! The engine holds the interaction state of the active question only. It
//! is created when a question id first becomes active, rebuilt from scratch
//! whenever the id changes, and dropped on deactivation. Rebuilding discards
//! any drag in flight against the previous question.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::answer::AnswerValue;
use crate::config::EngineConfig;
use crate::descriptor::{QuestionDescriptor, QuestionType};
use crate::error::ConfigError;
use crate::gesture::{Feedback, Gesture};
use crate::sink::AnswerSink;
use crate::variants::{
    FillBlank, MatchingPairer, MultipleChoice, PuzzleAssembler, SingleChoice, Zone,
};

/// The interaction controller selected for a question.
#[derive(Debug, Clone)]
pub enum Renderer {
    SingleChoice(SingleChoice),
    MultipleChoice(MultipleChoice),
    FillBlank(FillBlank),
    Puzzle(PuzzleAssembler),
    Matching(MatchingPairer),
    /// The payload cannot drive its variant.
    Misconfigured(ConfigError),
}

impl Renderer {
    /// Select and initialize the variant for `descriptor`. Also returns the
    /// value to publish right away, if initialization produces one.
    pub fn build<R: Rng + ?Sized>(
        descriptor: &QuestionDescriptor,
        stored: Option<&AnswerValue>,
        config: &EngineConfig,
        rng: &mut R,
    ) -> (Self, Option<AnswerValue>) {
        let payload = &descriptor.payload;
        match descriptor.question_type {
            QuestionType::SingleChoice => {
                (Renderer::SingleChoice(SingleChoice::new(payload, stored)), None)
            }
            QuestionType::MultipleChoice => (
                Renderer::MultipleChoice(MultipleChoice::new(payload, stored)),
                None,
            ),
            QuestionType::FillBlank => match FillBlank::new(&descriptor.text, payload, stored) {
                Ok((view, initial)) => (Renderer::FillBlank(view), initial),
                Err(e) => (Renderer::Misconfigured(e), None),
            },
            QuestionType::PuzzleGame => (
                Renderer::Puzzle(PuzzleAssembler::new(payload, stored, config, rng)),
                None,
            ),
            QuestionType::MatchingTask => match MatchingPairer::new(payload, stored) {
                Ok(view) => (Renderer::Matching(view), None),
                Err(e) => (Renderer::Misconfigured(e), None),
            },
        }
    }

    pub fn config_error(&self) -> Option<&ConfigError> {
        match self {
            Renderer::Misconfigured(e) => Some(e),
            _ => None,
        }
    }

    /// The answer the renderer currently shows.
    pub fn answer(&self) -> Option<AnswerValue> {
        match self {
            Renderer::SingleChoice(v) => {
                Some(AnswerValue::SingleChoice(v.selected().map(str::to_string)))
            }
            Renderer::MultipleChoice(v) => Some(AnswerValue::MultipleChoice(v.selected().to_vec())),
            Renderer::FillBlank(v) => Some(AnswerValue::FillBlank(v.values().to_vec())),
            Renderer::Puzzle(v) => Some(v.answer()),
            Renderer::Matching(v) => Some(v.answer()),
            Renderer::Misconfigured(_) => None,
        }
    }

    /// Whether a drag gesture is in flight.
    pub fn is_dragging(&self) -> bool {
        match self {
            Renderer::Puzzle(v) => v.dragging().is_some(),
            Renderer::Matching(v) => v.dragging_left().is_some(),
            _ => false,
        }
    }

    /// Apply one gesture. Returns the value to publish, if any, and the
    /// feedback for the host.
    pub fn apply(&mut self, gesture: Gesture) -> (Option<AnswerValue>, Feedback) {
        match (self, gesture) {
            (Renderer::SingleChoice(v), Gesture::Select { key }) => published(v.select(&key)),

            (Renderer::MultipleChoice(v), Gesture::Toggle { index }) => published(v.toggle(index)),

            (Renderer::FillBlank(v), Gesture::Edit { index, value }) => {
                published(v.edit(index, &value))
            }
            (Renderer::FillBlank(v), Gesture::ToggleHint { index }) => match v.toggle_hint(index) {
                Some(visible) => (None, Feedback::Hint { index, visible }),
                None => (None, Feedback::Ignored),
            },

            (Renderer::Puzzle(v), Gesture::DragFragment { zone, position }) => {
                let started = v
                    .uid_at(zone, position)
                    .is_some_and(|uid| v.begin_drag(uid));
                (None, if started { Feedback::Applied } else { Feedback::Ignored })
            }
            (Renderer::Puzzle(v), Gesture::DropInChain { index }) => {
                published(v.drop_in_chain(index))
            }
            (Renderer::Puzzle(v), Gesture::DropInWorkspace { x, centers }) => {
                published(v.drop_in_workspace(x, &centers))
            }
            (Renderer::Puzzle(v), Gesture::DropOnPool) => published(v.drop_on_pool()),
            (Renderer::Puzzle(v), Gesture::RemoveFragment { position }) => {
                let removed = v
                    .uid_at(Zone::Chain, position)
                    .and_then(|uid| v.remove(uid));
                published(removed)
            }
            (Renderer::Puzzle(v), Gesture::CancelDrag) => {
                v.cancel_drag();
                (None, Feedback::Applied)
            }
            (Renderer::Puzzle(v), Gesture::Clear) => published(Some(v.clear())),
            (Renderer::Puzzle(v), Gesture::Check) => (
                None,
                Feedback::PuzzleCheck {
                    correct: v.check(),
                },
            ),

            (Renderer::Matching(v), Gesture::SelectLeft { index }) => (
                None,
                Feedback::Selection {
                    left: v.select_left(index),
                },
            ),
            (Renderer::Matching(v), Gesture::ClickRight { index }) => {
                published(v.click_right(index))
            }
            (Renderer::Matching(v), Gesture::DragLeft { index }) => {
                let started = v.begin_drag(index);
                (None, if started { Feedback::Applied } else { Feedback::Ignored })
            }
            (Renderer::Matching(v), Gesture::DropOnRight { index }) => {
                published(v.drop_on_right(index))
            }
            (Renderer::Matching(v), Gesture::Unpair { index }) => published(v.unpair(index)),
            (Renderer::Matching(v), Gesture::CancelDrag) => {
                v.cancel_drag();
                (None, Feedback::Applied)
            }
            (Renderer::Matching(v), Gesture::Clear) => published(Some(v.clear())),
            (Renderer::Matching(v), Gesture::Check) => (
                None,
                Feedback::MatchCheck { verdict: v.check() },
            ),

            (_, gesture) => {
                tracing::debug!(?gesture, "gesture does not apply to the active question");
                (None, Feedback::Ignored)
            }
        }
    }
}

fn published(value: Option<AnswerValue>) -> (Option<AnswerValue>, Feedback) {
    match value {
        Some(v) => (Some(v), Feedback::Applied),
        None => (None, Feedback::Ignored),
    }
}

/// The question currently owning the interaction state.
#[derive(Debug, Clone)]
pub struct ActiveQuestion {
    pub descriptor: QuestionDescriptor,
    pub renderer: Renderer,
}

/// The answer-capture engine for one mounted question slot.
pub struct Engine<S: AnswerSink> {
    config: EngineConfig,
    rng: StdRng,
    sink: S,
    active: Option<ActiveQuestion>,
}

impl<S: AnswerSink> Engine<S> {
    pub fn new(sink: S) -> Self {
        Self::with_config(EngineConfig::default(), sink)
    }

    pub fn with_config(config: EngineConfig, sink: S) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            sink,
            active: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Make `descriptor` the active question. Re-activating the current id
    /// keeps its state; any other id discards the previous state, including
    /// a pending drag, and seeds fresh state from `stored`.
    pub fn activate(
        &mut self,
        descriptor: QuestionDescriptor,
        stored: Option<&AnswerValue>,
    ) -> &Renderer {
        let active = match self.active.take() {
            Some(active) if active.descriptor.id == descriptor.id => active,
            previous => {
                if let Some(previous) = previous.filter(|p| p.renderer.is_dragging()) {
                    tracing::debug!(id = %previous.descriptor.id, "question changed mid-drag, discarding gesture");
                }
                tracing::debug!(id = %descriptor.id, question_type = %descriptor.question_type, "activating question");

                let (renderer, initial) =
                    Renderer::build(&descriptor, stored, &self.config, &mut self.rng);
                if let Some(e) = renderer.config_error() {
                    tracing::warn!(id = %descriptor.id, "question misconfigured: {e}");
                }
                if let Some(value) = initial {
                    self.sink.publish(value);
                }
                ActiveQuestion {
                    descriptor,
                    renderer,
                }
            }
        };
        &self.active.insert(active).renderer
    }

    /// Like [`activate`](Self::activate), reading the stored answer from its
    /// JSON form. Malformed stored values are treated as absent.
    pub fn activate_json(&mut self, descriptor: QuestionDescriptor, stored: Option<&Value>) -> &Renderer {
        let stored = stored.and_then(|v| {
            let parsed = AnswerValue::from_json(descriptor.question_type, v);
            if parsed.is_none() {
                tracing::debug!(id = %descriptor.id, "ignoring malformed stored answer");
            }
            parsed
        });
        self.activate(descriptor, stored.as_ref())
    }

    /// Tear down the active question's state.
    pub fn deactivate(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<&ActiveQuestion> {
        self.active.as_ref()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.descriptor.id.as_str())
    }

    pub fn renderer(&self) -> Option<&Renderer> {
        self.active.as_ref().map(|a| &a.renderer)
    }

    /// Apply a gesture to the active question, publishing any new answer.
    pub fn apply(&mut self, gesture: Gesture) -> Feedback {
        let Some(active) = self.active.as_mut() else {
            tracing::debug!(?gesture, "no active question");
            return Feedback::Ignored;
        };
        let (value, feedback) = active.renderer.apply(gesture);
        if let Some(value) = value {
            self.sink.publish(value);
        }
        feedback
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Payload;
    use crate::sink::RecordingSink;

    fn seeded() -> Engine<RecordingSink> {
        let config = EngineConfig {
            shuffle_seed: Some(3),
            ..EngineConfig::default()
        };
        Engine::with_config(config, RecordingSink::new())
    }

    fn puzzle(id: &str) -> QuestionDescriptor {
        QuestionDescriptor::new(
            id,
            QuestionType::PuzzleGame,
            Payload {
                puzzle_fragments: vec!["a".into(), "b".into()],
                puzzle_solution: Some("a b".into()),
                ..Payload::default()
            },
        )
    }

    #[test]
    fn reactivating_same_id_keeps_state() {
        let mut engine = seeded();
        engine.activate(puzzle("p1"), None);
        engine.apply(Gesture::DragFragment {
            zone: Zone::Pool,
            position: 0,
        });
        engine.apply(Gesture::DropInChain { index: 0 });
        engine.activate(puzzle("p1"), None);
        let Some(Renderer::Puzzle(p)) = engine.renderer() else {
            panic!("expected puzzle");
        };
        assert_eq!(p.chain().len(), 1);
    }

    #[test]
    fn id_change_cancels_pending_drag() {
        let mut engine = seeded();
        engine.activate(puzzle("p1"), None);
        assert_eq!(
            engine.apply(Gesture::DragFragment {
                zone: Zone::Pool,
                position: 0
            }),
            Feedback::Applied
        );
        engine.activate(puzzle("p2"), None);
        assert_eq!(
            engine.apply(Gesture::DropInChain { index: 0 }),
            Feedback::Ignored
        );
        assert!(engine.sink().is_empty());
    }

    #[test]
    fn unknown_type_renders_single_choice() {
        let descriptor = QuestionDescriptor::from_json(serde_json::json!({
            "id": 9,
            "question_type": "error_spotting",
            "options": {"A": "yes", "B": "no"}
        }));
        let mut engine = seeded();
        assert!(matches!(
            engine.activate(descriptor, None),
            Renderer::SingleChoice(_)
        ));
        engine.apply(Gesture::Select { key: "B".into() });
        assert_eq!(
            engine.sink().last(),
            Some(&AnswerValue::SingleChoice(Some("B".into())))
        );
    }

    #[test]
    fn mismatched_gesture_is_ignored() {
        let mut engine = seeded();
        engine.activate(puzzle("p1"), None);
        assert_eq!(engine.apply(Gesture::Toggle { index: 0 }), Feedback::Ignored);
        assert!(engine.sink().is_empty());
    }

    #[test]
    fn no_active_question_ignores_everything() {
        let mut engine = seeded();
        assert_eq!(engine.apply(Gesture::Clear), Feedback::Ignored);
        engine.activate(puzzle("p1"), None);
        engine.deactivate();
        assert!(engine.active_id().is_none());
        assert_eq!(engine.apply(Gesture::Check), Feedback::Ignored);
    }

    #[test]
    fn misconfigured_fill_blank() {
        let mut engine = seeded();
        let renderer = engine.activate(
            QuestionDescriptor::new("f", QuestionType::FillBlank, Payload::default()),
            None,
        );
        assert_eq!(renderer.config_error(), Some(&ConfigError::NoBlanks));
        assert!(renderer.answer().is_none());
        assert!(engine.sink().is_empty());
    }

    #[test]
    fn malformed_stored_json_is_absent() {
        let mut engine = seeded();
        let descriptor = QuestionDescriptor::new(
            "f",
            QuestionType::FillBlank,
            Payload {
                blank_answers: vec!["x".into()],
                ..Payload::default()
            },
        );
        engine.activate_json(descriptor, Some(&serde_json::json!({"bad": true})));
        assert_eq!(
            engine.sink().published(),
            &[AnswerValue::FillBlank(vec![String::new()])]
        );
    }
}
