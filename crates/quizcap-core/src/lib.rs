//! quizcap-core: interactive answer-capture engine.
//!
//! Given a question descriptor and the previously stored answer, the engine
//! selects a variant renderer, seeds its private interaction state, and
//! publishes a canonical answer value to the host after every committing
//! gesture. It performs no I/O of its own beyond optional question-set and
//! config loading.

pub mod answer;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod question_set;
pub mod sink;
pub mod variants;

pub use answer::AnswerValue;
pub use config::EngineConfig;
pub use descriptor::{QuestionDescriptor, QuestionType};
pub use engine::{Engine, Renderer};
pub use error::ConfigError;
pub use gesture::{Feedback, Gesture};
pub use sink::{AnswerSink, RecordingSink};
