//! The five variant renderers. Each owns its private interaction state and
//! returns the value to publish from every committing operation.

pub mod fill_blank;
pub mod matching;
pub mod multiple;
pub mod puzzle;
pub mod single;

pub use fill_blank::FillBlank;
pub use matching::{MatchCheck, MatchingPairer};
pub use multiple::MultipleChoice;
pub use puzzle::{Fragment, PuzzleAssembler, Zone};
pub use single::SingleChoice;
