//! Adaptive multiple choice quizzing.
//!
//! A [`Session`] asks questions built from a [`FactStore`], choosing which
//! prompt to ask with a [`QuestionPicker`] that favours prompts the player
//! keeps getting wrong.

mod error;
pub mod fact;
pub mod picker;
pub mod question;
pub mod sample;
pub mod session;

pub use error::{Error, ErrorKind, Result};
pub use fact::{Fact, FactStore, MatchingRules};
pub use picker::{AdaptivePicker, PerformanceRecord, PickerConfig, QuestionPicker};
pub use question::Question;
pub use session::{Outcome, Session, SessionConfig, Summary};
