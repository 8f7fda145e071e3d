//! Shared types: errors and question shapes

pub mod error;
pub mod question;

pub use error::{HubError, Result};
pub use question::{Difficulty, NewQuestion, Question, QuestionRecord, UnknownDifficulty};
