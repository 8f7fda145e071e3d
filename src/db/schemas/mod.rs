//! Database schemas
//!
//! Defines the MongoDB document structures.

mod question;

pub use question::{QuestionDoc, QUESTION_COLLECTION};
