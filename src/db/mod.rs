//! Database layer
//!
//! MongoDB wrapper, document schemas and the question store seam.

pub mod mongo;
pub mod schemas;
pub mod store;

pub use mongo::{IntoIndexes, MongoClient, MongoCollection};
pub use store::{MemoryQuestionStore, MongoQuestionStore, QuestionStore};
