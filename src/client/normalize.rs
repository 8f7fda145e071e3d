//! Typed parsing of API payloads into canonical client shapes
//!
//! Parsing fails closed: a record that cannot be identified or placed in a
//! category rejects the whole response instead of being skipped.

use serde::Deserialize;

use super::error::{GatewayError, Result};
use crate::types::{Difficulty, Question};

pub const MISSING_QUESTION: &str = "Question text unavailable";
pub const MISSING_ANSWER: &str = "Answer unavailable";

/// Question record as loosely delivered by the API
#[derive(Debug, Deserialize)]
struct RawQuestion {
    /// Store identifier; some serializers also emit a virtual `id`
    #[serde(rename = "_id")]
    store_id: Option<String>,
    id: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    category: Option<String>,
    tags: Option<Vec<String>>,
    difficulty: Option<Difficulty>,
}

impl RawQuestion {
    fn normalize(self, index: usize) -> Result<Question> {
        let id = self
            .store_id
            .filter(|id| !id.is_empty())
            .or_else(|| self.id.filter(|id| !id.is_empty()))
            .ok_or_else(|| GatewayError::Parse(format!("question #{} has no identifier", index)))?;
        let category = self
            .category
            .filter(|c| !c.is_empty())
            .ok_or_else(|| GatewayError::Parse(format!("question {} has no category", id)))?;

        Ok(Question {
            id,
            question: self
                .question
                .unwrap_or_else(|| MISSING_QUESTION.to_string()),
            answer: self.answer.unwrap_or_else(|| MISSING_ANSWER.to_string()),
            category,
            tags: self.tags.unwrap_or_default(),
            difficulty: self.difficulty.unwrap_or_default(),
        })
    }
}

/// Parse a `GET /api/questions/{category}` body
pub fn parse_questions(body: &[u8]) -> Result<Vec<Question>> {
    let raw: Vec<RawQuestion> = serde_json::from_slice(body)?;
    raw.into_iter()
        .enumerate()
        .map(|(index, q)| q.normalize(index))
        .collect()
}

/// Parse a `GET /api/categories` body
pub fn parse_categories(body: &[u8]) -> Result<Vec<String>> {
    Ok(serde_json::from_slice(body)?)
}
