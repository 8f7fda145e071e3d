//! Question document schema

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::types::{Difficulty, NewQuestion, QuestionRecord};

/// Collection name for questions
pub const QUESTION_COLLECTION: &str = "questions";

/// Question document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct QuestionDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    pub question: String,

    pub answer: String,

    /// Category label, matched by exact equality
    pub category: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl QuestionDoc {
    /// Wire form; documents read back from the store always carry an id
    pub fn into_record(self) -> Option<QuestionRecord> {
        let id = self._id?;
        Some(QuestionRecord {
            id: id.to_hex(),
            question: self.question,
            answer: self.answer,
            category: self.category,
            tags: self.tags,
            difficulty: self.difficulty,
        })
    }
}

impl From<NewQuestion> for QuestionDoc {
    fn from(q: NewQuestion) -> Self {
        Self {
            _id: None,
            question: q.question,
            answer: q.answer,
            category: q.category,
            tags: q.tags,
            difficulty: q.difficulty,
        }
    }
}

impl IntoIndexes for QuestionDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "category": 1 },
            Some(
                IndexOptions::builder()
                    .name("category_index".to_string())
                    .build(),
            ),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_without_id_has_no_record() {
        let doc = QuestionDoc {
            question: "q".into(),
            answer: "a".into(),
            category: "Backend".into(),
            ..Default::default()
        };
        assert!(doc.into_record().is_none());
    }

    #[test]
    fn test_into_record_renders_hex_id() {
        let oid = ObjectId::new();
        let doc = QuestionDoc {
            _id: Some(oid),
            question: "What is a heap?".into(),
            answer: "A tree-shaped priority structure.".into(),
            category: "Data Structures".into(),
            tags: vec!["Heap".into()],
            difficulty: Some(Difficulty::Easy),
        };
        let record = doc.into_record().unwrap();
        assert_eq!(record.id, oid.to_hex());
        assert_eq!(record.category, "Data Structures");
        assert_eq!(record.difficulty, Some(Difficulty::Easy));
    }

    #[test]
    fn test_stored_doc_without_tags_defaults_empty() {
        let doc: QuestionDoc = bson::from_document(doc! {
            "question": "q",
            "answer": "a",
            "category": "Frontend",
        })
        .unwrap();
        assert!(doc.tags.is_empty());
        assert!(doc.difficulty.is_none());
    }

    #[test]
    fn test_category_index_declared() {
        let indices = QuestionDoc::into_indices();
        assert_eq!(indices.len(), 1);
        assert_eq!(indices[0].0, doc! { "category": 1 });
    }
}
