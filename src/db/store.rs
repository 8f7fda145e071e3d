//! Question store abstraction
//!
//! The service only needs two reads from the store: the distinct category
//! labels and the questions of one category. `replace_all` exists for the
//! seeder.

use async_trait::async_trait;
use bson::doc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::db::schemas::{QuestionDoc, QUESTION_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::types::{HubError, NewQuestion, QuestionRecord, Result};

/// Read access to persisted questions
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Every distinct `category` value; order is unspecified
    async fn distinct_categories(&self) -> Result<Vec<String>>;

    /// Questions whose category equals `category` exactly (case-sensitive)
    async fn find_by_category(&self, category: &str) -> Result<Vec<QuestionRecord>>;

    /// Drop all questions and insert the given ones, returning the count
    async fn replace_all(&self, questions: Vec<NewQuestion>) -> Result<usize>;

    /// Short backend name for health output
    fn backend(&self) -> &'static str;
}

/// MongoDB-backed store
pub struct MongoQuestionStore {
    collection: MongoCollection<QuestionDoc>,
}

impl MongoQuestionStore {
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        let collection = mongo.collection::<QuestionDoc>(QUESTION_COLLECTION).await?;
        info!(
            db = mongo.db_name(),
            collection = QUESTION_COLLECTION,
            "Question store ready"
        );
        Ok(Self { collection })
    }
}

#[async_trait]
impl QuestionStore for MongoQuestionStore {
    async fn distinct_categories(&self) -> Result<Vec<String>> {
        self.collection.distinct_strings("category").await
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<QuestionRecord>> {
        let docs = self
            .collection
            .find_many(doc! { "category": category })
            .await?;

        let total = docs.len();
        let records: Vec<QuestionRecord> =
            docs.into_iter().filter_map(QuestionDoc::into_record).collect();

        if records.len() != total {
            warn!(
                category = category,
                dropped = total - records.len(),
                "Dropped stored questions without an _id"
            );
        }

        Ok(records)
    }

    async fn replace_all(&self, questions: Vec<NewQuestion>) -> Result<usize> {
        let deleted = self.collection.delete_all().await?;
        info!(deleted = deleted, "Cleared existing questions");

        let docs: Vec<QuestionDoc> = questions.into_iter().map(QuestionDoc::from).collect();
        self.collection.insert_many(docs).await
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}

/// In-memory store used by tests and by dev mode without MongoDB
pub struct MemoryQuestionStore {
    records: RwLock<Vec<QuestionRecord>>,
    next_id: AtomicU64,
    available: bool,
}

impl MemoryQuestionStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            available: true,
        }
    }

    /// Store whose every operation fails with `StoreUnavailable`
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Build a store holding the given questions
    pub async fn with_questions(questions: Vec<NewQuestion>) -> Self {
        let store = Self::new();
        let mut records = store.records.write().await;
        for q in questions {
            let record = store.assign_id(q);
            records.push(record);
        }
        drop(records);
        store
    }

    fn assign_id(&self, q: NewQuestion) -> QuestionRecord {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        QuestionRecord {
            id: format!("{:024x}", n),
            question: q.question,
            answer: q.answer,
            category: q.category,
            tags: q.tags,
            difficulty: q.difficulty,
        }
    }

    fn check_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(HubError::StoreUnavailable("memory store is offline".into()))
        }
    }
}

impl Default for MemoryQuestionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionStore for MemoryQuestionStore {
    async fn distinct_categories(&self) -> Result<Vec<String>> {
        self.check_available()?;
        let records = self.records.read().await;

        let mut categories: Vec<String> = Vec::new();
        for record in records.iter() {
            if !categories.contains(&record.category) {
                categories.push(record.category.clone());
            }
        }
        Ok(categories)
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<QuestionRecord>> {
        self.check_available()?;
        let records = self.records.read().await;

        let matches: Vec<QuestionRecord> = records
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect();

        debug!(category = category, count = matches.len(), "Memory store lookup");
        Ok(matches)
    }

    async fn replace_all(&self, questions: Vec<NewQuestion>) -> Result<usize> {
        self.check_available()?;
        let fresh: Vec<QuestionRecord> = questions.into_iter().map(|q| self.assign_id(q)).collect();
        let count = fresh.len();
        *self.records.write().await = fresh;
        Ok(count)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(category: &str, text: &str) -> NewQuestion {
        NewQuestion {
            question: text.into(),
            answer: format!("answer to {}", text),
            category: category.into(),
            tags: vec![],
            difficulty: None,
        }
    }

    #[tokio::test]
    async fn test_distinct_categories_dedupes() {
        let store = MemoryQuestionStore::with_questions(vec![
            question("Frontend", "a"),
            question("Backend", "b"),
            question("Frontend", "c"),
        ])
        .await;

        let mut categories = store.distinct_categories().await.unwrap();
        categories.sort();
        assert_eq!(categories, vec!["Backend", "Frontend"]);
    }

    #[tokio::test]
    async fn test_find_is_exact_and_case_sensitive() {
        let store = MemoryQuestionStore::with_questions(vec![
            question("Frontend", "a"),
            question("Backend", "b"),
        ])
        .await;

        assert_eq!(store.find_by_category("Frontend").await.unwrap().len(), 1);
        assert!(store.find_by_category("frontend").await.unwrap().is_empty());
        assert!(store.find_by_category(" Frontend").await.unwrap().is_empty());
        assert!(store.find_by_category("Cooking").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = MemoryQuestionStore::with_questions(vec![
            question("Frontend", "a"),
            question("Frontend", "b"),
        ])
        .await;

        let found = store.find_by_category("Frontend").await.unwrap();
        assert_ne!(found[0].id, found[1].id);
        assert_eq!(found[0].id.len(), 24);
    }

    #[tokio::test]
    async fn test_replace_all_swaps_contents() {
        let store = MemoryQuestionStore::with_questions(vec![question("Old", "x")]).await;

        let inserted = store
            .replace_all(vec![question("New", "y"), question("New", "z")])
            .await
            .unwrap();

        assert_eq!(inserted, 2);
        assert!(store.find_by_category("Old").await.unwrap().is_empty());
        assert_eq!(store.distinct_categories().await.unwrap(), vec!["New"]);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_read() {
        let store = MemoryQuestionStore::unavailable();

        let err = store.distinct_categories().await.unwrap_err();
        assert!(err.is_store_failure());
        tokio_test::assert_err!(store.find_by_category("Backend").await);
    }
}
