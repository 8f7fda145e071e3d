//! Filter engine for fetched questions
//!
//! [`apply_filters`] is pure: it borrows the questions, never mutates them
//! and keeps their relative order. A question is kept when it matches the
//! search text AND the tag selection AND the difficulty selection; within
//! the tag and difficulty selections any one match is enough.

pub mod catalog;
pub mod view;

pub use catalog::{CategoryCatalog, CategoryInfo};
pub use view::{CategoryView, QuestionState};

use std::collections::BTreeSet;

use crate::types::{Difficulty, Question};

/// User-selected predicates for one category view
///
/// Tag and difficulty selections are kept lower-cased, so membership is
/// case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    selected_tags: BTreeSet<String>,
    selected_difficulties: BTreeSet<String>,
    search_query: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `tag` if unselected, otherwise unselect it. Returns whether it
    /// is selected afterwards.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        toggle(&mut self.selected_tags, tag)
    }

    /// Same as [`toggle_tag`](Self::toggle_tag) for difficulty labels
    pub fn toggle_difficulty(&mut self, difficulty: &str) -> bool {
        toggle(&mut self.selected_difficulties, difficulty)
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Drop every predicate
    pub fn clear(&mut self) {
        self.selected_tags.clear();
        self.selected_difficulties.clear();
        self.search_query.clear();
    }

    /// Number of active predicates (each tag, each difficulty, and the query)
    pub fn active_count(&self) -> usize {
        self.selected_tags.len()
            + self.selected_difficulties.len()
            + usize::from(!self.search_query.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    pub fn selected_tags(&self) -> impl Iterator<Item = &str> {
        self.selected_tags.iter().map(String::as_str)
    }

    pub fn selected_difficulties(&self) -> impl Iterator<Item = &str> {
        self.selected_difficulties.iter().map(String::as_str)
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Whether `question` passes every predicate
    pub fn matches(&self, question: &Question) -> bool {
        self.matches_search(question)
            && self.matches_tags(question)
            && self.matches_difficulty(question)
    }

    fn matches_search(&self, question: &Question) -> bool {
        if self.search_query.is_empty() {
            return true;
        }
        let query = self.search_query.to_lowercase();
        question.question.to_lowercase().contains(&query)
            || question.answer.to_lowercase().contains(&query)
    }

    fn matches_tags(&self, question: &Question) -> bool {
        self.selected_tags.is_empty()
            || question
                .tags
                .iter()
                .any(|tag| self.selected_tags.contains(&tag.to_lowercase()))
    }

    fn matches_difficulty(&self, question: &Question) -> bool {
        self.selected_difficulties.is_empty()
            || self
                .selected_difficulties
                .contains(question.difficulty.as_str())
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) -> bool {
    let key = value.to_lowercase();
    if set.remove(&key) {
        false
    } else {
        set.insert(key);
        true
    }
}

/// Questions passing `state`, in input order
pub fn apply_filters<'a>(questions: &'a [Question], state: &FilterState) -> Vec<&'a Question> {
    questions.iter().filter(|q| state.matches(q)).collect()
}

/// Distinct tags across `questions`, in first-seen order
pub fn available_tags(questions: &[Question]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut tags = Vec::new();
    for question in questions {
        for tag in &question.tags {
            if seen.insert(tag.as_str()) {
                tags.push(tag.clone());
            }
        }
    }
    tags
}

/// Difficulty labels offered as filter options
pub fn available_difficulties() -> [&'static str; 3] {
    Difficulty::ALL.map(|d| d.label())
}
