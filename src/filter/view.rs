//! Per-session state of one category page
//!
//! Owns the fetched questions plus per-question UI flags and the active
//! filters. Every mutation recomputes the filtered view immediately, so
//! [`CategoryView::filtered`] is always consistent with the current state.

use std::sync::Arc;

use super::{available_tags, CategoryInfo, FilterState};
use crate::types::Question;

/// UI flags attached to one question
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestionState {
    pub expanded: bool,
    pub bookmarked: bool,
}

#[derive(Debug, Clone)]
pub struct CategoryView {
    info: CategoryInfo,
    questions: Arc<Vec<Question>>,
    states: Vec<QuestionState>,
    filters: FilterState,
    tags: Vec<String>,
    /// Indices into `questions` passing `filters`
    visible: Vec<usize>,
}

impl CategoryView {
    /// Empty view for `info`; questions arrive through `replace_questions`
    pub fn new(info: CategoryInfo) -> Self {
        Self {
            info,
            questions: Arc::new(Vec::new()),
            states: Vec::new(),
            filters: FilterState::new(),
            tags: Vec::new(),
            visible: Vec::new(),
        }
    }

    pub fn info(&self) -> &CategoryInfo {
        &self.info
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Distinct tags of the loaded questions, first-seen order
    pub fn available_tags(&self) -> &[String] {
        &self.tags
    }

    /// Questions passing the current filters, with their flags
    pub fn filtered(&self) -> Vec<(&Question, QuestionState)> {
        self.visible
            .iter()
            .map(|&i| (&self.questions[i], self.states[i]))
            .collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    pub fn state_of(&self, id: &str) -> Option<QuestionState> {
        self.position(id).map(|i| self.states[i])
    }

    /// Swap in a freshly fetched question list; flags reset
    pub fn replace_questions(&mut self, questions: Arc<Vec<Question>>) {
        self.states = vec![QuestionState::default(); questions.len()];
        self.tags = available_tags(&questions);
        self.questions = questions;
        self.recompute();
    }

    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        let selected = self.filters.toggle_tag(tag);
        self.recompute();
        selected
    }

    pub fn toggle_difficulty(&mut self, difficulty: &str) -> bool {
        let selected = self.filters.toggle_difficulty(difficulty);
        self.recompute();
        selected
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filters.set_search_query(query);
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.recompute();
    }

    pub fn active_filter_count(&self) -> usize {
        self.filters.active_count()
    }

    /// Flip the expanded flag of question `id`; `None` if unknown
    pub fn toggle_expanded(&mut self, id: &str) -> Option<bool> {
        let i = self.position(id)?;
        self.states[i].expanded = !self.states[i].expanded;
        self.recompute();
        Some(self.states[i].expanded)
    }

    /// Flip the bookmark flag of question `id`; `None` if unknown
    pub fn toggle_bookmark(&mut self, id: &str) -> Option<bool> {
        let i = self.position(id)?;
        self.states[i].bookmarked = !self.states[i].bookmarked;
        self.recompute();
        Some(self.states[i].bookmarked)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }

    fn recompute(&mut self) {
        self.visible = self
            .questions
            .iter()
            .enumerate()
            .filter(|(_, q)| self.filters.matches(q))
            .map(|(i, _)| i)
            .collect();
    }
}
