//! Fixed catalog of browsable categories

use serde::Serialize;

/// One browsable category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    /// URL-friendly identifier, e.g. `data-structures`
    pub slug: String,
    /// Human-readable title
    pub display_name: String,
    /// Category label used by the store
    pub store_name: String,
}

impl CategoryInfo {
    fn new(slug: &str, display_name: &str, store_name: &str) -> Self {
        Self {
            slug: slug.to_string(),
            display_name: display_name.to_string(),
            store_name: store_name.to_string(),
        }
    }
}

/// Slug to category mapping
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    entries: Vec<CategoryInfo>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self {
            entries: vec![
                CategoryInfo::new("frontend", "Frontend Development", "Frontend"),
                CategoryInfo::new("backend", "Backend Development", "Backend"),
                CategoryInfo::new("data-structures", "Data Structures", "Data Structures"),
                CategoryInfo::new("algorithms", "Algorithms", "Algorithms"),
                CategoryInfo::new("system-design", "System Design", "System Design"),
                CategoryInfo::new("databases", "Databases", "Databases"),
            ],
        }
    }
}

impl CategoryCatalog {
    pub fn new(entries: Vec<CategoryInfo>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CategoryInfo] {
        &self.entries
    }

    pub fn get(&self, slug: &str) -> Option<&CategoryInfo> {
        self.entries.iter().find(|e| e.slug == slug)
    }

    /// Resolve a slug; unknown slugs are passed through as the store name
    pub fn resolve(&self, slug: &str) -> CategoryInfo {
        self.get(slug)
            .cloned()
            .unwrap_or_else(|| CategoryInfo::new(slug, "Unknown Category", slug))
    }
}
