//! Question gateway
//!
//! Mediates every call to the question API:
//!
//! - `categories()` is fetched once and kept for the lifetime of the gateway.
//! - `questions(category)` is cached per lower-cased category for a TTL
//!   (5 minutes by default). Concurrent callers for the same category share
//!   one network call and receive the same `Arc`.
//!
//! Failures are returned to the caller and never cached.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use reqwest::Client;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, OnceCell};
use tracing::{debug, info, warn};

use super::cache::{CacheEntry, Clock, SystemClock};
use super::error::{GatewayError, Result};
use super::normalize;
use crate::filter::CategoryCatalog;
use crate::types::Question;

/// Default TTL for per-category question caches
pub const DEFAULT_QUESTION_TTL: Duration = Duration::from_secs(5 * 60);

type FetchResult = Result<Arc<Vec<Question>>>;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// API base URL, e.g. `http://localhost:8080`
    pub base_url: String,
    /// How long a fetched category stays fresh
    pub question_ttl: Duration,
    /// Transport timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            question_ttl: DEFAULT_QUESTION_TTL,
            timeout_secs: 30,
        }
    }
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Gateway counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GatewayStats {
    /// Requests actually sent to the API
    pub network_fetches: u64,
    /// Calls answered from a cache
    pub cache_hits: u64,
    /// Calls that joined another caller's in-flight fetch
    pub coalesced: u64,
}

/// Catalog entry joined with what the API currently offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOverview {
    pub slug: String,
    pub display_name: String,
    /// Name the API lists, when the category is available
    pub api_name: Option<String>,
    pub question_count: usize,
}

impl CategoryOverview {
    pub fn is_available(&self) -> bool {
        self.api_name.is_some()
    }
}

/// Client-side data gateway for the question API
pub struct QuestionGateway {
    config: GatewayConfig,
    client: Client,
    clock: Arc<dyn Clock>,
    categories: OnceCell<Arc<Vec<String>>>,
    /// Keyed by lower-cased category
    cache: DashMap<String, CacheEntry>,
    /// Keyed by exact category spelling
    in_flight: DashMap<String, broadcast::Sender<FetchResult>>,
    network_fetches: AtomicU64,
    cache_hits: AtomicU64,
    coalesced: AtomicU64,
}

impl QuestionGateway {
    /// Create a gateway using the wall clock
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a gateway aging its cache with `clock`
    pub fn with_clock(mut config: GatewayConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            clock,
            categories: OnceCell::new(),
            cache: DashMap::new(),
            in_flight: DashMap::new(),
            network_fetches: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn stats(&self) -> GatewayStats {
        GatewayStats {
            network_fetches: self.network_fetches.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
        }
    }

    /// All category names the API knows, fetched at most once
    pub async fn categories(&self) -> Result<Arc<Vec<String>>> {
        if let Some(categories) = self.categories.get() {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(categories));
        }

        let categories = self
            .categories
            .get_or_try_init(|| async {
                let url = format!("{}/api/categories", self.config.base_url);
                let body = self.fetch(&url).await?;
                let categories = normalize::parse_categories(&body)?;
                info!(count = categories.len(), "Fetched categories");
                Ok::<_, GatewayError>(Arc::new(categories))
            })
            .await?;

        Ok(Arc::clone(categories))
    }

    /// Questions of `category`, served from cache while fresh
    pub async fn questions(&self, category: &str, force_refresh: bool) -> FetchResult {
        let key = category.to_lowercase();

        let sender = loop {
            if !force_refresh {
                if let Some(data) = self.fresh(&key, category) {
                    self.cache_hits.fetch_add(1, Ordering::Relaxed);
                    debug!(category = category, "Question cache hit");
                    return Ok(data);
                }
            }

            let mut receiver = match self.in_flight.entry(category.to_string()) {
                Entry::Occupied(slot) => slot.get().subscribe(),
                Entry::Vacant(slot) => {
                    // A fetch may have completed between the check above and taking the slot
                    if !force_refresh {
                        if let Some(data) = self.fresh(&key, category) {
                            self.cache_hits.fetch_add(1, Ordering::Relaxed);
                            return Ok(data);
                        }
                    }
                    let (sender, _) = broadcast::channel(1);
                    slot.insert(sender.clone());
                    break sender;
                }
            };

            self.coalesced.fetch_add(1, Ordering::Relaxed);
            match receiver.recv().await {
                Ok(result) => return result,
                // Leader went away without an answer; take over
                Err(_) => continue,
            }
        };

        let guard = InFlightGuard {
            in_flight: &self.in_flight,
            key: category.to_string(),
            completed: false,
        };

        let result = self.fetch_questions(category).await.map(Arc::new);

        match &result {
            Ok(data) => {
                self.cache.insert(
                    key,
                    CacheEntry::new(self.clock.now(), category, Arc::clone(data)),
                );
            }
            Err(e) => warn!(category = category, error = %e, "Question fetch failed"),
        }

        guard.complete();
        let _ = sender.send(result.clone());
        result
    }

    /// Join the API's categories with a fixed catalog
    ///
    /// Catalog entries match API categories case-insensitively; counts are
    /// taken from the (cached) question lists.
    pub async fn category_overview(
        &self,
        catalog: &CategoryCatalog,
    ) -> Result<Vec<CategoryOverview>> {
        let categories = self.categories().await?;
        let mut overview = Vec::with_capacity(catalog.entries().len());

        for info in catalog.entries() {
            let api_name = categories
                .iter()
                .find(|c| c.eq_ignore_ascii_case(&info.store_name))
                .cloned();

            let question_count = match &api_name {
                Some(name) => self.questions(name, false).await?.len(),
                None => 0,
            };

            overview.push(CategoryOverview {
                slug: info.slug.clone(),
                display_name: info.display_name.clone(),
                api_name,
                question_count,
            });
        }

        Ok(overview)
    }

    fn fresh(&self, key: &str, category: &str) -> Option<Arc<Vec<Question>>> {
        let entry = self.cache.get(key)?;
        if entry.serves(category, self.clock.now(), self.config.question_ttl) {
            Some(Arc::clone(&entry.data))
        } else {
            None
        }
    }

    async fn fetch_questions(&self, category: &str) -> Result<Vec<Question>> {
        let url = format!(
            "{}/api/questions/{}",
            self.config.base_url,
            urlencoding::encode(category)
        );
        let body = self.fetch(&url).await?;
        let questions = normalize::parse_questions(&body)?;
        info!(category = category, count = questions.len(), "Fetched questions");
        Ok(questions)
    }

    async fn fetch(&self, url: &str) -> Result<bytes::Bytes> {
        self.network_fetches.fetch_add(1, Ordering::Relaxed);
        debug!(url = url, "GET");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.is_empty() {
                status.canonical_reason().unwrap_or("Unknown").to_string()
            } else {
                text
            };
            return Err(GatewayError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes().await?)
    }
}

/// Removes the in-flight slot if the leading fetch is dropped mid-way, so
/// waiters see the channel close and retry
struct InFlightGuard<'a> {
    in_flight: &'a DashMap<String, broadcast::Sender<FetchResult>>,
    key: String,
    completed: bool,
}

impl InFlightGuard<'_> {
    fn complete(mut self) {
        self.in_flight.remove(&self.key);
        self.completed = true;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.in_flight.remove(&self.key);
        }
    }
}
