//! Client-side access to the question API
//!
//! The gateway owns all caching and payload normalization; consumers get
//! canonical [`Question`](crate::types::Question) values or a typed
//! [`GatewayError`].

pub mod cache;
pub mod error;
pub mod gateway;
pub mod normalize;

pub use cache::{CacheEntry, Clock, ManualClock, SystemClock};
pub use error::GatewayError;
pub use gateway::{
    CategoryOverview, GatewayConfig, GatewayStats, QuestionGateway, DEFAULT_QUESTION_TTL,
};
