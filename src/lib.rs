//! Question Hub - categorized interview questions over HTTP
//!
//! The server side exposes `GET /api/categories` and
//! `GET /api/questions/{category}` over a MongoDB collection. The client side
//! is a caching [`QuestionGateway`](client::QuestionGateway) plus a pure
//! filter engine for narrowing a fetched category down by search text, tags
//! and difficulty.

pub mod client;
pub mod config;
pub mod db;
pub mod filter;
pub mod logging;
pub mod routes;
pub mod seed;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{HubError, Result};
