//! HTTP API for investigators
//!
//! Serves the ranked entity table, entity details, communities and the
//! investigation status trail from the latest published analysis snapshot.

pub mod handler;
pub mod server;

pub use handler::ApiError;
pub use server::{router, AppState, HttpServer};
