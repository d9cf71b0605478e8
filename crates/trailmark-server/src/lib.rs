//! Trailmark server: HTTP API over the SEO enrichment pipeline.

pub mod error;
pub mod maintenance;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::build_router;
pub use state::AppState;
