//! HTTP API over the ingestion pipeline, analytics and achievements.
//!
//! Routes are nested under `/api/`. Every route except `/api/health`
//! requires the caller identity in `X-User-Id`, which an upstream
//! authenticator is trusted to set.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::serve;
pub use types::{ApiContext, CallerContext};
