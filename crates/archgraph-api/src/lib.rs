//! HTTP transport for ArchGraph module projections.

pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult, Operation};
pub use response::{success, ApiResponse};
pub use routes::create_router;
pub use server::Server;
pub use state::AppState;
