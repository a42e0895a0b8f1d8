//! HTTP layer - routes, handlers and extractors.

pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod user_resource;

pub use routes::create_router;
pub use state::AppState;
pub use user_resource::user_routes;
