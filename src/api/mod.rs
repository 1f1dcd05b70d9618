//! API Module
//!
//! HTTP handlers and routing for the repository display service.
//!
//! # Endpoints
//! - `GET /repos/:username/:repo` - Render one repository
//! - `GET /repos` - Render a list of repositories as a grid
//! - `GET /users/:username/repos` - Render a user's repositories as a grid
//! - `POST /admin/cache/clear` - Empty both cache layers
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
