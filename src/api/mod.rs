//! API Module
//!
//! Local admin surface for inspecting and steering the cache.
//!
//! # Endpoints
//! - `GET /stats` - Cache statistics
//! - `POST /cleanup` - Run intelligent cleanup now
//! - `PUT /cache-size` - Change the byte budget
//! - `POST /memory-warning` - Raise the low-memory signal
//! - `DELETE /entries` - Clear the cache
//! - `DELETE /entries/:key` - Remove one entry
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
