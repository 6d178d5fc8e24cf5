//! Request and Response models for the admin API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::SetCacheSizeRequest;
pub use responses::{
    CacheSizeResponse, CleanupResponse, DeleteResponse, HealthResponse, MemoryWarningResponse,
};
