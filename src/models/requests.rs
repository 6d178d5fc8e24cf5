//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for PUT /cache-size
#[derive(Debug, Clone, Deserialize)]
pub struct SetCacheSizeRequest {
    /// New byte budget; values below 1 MiB are raised to 1 MiB
    pub bytes: usize,
}

impl SetCacheSizeRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.bytes == 0 {
            return Some("Cache size must be greater than zero".to_string());
        }
        None
    }
}
