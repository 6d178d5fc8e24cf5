//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CleanupReport;

/// Response body for POST /cleanup
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    pub message: String,
    pub report: CleanupReport,
}

impl CleanupResponse {
    pub fn new(report: CleanupReport) -> Self {
        Self {
            message: format!("Cleanup removed {} entries", report.removed()),
            report,
        }
    }
}

/// Response body for PUT /cache-size
#[derive(Debug, Clone, Serialize)]
pub struct CacheSizeResponse {
    /// Byte budget now in effect, after the 1 MiB floor
    pub max_size_bytes: usize,
    /// Present when the new budget forced a cleanup
    pub cleanup: Option<CleanupReport>,
}

/// Response body for POST /memory-warning
#[derive(Debug, Clone, Serialize)]
pub struct MemoryWarningResponse {
    pub message: String,
    /// Number of responders that will handle the warning
    pub subscribers: usize,
}

impl MemoryWarningResponse {
    pub fn new(subscribers: usize) -> Self {
        Self {
            message: "Memory warning dispatched".to_string(),
            subscribers,
        }
    }
}

/// Response body for DELETE /entries and DELETE /entries/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    /// The key that was deleted, absent when the whole cache was cleared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl DeleteResponse {
    pub fn key(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' removed", key),
            key: Some(key),
        }
    }

    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
            key: None,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
