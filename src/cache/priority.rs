//! Cache Priority Module
//!
//! Priority tiers that decide an entry's TTL and its weight during eviction.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// == Cache Priority ==
/// Priority tier of a cache entry.
///
/// Ordered `Low < Normal < High < Critical`. Higher tiers live longer and are
/// evicted later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePriority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl CachePriority {
    /// All tiers from lowest to highest.
    pub const ALL: [CachePriority; 4] = [
        CachePriority::Low,
        CachePriority::Normal,
        CachePriority::High,
        CachePriority::Critical,
    ];

    // == Rank ==
    /// Numeric rank used by the eviction score (Low = 0 .. Critical = 3).
    pub fn rank(self) -> u8 {
        match self {
            CachePriority::Low => 0,
            CachePriority::Normal => 1,
            CachePriority::High => 2,
            CachePriority::Critical => 3,
        }
    }

    // == TTL ==
    /// Time-to-live granted to entries of this tier.
    pub fn ttl(self) -> Duration {
        match self {
            CachePriority::Low => Duration::from_secs(60),
            CachePriority::Normal => Duration::from_secs(300),
            CachePriority::High => Duration::from_secs(600),
            CachePriority::Critical => Duration::from_secs(1800),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CachePriority::Low => "low",
            CachePriority::Normal => "normal",
            CachePriority::High => "high",
            CachePriority::Critical => "critical",
        }
    }
}

impl fmt::Display for CachePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CachePriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(CachePriority::Low),
            "normal" => Ok(CachePriority::Normal),
            "high" => Ok(CachePriority::High),
            "critical" => Ok(CachePriority::Critical),
            other => Err(format!("Unknown cache priority: {}", other)),
        }
    }
}
