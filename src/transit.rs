//! Transit Cache Module
//!
//! Convenience layer for the two payload kinds the app caches: journey
//! option lists per saved route and downloaded images.
//!
//! Keys follow a fixed convention so other components can find entries:
//! `journey_<route-id>` and `image_<url>`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::{sequence_size, CachePriority, EstimateSize, IntelligentCache};

const JOURNEY_KEY_PREFIX: &str = "journey_";
const IMAGE_KEY_PREFIX: &str = "image_";

// == Journey Option ==
/// One departure offered for a saved route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyOption {
    /// Planned departure (RFC 3339)
    pub departure: String,
    /// Planned arrival (RFC 3339)
    pub arrival: String,
    /// Line designation, e.g. "S1" or "RE7"
    pub line: String,
    pub platform: Option<String>,
    pub delay_minutes: Option<i32>,
}

// == Cached Value ==
/// Payload stored in the transit cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Journeys(Arc<Vec<JourneyOption>>),
    Image(Arc<Vec<u8>>),
    Text(String),
}

impl EstimateSize for CachedValue {
    fn estimated_size(&self) -> usize {
        match self {
            CachedValue::Journeys(options) => sequence_size(options.len()),
            CachedValue::Image(bytes) => bytes.estimated_size(),
            CachedValue::Text(text) => text.estimated_size(),
        }
    }
}

pub fn journey_key(route_id: &str) -> String {
    format!("{}{}", JOURNEY_KEY_PREFIX, route_id)
}

pub fn image_key(url: &str) -> String {
    format!("{}{}", IMAGE_KEY_PREFIX, url)
}

// == Transit Cache ==
/// Typed wrapper over a shared [`IntelligentCache`].
#[derive(Debug, Clone)]
pub struct TransitCache {
    cache: IntelligentCache<CachedValue>,
}

impl TransitCache {
    pub fn new(cache: IntelligentCache<CachedValue>) -> Self {
        Self { cache }
    }

    /// The underlying cache, for statistics and cleanup.
    pub fn inner(&self) -> &IntelligentCache<CachedValue> {
        &self.cache
    }

    // == Journeys ==
    /// Caches the journey options of a route. Favorite routes get High
    /// priority, everything else Normal.
    pub fn cache_journey_options(
        &self,
        route_id: &str,
        is_favorite: bool,
        options: Vec<JourneyOption>,
    ) {
        let priority = if is_favorite {
            CachePriority::High
        } else {
            CachePriority::Normal
        };
        self.cache.store(
            journey_key(route_id),
            CachedValue::Journeys(Arc::new(options)),
            priority,
        );
    }

    /// A payload of another kind under the journey key counts as a miss.
    pub fn journey_options(&self, route_id: &str) -> Option<Arc<Vec<JourneyOption>>> {
        self.cache.retrieve_with(&journey_key(route_id), |value| match value {
            CachedValue::Journeys(options) => Some(Arc::clone(options)),
            _ => None,
        })
    }

    // == Images ==
    pub fn cache_image(&self, url: &str, data: Vec<u8>, priority: CachePriority) {
        self.cache
            .store(image_key(url), CachedValue::Image(Arc::new(data)), priority);
    }

    pub fn image(&self, url: &str) -> Option<Arc<Vec<u8>>> {
        self.cache.retrieve_with(&image_key(url), |value| match value {
            CachedValue::Image(data) => Some(Arc::clone(data)),
            _ => None,
        })
    }
}
