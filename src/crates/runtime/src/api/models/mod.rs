//! API data transfer objects (DTOs) and response models
//!
//! Request/response shapes for the run/thread/assistant/store surface.
//! These are intentionally thin: database models already carry the
//! canonical shape, these types exist to accept partial/optional input
//! and to avoid leaking internal column names where they'd differ.

pub mod assistant;
pub mod cron;
pub mod run;
pub mod store;
pub mod thread;

pub use assistant::{AssistantResponse, CreateAssistantRequest, SearchAssistantsRequest, UpdateAssistantRequest};
pub use cron::{CreateCronRequest, CronResponse};
pub use run::{CancelRunResponse, CreateRunRequest, RunResponse};
pub use store::{DeleteStoreItemQuery, GetStoreItemQuery, PutStoreItemRequest, SearchStoreItemsRequest, StoreItemResponse};
pub use thread::{CreateThreadRequest, PatchThreadRequest, ThreadResponse, ThreadStateResponse};

/// System health response
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub version: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(status: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            database: database.into(),
            version: crate::version::VERSION.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_carries_current_version() {
        let health = HealthResponse::new("ok", "connected");
        assert_eq!(health.status, "ok");
        assert!(!health.version.is_empty());
    }
}
