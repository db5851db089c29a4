//! Error types for the scoreboard

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by the data source
///
/// Stored verbatim and handed to the rendering layer; the scoreboard never
/// inspects it.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
    /// HTTP status, when the source is an HTTP endpoint
    #[serde(default)]
    pub status: Option<u16>,
    /// Error payload exactly as the source delivered it
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            details: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}' (expected All, Hot, Warm or Cold)")]
pub struct ParseCategoryError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort field '{0}' (expected Name, StageName, Amount, Opportunity_Score__c or CloseDate)")]
pub struct ParseSortFieldError(pub String);
