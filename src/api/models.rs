use serde::{Deserialize, Serialize};

use crate::projection::Coordinate;
use crate::satellite::SatelliteImages;
use crate::types::{Spot, SpotSummary};

/// A spot as returned to clients, with its satellite image URLs
#[derive(Debug, Serialize)]
pub struct SpotResponse {
    #[serde(flatten)]
    pub spot: Spot,
    #[serde(flatten)]
    pub images: SatelliteImages,
}

#[derive(Debug, Serialize)]
pub struct SpotSummaryResponse {
    #[serde(flatten)]
    pub spot: SpotSummary,
    #[serde(flatten)]
    pub images: SatelliteImages,
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    #[serde(default)]
    pub input: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ParseSuccess {
    pub success: bool,
    pub coordinates: Coordinate,
}

#[derive(Debug, Serialize)]
pub struct ParseFailure {
    pub success: bool,
    pub error: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub urls: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub database_state: &'static str,
    pub uploads: &'static str,
    pub timestamp: String,
    pub environment: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreTestResponse {
    pub status: &'static str,
    pub message: String,
    pub state: &'static str,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_count: Option<usize>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_state: Option<&'static str>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Default::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_details(mut self, details: impl ToString) -> Self {
        self.details = Some(details.to_string());
        self
    }
}
