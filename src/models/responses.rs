use serde::{Deserialize, Serialize};

/// Response for the deal-highlights endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightsResponse {
    #[serde(rename = "dealId")]
    pub deal_id: String,
    #[serde(rename = "programYear")]
    pub program_year: u16,
    pub highlights: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub backend: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
