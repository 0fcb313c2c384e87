use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::geography::CURRENT_PROGRAM_YEAR;

/// Request to run AutoMatch for a deal
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RunMatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "deal_id", rename = "dealId")]
    pub deal_id: String,
    #[serde(default = "default_program_year")]
    #[serde(alias = "program_year", rename = "programYear")]
    pub program_year: u16,
    #[validate(range(min = 1, max = 50))]
    #[serde(default)]
    #[serde(alias = "max_results", rename = "maxResults")]
    pub max_results: Option<u16>,
}

/// Query string for the deal-highlights endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightsQuery {
    #[serde(default = "default_program_year")]
    #[serde(alias = "program_year", rename = "programYear")]
    pub program_year: u16,
}

fn default_program_year() -> u16 {
    CURRENT_PROGRAM_YEAR
}
