use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::domain::{ComplianceChecks, Deal, Program, Provider};

/// Errors that can occur when talking to the marketplace backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Marketplace API client
///
/// Handles all communication with the marketplace backend including:
/// - Fetching deal records and their compliance worksheets
/// - Listing candidate providers from the directory
pub struct MarketplaceClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl MarketplaceClient {
    /// Create a new marketplace client
    pub fn new(base_url: String, api_key: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            client,
        }
    }

    /// Fetch a deal together with its compliance worksheet, reconciled into
    /// one canonical record.
    ///
    /// The backend keeps the worksheet as a separate document maintained by
    /// the compliance workflow; its fields take precedence over whatever the
    /// deal document itself carries.
    pub async fn get_deal(&self, deal_id: &str) -> Result<Deal, BackendError> {
        let url = format!(
            "{}/deals/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(deal_id)
        );

        tracing::debug!("Fetching deal from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(format!("Deal {} not found", deal_id)));
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized);
        }
        if !status.is_success() {
            return Err(BackendError::ApiError(format!(
                "Failed to fetch deal: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        let deal_value = json
            .get("deal")
            .ok_or_else(|| BackendError::InvalidResponse("Missing deal object".into()))?;

        let mut deal: Deal = serde_json::from_value(deal_value.clone())
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse deal: {}", e)))?;

        if let Some(worksheet_value) = json.get("worksheet").filter(|value| !value.is_null()) {
            let worksheet: ComplianceChecks = serde_json::from_value(worksheet_value.clone())
                .map_err(|e| {
                    BackendError::InvalidResponse(format!("Failed to parse worksheet: {}", e))
                })?;
            reconcile_deal(&mut deal, worksheet);
        }

        Ok(deal)
    }

    /// List candidate providers from the directory, optionally pre-filtered
    /// by program focus and active status.
    pub async fn list_providers(
        &self,
        program: Option<Program>,
        active_only: bool,
    ) -> Result<Vec<Provider>, BackendError> {
        let base = format!("{}/providers", self.base_url.trim_end_matches('/'));

        // Backend filter format: JSON array of filter strings
        let mut filters: Vec<String> = Vec::new();
        if active_only {
            filters.push("equal(\"active\", true)".to_string());
        }
        if let Some(program) = program {
            filters.push(format!("contains(\"programFocus\", \"{}\")", program.as_str()));
        }

        let url = if filters.is_empty() {
            base
        } else {
            let filters_json = serde_json::to_string(&filters).map_err(|e| {
                BackendError::InvalidResponse(format!("Failed to encode filters: {}", e))
            })?;
            format!("{}?filters={}", base, urlencoding::encode(&filters_json))
        };

        tracing::debug!("Listing providers from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized);
        }
        if !status.is_success() {
            return Err(BackendError::ApiError(format!(
                "Failed to list providers: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        let total = json.get("total").and_then(|t| t.as_u64()).unwrap_or(0);

        let documents = json
            .get("providers")
            .and_then(|p| p.as_array())
            .ok_or_else(|| BackendError::InvalidResponse("Missing providers array".into()))?;

        let providers: Vec<Provider> = documents
            .iter()
            .filter_map(|doc| serde_json::from_value(doc.clone()).ok())
            .collect();

        tracing::debug!("Listed {} providers (total: {})", providers.len(), total);

        Ok(providers)
    }

    /// Upstream reachability probe for the health endpoint.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url.trim_end_matches('/'));

        match self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                tracing::warn!("Backend health check failed: {}", error);
                false
            }
        }
    }
}

/// Merge a standalone compliance worksheet into a deal record. Worksheet
/// fields override whatever the deal document carried; fields the worksheet
/// leaves empty keep the deal's own values.
pub fn reconcile_deal(deal: &mut Deal, worksheet: ComplianceChecks) {
    let merged = match deal.compliance.take() {
        Some(existing) => ComplianceChecks {
            qualifying_income_pct: worksheet
                .qualifying_income_pct
                .or(existing.qualifying_income_pct),
            tangible_property_pct: worksheet
                .tangible_property_pct
                .or(existing.tangible_property_pct),
            qualifying_services_pct: worksheet
                .qualifying_services_pct
                .or(existing.qualifying_services_pct),
            excluded_business: worksheet.excluded_business.or(existing.excluded_business),
        },
        None => worksheet,
    };
    deal.compliance = Some(merged);
}
