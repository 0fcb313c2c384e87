use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{reasons, Matcher};
use crate::models::{
    ErrorResponse, HealthResponse, HighlightsQuery, HighlightsResponse, Program, Provider,
    RunMatchRequest,
};
use crate::services::{BackendError, CacheKey, CacheManager, MarketplaceClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<MarketplaceClient>,
    pub cache: Arc<CacheManager>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/run", web::post().to(run_matches))
        .route("/deals/{deal_id}/highlights", web::get().to(deal_highlights))
        .route("/debug/cache", web::get().to(cache_stats))
        .route("/debug/cache", web::delete().to(flush_cache));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let backend_healthy = state.backend.health_check().await;

    let status = if backend_healthy { "healthy" } else { "degraded" };
    let backend = if backend_healthy {
        "reachable"
    } else {
        "unreachable"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: backend.to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Cache statistics, for operational debugging
async fn cache_stats(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.cache.stats())
}

/// Flush cached directory listings, e.g. after onboarding a provider
async fn flush_cache(state: web::Data<AppState>) -> impl Responder {
    state.cache.invalidate_all();
    tracing::info!("Provider cache flushed");
    HttpResponse::NoContent().finish()
}

/// Run AutoMatch for a deal
///
/// POST /api/v1/matches/run
///
/// Request body:
/// ```json
/// {
///   "dealId": "string",
///   "programYear": 2025,
///   "maxResults": 5
/// }
/// ```
async fn run_matches(
    state: web::Data<AppState>,
    req: web::Json<RunMatchRequest>,
) -> impl Responder {
    // Validate request
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for run_matches request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let max_results = req
        .max_results
        .unwrap_or(state.matching.default_max_results)
        .min(state.matching.max_results_cap) as usize;

    tracing::info!(
        "Running match for deal: {}, program year: {}, max results: {}",
        req.deal_id,
        req.program_year,
        max_results
    );

    // The deal is always fetched fresh so the run sees the current status
    // and worksheet
    let deal = match state.backend.get_deal(&req.deal_id).await {
        Ok(deal) => deal,
        Err(e) => return upstream_error("Failed to fetch deal", e),
    };

    if !deal.status.is_matchable() {
        return HttpResponse::Conflict().json(ErrorResponse {
            error: "Deal not matchable".to_string(),
            message: format!(
                "Deal {} is {} and cannot be matched",
                deal.deal_id,
                deal.status.as_str()
            ),
            status_code: 409,
        });
    }

    let candidates = match load_candidates(&state, &deal.program).await {
        Ok(candidates) => candidates,
        Err(e) => return upstream_error("Failed to list providers", e),
    };

    tracing::debug!(
        "Loaded {} candidate providers for deal {}",
        candidates.len(),
        deal.deal_id
    );

    // Run the matching algorithm
    let run = state
        .matcher
        .run(&deal, candidates, req.program_year, max_results);

    tracing::info!(
        "Returning {} matches for deal {} (from {} candidates)",
        run.matches.len(),
        run.deal_id,
        run.total_candidates
    );

    HttpResponse::Ok().json(run)
}

/// Provider-independent highlights for a deal
///
/// GET /api/v1/deals/{deal_id}/highlights?programYear=2025
///
/// Used by callers that need something to display before a match run has
/// produced per-provider reasons.
async fn deal_highlights(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HighlightsQuery>,
) -> impl Responder {
    let deal_id = path.into_inner();

    let deal = match state.backend.get_deal(&deal_id).await {
        Ok(deal) => deal,
        Err(e) => return upstream_error("Failed to fetch deal", e),
    };

    let highlights = reasons::fallback_highlights(&deal, query.program_year);

    HttpResponse::Ok().json(HighlightsResponse {
        deal_id: deal.deal_id,
        program_year: query.program_year,
        highlights,
    })
}

/// Load the active provider directory for a program, through the cache.
async fn load_candidates(
    state: &web::Data<AppState>,
    program: &Program,
) -> Result<Vec<Provider>, BackendError> {
    let cache_key = CacheKey::providers(Some(*program), true);

    if let Ok(cached) = state.cache.get::<Vec<Provider>>(&cache_key).await {
        return Ok(cached);
    }

    let providers = state.backend.list_providers(Some(*program), true).await?;

    if let Err(e) = state.cache.set(&cache_key, &providers).await {
        tracing::warn!("Failed to cache provider directory: {}", e);
    }

    Ok(providers)
}

fn upstream_error(context: &str, error: BackendError) -> HttpResponse {
    match error {
        BackendError::NotFound(message) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message,
            status_code: 404,
        }),
        other => {
            tracing::error!("{}: {}", context, other);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "Upstream request failed".to_string(),
                message: other.to_string(),
                status_code: 502,
            })
        }
    }
}
