//! AutoMatch - matching and scoring engine for the tax-credit financing
//! marketplace
//!
//! This library scores capital-seeking deals against CDEs and investors
//! across a fixed set of weighted criteria, classifies match strength, and
//! produces ranked, explainable match runs.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{matcher::MatchPolicy, Matcher};
pub use crate::models::{Deal, MatchResult, MatchRun, MatchTier, Provider, RunMatchRequest};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let state = crate::core::resolve_state("west virginia");
        assert_eq!(state.map(|info| info.code), Some("WV"));

        let policy = MatchPolicy::default();
        assert!(!policy.block_on_gate_failure);
    }
}
