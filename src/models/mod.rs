// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CensusTract, ComplianceChecks, Criterion, CriterionScore, Deal, DealStatus, GateCheck,
    GateOutcome, GateStatus, MatchResult, MatchRun, MatchTier, Program, Provider, ProviderKind,
};
pub use requests::{HighlightsQuery, RunMatchRequest};
pub use responses::{ErrorResponse, HealthResponse, HighlightsResponse};
