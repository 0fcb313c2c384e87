// Core algorithm exports
pub mod eligibility;
pub mod geography;
pub mod matcher;
pub mod reasons;
pub mod scoring;
pub mod text;
pub mod tiers;

pub use geography::{is_underserved, resolve_state, StateInfo, CURRENT_PROGRAM_YEAR};
pub use matcher::{MatchPolicy, Matcher};
pub use reasons::{fallback_highlights, top_reasons};
pub use scoring::score_pair;
pub use text::normalize;
pub use tiers::classify;
