use crate::models::domain::MatchTier;

/// Aggregate score at or above this is an excellent match.
pub const EXCELLENT_MIN: u8 = 80;

/// Aggregate score at or above this (and below excellent) is a good match.
pub const GOOD_MIN: u8 = 65;

/// Aggregate score at or above this (and below good) is a fair match.
pub const FAIR_MIN: u8 = 50;

/// Map an aggregate score to its match-strength tier. Boundary values belong
/// to the higher tier.
pub fn classify(score: u8) -> MatchTier {
    if score >= EXCELLENT_MIN {
        MatchTier::Excellent
    } else if score >= GOOD_MIN {
        MatchTier::Good
    } else if score >= FAIR_MIN {
        MatchTier::Fair
    } else {
        MatchTier::Weak
    }
}
