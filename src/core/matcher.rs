use chrono::Utc;
use uuid::Uuid;

use crate::core::{eligibility, reasons, scoring, tiers};
use crate::models::domain::{Deal, GateOutcome, GateStatus, MatchResult, MatchRun, Provider};

/// Policy knobs for a match run.
#[derive(Debug, Clone)]
pub struct MatchPolicy {
    /// Skip scoring entirely when the compliance gate comes back failing.
    /// Off by default: compliance review and capital matching are distinct
    /// workflows, so a failing gate is normally surfaced, not enforced.
    pub block_on_gate_failure: bool,
    /// How many reasons each match surfaces.
    pub reason_count: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            block_on_gate_failure: false,
            reason_count: reasons::DEFAULT_REASON_COUNT,
        }
    }
}

/// Match orchestrator: gate, score, classify, explain, rank.
#[derive(Debug, Clone)]
pub struct Matcher {
    policy: MatchPolicy,
}

impl Matcher {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn with_default_policy() -> Self {
        Self {
            policy: MatchPolicy::default(),
        }
    }

    /// Run a full match for one deal against a candidate directory.
    ///
    /// Evaluates the compliance gate once, scores every active candidate,
    /// classifies tiers and renders reasons, then sorts by score descending
    /// with ties broken by case-insensitive provider name ascending and
    /// truncates to `max_results`. Aside from the run id and timestamp the
    /// run is a pure function of its inputs, so identical inputs reproduce
    /// identical rankings.
    pub fn run(
        &self,
        deal: &Deal,
        candidates: Vec<Provider>,
        program_year: u16,
        max_results: usize,
    ) -> MatchRun {
        let total_candidates = candidates.len();
        let gate = eligibility::evaluate(deal);

        if self.policy.block_on_gate_failure && gate.status == GateStatus::Failing {
            tracing::warn!(
                "Deal {} blocked by failing compliance gate ({}/{} checks passing)",
                deal.deal_id,
                gate.tests_passing,
                gate.tests_completed
            );
            return finish_run(deal, program_year, gate, Vec::new(), total_candidates);
        }

        let mut matches: Vec<MatchResult> = candidates
            .into_iter()
            .filter(|provider| provider.active)
            .map(|provider| {
                let (breakdown, total) = scoring::score_pair(deal, &provider, program_year, &gate);
                let score = total.round() as u8;
                let match_reasons =
                    reasons::top_reasons(deal, &provider, &breakdown, self.policy.reason_count);

                MatchResult {
                    provider_id: provider.provider_id,
                    provider_name: provider.name,
                    score,
                    tier: tiers::classify(score),
                    breakdown,
                    reasons: match_reasons,
                }
            })
            .collect();

        let scored = matches.len();
        matches.sort_by(|a, b| {
            b.score.cmp(&a.score).then_with(|| {
                a.provider_name
                    .to_lowercase()
                    .cmp(&b.provider_name.to_lowercase())
            })
        });
        matches.truncate(max_results);

        tracing::debug!(
            "Scored {} of {} candidates for deal {}, returning {}",
            scored,
            total_candidates,
            deal.deal_id,
            matches.len()
        );

        finish_run(deal, program_year, gate, matches, total_candidates)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_policy()
    }
}

fn finish_run(
    deal: &Deal,
    program_year: u16,
    gate: GateOutcome,
    matches: Vec<MatchResult>,
    total_candidates: usize,
) -> MatchRun {
    MatchRun {
        run_id: Uuid::new_v4().to_string(),
        deal_id: deal.deal_id.clone(),
        program_year,
        gate,
        matches,
        total_candidates,
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{
        CensusTract, ComplianceChecks, DealStatus, MatchTier, Program, ProviderKind,
    };

    fn wv_deal() -> Deal {
        Deal {
            deal_id: "harper-mill".to_string(),
            name: "Harper Mill Redevelopment".to_string(),
            program: Program::Nmtc,
            status: DealStatus::Active,
            state: Some("WV".to_string()),
            address: None,
            tract: Some(CensusTract {
                tract_id: None,
                poverty_rate: Some(34.0),
                median_income_pct: Some(55.0),
                unemployment_ratio: Some(1.8),
            }),
            requested_amount: Some(4_000_000),
            total_cost: Some(12_000_000),
            financing_gap: Some(3_000_000),
            compliance: Some(ComplianceChecks {
                qualifying_income_pct: Some(62.0),
                tangible_property_pct: Some(85.0),
                qualifying_services_pct: Some(70.0),
                excluded_business: Some(false),
            }),
            sector: Some("community real estate".to_string()),
            mission: Some("Community health and training hub".to_string()),
            shovel_ready: Some(true),
            projected_jobs: Some(85),
        }
    }

    fn failing_deal() -> Deal {
        let mut deal = wv_deal();
        deal.compliance = Some(ComplianceChecks {
            qualifying_income_pct: Some(10.0),
            tangible_property_pct: Some(5.0),
            qualifying_services_pct: None,
            excluded_business: None,
        });
        deal
    }

    fn cde(id: &str, name: &str, capital: Option<u64>) -> Provider {
        Provider {
            provider_id: id.to_string(),
            name: name.to_string(),
            kind: ProviderKind::Cde,
            geographic_focus: vec!["WV".to_string()],
            sector_focus: vec!["community real estate".to_string()],
            program_focus: vec![Program::Nmtc],
            available_capital: capital,
            min_investment: None,
            max_investment: None,
            active: true,
        }
    }

    #[test]
    fn test_run_scores_and_ranks_candidates() {
        let matcher = Matcher::with_default_policy();
        let deal = wv_deal();

        let candidates = vec![
            cde("weak", "Weak Fit Partners", None),
            cde("strong", "Strong Fit Capital", Some(25_000_000)),
        ];

        let run = matcher.run(&deal, candidates, 2024, 10);

        assert_eq!(run.total_candidates, 2);
        assert_eq!(run.matches.len(), 2);
        assert_eq!(run.matches[0].provider_id, "strong");
        assert!(run.matches[0].score > run.matches[1].score);
        assert_eq!(run.deal_id, "harper-mill");
        assert_eq!(run.program_year, 2024);
    }

    #[test]
    fn test_inactive_candidates_are_skipped() {
        let matcher = Matcher::with_default_policy();
        let deal = wv_deal();

        let mut dormant = cde("dormant", "Dormant Fund", Some(25_000_000));
        dormant.active = false;
        let candidates = vec![dormant, cde("live", "Live Fund", Some(25_000_000))];

        let run = matcher.run(&deal, candidates, 2024, 10);

        // skipped candidates still count toward the candidate total
        assert_eq!(run.total_candidates, 2);
        assert_eq!(run.matches.len(), 1);
        assert_eq!(run.matches[0].provider_id, "live");
    }

    #[test]
    fn test_ties_break_by_name_case_insensitively() {
        let matcher = Matcher::with_default_policy();
        let deal = wv_deal();

        // Byte order would put "Riverbend" (R = 0x52) ahead of "allegheny"
        // (a = 0x61); folding case reverses that.
        let candidates = vec![
            cde("b", "Riverbend Community Partners", Some(25_000_000)),
            cde("a", "allegheny growth collaborative", Some(25_000_000)),
        ];

        let run = matcher.run(&deal, candidates, 2024, 10);

        assert_eq!(run.matches[0].score, run.matches[1].score);
        assert_eq!(run.matches[0].provider_id, "a");
        assert_eq!(run.matches[1].provider_id, "b");
    }

    #[test]
    fn test_truncates_to_max_results() {
        let matcher = Matcher::with_default_policy();
        let deal = wv_deal();

        let candidates: Vec<Provider> = (0..20)
            .map(|i| cde(&format!("p{}", i), &format!("Provider {:02}", i), Some(25_000_000)))
            .collect();

        let run = matcher.run(&deal, candidates, 2024, 5);

        assert_eq!(run.total_candidates, 20);
        assert_eq!(run.matches.len(), 5);
    }

    #[test]
    fn test_empty_candidate_list() {
        let matcher = Matcher::with_default_policy();
        let run = matcher.run(&wv_deal(), Vec::new(), 2024, 5);

        assert_eq!(run.total_candidates, 0);
        assert!(run.matches.is_empty());
        assert_eq!(run.gate.status, GateStatus::Passing);
    }

    #[test]
    fn test_failing_gate_is_informational_by_default() {
        let matcher = Matcher::with_default_policy();
        let run = matcher.run(&failing_deal(), vec![cde("c", "CDE", Some(25_000_000))], 2024, 5);

        assert_eq!(run.gate.status, GateStatus::Failing);
        assert_eq!(run.matches.len(), 1);
    }

    #[test]
    fn test_blocking_policy_skips_scoring_on_failing_gate() {
        let matcher = Matcher::new(MatchPolicy {
            block_on_gate_failure: true,
            reason_count: 2,
        });
        let run = matcher.run(&failing_deal(), vec![cde("c", "CDE", Some(25_000_000))], 2024, 5);

        assert_eq!(run.gate.status, GateStatus::Failing);
        assert!(run.matches.is_empty());
        assert_eq!(run.total_candidates, 1);
    }

    #[test]
    fn test_blocking_policy_leaves_partial_gates_alone() {
        let matcher = Matcher::new(MatchPolicy {
            block_on_gate_failure: true,
            reason_count: 2,
        });
        let mut deal = wv_deal();
        deal.compliance = Some(ComplianceChecks {
            qualifying_income_pct: Some(62.0),
            tangible_property_pct: Some(5.0),
            qualifying_services_pct: None,
            excluded_business: None,
        });

        let run = matcher.run(&deal, vec![cde("c", "CDE", Some(25_000_000))], 2024, 5);

        assert_eq!(run.gate.status, GateStatus::Partial);
        assert_eq!(run.matches.len(), 1);
    }

    #[test]
    fn test_perfect_candidate_is_excellent() {
        let matcher = Matcher::with_default_policy();
        let deal = wv_deal();
        let mut provider = cde("acc", "Appalachian Community Capital", Some(25_000_000));
        provider.sector_focus = vec![
            "community real estate".to_string(),
            "healthcare".to_string(),
        ];

        let run = matcher.run(&deal, vec![provider], 2024, 5);

        assert_eq!(run.matches[0].score, 100);
        assert_eq!(run.matches[0].tier, MatchTier::Excellent);
        assert_eq!(run.matches[0].breakdown.len(), 15);
        assert_eq!(run.matches[0].reasons.len(), 2);
    }

    #[test]
    fn test_reruns_reproduce_identical_rankings() {
        let matcher = Matcher::with_default_policy();
        let deal = wv_deal();
        let candidates = vec![
            cde("a", "Allegheny Growth Collaborative", None),
            cde("b", "Riverbend Community Partners", None),
            cde("c", "Cactus Flats Fund", Some(25_000_000)),
        ];

        let first = matcher.run(&deal, candidates.clone(), 2023, 10);
        let second = matcher.run(&deal, candidates, 2023, 10);

        let first_ids: Vec<&str> = first.matches.iter().map(|m| m.provider_id.as_str()).collect();
        let second_ids: Vec<&str> = second.matches.iter().map(|m| m.provider_id.as_str()).collect();
        assert_eq!(first_ids, second_ids);

        for (a, b) in first.matches.iter().zip(second.matches.iter()) {
            assert_eq!(a.score, b.score);
            assert_eq!(a.reasons, b.reasons);
        }
        assert_ne!(first.run_id, second.run_id);
    }
}
