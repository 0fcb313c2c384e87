use crate::core::geography::{is_underserved, resolve_state};
use crate::core::text::{normalize, token_set};
use crate::models::domain::{Criterion, CriterionScore, Deal, GateOutcome, Provider, ProviderKind};

/// Poverty-rate band earning the full tract weight.
const POVERTY_HIGH_PCT: f64 = 30.0;
/// Poverty-rate band earning half the tract weight.
const POVERTY_ELEVATED_PCT: f64 = 20.0;

/// Median-income band (pct of area median) earning the full weight.
const INCOME_LOW_PCT: f64 = 60.0;
/// Median-income band earning half the weight.
const INCOME_MODERATE_PCT: f64 = 80.0;

/// Unemployment-to-national ratio treated as distressed.
const UNEMPLOYMENT_HIGH_RATIO: f64 = 1.5;

/// Projected jobs count earning the full jobs-impact weight.
const JOBS_FULL_CREDIT: u32 = 50;

/// Overlap tokens shorter than this are noise (articles, conjunctions).
const MIN_OVERLAP_TOKEN_LEN: usize = 4;

/// Score a (deal, provider) pair across the fifteen fixed-weight criteria.
///
/// Weights sum to 100:
///   state alignment 12, underserved area 8, sector 10, mission 5,
///   program 10, capital fit 10, gap coverage 5, compliance readiness 8,
///   shovel ready 6, jobs impact 6, poverty tract 6, income tract 5,
///   unemployment tract 4, concentration fit 3, gap share 2
///
/// Each criterion contributes in [0, weight]. Missing inputs on either side
/// zero that criterion rather than rescaling the rest, so a sparsely
/// documented deal legitimately scores lower. The aggregate is the plain sum
/// clamped to [0, 100], returned alongside the ordered breakdown.
pub fn score_pair(
    deal: &Deal,
    provider: &Provider,
    program_year: u16,
    gate: &GateOutcome,
) -> (Vec<CriterionScore>, f64) {
    let breakdown: Vec<CriterionScore> = Criterion::ALL
        .iter()
        .map(|&criterion| CriterionScore {
            criterion,
            points: score_criterion(criterion, deal, provider, program_year, gate),
        })
        .collect();

    let total: f64 = breakdown.iter().map(|entry| entry.points).sum();
    (breakdown, total.clamp(0.0, 100.0))
}

fn score_criterion(
    criterion: Criterion,
    deal: &Deal,
    provider: &Provider,
    program_year: u16,
    gate: &GateOutcome,
) -> f64 {
    let weight = criterion.weight();
    match criterion {
        Criterion::StateAlignment => score_state_alignment(deal, provider, weight),
        Criterion::UnderservedArea => score_underserved_area(deal, program_year, weight),
        Criterion::SectorAlignment => score_sector_alignment(deal, provider, weight),
        Criterion::MissionAlignment => score_mission_alignment(deal, provider, weight),
        Criterion::ProgramAlignment => score_program_alignment(deal, provider, weight),
        Criterion::CapitalFit => score_capital_fit(deal, provider, weight),
        Criterion::GapCoverage => score_gap_coverage(deal, provider, weight),
        Criterion::ComplianceReadiness => score_compliance_readiness(gate, weight),
        Criterion::ShovelReady => score_shovel_ready(deal, weight),
        Criterion::JobsImpact => score_jobs_impact(deal, weight),
        Criterion::PovertyTract => score_poverty_tract(deal, weight),
        Criterion::IncomeTract => score_income_tract(deal, weight),
        Criterion::UnemploymentTract => score_unemployment_tract(deal, weight),
        Criterion::ConcentrationFit => score_concentration_fit(deal, provider, weight),
        Criterion::GapShare => score_gap_share(deal, weight),
    }
}

/// Sub-score for criteria that read only the deal side, `None` for criteria
/// that need a provider. Lets highlight rendering share the scorer's
/// thresholds instead of duplicating them.
pub(crate) fn deal_only_score(
    criterion: Criterion,
    deal: &Deal,
    program_year: u16,
    gate: &GateOutcome,
) -> Option<f64> {
    let weight = criterion.weight();
    match criterion {
        Criterion::UnderservedArea => Some(score_underserved_area(deal, program_year, weight)),
        Criterion::ComplianceReadiness => Some(score_compliance_readiness(gate, weight)),
        Criterion::ShovelReady => Some(score_shovel_ready(deal, weight)),
        Criterion::JobsImpact => Some(score_jobs_impact(deal, weight)),
        Criterion::PovertyTract => Some(score_poverty_tract(deal, weight)),
        Criterion::IncomeTract => Some(score_income_tract(deal, weight)),
        Criterion::UnemploymentTract => Some(score_unemployment_tract(deal, weight)),
        Criterion::GapShare => Some(score_gap_share(deal, weight)),
        _ => None,
    }
}

/// Geographic alignment: the provider's focus list covers the deal's state.
/// Codes and full names cross-match through the state table; entries the
/// table cannot resolve (territories) still match on normalized text.
#[inline]
fn score_state_alignment(deal: &Deal, provider: &Provider, weight: f64) -> f64 {
    let Some(deal_state) = deal.state.as_deref() else {
        return 0.0;
    };
    let deal_normalized = normalize(deal_state);
    if deal_normalized.is_empty() {
        return 0.0;
    }
    let deal_resolved = resolve_state(deal_state);

    let covered = provider
        .geographic_focus
        .iter()
        .any(|focus| match (deal_resolved, resolve_state(focus)) {
            (Some(deal_info), Some(focus_info)) => deal_info.code == focus_info.code,
            _ => normalize(focus) == deal_normalized,
        });

    if covered {
        weight
    } else {
        0.0
    }
}

/// Underserved-area bonus for the requested program year. Full names resolve
/// to a code first; unresolvable inputs (territory codes) go to the year
/// table as-is.
#[inline]
fn score_underserved_area(deal: &Deal, program_year: u16, weight: f64) -> f64 {
    let Some(state) = deal.state.as_deref() else {
        return 0.0;
    };
    let code = match resolve_state(state) {
        Some(info) => info.code.to_string(),
        None => state.trim().to_uppercase(),
    };

    if is_underserved(&code, program_year) {
        weight
    } else {
        0.0
    }
}

/// Sector alignment: the normalized deal sector equals one of the provider's
/// normalized focus areas.
#[inline]
fn score_sector_alignment(deal: &Deal, provider: &Provider, weight: f64) -> f64 {
    let Some(sector) = deal.sector.as_deref() else {
        return 0.0;
    };
    let sector = normalize(sector);
    if sector.is_empty() {
        return 0.0;
    }

    let aligned = provider
        .sector_focus
        .iter()
        .any(|focus| normalize(focus) == sector);

    if aligned {
        weight
    } else {
        0.0
    }
}

/// Mission alignment: any meaningful word shared between the deal's mission
/// text and the provider's focus areas. Short tokens are skipped so articles
/// and conjunctions cannot create overlap on their own.
#[inline]
fn score_mission_alignment(deal: &Deal, provider: &Provider, weight: f64) -> f64 {
    let Some(mission) = deal.mission.as_deref() else {
        return 0.0;
    };
    let mission_tokens = token_set(mission);
    if mission_tokens.is_empty() {
        return 0.0;
    }

    let overlaps = provider
        .sector_focus
        .iter()
        .flat_map(|focus| token_set(focus))
        .any(|token| token.len() >= MIN_OVERLAP_TOKEN_LEN && mission_tokens.contains(&token));

    if overlaps {
        weight
    } else {
        0.0
    }
}

/// Program-type alignment: the provider's focus list contains the deal's
/// program.
#[inline]
fn score_program_alignment(deal: &Deal, provider: &Provider, weight: f64) -> f64 {
    if provider.program_focus.contains(&deal.program) {
        weight
    } else {
        0.0
    }
}

/// Capital-size fit. Investors match when the request falls inside their
/// check-size range (an absent bound is open, but at least one bound must
/// exist); CDEs match when the request fits their remaining allocation.
#[inline]
fn score_capital_fit(deal: &Deal, provider: &Provider, weight: f64) -> f64 {
    let Some(requested) = deal.requested_amount else {
        return 0.0;
    };

    let fits = match provider.kind {
        ProviderKind::Investor => {
            let bounded = provider.min_investment.is_some() || provider.max_investment.is_some();
            let above_min = provider.min_investment.map_or(true, |min| requested >= min);
            let below_max = provider.max_investment.map_or(true, |max| requested <= max);
            bounded && above_min && below_max
        }
        ProviderKind::Cde => provider
            .available_capital
            .map_or(false, |capital| requested <= capital),
    };

    if fits {
        weight
    } else {
        0.0
    }
}

/// Gap coverage: the provider could close the deal's remaining financing gap
/// on its own.
#[inline]
fn score_gap_coverage(deal: &Deal, provider: &Provider, weight: f64) -> f64 {
    match (deal.financing_gap, provider.deployable_capital()) {
        (Some(gap), Some(capital)) if capital >= gap => weight,
        _ => 0.0,
    }
}

/// Compliance readiness: the gate's pass ratio scaled by the weight. A gate
/// that has not started contributes nothing.
#[inline]
fn score_compliance_readiness(gate: &GateOutcome, weight: f64) -> f64 {
    if gate.tests_completed == 0 {
        return 0.0;
    }
    weight * f64::from(gate.tests_passing) / f64::from(gate.tests_completed)
}

#[inline]
fn score_shovel_ready(deal: &Deal, weight: f64) -> f64 {
    if deal.is_shovel_ready() {
        weight
    } else {
        0.0
    }
}

/// Jobs impact: linear credit up to the full-credit count, flat above it.
#[inline]
fn score_jobs_impact(deal: &Deal, weight: f64) -> f64 {
    let Some(jobs) = deal.projected_jobs else {
        return 0.0;
    };
    weight * f64::from(jobs.min(JOBS_FULL_CREDIT)) / f64::from(JOBS_FULL_CREDIT)
}

/// Poverty-tract signal, two bands.
#[inline]
fn score_poverty_tract(deal: &Deal, weight: f64) -> f64 {
    let Some(rate) = deal.tract.as_ref().and_then(|tract| tract.poverty_rate) else {
        return 0.0;
    };

    if rate >= POVERTY_HIGH_PCT {
        weight
    } else if rate >= POVERTY_ELEVATED_PCT {
        weight / 2.0
    } else {
        0.0
    }
}

/// Low-income-tract signal, two bands (lower median income is stronger).
#[inline]
fn score_income_tract(deal: &Deal, weight: f64) -> f64 {
    let Some(pct) = deal.tract.as_ref().and_then(|tract| tract.median_income_pct) else {
        return 0.0;
    };

    if pct <= INCOME_LOW_PCT {
        weight
    } else if pct <= INCOME_MODERATE_PCT {
        weight / 2.0
    } else {
        0.0
    }
}

/// High-unemployment-tract signal, single threshold on the ratio to the
/// national rate.
#[inline]
fn score_unemployment_tract(deal: &Deal, weight: f64) -> f64 {
    let Some(ratio) = deal.tract.as_ref().and_then(|tract| tract.unemployment_ratio) else {
        return 0.0;
    };

    if ratio >= UNEMPLOYMENT_HIGH_RATIO {
        weight
    } else {
        0.0
    }
}

/// Concentration fit: the request takes at most a quarter of the provider's
/// deployable capital. Integer math keeps the boundary exact.
#[inline]
fn score_concentration_fit(deal: &Deal, provider: &Provider, weight: f64) -> f64 {
    match (deal.requested_amount, provider.deployable_capital()) {
        (Some(requested), Some(capital)) if u128::from(requested) * 4 <= u128::from(capital) => {
            weight
        }
        _ => 0.0,
    }
}

/// Gap share: the remaining gap is at most a third of total project cost,
/// meaning the financing stack is nearly complete.
#[inline]
fn score_gap_share(deal: &Deal, weight: f64) -> f64 {
    match (deal.financing_gap, deal.total_cost) {
        (Some(gap), Some(total)) if total > 0 && u128::from(gap) * 3 <= u128::from(total) => weight,
        _ => 0.0,
    }
}
