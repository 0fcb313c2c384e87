use crate::core::eligibility;
use crate::core::geography::resolve_state;
use crate::core::scoring;
use crate::core::text::normalize;
use crate::models::domain::{Criterion, CriterionScore, Deal, Provider, ProviderKind};

/// How many reasons a match surfaces unless the caller asks for more.
pub const DEFAULT_REASON_COUNT: usize = 2;

/// Render the strongest positive contributions of a breakdown into short
/// human-readable reasons.
///
/// Criteria contributing zero are never rendered; ties keep breakdown order
/// so repeated runs produce identical reason lists. An all-zero breakdown
/// yields an empty list and the caller falls back to deal-only highlights.
pub fn top_reasons(
    deal: &Deal,
    provider: &Provider,
    breakdown: &[CriterionScore],
    count: usize,
) -> Vec<String> {
    let mut positive: Vec<&CriterionScore> = breakdown
        .iter()
        .filter(|entry| entry.points > 0.0)
        .collect();
    positive.sort_by(|a, b| b.points.total_cmp(&a.points));

    positive
        .into_iter()
        .take(count)
        .map(|entry| render(entry.criterion, deal, Some(provider)))
        .collect()
}

/// Provider-independent highlights straight from deal attributes, for
/// callers that need something to show before any provider has been scored.
pub fn fallback_highlights(deal: &Deal, program_year: u16) -> Vec<String> {
    let gate = eligibility::evaluate(deal);

    let mut scored: Vec<CriterionScore> = Criterion::ALL
        .iter()
        .filter_map(|&criterion| {
            scoring::deal_only_score(criterion, deal, program_year, &gate)
                .filter(|points| *points > 0.0)
                .map(|points| CriterionScore { criterion, points })
        })
        .collect();
    scored.sort_by(|a, b| b.points.total_cmp(&a.points));

    scored
        .iter()
        .map(|entry| render(entry.criterion, deal, None))
        .collect()
}

fn render(criterion: Criterion, deal: &Deal, provider: Option<&Provider>) -> String {
    match criterion {
        Criterion::StateAlignment => {
            format!("Geographic focus includes {}", deal_state_label(deal))
        }
        Criterion::UnderservedArea => "Located in underserved community".to_string(),
        Criterion::SectorAlignment => {
            format!("Sector alignment: {}", normalize(deal.sector.as_deref().unwrap_or("")))
        }
        Criterion::MissionAlignment => "Mission aligns with provider focus areas".to_string(),
        Criterion::ProgramAlignment => format!("{} program focus", deal.program.label()),
        Criterion::CapitalFit => match provider.map(|provider| provider.kind) {
            Some(ProviderKind::Investor) => "Within investment range".to_string(),
            _ => "Within available allocation".to_string(),
        },
        Criterion::GapCoverage => "Can cover the remaining financing gap".to_string(),
        Criterion::ComplianceReadiness => "Strong compliance test results".to_string(),
        Criterion::ShovelReady => "Project is shovel-ready".to_string(),
        Criterion::JobsImpact => {
            format!("Projected to create {} jobs", deal.projected_jobs.unwrap_or(0))
        }
        Criterion::PovertyTract => "Located in a high-poverty census tract".to_string(),
        Criterion::IncomeTract => "Located in a low-income census tract".to_string(),
        Criterion::UnemploymentTract => "Located in a high-unemployment census tract".to_string(),
        Criterion::ConcentrationFit => "Fits portfolio concentration limits".to_string(),
        Criterion::GapShare => "Financing stack is nearly complete".to_string(),
    }
}

/// Display label for the deal's state: the resolved name in title case, or
/// the raw value when the table cannot resolve it.
fn deal_state_label(deal: &Deal) -> String {
    let Some(state) = deal.state.as_deref() else {
        return "the target state".to_string();
    };
    match resolve_state(state) {
        Some(info) => title_case(info.name),
        None => state.trim().to_string(),
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
