// Unit tests for AutoMatch

use automatch::core::{
    eligibility,
    geography::{
        all_states, clamp_program_year, is_underserved, resolve_state, MAX_PROGRAM_YEAR,
        MIN_PROGRAM_YEAR,
    },
    scoring::score_pair,
    text::{normalize, token_set},
    tiers::classify,
};
use automatch::models::{
    CensusTract, ComplianceChecks, Criterion, Deal, DealStatus, GateStatus, MatchTier, Program,
    Provider, ProviderKind,
};

fn create_test_deal(id: &str, state: &str) -> Deal {
    Deal {
        deal_id: id.to_string(),
        name: format!("Deal {}", id),
        program: Program::Nmtc,
        status: DealStatus::Active,
        state: Some(state.to_string()),
        address: None,
        tract: Some(CensusTract {
            tract_id: Some("54061-0103".to_string()),
            poverty_rate: Some(32.0),
            median_income_pct: Some(58.0),
            unemployment_ratio: Some(1.7),
        }),
        requested_amount: Some(3_000_000),
        total_cost: Some(10_000_000),
        financing_gap: Some(2_500_000),
        compliance: Some(ComplianceChecks {
            qualifying_income_pct: Some(65.0),
            tangible_property_pct: Some(80.0),
            qualifying_services_pct: Some(55.0),
            excluded_business: Some(false),
        }),
        sector: Some("community real estate".to_string()),
        mission: Some("Rebuild the downtown corridor as community space".to_string()),
        shovel_ready: Some(true),
        projected_jobs: Some(40),
    }
}

fn create_test_provider(id: &str, states: &[&str]) -> Provider {
    Provider {
        provider_id: id.to_string(),
        name: format!("Provider {}", id),
        kind: ProviderKind::Cde,
        geographic_focus: states.iter().map(|s| s.to_string()).collect(),
        sector_focus: vec!["community real estate".to_string()],
        program_focus: vec![Program::Nmtc],
        available_capital: Some(20_000_000),
        min_investment: None,
        max_investment: None,
        active: true,
    }
}

#[test]
fn test_criterion_weights_sum_to_one_hundred() {
    let total: f64 = Criterion::ALL.iter().map(|c| c.weight()).sum();
    assert_eq!(Criterion::ALL.len(), 15);
    assert!(
        (total - 100.0).abs() < f64::EPSILON,
        "Weights sum to {}, expected 100",
        total
    );
}

#[test]
fn test_every_state_resolves_by_code_and_name() {
    let mut count = 0;
    for state in all_states() {
        let by_code = resolve_state(state.code).expect("code should resolve");
        assert_eq!(by_code.code, state.code);

        // Names resolve case-insensitively
        let by_name = resolve_state(state.name).expect("name should resolve");
        assert_eq!(by_name.code, state.code);

        let upper_name = state.name.to_uppercase();
        let by_upper = resolve_state(&upper_name).expect("uppercase name should resolve");
        assert_eq!(by_upper.code, state.code);

        count += 1;
    }
    assert_eq!(count, 50, "Expected exactly 50 states");
}

#[test]
fn test_unknown_inputs_do_not_resolve() {
    assert!(resolve_state("").is_none());
    assert!(resolve_state("  ").is_none());
    assert!(resolve_state("XX").is_none());
    assert!(resolve_state("Atlantis").is_none());
    // Territories and DC are not states
    assert!(resolve_state("PR").is_none());
    assert!(resolve_state("DC").is_none());
}

#[test]
fn test_underserved_list_grows_by_year() {
    // Core states are underserved in every program year
    for year in MIN_PROGRAM_YEAR..=MAX_PROGRAM_YEAR {
        assert!(is_underserved("MS", year), "MS should be underserved in {}", year);
        assert!(is_underserved("WV", year), "WV should be underserved in {}", year);
    }

    // Territories are carried on the 2022 list only
    assert!(is_underserved("PR", 2022));
    assert!(!is_underserved("PR", 2023));
    assert!(!is_underserved("PR", 2024));

    // Idaho was added in 2023
    assert!(!is_underserved("ID", 2022));
    assert!(is_underserved("ID", 2023));
    assert!(is_underserved("ID", 2024));

    // Nevada was added in 2024
    assert!(!is_underserved("NV", 2022));
    assert!(!is_underserved("NV", 2023));
    assert!(is_underserved("NV", 2024));

    // CA has never been on the list
    for year in MIN_PROGRAM_YEAR..=MAX_PROGRAM_YEAR {
        assert!(!is_underserved("CA", year));
    }
}

#[test]
fn test_2025_underserved_list_matches_2024() {
    for state in all_states() {
        assert_eq!(
            is_underserved(state.code, 2024),
            is_underserved(state.code, 2025),
            "2024 and 2025 disagree on {}",
            state.code
        );
    }
    for territory in ["AS", "GU", "MP", "PR", "VI"] {
        assert_eq!(is_underserved(territory, 2024), is_underserved(territory, 2025));
    }
}

#[test]
fn test_out_of_range_program_years_clamp() {
    assert_eq!(clamp_program_year(2019), MIN_PROGRAM_YEAR);
    assert_eq!(clamp_program_year(2030), MAX_PROGRAM_YEAR);
    assert_eq!(clamp_program_year(2023), 2023);

    // Lookups clamp instead of failing
    assert!(is_underserved("NV", 2030), "2030 should clamp to the 2025 table");
    assert!(!is_underserved("ID", 1999), "1999 should clamp to the 2022 table");
}

#[test]
fn test_normalize_folds_case_separators_and_whitespace() {
    assert_eq!(normalize("Community-Real_Estate"), "community real estate");
    assert_eq!(normalize("  Clean   Energy  "), "clean energy");
    assert_eq!(normalize(""), "");

    // Idempotent
    let once = normalize("Mixed_Use--Development");
    assert_eq!(normalize(&once), once);
}

#[test]
fn test_token_set_deduplicates() {
    let tokens = token_set("health Health HEALTH care");
    assert_eq!(tokens.len(), 2);
    assert!(tokens.contains("health"));
    assert!(tokens.contains("care"));
}

#[test]
fn test_score_is_deterministic_and_in_range() {
    let deal = create_test_deal("d-1", "WV");
    let provider = create_test_provider("p-1", &["WV", "KY"]);
    let gate = eligibility::evaluate(&deal);

    let (breakdown_a, total_a) = score_pair(&deal, &provider, 2024, &gate);
    let (breakdown_b, total_b) = score_pair(&deal, &provider, 2024, &gate);

    assert_eq!(total_a, total_b, "Same inputs should produce the same score");
    assert_eq!(breakdown_a, breakdown_b);
    assert!(total_a >= 0.0 && total_a <= 100.0, "Score {} out of range", total_a);
    assert_eq!(breakdown_a.len(), 15);

    // No criterion exceeds its weight
    for entry in &breakdown_a {
        assert!(
            entry.points >= 0.0 && entry.points <= entry.criterion.weight(),
            "{} scored {} over weight {}",
            entry.criterion.name(),
            entry.points,
            entry.criterion.weight()
        );
    }
}

#[test]
fn test_gate_counts_stay_consistent() {
    let mut deal = create_test_deal("d-2", "WV");
    deal.compliance = Some(ComplianceChecks {
        qualifying_income_pct: Some(45.0), // Failing
        tangible_property_pct: Some(70.0), // Passing
        qualifying_services_pct: None,
        excluded_business: None,
    });

    let gate = eligibility::evaluate(&deal);

    assert_eq!(gate.status, GateStatus::Partial);
    assert_eq!(gate.tests_completed as usize, gate.checks.len());
    assert!(gate.tests_passing <= gate.tests_completed);
    assert_eq!(gate.tests_completed, 2);
    assert_eq!(gate.tests_passing, 1);
}

#[test]
fn test_tier_boundaries_round_up() {
    assert_eq!(classify(100), MatchTier::Excellent);
    assert_eq!(classify(80), MatchTier::Excellent);
    assert_eq!(classify(79), MatchTier::Good);
    assert_eq!(classify(65), MatchTier::Good);
    assert_eq!(classify(64), MatchTier::Fair);
    assert_eq!(classify(50), MatchTier::Fair);
    assert_eq!(classify(49), MatchTier::Weak);
    assert_eq!(classify(0), MatchTier::Weak);
}

#[test]
fn test_deal_parses_camel_case_json() {
    let raw = serde_json::json!({
        "dealId": "deal-77",
        "name": "Eastside Grocery",
        "program": "nmtc",
        "status": "under-review",
        "state": "Mississippi",
        "tract": {
            "tractId": "28049-0011",
            "povertyRate": 24.5,
            "medianIncomePct": 71.0
        },
        "requestedAmount": 1_500_000,
        "totalCost": 4_000_000,
        "shovelReady": true
    });

    let deal: Deal = serde_json::from_value(raw).expect("deal should deserialize");
    assert_eq!(deal.deal_id, "deal-77");
    assert_eq!(deal.program, Program::Nmtc);
    assert_eq!(deal.status, DealStatus::UnderReview);
    assert_eq!(deal.requested_amount, Some(1_500_000));
    let tract = deal.tract.expect("tract should be present");
    assert_eq!(tract.poverty_rate, Some(24.5));
    // Absent optional fields come back as None
    assert!(tract.unemployment_ratio.is_none());
    assert!(deal.financing_gap.is_none());
    assert!(deal.compliance.is_none());
}
