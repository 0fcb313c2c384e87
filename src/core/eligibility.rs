use crate::models::domain::{Deal, GateCheck, GateOutcome, GateStatus};

/// Minimum share of gross income derived from qualifying activity.
pub const QUALIFYING_INCOME_MIN_PCT: f64 = 50.0;

/// Minimum share of tangible property in qualifying use.
pub const TANGIBLE_PROPERTY_MIN_PCT: f64 = 40.0;

/// Minimum share of services performed in qualifying areas.
pub const QUALIFYING_SERVICES_MIN_PCT: f64 = 40.0;

/// Evaluate the compliance gate for a deal.
///
/// Only compliance-bound programs carry a worksheet; every other program gets
/// a `NotStarted` outcome with no checks. A check whose input is absent is
/// skipped, not failed, so sparse worksheets produce partial gates rather
/// than false negatives. The outcome is informational: callers decide
/// whether to act on a failing gate.
pub fn evaluate(deal: &Deal) -> GateOutcome {
    if !deal.program.compliance_bound() {
        return empty_outcome();
    }

    let Some(worksheet) = deal.compliance.as_ref() else {
        return empty_outcome();
    };

    let mut checks = Vec::with_capacity(4);

    if let Some(pct) = worksheet.qualifying_income_pct {
        checks.push(GateCheck {
            name: "qualifying-income".to_string(),
            passed: pct >= QUALIFYING_INCOME_MIN_PCT,
            detail: format!(
                "{:.1}% of income from qualifying activity (minimum {:.0}%)",
                pct, QUALIFYING_INCOME_MIN_PCT
            ),
        });
    }

    if let Some(pct) = worksheet.tangible_property_pct {
        checks.push(GateCheck {
            name: "tangible-property".to_string(),
            passed: pct >= TANGIBLE_PROPERTY_MIN_PCT,
            detail: format!(
                "{:.1}% of tangible property in qualifying use (minimum {:.0}%)",
                pct, TANGIBLE_PROPERTY_MIN_PCT
            ),
        });
    }

    if let Some(pct) = worksheet.qualifying_services_pct {
        checks.push(GateCheck {
            name: "qualifying-services".to_string(),
            passed: pct >= QUALIFYING_SERVICES_MIN_PCT,
            detail: format!(
                "{:.1}% of services performed in qualifying areas (minimum {:.0}%)",
                pct, QUALIFYING_SERVICES_MIN_PCT
            ),
        });
    }

    if let Some(excluded) = worksheet.excluded_business {
        checks.push(GateCheck {
            name: "excluded-business".to_string(),
            passed: !excluded,
            detail: if excluded {
                "Business type is on the excluded list".to_string()
            } else {
                "Business type is not on the excluded list".to_string()
            },
        });
    }

    let tests_completed = checks.len() as u8;
    let tests_passing = checks.iter().filter(|check| check.passed).count() as u8;

    GateOutcome {
        status: derive_status(tests_completed, tests_passing),
        tests_completed,
        tests_passing,
        checks,
    }
}

fn empty_outcome() -> GateOutcome {
    GateOutcome {
        status: GateStatus::NotStarted,
        tests_completed: 0,
        tests_passing: 0,
        checks: Vec::new(),
    }
}

fn derive_status(completed: u8, passing: u8) -> GateStatus {
    if completed == 0 {
        GateStatus::NotStarted
    } else if passing == completed {
        GateStatus::Passing
    } else if passing == 0 {
        GateStatus::Failing
    } else {
        GateStatus::Partial
    }
}
