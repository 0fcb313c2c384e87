use serde::{Deserialize, Serialize};

/// Tax-credit programs a deal can seek financing under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Program {
    Nmtc,
    Htc,
    Lihtc,
    RenewableEnergy,
    OpportunityZone,
}

impl Program {
    /// Wire identifier, used in backend filter queries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Program::Nmtc => "nmtc",
            Program::Htc => "htc",
            Program::Lihtc => "lihtc",
            Program::RenewableEnergy => "renewable-energy",
            Program::OpportunityZone => "opportunity-zone",
        }
    }

    /// Short display label for reasons and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Program::Nmtc => "NMTC",
            Program::Htc => "HTC",
            Program::Lihtc => "LIHTC",
            Program::RenewableEnergy => "Renewable Energy",
            Program::OpportunityZone => "Opportunity Zone",
        }
    }

    /// Whether deals under this program are subject to the compliance gate.
    pub fn compliance_bound(&self) -> bool {
        matches!(self, Program::Nmtc)
    }
}

/// Deal lifecycle status. The workflow that moves deals between statuses is
/// owned by the marketplace; the engine only reads it to decide whether a
/// deal may be matched at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DealStatus {
    Draft,
    Active,
    UnderReview,
    Funded,
    Withdrawn,
    Closed,
}

impl DealStatus {
    pub fn is_matchable(&self) -> bool {
        matches!(self, DealStatus::Active | DealStatus::UnderReview)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::Draft => "draft",
            DealStatus::Active => "active",
            DealStatus::UnderReview => "under-review",
            DealStatus::Funded => "funded",
            DealStatus::Withdrawn => "withdrawn",
            DealStatus::Closed => "closed",
        }
    }
}

/// Location-based eligibility signals for the deal's census tract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CensusTract {
    #[serde(rename = "tractId", default)]
    pub tract_id: Option<String>,
    #[serde(rename = "povertyRate", default)]
    pub poverty_rate: Option<f64>,
    #[serde(rename = "medianIncomePct", default)]
    pub median_income_pct: Option<f64>,
    #[serde(rename = "unemploymentRatio", default)]
    pub unemployment_ratio: Option<f64>,
}

/// Program compliance test inputs, each independently optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplianceChecks {
    #[serde(rename = "qualifyingIncomePct", default)]
    pub qualifying_income_pct: Option<f64>,
    #[serde(rename = "tangiblePropertyPct", default)]
    pub tangible_property_pct: Option<f64>,
    #[serde(rename = "qualifyingServicesPct", default)]
    pub qualifying_services_pct: Option<f64>,
    #[serde(rename = "excludedBusiness", default)]
    pub excluded_business: Option<bool>,
}

/// A capital-seeking project, reconciled into one canonical record before it
/// reaches the scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    #[serde(rename = "dealId")]
    pub deal_id: String,
    pub name: String,
    pub program: Program,
    #[serde(default = "default_deal_status")]
    pub status: DealStatus,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub tract: Option<CensusTract>,
    #[serde(rename = "requestedAmount", default)]
    pub requested_amount: Option<u64>,
    #[serde(rename = "totalCost", default)]
    pub total_cost: Option<u64>,
    #[serde(rename = "financingGap", default)]
    pub financing_gap: Option<u64>,
    #[serde(default)]
    pub compliance: Option<ComplianceChecks>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub mission: Option<String>,
    #[serde(rename = "shovelReady", default)]
    pub shovel_ready: Option<bool>,
    #[serde(rename = "projectedJobs", default)]
    pub projected_jobs: Option<u32>,
}

impl Deal {
    /// Helper to read shovel_ready as a bool, defaulting to false
    pub fn is_shovel_ready(&self) -> bool {
        self.shovel_ready.unwrap_or(false)
    }
}

fn default_deal_status() -> DealStatus {
    DealStatus::Active
}

/// Capital-provider role. CDEs hold tax-credit allocation; investors deploy
/// their own capital within a check-size range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Cde,
    Investor,
}

/// A capital source from the provider directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    #[serde(rename = "providerId")]
    pub provider_id: String,
    pub name: String,
    pub kind: ProviderKind,
    #[serde(rename = "geographicFocus", default)]
    pub geographic_focus: Vec<String>,
    #[serde(rename = "sectorFocus", default)]
    pub sector_focus: Vec<String>,
    #[serde(rename = "programFocus", default)]
    pub program_focus: Vec<Program>,
    #[serde(rename = "availableCapital", default)]
    pub available_capital: Option<u64>,
    #[serde(rename = "minInvestment", default)]
    pub min_investment: Option<u64>,
    #[serde(rename = "maxInvestment", default)]
    pub max_investment: Option<u64>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Provider {
    /// Capital the provider can actually put into a single deal: a CDE's
    /// remaining allocation, or an investor's stated capital falling back to
    /// its maximum check size.
    pub fn deployable_capital(&self) -> Option<u64> {
        match self.kind {
            ProviderKind::Cde => self.available_capital,
            ProviderKind::Investor => self.available_capital.or(self.max_investment),
        }
    }
}

fn default_true() -> bool {
    true
}

/// The fixed set of matching criteria. Declaration order is the order
/// breakdowns are reported in; weights are constants summing to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    StateAlignment,
    UnderservedArea,
    SectorAlignment,
    MissionAlignment,
    ProgramAlignment,
    CapitalFit,
    GapCoverage,
    ComplianceReadiness,
    ShovelReady,
    JobsImpact,
    PovertyTract,
    IncomeTract,
    UnemploymentTract,
    ConcentrationFit,
    GapShare,
}

impl Criterion {
    /// Every criterion, in reporting order.
    pub const ALL: [Criterion; 15] = [
        Criterion::StateAlignment,
        Criterion::UnderservedArea,
        Criterion::SectorAlignment,
        Criterion::MissionAlignment,
        Criterion::ProgramAlignment,
        Criterion::CapitalFit,
        Criterion::GapCoverage,
        Criterion::ComplianceReadiness,
        Criterion::ShovelReady,
        Criterion::JobsImpact,
        Criterion::PovertyTract,
        Criterion::IncomeTract,
        Criterion::UnemploymentTract,
        Criterion::ConcentrationFit,
        Criterion::GapShare,
    ];

    /// Maximum contribution of this criterion to the 100-point aggregate.
    pub fn weight(&self) -> f64 {
        match self {
            Criterion::StateAlignment => 12.0,
            Criterion::UnderservedArea => 8.0,
            Criterion::SectorAlignment => 10.0,
            Criterion::MissionAlignment => 5.0,
            Criterion::ProgramAlignment => 10.0,
            Criterion::CapitalFit => 10.0,
            Criterion::GapCoverage => 5.0,
            Criterion::ComplianceReadiness => 8.0,
            Criterion::ShovelReady => 6.0,
            Criterion::JobsImpact => 6.0,
            Criterion::PovertyTract => 6.0,
            Criterion::IncomeTract => 5.0,
            Criterion::UnemploymentTract => 4.0,
            Criterion::ConcentrationFit => 3.0,
            Criterion::GapShare => 2.0,
        }
    }

    /// Stable name matching the serde wire representation.
    pub fn name(&self) -> &'static str {
        match self {
            Criterion::StateAlignment => "state_alignment",
            Criterion::UnderservedArea => "underserved_area",
            Criterion::SectorAlignment => "sector_alignment",
            Criterion::MissionAlignment => "mission_alignment",
            Criterion::ProgramAlignment => "program_alignment",
            Criterion::CapitalFit => "capital_fit",
            Criterion::GapCoverage => "gap_coverage",
            Criterion::ComplianceReadiness => "compliance_readiness",
            Criterion::ShovelReady => "shovel_ready",
            Criterion::JobsImpact => "jobs_impact",
            Criterion::PovertyTract => "poverty_tract",
            Criterion::IncomeTract => "income_tract",
            Criterion::UnemploymentTract => "unemployment_tract",
            Criterion::ConcentrationFit => "concentration_fit",
            Criterion::GapShare => "gap_share",
        }
    }
}

/// One criterion's contribution to a match score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub points: f64,
}

/// Match-strength tier derived from the aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Excellent,
    Good,
    Fair,
    Weak,
}

/// Overall state of the compliance gate for a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateStatus {
    NotStarted,
    Failing,
    Partial,
    Passing,
}

/// A single compliance check with its human-readable outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateCheck {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

/// Eligibility-gate summary surfaced alongside every match run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOutcome {
    pub status: GateStatus,
    #[serde(rename = "testsCompleted")]
    pub tests_completed: u8,
    #[serde(rename = "testsPassing")]
    pub tests_passing: u8,
    pub checks: Vec<GateCheck>,
}

/// Scored match for a single candidate provider. Created fresh on every run
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "providerId")]
    pub provider_id: String,
    #[serde(rename = "providerName")]
    pub provider_name: String,
    pub score: u8,
    pub tier: MatchTier,
    pub breakdown: Vec<CriterionScore>,
    pub reasons: Vec<String>,
}

/// Timestamped result set of one orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRun {
    #[serde(rename = "runId")]
    pub run_id: String,
    #[serde(rename = "dealId")]
    pub deal_id: String,
    #[serde(rename = "programYear")]
    pub program_year: u16,
    pub gate: GateOutcome,
    pub matches: Vec<MatchResult>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
