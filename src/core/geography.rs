use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// A resolved US state: two-letter code plus canonical lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateInfo {
    pub code: &'static str,
    pub name: &'static str,
}

/// First program year with a published underserved-area list.
pub const MIN_PROGRAM_YEAR: u16 = 2022;

/// Latest program year with a published underserved-area list.
pub const MAX_PROGRAM_YEAR: u16 = 2025;

/// Default program year for callers that do not specify one.
pub const CURRENT_PROGRAM_YEAR: u16 = MAX_PROGRAM_YEAR;

/// The 50 US states. Codes uppercase, names lowercase; territories are
/// deliberately absent — they exist only in the underserved-area table.
const STATES: [(&str, &str); 50] = [
    ("AL", "alabama"),
    ("AK", "alaska"),
    ("AZ", "arizona"),
    ("AR", "arkansas"),
    ("CA", "california"),
    ("CO", "colorado"),
    ("CT", "connecticut"),
    ("DE", "delaware"),
    ("FL", "florida"),
    ("GA", "georgia"),
    ("HI", "hawaii"),
    ("ID", "idaho"),
    ("IL", "illinois"),
    ("IN", "indiana"),
    ("IA", "iowa"),
    ("KS", "kansas"),
    ("KY", "kentucky"),
    ("LA", "louisiana"),
    ("ME", "maine"),
    ("MD", "maryland"),
    ("MA", "massachusetts"),
    ("MI", "michigan"),
    ("MN", "minnesota"),
    ("MS", "mississippi"),
    ("MO", "missouri"),
    ("MT", "montana"),
    ("NE", "nebraska"),
    ("NV", "nevada"),
    ("NH", "new hampshire"),
    ("NJ", "new jersey"),
    ("NM", "new mexico"),
    ("NY", "new york"),
    ("NC", "north carolina"),
    ("ND", "north dakota"),
    ("OH", "ohio"),
    ("OK", "oklahoma"),
    ("OR", "oregon"),
    ("PA", "pennsylvania"),
    ("RI", "rhode island"),
    ("SC", "south carolina"),
    ("SD", "south dakota"),
    ("TN", "tennessee"),
    ("TX", "texas"),
    ("UT", "utah"),
    ("VT", "vermont"),
    ("VA", "virginia"),
    ("WA", "washington"),
    ("WV", "west virginia"),
    ("WI", "wisconsin"),
    ("WY", "wyoming"),
];

/// States on the underserved list in every known program year.
const UNDERSERVED_CORE: [&str; 14] = [
    "AL", "AR", "FL", "GA", "KS", "KY", "LA", "MS", "MO", "MT", "TN", "TX", "WV", "WY",
];

/// Territories carried on the 2022 list only.
const UNDERSERVED_2022_TERRITORIES: [&str; 5] = ["AS", "GU", "MP", "PR", "VI"];

/// Added to the list starting with the 2023 program year.
const UNDERSERVED_ADDED_2023: [&str; 1] = ["ID"];

/// Added starting 2024; the 2025 list is unchanged from 2024.
const UNDERSERVED_ADDED_2024: [&str; 1] = ["NV"];

struct StateTables {
    by_code: HashMap<&'static str, StateInfo>,
    by_name: HashMap<&'static str, StateInfo>,
}

fn state_tables() -> &'static StateTables {
    static TABLES: OnceLock<StateTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut by_code = HashMap::with_capacity(STATES.len());
        let mut by_name = HashMap::with_capacity(STATES.len());
        for (code, name) in STATES {
            let info = StateInfo { code, name };
            by_code.insert(code, info);
            by_name.insert(name, info);
        }
        StateTables { by_code, by_name }
    })
}

fn underserved_by_year() -> &'static HashMap<u16, HashSet<&'static str>> {
    static TABLE: OnceLock<HashMap<u16, HashSet<&'static str>>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let core: HashSet<&'static str> = UNDERSERVED_CORE.into_iter().collect();

        let mut y2022 = core.clone();
        y2022.extend(UNDERSERVED_2022_TERRITORIES);

        let mut y2023 = core;
        y2023.extend(UNDERSERVED_ADDED_2023);

        let mut y2024 = y2023.clone();
        y2024.extend(UNDERSERVED_ADDED_2024);

        let y2025 = y2024.clone();

        HashMap::from([(2022, y2022), (2023, y2023), (2024, y2024), (2025, y2025)])
    })
}

/// Every resolvable state, in table order.
pub fn all_states() -> impl Iterator<Item = StateInfo> {
    STATES.iter().map(|&(code, name)| StateInfo { code, name })
}

/// Resolve a two-letter code or a full state name, case-insensitively and
/// tolerating surrounding whitespace.
///
/// Returns `None` for anything outside the 50-state table, including
/// territory codes — those are valid underserved-area codes but are not
/// resolvable states.
pub fn resolve_state(input: &str) -> Option<StateInfo> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.len() == 2 {
        let code = trimmed.to_uppercase();
        state_tables().by_code.get(code.as_str()).copied()
    } else {
        let name = trimmed.to_lowercase();
        state_tables().by_name.get(name.as_str()).copied()
    }
}

/// Whether an area code is on the given program year's underserved list.
///
/// Years outside the published range fall back to the nearest known year;
/// the fallback is logged so callers can observe it.
pub fn is_underserved(area_code: &str, program_year: u16) -> bool {
    let code = area_code.trim().to_uppercase();
    if code.is_empty() {
        return false;
    }

    let year = clamp_program_year(program_year);
    underserved_by_year()
        .get(&year)
        .map(|set| set.contains(code.as_str()))
        .unwrap_or(false)
}

/// Clamp a program year into the known table range.
pub fn clamp_program_year(year: u16) -> u16 {
    if year < MIN_PROGRAM_YEAR {
        tracing::debug!(
            "Program year {} predates the underserved-area table ({}-{}), using {}",
            year,
            MIN_PROGRAM_YEAR,
            MAX_PROGRAM_YEAR,
            MIN_PROGRAM_YEAR
        );
        MIN_PROGRAM_YEAR
    } else if year > MAX_PROGRAM_YEAR {
        tracing::debug!(
            "Program year {} is beyond the underserved-area table ({}-{}), using {}",
            year,
            MIN_PROGRAM_YEAR,
            MAX_PROGRAM_YEAR,
            MAX_PROGRAM_YEAR
        );
        MAX_PROGRAM_YEAR
    } else {
        year
    }
}
