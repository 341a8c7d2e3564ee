//! Categorical value standardization.

/// Cell values treated as missing regardless of column.
const MISSING_TOKENS: &[&str] = &["n/a", "na", "null", "none", "-", "?", "nan"];

/// Country synonyms, keyed by compact uppercase form.
const COUNTRY_SYNONYMS: &[(&str, &str)] = &[
    ("US", "United States"),
    ("USA", "United States"),
    ("UNITEDSTATES", "United States"),
    ("UNITEDSTATESOFAMERICA", "United States"),
    ("AMERICA", "United States"),
    ("UK", "United Kingdom"),
    ("GB", "United Kingdom"),
    ("GBR", "United Kingdom"),
    ("GREATBRITAIN", "United Kingdom"),
    ("ENGLAND", "United Kingdom"),
    ("UNITEDKINGDOM", "United Kingdom"),
    ("DE", "Germany"),
    ("DEU", "Germany"),
    ("DEUTSCHLAND", "Germany"),
    ("FR", "France"),
    ("FRA", "France"),
    ("JP", "Japan"),
    ("JPN", "Japan"),
    ("NIPPON", "Japan"),
    ("CN", "China"),
    ("CHN", "China"),
    ("PRC", "China"),
    ("CA", "Canada"),
    ("CAN", "Canada"),
    ("AU", "Australia"),
    ("AUS", "Australia"),
    ("IN", "India"),
    ("IND", "India"),
    ("ES", "Spain"),
    ("ESPANA", "Spain"),
    ("IT", "Italy"),
    ("ITALIA", "Italy"),
    ("NL", "Netherlands"),
    ("HOLLAND", "Netherlands"),
    ("THENETHERLANDS", "Netherlands"),
];

/// Customer segment synonyms, keyed by compact uppercase form.
const SEGMENT_SYNONYMS: &[(&str, &str)] = &[
    ("HOME", "Residential"),
    ("HOUSEHOLD", "Residential"),
    ("CONSUMER", "Residential"),
    ("RESIDENTIAL", "Residential"),
    ("BUSINESS", "Commercial"),
    ("SMB", "Commercial"),
    ("COMMERCIAL", "Commercial"),
    ("INDUSTRY", "Industrial"),
    ("INDUSTRIAL", "Industrial"),
];

/// Case applied to a categorical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseRule {
    /// Keep the source case (identifiers).
    Preserve,
    Upper,
    Title,
}

/// Creates a compact key by keeping only uppercase alphanumeric characters.
fn compact_key(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect()
}

fn lookup<'a>(table: &'a [(&str, &str)], value: &str) -> Option<&'a str> {
    let key = compact_key(value);
    table
        .iter()
        .find(|(synonym, _)| *synonym == key)
        .map(|(_, canonical)| *canonical)
}

/// Whether a trimmed cell holds one of the missing-value tokens.
pub fn is_missing_token(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || MISSING_TOKENS
            .iter()
            .any(|token| token.eq_ignore_ascii_case(trimmed))
}

/// Trim and collapse internal whitespace runs to a single space.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title-case words separated by spaces, hyphens or slashes.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut word_start = true;
    for ch in value.chars() {
        if word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
        word_start = matches!(ch, ' ' | '-' | '/');
    }
    out
}

/// Standardize a categorical cell. Returns `None` for missing values.
pub fn normalize_label(value: &str, rule: CaseRule) -> Option<String> {
    if is_missing_token(value) {
        return None;
    }
    let collapsed = collapse_whitespace(value);
    Some(match rule {
        CaseRule::Preserve => collapsed,
        CaseRule::Upper => collapsed.to_uppercase(),
        CaseRule::Title => title_case(&collapsed),
    })
}

/// Canonical country label: synonym table first, else Title Case.
pub fn canonical_country(value: &str) -> Option<String> {
    let label = normalize_label(value, CaseRule::Title)?;
    Some(lookup(COUNTRY_SYNONYMS, &label).map_or(label, str::to_string))
}

/// Canonical customer segment label: synonym table first, else Title Case.
pub fn canonical_segment(value: &str) -> Option<String> {
    let label = normalize_label(value, CaseRule::Title)?;
    Some(lookup(SEGMENT_SYNONYMS, &label).map_or(label, str::to_string))
}
