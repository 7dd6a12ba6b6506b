use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One practice location. Matching compares all five fields case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub street: String,
    /// Secondary address line. Often empty.
    pub street_2: String,
    pub postal_code: String,
    pub city: String,
    pub region: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        street_2: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            street_2: street_2.into(),
            postal_code: postal_code.into(),
            city: city.into(),
            region: region.into(),
        }
    }
}

/// A single provider from either roster.
///
/// `national_id` is the NPI. An empty string means the source did not carry
/// one; that is a normal state and only changes which identity rule applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub addresses: Vec<Address>,
}

impl Record {
    /// Record without any practice address.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        national_id: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            national_id: national_id.into(),
            addresses: Vec::new(),
        }
    }

    pub fn with_addresses(mut self, addresses: Vec<Address>) -> Self {
        self.addresses = addresses;
        self
    }

    pub fn has_national_id(&self) -> bool {
        !self.national_id.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Which identity rule paired a candidate with its reference record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Both sides carried an NPI and they agree.
    NationalId,
    /// At least one side had no NPI; name and a practice address agree.
    NameAndAddress,
}

impl std::fmt::Display for MatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NationalId => write!(f, "national_id"),
            Self::NameAndAddress => write!(f, "name_and_address"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedPair {
    pub candidate: Record,
    pub reference: Record,
    pub rule: MatchRule,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconSummary {
    pub reference_count: usize,
    pub candidate_count: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// `None` when there were no candidates to match.
    pub match_percent: Option<f64>,
    pub by_rule: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub matches: Vec<MatchedPair>,
    pub unmatched: Vec<Record>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}
