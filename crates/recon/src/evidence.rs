use std::collections::BTreeMap;
use std::fmt;

use crate::model::{MatchedPair, ReconSummary, Record};

/// Compute summary statistics from one reconciliation pass.
pub fn compute_summary(
    reference_count: usize,
    candidate_count: usize,
    matches: &[MatchedPair],
    unmatched: &[Record],
) -> ReconSummary {
    let mut by_rule: BTreeMap<String, usize> = BTreeMap::new();
    for pair in matches {
        *by_rule.entry(pair.rule.to_string()).or_insert(0) += 1;
    }

    ReconSummary {
        reference_count,
        candidate_count,
        matched: matches.len(),
        unmatched: unmatched.len(),
        match_percent: match_percent(matches.len(), candidate_count),
        by_rule,
    }
}

/// Share of candidates that found a match, or `None` with no candidates.
pub fn match_percent(matched: usize, candidate_count: usize) -> Option<f64> {
    if candidate_count == 0 {
        return None;
    }
    Some(100.0 * matched as f64 / candidate_count as f64)
}

impl fmt::Display for ReconSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Doctors in reference set: {}", self.reference_count)?;
        writeln!(f, "Doctors in candidate set: {}", self.candidate_count)?;
        writeln!(f, "Matches found: {}", self.matched)?;
        writeln!(f, "Candidates without match: {}", self.unmatched)?;
        match self.match_percent {
            Some(pct) => write!(f, "Match %: {pct:.2}"),
            None => write!(f, "Match %: n/a"),
        }
    }
}
