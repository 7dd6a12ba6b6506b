#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::evidence::compute_summary;
use crate::model::{MatchRule, MatchedPair, ReconMeta, ReconResult, ReconSummary, Record};

/// Holds both rosters and the outcome of the last reconciliation pass.
///
/// `reference_set` and `candidate_set` are filled by the caller. Everything
/// else is only written by [`Reconciler::reconcile`] and is empty (or zero)
/// until it has run, so the outputs always describe the same pass even if the
/// inputs are edited afterwards.
#[derive(Debug, Default)]
pub struct Reconciler {
    pub reference_set: Vec<Record>,
    pub candidate_set: Vec<Record>,
    matches: Vec<MatchedPair>,
    unmatched: Vec<Record>,
    reference_count: usize,
    candidate_count: usize,
}

impl Reconciler {
    pub fn new(reference_set: Vec<Record>, candidate_set: Vec<Record>) -> Self {
        Self {
            reference_set,
            candidate_set,
            matches: Vec::new(),
            unmatched: Vec::new(),
            reference_count: 0,
            candidate_count: 0,
        }
    }

    /// Pair every candidate with the first reference record it identity-matches.
    ///
    /// Candidates are visited in order and each lands in exactly one of
    /// `matches` or `unmatched`, so both outputs follow candidate order.
    /// Reference records are not consumed: several candidates may pair with
    /// the same one. Previous results are discarded.
    pub fn reconcile(&mut self) {
        #[cfg(feature = "parallel")]
        let outcomes: Vec<Option<(usize, MatchRule)>> = self
            .candidate_set
            .par_iter()
            .map(|candidate| find_reference(candidate, &self.reference_set))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<Option<(usize, MatchRule)>> = self
            .candidate_set
            .iter()
            .map(|candidate| find_reference(candidate, &self.reference_set))
            .collect();

        let mut matches = Vec::new();
        let mut unmatched = Vec::new();

        for (candidate, outcome) in self.candidate_set.iter().zip(outcomes) {
            match outcome {
                Some((ri, rule)) => {
                    let reference = &self.reference_set[ri];
                    log::debug!(
                        "matched {} {} -> reference #{ri} via {rule}",
                        candidate.first_name,
                        candidate.last_name,
                    );
                    matches.push(MatchedPair {
                        candidate: candidate.clone(),
                        reference: reference.clone(),
                        rule,
                    });
                }
                None => {
                    log::debug!(
                        "no match for {} {} (npi '{}')",
                        candidate.first_name,
                        candidate.last_name,
                        candidate.national_id,
                    );
                    unmatched.push(candidate.clone());
                }
            }
        }

        self.matches = matches;
        self.unmatched = unmatched;
        self.reference_count = self.reference_set.len();
        self.candidate_count = self.candidate_set.len();

        log::info!(
            "reconciled {} candidate(s) against {} reference record(s): {} matched, {} unmatched",
            self.candidate_count,
            self.reference_count,
            self.matches.len(),
            self.unmatched.len(),
        );
    }

    /// ⟨candidate, reference⟩ pairs from the last pass, in candidate order.
    pub fn matches(&self) -> &[MatchedPair] {
        &self.matches
    }

    /// Candidates with no matching reference record, in candidate order.
    pub fn unmatched(&self) -> &[Record] {
        &self.unmatched
    }

    /// Counts of the last pass. Edits to the input sets after it are not seen.
    pub fn summary(&self) -> ReconSummary {
        compute_summary(
            self.reference_count,
            self.candidate_count,
            &self.matches,
            &self.unmatched,
        )
    }

    /// Snapshot of the last pass for serialization.
    pub fn result(&self, config_name: &str) -> ReconResult {
        ReconResult {
            meta: ReconMeta {
                config_name: config_name.to_string(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339(),
            },
            summary: self.summary(),
            matches: self.matches.clone(),
            unmatched: self.unmatched.clone(),
        }
    }
}

/// Linear scan of `reference_set` in order, returning the first hit.
///
/// The earliest matching reference always wins, even when later ones would
/// also match. Ambiguity is not reported.
fn find_reference(candidate: &Record, reference_set: &[Record]) -> Option<(usize, MatchRule)> {
    for (ri, reference) in reference_set.iter().enumerate() {
        if let Some(rule) = candidate.identity_rule(reference) {
            return Some((ri, rule));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Address;

    fn clinic() -> Address {
        Address::new("271 Annabelle Fort", "Apt. 404", "53549", "Port Demetris", "LA")
    }

    #[test]
    fn empty_before_first_pass() {
        let recon = Reconciler::new(vec![Record::new("a", "b", "1")], vec![Record::new("a", "b", "1")]);
        assert!(recon.matches().is_empty());
        assert!(recon.unmatched().is_empty());
    }

    #[test]
    fn matches_by_npi_and_leaves_rest_unmatched() {
        let reference = vec![Record::new("a", "b", "111"), Record::new("a", "b", "222")];
        let candidates = vec![Record::new("a", "b", "222"), Record::new("a", "b", "333")];
        let mut recon = Reconciler::new(reference.clone(), candidates.clone());
        recon.reconcile();

        assert_eq!(
            recon.matches(),
            &[MatchedPair {
                candidate: candidates[0].clone(),
                reference: reference[1].clone(),
                rule: MatchRule::NationalId,
            }]
        );
        assert_eq!(recon.unmatched(), &[candidates[1].clone()]);
    }

    #[test]
    fn first_reference_wins() {
        let reference = vec![
            Record::new("Dean", "Israel", "").with_addresses(vec![clinic()]),
            Record::new("DEAN", "ISRAEL", "999").with_addresses(vec![clinic()]),
        ];
        let candidates = vec![Record::new("dean", "israel", "").with_addresses(vec![clinic()])];
        let mut recon = Reconciler::new(reference.clone(), candidates);
        recon.reconcile();

        assert_eq!(recon.matches().len(), 1);
        assert_eq!(recon.matches()[0].reference, reference[0]);
        assert_eq!(recon.matches()[0].rule, MatchRule::NameAndAddress);
    }

    #[test]
    fn reference_not_consumed() {
        let reference = vec![Record::new("a", "b", "111")];
        let candidates = vec![Record::new("x", "y", "111"), Record::new("p", "q", "111")];
        let mut recon = Reconciler::new(reference, candidates);
        recon.reconcile();

        assert_eq!(recon.matches().len(), 2);
        assert!(recon.unmatched().is_empty());
    }

    #[test]
    fn empty_candidates() {
        let mut recon = Reconciler::new(vec![Record::new("a", "b", "111")], vec![]);
        recon.reconcile();
        assert!(recon.matches().is_empty());
        assert!(recon.unmatched().is_empty());
        assert_eq!(recon.summary().match_percent, None);
    }

    #[test]
    fn empty_reference() {
        let mut recon = Reconciler::new(vec![], vec![Record::new("a", "b", "111")]);
        recon.reconcile();
        assert!(recon.matches().is_empty());
        assert_eq!(recon.unmatched().len(), 1);
    }

    #[test]
    fn rerun_does_not_accumulate() {
        let mut recon = Reconciler::new(
            vec![Record::new("a", "b", "111")],
            vec![Record::new("a", "b", "111"), Record::new("a", "b", "222")],
        );
        recon.reconcile();
        recon.reconcile();
        assert_eq!(recon.matches().len(), 1);
        assert_eq!(recon.unmatched().len(), 1);

        // Changing inputs between passes recomputes from scratch
        recon.candidate_set.truncate(1);
        recon.reconcile();
        assert_eq!(recon.matches().len(), 1);
        assert!(recon.unmatched().is_empty());
    }

    #[test]
    fn inputs_untouched() {
        let reference = vec![Record::new("a", "b", "111")];
        let candidates = vec![Record::new("a", "b", "111"), Record::new("c", "d", "")];
        let mut recon = Reconciler::new(reference.clone(), candidates.clone());
        recon.reconcile();
        assert_eq!(recon.reference_set, reference);
        assert_eq!(recon.candidate_set, candidates);
    }

    #[test]
    fn result_carries_meta_and_outputs() {
        let mut recon = Reconciler::new(
            vec![Record::new("a", "b", "111")],
            vec![Record::new("a", "b", "111")],
        );
        recon.reconcile();
        let result = recon.result("weekly");
        assert_eq!(result.meta.config_name, "weekly");
        assert_eq!(result.meta.engine_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.summary.matched, 1);
    }

    #[test]
    fn summary_reflects_last_pass() {
        let mut recon = Reconciler::new(
            vec![Record::new("a", "b", "111")],
            vec![Record::new("a", "b", "111")],
        );
        assert_eq!(recon.summary().candidate_count, 0);

        recon.reconcile();
        recon.candidate_set.clear();
        recon.reference_set.push(Record::new("c", "d", "222"));

        let summary = recon.summary();
        assert_eq!(summary.reference_count, 1);
        assert_eq!(summary.candidate_count, 1);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.match_percent, Some(100.0));

        recon.reconcile();
        let summary = recon.summary();
        assert_eq!(summary.reference_count, 2);
        assert_eq!(summary.candidate_count, 0);
        assert_eq!(summary.match_percent, None);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_pass_matches_sequential_scan() {
        // Several references match the same candidates; the earliest must win
        let reference: Vec<Record> = (0..40)
            .map(|i| {
                Record::new(format!("Dean{}", i % 4), "Israel", format!("{}", i % 7))
                    .with_addresses(vec![clinic()])
            })
            .collect();
        let candidates: Vec<Record> = (0..500)
            .map(|i| {
                let npi = if i % 3 == 0 { String::new() } else { format!("{}", i % 11) };
                let addresses = if i % 2 == 0 { vec![clinic()] } else { Vec::new() };
                Record::new(format!("DEAN{}", i % 6), "ISRAEL", npi).with_addresses(addresses)
            })
            .collect();

        let mut expected_matches = Vec::new();
        let mut expected_unmatched = Vec::new();
        for candidate in &candidates {
            match find_reference(candidate, &reference) {
                Some((ri, rule)) => expected_matches.push(MatchedPair {
                    candidate: candidate.clone(),
                    reference: reference[ri].clone(),
                    rule,
                }),
                None => expected_unmatched.push(candidate.clone()),
            }
        }
        assert!(!expected_matches.is_empty());
        assert!(!expected_unmatched.is_empty());

        let mut recon = Reconciler::new(reference, candidates);
        recon.reconcile();
        assert_eq!(recon.matches(), expected_matches.as_slice());
        assert_eq!(recon.unmatched(), expected_unmatched.as_slice());
    }
}
