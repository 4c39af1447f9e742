//! Distributional statistics over tied utterances

use crate::classify::{Decision, Utterance};

/// Zero-rate flags derived for one tied utterance.
///
/// Exists only for ties; every flag is measured against the true reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TieRecord {
    pub merged_matches_truth: bool,
    pub candidate_a_matches_truth: bool,
    pub candidate_b_matches_truth: bool,
    pub all_match_truth: bool,
    /// Normalized candidates are identical and non-empty.
    pub candidates_identical: bool,
}

/// Tie flags for an utterance, or `None` when the decision was not a tie.
pub fn tie_record(utt: &Utterance) -> Option<TieRecord> {
    if utt.decision != Decision::Tie {
        return None;
    }
    let merged_matches_truth = utt.truth_rate_merged == 0.0;
    let candidate_a_matches_truth = utt.truth_rate_a == 0.0;
    let candidate_b_matches_truth = utt.truth_rate_b == 0.0;
    Some(TieRecord {
        merged_matches_truth,
        candidate_a_matches_truth,
        candidate_b_matches_truth,
        all_match_truth: merged_matches_truth
            && candidate_a_matches_truth
            && candidate_b_matches_truth,
        candidates_identical: utt.same_text,
    })
}

/// Counters accumulated across one classification run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TieStats {
    /// Utterances whose normalized candidates matched exactly (non-empty),
    /// counted regardless of the decision.
    pub same_text: usize,
    /// Tied utterances.
    pub ties: usize,
    /// Ties where the merged reference matched the true reference exactly.
    pub truth_zero_merged: usize,
    /// Ties where candidate A matched the true reference exactly.
    pub truth_zero_a: usize,
    /// Ties where candidate B matched the true reference exactly.
    pub truth_zero_b: usize,
    /// Ties where all three of the above held at once.
    pub all_three_zero: usize,
    /// Ties where both candidates and the merged reference normalize to the
    /// same non-empty text.
    pub all_texts_equal: usize,
}

/// Feeds on every classified utterance and tallies [`TieStats`].
///
/// Owned by a single run; the counters are never shared.
#[derive(Debug, Default)]
pub struct DiagnosticsAggregator {
    stats: TieStats,
}

impl DiagnosticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one utterance. Call once per key, in any order.
    pub fn observe(&mut self, utt: &Utterance) {
        if utt.same_text {
            self.stats.same_text += 1;
        }

        let Some(record) = tie_record(utt) else {
            return;
        };

        self.stats.ties += 1;
        if record.merged_matches_truth {
            self.stats.truth_zero_merged += 1;
        }
        if record.candidate_a_matches_truth {
            self.stats.truth_zero_a += 1;
        }
        if record.candidate_b_matches_truth {
            self.stats.truth_zero_b += 1;
        }
        if record.all_match_truth {
            self.stats.all_three_zero += 1;
        }
        if utt.all_texts_equal {
            self.stats.all_texts_equal += 1;
        }
    }

    pub fn finish(self) -> TieStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify_utterance, TranscriptSources};
    use std::collections::HashMap;

    fn utterance(merged: &str, a: &str, b: &str, truth: &str) -> Utterance {
        let one = |v: &str| -> HashMap<String, String> {
            [("u1".to_string(), v.to_string())].into_iter().collect()
        };
        let sources = TranscriptSources {
            merged: one(merged),
            candidate_a: one(a),
            candidate_b: one(b),
            truth: one(truth),
        };
        classify_utterance("u1", &sources)
    }

    #[test]
    fn test_no_record_for_decided_utterance() {
        let utt = utterance("你好", "你好", "您好", "你好");
        assert_eq!(utt.decision, Decision::A);
        assert!(tie_record(&utt).is_none());

        let mut agg = DiagnosticsAggregator::new();
        agg.observe(&utt);
        assert_eq!(agg.finish(), TieStats::default());
    }

    #[test]
    fn test_same_text_counted_even_without_tie_flags() {
        // identical wrong candidates: tie, same text, no zero counters
        let utt = utterance("天氣真好", "天器真好", "天器真好", "天氣真好");
        let mut agg = DiagnosticsAggregator::new();
        agg.observe(&utt);
        let stats = agg.finish();
        assert_eq!(stats.same_text, 1);
        assert_eq!(stats.ties, 1);
        assert_eq!(stats.truth_zero_merged, 1); // merged == truth here
        assert_eq!(stats.truth_zero_a, 0);
        assert_eq!(stats.truth_zero_b, 0);
        assert_eq!(stats.all_three_zero, 0);
        assert_eq!(stats.all_texts_equal, 0);
    }

    #[test]
    fn test_all_three_zero() {
        let utt = utterance("你好", "你好", "你好", "你好");
        let record = tie_record(&utt).unwrap();
        assert!(record.all_match_truth);
        assert!(record.candidates_identical);

        let mut agg = DiagnosticsAggregator::new();
        agg.observe(&utt);
        let stats = agg.finish();
        assert_eq!(stats.ties, 1);
        assert_eq!(stats.truth_zero_merged, 1);
        assert_eq!(stats.truth_zero_a, 1);
        assert_eq!(stats.truth_zero_b, 1);
        assert_eq!(stats.all_three_zero, 1);
        assert_eq!(stats.all_texts_equal, 1);
    }

    #[test]
    fn test_partial_zero_counters() {
        // candidates match truth, merged does not
        let utt = utterance("您好", "你好", "你好", "你好");
        let record = tie_record(&utt).unwrap();
        assert!(!record.merged_matches_truth);
        assert!(record.candidate_a_matches_truth);
        assert!(record.candidate_b_matches_truth);
        assert!(!record.all_match_truth);

        let mut agg = DiagnosticsAggregator::new();
        agg.observe(&utt);
        let stats = agg.finish();
        assert_eq!(stats.truth_zero_a, 1);
        assert_eq!(stats.truth_zero_b, 1);
        assert_eq!(stats.truth_zero_merged, 0);
        assert_eq!(stats.all_three_zero, 0);
        assert_eq!(stats.all_texts_equal, 0);
    }

    #[test]
    fn test_empty_candidates_do_not_count_as_same_text() {
        let utt = utterance("你好", "", "", "你好");
        assert_eq!(utt.decision, Decision::Tie);
        let mut agg = DiagnosticsAggregator::new();
        agg.observe(&utt);
        let stats = agg.finish();
        assert_eq!(stats.same_text, 0);
        assert_eq!(stats.ties, 1);
    }
}
