//! Per-utterance comparison of two candidate transcriptions against a
//! shared reference

use crate::cer::character_error_rate;
use crate::config::Labels;
use crate::text::normalize;
use std::collections::{BTreeSet, HashMap};

/// Which side of the comparison an utterance was assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Candidate A had the lower error rate against the merged reference.
    A,
    /// Candidate B had the lower error rate.
    B,
    /// Both rates were equal.
    Tie,
}

impl Decision {
    /// Display label for this decision. Ties land in the shared bucket.
    pub fn label<'a>(&self, labels: &'a Labels) -> &'a str {
        match self {
            Decision::A => &labels.a,
            Decision::B => &labels.b,
            Decision::Tie => &labels.tie,
        }
    }
}

/// The four key→text mappings classification draws from.
///
/// Any key may be absent from any mapping: absent merged/candidate text is
/// treated as empty, an absent true reference falls back to the merged one.
#[derive(Debug, Default)]
pub struct TranscriptSources {
    pub merged: HashMap<String, String>,
    pub candidate_a: HashMap<String, String>,
    pub candidate_b: HashMap<String, String>,
    pub truth: HashMap<String, String>,
}

impl TranscriptSources {
    /// Keys to classify: the union of the merged and candidate mappings.
    ///
    /// Keys that only appear in the true-reference mapping do not create
    /// utterances; that mapping exists to check the others, not to add work.
    pub fn keys(&self) -> BTreeSet<String> {
        let mut keys: BTreeSet<String> = self.merged.keys().cloned().collect();
        keys.extend(self.candidate_a.keys().cloned());
        keys.extend(self.candidate_b.keys().cloned());
        keys
    }

    fn text<'a>(map: &'a HashMap<String, String>, key: &str) -> &'a str {
        map.get(key).map(String::as_str).unwrap_or("")
    }
}

/// One fully classified utterance, carrying every rate the reports need.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub key: String,
    pub merged_raw: String,
    pub candidate_a_raw: String,
    pub candidate_b_raw: String,
    /// Raw true reference; the merged text when none was supplied.
    pub truth_raw: String,
    /// Candidate rates against the merged reference. These two decide.
    pub rate_a: f64,
    pub rate_b: f64,
    /// Rates against the true reference, reported for every utterance.
    pub truth_rate_merged: f64,
    pub truth_rate_a: f64,
    pub truth_rate_b: f64,
    pub decision: Decision,
    /// Normalized candidates are identical and non-empty.
    pub same_text: bool,
    /// Normalized candidates and merged reference are all identical and
    /// non-empty.
    pub all_texts_equal: bool,
}

/// Classify a single key against the loaded sources.
pub fn classify_utterance(key: &str, sources: &TranscriptSources) -> Utterance {
    let merged_raw = TranscriptSources::text(&sources.merged, key).to_string();
    let candidate_a_raw = TranscriptSources::text(&sources.candidate_a, key).to_string();
    let candidate_b_raw = TranscriptSources::text(&sources.candidate_b, key).to_string();
    let truth_raw = sources
        .truth
        .get(key)
        .cloned()
        .unwrap_or_else(|| merged_raw.clone());

    let merged = normalize(&merged_raw);
    let a = normalize(&candidate_a_raw);
    let b = normalize(&candidate_b_raw);
    let truth = normalize(&truth_raw);

    let rate_a = character_error_rate(&a, &merged);
    let rate_b = character_error_rate(&b, &merged);
    let truth_rate_merged = character_error_rate(&merged, &truth);
    let truth_rate_a = character_error_rate(&a, &truth);
    let truth_rate_b = character_error_rate(&b, &truth);

    let decision = if rate_a < rate_b {
        Decision::A
    } else if rate_b < rate_a {
        Decision::B
    } else {
        Decision::Tie
    };

    let same_text = !a.is_empty() && a == b;
    let all_texts_equal = same_text && a == merged;

    Utterance {
        key: key.to_string(),
        merged_raw,
        candidate_a_raw,
        candidate_b_raw,
        truth_raw,
        rate_a,
        rate_b,
        truth_rate_merged,
        truth_rate_a,
        truth_rate_b,
        decision,
        same_text,
        all_texts_equal,
    }
}

/// Classify every key, in lexicographic key order.
///
/// The ordering is part of the contract: lists, reports and tie statistics
/// must come out identical across runs over the same inputs.
pub fn classify_corpus(sources: &TranscriptSources) -> Vec<Utterance> {
    sources
        .keys()
        .iter()
        .map(|key| classify_utterance(key, sources))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sources_for(merged: &str, a: &str, b: &str, truth: Option<&str>) -> TranscriptSources {
        TranscriptSources {
            merged: map(&[("u1", merged)]),
            candidate_a: map(&[("u1", a)]),
            candidate_b: map(&[("u1", b)]),
            truth: truth.map(|t| map(&[("u1", t)])).unwrap_or_default(),
        }
    }

    #[test]
    fn test_lower_rate_wins() {
        let utt = classify_utterance("u1", &sources_for("你好", "你好", "您好", Some("你好")));
        assert_eq!(utt.rate_a, 0.0);
        assert_eq!(utt.rate_b, 50.0);
        assert_eq!(utt.decision, Decision::A);
        assert!(!utt.same_text);

        let utt = classify_utterance("u1", &sources_for("你好", "您好", "你好", Some("你好")));
        assert_eq!(utt.decision, Decision::B);
    }

    #[test]
    fn test_equal_rates_tie() {
        // both candidates carry one substitution against the merged text
        let utt = classify_utterance(
            "u1",
            &sources_for("天氣真好", "天器真好", "天器真好", Some("天氣真好")),
        );
        assert_eq!(utt.rate_a, utt.rate_b);
        assert_eq!(utt.decision, Decision::Tie);
        assert!(utt.same_text);
        assert!(!utt.all_texts_equal);
        assert_eq!(utt.truth_rate_a, 25.0);
        assert_eq!(utt.truth_rate_b, 25.0);
        assert_eq!(utt.truth_rate_merged, 0.0);
    }

    #[test]
    fn test_both_zero_is_tie() {
        let utt = classify_utterance("u1", &sources_for("你好", "你好", "你好", None));
        assert_eq!(utt.decision, Decision::Tie);
        assert!(utt.all_texts_equal);
    }

    #[test]
    fn test_swapping_candidates_flips_decision() {
        let forward = classify_utterance("u1", &sources_for("你好", "你好", "您好", None));
        let swapped = classify_utterance("u1", &sources_for("你好", "您好", "你好", None));
        assert_eq!(forward.decision, Decision::A);
        assert_eq!(swapped.decision, Decision::B);

        let tie = classify_utterance("u1", &sources_for("你好", "您好", "妳好", None));
        let tie_swapped = classify_utterance("u1", &sources_for("你好", "妳好", "您好", None));
        assert_eq!(tie.decision, Decision::Tie);
        assert_eq!(tie_swapped.decision, Decision::Tie);
    }

    #[test]
    fn test_truth_falls_back_to_merged() {
        let utt = classify_utterance("u1", &sources_for("你好", "你好", "您好", None));
        assert_eq!(utt.truth_raw, "你好");
        assert_eq!(utt.truth_rate_merged, 0.0);
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let sources = TranscriptSources {
            merged: map(&[("u1", "你好")]),
            ..Default::default()
        };
        let utt = classify_utterance("u1", &sources);
        assert_eq!(utt.candidate_a_raw, "");
        assert_eq!(utt.candidate_b_raw, "");
        // both candidates empty against a non-empty reference: tied at 100
        assert_eq!(utt.rate_a, 100.0);
        assert_eq!(utt.decision, Decision::Tie);
        assert!(!utt.same_text);
    }

    #[test]
    fn test_corpus_keys_union_excludes_truth_only() {
        let sources = TranscriptSources {
            merged: map(&[("b", "x")]),
            candidate_a: map(&[("a", "x")]),
            candidate_b: map(&[("c", "x")]),
            truth: map(&[("z", "x")]),
        };
        let keys: Vec<String> = sources.keys().into_iter().collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn test_corpus_is_sorted_and_partitioned() {
        let sources = TranscriptSources {
            merged: map(&[("u2", "你好"), ("u1", "天氣真好"), ("u3", "好")]),
            candidate_a: map(&[("u1", "天器真好"), ("u2", "你好"), ("u3", "好")]),
            candidate_b: map(&[("u1", "天器真好"), ("u2", "您好"), ("u3", "不好")]),
            truth: HashMap::new(),
        };
        let utterances = classify_corpus(&sources);
        let keys: Vec<&str> = utterances.iter().map(|u| u.key.as_str()).collect();
        assert_eq!(keys, ["u1", "u2", "u3"]);

        // exactly one decision per key
        let ties = utterances
            .iter()
            .filter(|u| u.decision == Decision::Tie)
            .count();
        let a_wins = utterances
            .iter()
            .filter(|u| u.decision == Decision::A)
            .count();
        let b_wins = utterances
            .iter()
            .filter(|u| u.decision == Decision::B)
            .count();
        assert_eq!(ties + a_wins + b_wins, utterances.len());
        assert_eq!((a_wins, b_wins, ties), (2, 0, 1));
    }
}
