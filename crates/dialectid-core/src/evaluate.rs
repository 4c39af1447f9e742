//! Scoring of predicted dialect labels against directory-derived ground truth

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// The dialect labels attached to one key. Used for both predictions and
/// ground truth.
pub type LabelSet = BTreeSet<String>;

/// Every (label, path) pair a key was found under in the ground-truth
/// directories.
///
/// A key may legitimately appear under more than one label directory; such
/// keys are reported as ambiguous but still contribute all their labels.
#[derive(Debug, Default)]
pub struct GroundTruthIndex {
    entries: BTreeMap<String, Vec<(String, PathBuf)>>,
}

impl GroundTruthIndex {
    pub fn insert(&mut self, key: String, label: String, path: PathBuf) {
        self.entries.entry(key).or_default().push((label, path));
    }

    pub fn get(&self, key: &str) -> Option<&[(String, PathBuf)]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct labels recorded for a key.
    pub fn labels_for(&self, key: &str) -> LabelSet {
        self.get(key)
            .map(|entries| entries.iter().map(|(label, _)| label.clone()).collect())
            .unwrap_or_default()
    }

    /// Keys found under more than one distinct label, with all their entries.
    pub fn ambiguous(&self) -> Vec<(String, Vec<(String, PathBuf)>)> {
        self.entries
            .iter()
            .filter(|(key, _)| self.labels_for(key).len() > 1)
            .map(|(key, entries)| (key.clone(), entries.clone()))
            .collect()
    }
}

/// Merge per-source prediction maps; a key present in several sources ends
/// up with a multi-label prediction.
pub fn merge_predictions(
    sources: Vec<BTreeMap<String, LabelSet>>,
) -> BTreeMap<String, LabelSet> {
    let mut merged: BTreeMap<String, LabelSet> = BTreeMap::new();
    for source in sources {
        for (key, labels) in source {
            merged.entry(key).or_default().extend(labels);
        }
    }
    merged
}

/// One key whose predicted labels did not intersect its ground truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misclassification {
    pub key: String,
    pub predicted: Vec<String>,
    pub truth: Vec<String>,
    /// Ground-truth file paths, for manual inspection.
    pub truth_paths: Vec<PathBuf>,
}

/// Full evaluation result.
#[derive(Debug, Default)]
pub struct Scorecard {
    /// Keys with a non-empty predicted label set.
    pub total_predicted: usize,
    /// Predicted keys that had any ground-truth entry.
    pub matched: usize,
    /// Matched keys whose prediction intersected the ground truth.
    pub correct: usize,
    /// Predicted keys with no ground-truth entry, in key order.
    pub missing: Vec<String>,
    pub misclassified: Vec<Misclassification>,
    pub ambiguous: Vec<(String, Vec<(String, PathBuf)>)>,
    /// (predicted label, true label) → count.
    pub confusion: BTreeMap<(String, String), usize>,
}

impl Scorecard {
    /// Correct over all predictions, missing ones included. 0 when there
    /// were no predictions.
    pub fn strict_accuracy(&self) -> f64 {
        if self.total_predicted == 0 {
            0.0
        } else {
            self.correct as f64 / self.total_predicted as f64
        }
    }

    /// Correct over predictions that found a ground-truth entry. 0 when
    /// nothing matched.
    pub fn matched_accuracy(&self) -> f64 {
        if self.matched == 0 {
            0.0
        } else {
            self.correct as f64 / self.matched as f64
        }
    }
}

/// Score predictions against ground truth.
///
/// A key counts as correct when its predicted and true label sets share at
/// least one label; partial multi-label agreement is enough, full set
/// equality is not required. Every (predicted, true) label pair from the
/// Cartesian product of the two sets feeds the confusion table.
pub fn evaluate(
    predictions: &BTreeMap<String, LabelSet>,
    ground_truth: &GroundTruthIndex,
) -> Scorecard {
    let mut score = Scorecard {
        ambiguous: ground_truth.ambiguous(),
        ..Default::default()
    };

    for (key, predicted) in predictions {
        if predicted.is_empty() {
            continue;
        }
        score.total_predicted += 1;

        let Some(entries) = ground_truth.get(key) else {
            score.missing.push(key.clone());
            continue;
        };
        score.matched += 1;

        let truth_labels = ground_truth.labels_for(key);
        let is_correct = predicted.iter().any(|label| truth_labels.contains(label));

        for predicted_label in predicted {
            for true_label in &truth_labels {
                *score
                    .confusion
                    .entry((predicted_label.clone(), true_label.clone()))
                    .or_default() += 1;
            }
        }

        if is_correct {
            score.correct += 1;
        } else {
            score.misclassified.push(Misclassification {
                key: key.clone(),
                predicted: predicted.iter().cloned().collect(),
                truth: truth_labels.into_iter().collect(),
                truth_paths: entries.iter().map(|(_, path)| path.clone()).collect(),
            });
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> LabelSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn predictions(pairs: &[(&str, &[&str])]) -> BTreeMap<String, LabelSet> {
        pairs
            .iter()
            .map(|(key, names)| (key.to_string(), labels(names)))
            .collect()
    }

    fn index(entries: &[(&str, &str)]) -> GroundTruthIndex {
        let mut gt = GroundTruthIndex::default();
        for (key, label) in entries {
            gt.insert(
                key.to_string(),
                label.to_string(),
                PathBuf::from(format!("驗證/{label}/{key}.wav")),
            );
        }
        gt
    }

    #[test]
    fn test_single_wrong_prediction() {
        let preds = predictions(&[("u1", &["大埔腔"])]);
        let gt = index(&[("u1", "詔安腔")]);
        let score = evaluate(&preds, &gt);

        assert_eq!(score.total_predicted, 1);
        assert_eq!(score.matched, 1);
        assert_eq!(score.correct, 0);
        assert_eq!(score.strict_accuracy(), 0.0);
        assert_eq!(score.matched_accuracy(), 0.0);
        assert_eq!(
            score.confusion,
            [(("大埔腔".to_string(), "詔安腔".to_string()), 1)]
                .into_iter()
                .collect()
        );
        assert_eq!(score.misclassified.len(), 1);
        assert_eq!(score.misclassified[0].predicted, ["大埔腔"]);
        assert_eq!(score.misclassified[0].truth, ["詔安腔"]);
    }

    #[test]
    fn test_intersection_is_enough() {
        // Correctness is any-overlap between the label sets, not equality.
        // A two-label prediction against a one-label truth still counts.
        let preds = predictions(&[("u1", &["大埔腔", "詔安腔"])]);
        let gt = index(&[("u1", "詔安腔")]);
        let score = evaluate(&preds, &gt);

        assert_eq!(score.correct, 1);
        assert_eq!(score.strict_accuracy(), 1.0);
        // both predicted labels still hit the confusion table
        assert_eq!(score.confusion.len(), 2);
        assert_eq!(
            score.confusion[&("大埔腔".to_string(), "詔安腔".to_string())],
            1
        );
        assert_eq!(
            score.confusion[&("詔安腔".to_string(), "詔安腔".to_string())],
            1
        );
    }

    #[test]
    fn test_missing_ground_truth_skips_scoring() {
        let preds = predictions(&[("u1", &["大埔腔"]), ("u2", &["詔安腔"])]);
        let gt = index(&[("u1", "大埔腔")]);
        let score = evaluate(&preds, &gt);

        assert_eq!(score.total_predicted, 2);
        assert_eq!(score.matched, 1);
        assert_eq!(score.correct, 1);
        assert_eq!(score.missing, ["u2"]);
        assert_eq!(score.strict_accuracy(), 0.5);
        assert_eq!(score.matched_accuracy(), 1.0);
        assert!(score.strict_accuracy() <= score.matched_accuracy());
    }

    #[test]
    fn test_ambiguous_keys_contribute_all_labels() {
        let preds = predictions(&[("u1", &["大埔腔"])]);
        let gt = index(&[("u1", "大埔腔"), ("u1", "詔安腔")]);
        let score = evaluate(&preds, &gt);

        assert_eq!(score.ambiguous.len(), 1);
        assert_eq!(score.ambiguous[0].0, "u1");
        assert_eq!(score.ambiguous[0].1.len(), 2);
        // intersection with either truth label counts as correct
        assert_eq!(score.correct, 1);
        // one predicted label × two truth labels
        assert_eq!(score.confusion.values().sum::<usize>(), 2);
    }

    #[test]
    fn test_confusion_totals_are_pairs_not_keys() {
        let preds = predictions(&[("u1", &["大埔腔", "詔安腔"]), ("u2", &["大埔腔"])]);
        let gt = index(&[("u1", "大埔腔"), ("u1", "詔安腔"), ("u2", "大埔腔")]);
        let score = evaluate(&preds, &gt);

        // u1: 2 predicted × 2 truth = 4, u2: 1 × 1 = 1
        assert_eq!(score.confusion.values().sum::<usize>(), 5);
    }

    #[test]
    fn test_duplicate_paths_under_one_label_stay_single_labelled() {
        let mut gt = GroundTruthIndex::default();
        gt.insert(
            "u1".to_string(),
            "大埔腔".to_string(),
            PathBuf::from("驗證/大埔腔/x/u1.wav"),
        );
        gt.insert(
            "u1".to_string(),
            "大埔腔".to_string(),
            PathBuf::from("驗證/大埔腔/y/u1.wav"),
        );
        assert!(gt.ambiguous().is_empty());
        assert_eq!(gt.labels_for("u1").len(), 1);

        let preds = predictions(&[("u1", &["詔安腔"])]);
        let score = evaluate(&preds, &gt);
        // confusion counts label pairs, not duplicate files
        assert_eq!(score.confusion.values().sum::<usize>(), 1);
        // both paths surface for inspection
        assert_eq!(score.misclassified[0].truth_paths.len(), 2);
    }

    #[test]
    fn test_empty_inputs() {
        let score = evaluate(&BTreeMap::new(), &GroundTruthIndex::default());
        assert_eq!(score.strict_accuracy(), 0.0);
        assert_eq!(score.matched_accuracy(), 0.0);
        assert!(score.confusion.is_empty());
    }

    #[test]
    fn test_merge_predictions_multi_label() {
        let a = predictions(&[("u1", &["大埔腔"]), ("u2", &["大埔腔"])]);
        let b = predictions(&[("u1", &["詔安腔"])]);
        let merged = merge_predictions(vec![a, b]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged["u1"], labels(&["大埔腔", "詔安腔"]));
        assert_eq!(merged["u2"], labels(&["大埔腔"]));
    }
}
