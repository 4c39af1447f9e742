//! Plain-text report rendering
//!
//! Everything here builds strings; writing them is the caller's job. Reports
//! are regenerated from scratch each run, so every renderer produces the
//! complete file content.

use crate::classify::{Decision, Utterance};
use crate::config::Labels;
use crate::diagnostics::TieStats;
use crate::evaluate::Scorecard;
use std::fmt::Write;
use std::path::PathBuf;

/// Classification artifact filenames under the result directory.
pub const SUMMARY_ALL_FILE: &str = "summary_all.txt";
pub const TIES_FILE: &str = "ties.txt";
pub const MISSING_AUDIO_FILE: &str = "missing_audio.txt";

/// Scoring artifact filenames under the scoring directory.
pub const ACCURACY_SUMMARY_FILE: &str = "accuracy_summary.txt";
pub const ERRORS_FILE: &str = "errors.txt";
pub const MISSING_GROUNDTRUTH_FILE: &str = "missing_groundtruth.txt";
pub const AMBIGUOUS_GROUNDTRUTH_FILE: &str = "ambiguous_groundtruth.txt";

/// Where an utterance's audio file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioStatus {
    /// Copied into the decision bucket at this path.
    Copied(PathBuf),
    /// No file with this key under the audio root.
    Missing,
    /// A file was found but copying it failed; the record still completes.
    CopyFailed,
}

/// One labeled multi-field block for a single utterance.
pub fn render_block(utt: &Utterance, labels: &Labels, audio: &AudioStatus) -> String {
    let mut block = String::new();
    let _ = writeln!(block, "file: {}", utt.key);
    let _ = writeln!(block, "truth: {}", utt.truth_raw);
    let _ = writeln!(block, "merged: {}", utt.merged_raw);
    let _ = writeln!(block, "cer vs truth (merged): {:.4}", utt.truth_rate_merged);
    let _ = writeln!(block, "{}: {}", labels.a, utt.candidate_a_raw);
    let _ = writeln!(block, "cer: {:.4}", utt.rate_a);
    let _ = writeln!(block, "cer vs truth: {:.4}", utt.truth_rate_a);
    let _ = writeln!(block, "{}: {}", labels.b, utt.candidate_b_raw);
    let _ = writeln!(block, "cer: {:.4}", utt.rate_b);
    let _ = writeln!(block, "cer vs truth: {:.4}", utt.truth_rate_b);
    let _ = writeln!(block, "decision: {}", utt.decision.label(labels));
    match audio {
        AudioStatus::Copied(path) => {
            let _ = write!(block, "copied to: {}", path.display());
        }
        AudioStatus::Missing => {
            let _ = write!(block, "audio: no matching file (not copied)");
        }
        AudioStatus::CopyFailed => {
            let _ = write!(block, "audio: copy failed (not copied)");
        }
    }
    block
}

/// Everything the classify stage persists.
#[derive(Debug)]
pub struct ClassificationReports {
    /// All per-utterance blocks, key order, blank-line separated.
    pub aggregate: String,
    /// Counter summary plus the partitioned tie blocks.
    pub tie_report: String,
    /// Ordered key lists, one per decision bucket.
    pub list_a: Vec<String>,
    pub list_b: Vec<String>,
    pub list_tie: Vec<String>,
    /// Keys with no audio file, key order.
    pub missing_audio: Vec<String>,
}

/// Accumulates per-utterance records; feed keys in their final order.
#[derive(Debug)]
pub struct ReportBuilder<'a> {
    labels: &'a Labels,
    blocks: Vec<String>,
    tie_blocks_same: Vec<String>,
    tie_blocks_diff: Vec<String>,
    list_a: Vec<String>,
    list_b: Vec<String>,
    list_tie: Vec<String>,
    missing_audio: Vec<String>,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(labels: &'a Labels) -> Self {
        Self {
            labels,
            blocks: Vec::new(),
            tie_blocks_same: Vec::new(),
            tie_blocks_diff: Vec::new(),
            list_a: Vec::new(),
            list_b: Vec::new(),
            list_tie: Vec::new(),
            missing_audio: Vec::new(),
        }
    }

    /// Record one classified utterance and its audio outcome.
    pub fn record(&mut self, utt: &Utterance, audio: &AudioStatus) {
        let block = render_block(utt, self.labels, audio);

        match utt.decision {
            Decision::A => self.list_a.push(utt.key.clone()),
            Decision::B => self.list_b.push(utt.key.clone()),
            Decision::Tie => {
                self.list_tie.push(utt.key.clone());
                if utt.same_text {
                    self.tie_blocks_same.push(block.clone());
                } else {
                    self.tie_blocks_diff.push(block.clone());
                }
            }
        }

        if matches!(audio, AudioStatus::Missing) {
            self.missing_audio.push(utt.key.clone());
        }

        self.blocks.push(block);
    }

    pub fn into_reports(self, stats: &TieStats) -> ClassificationReports {
        let tie_report = render_tie_report(
            stats,
            self.labels,
            &self.tie_blocks_diff,
            &self.tie_blocks_same,
        );
        ClassificationReports {
            aggregate: self.blocks.join("\n\n"),
            tie_report,
            list_a: self.list_a,
            list_b: self.list_b,
            list_tie: self.list_tie,
            missing_audio: self.missing_audio,
        }
    }
}

fn render_partition(out: &mut String, blocks: &[String]) {
    if blocks.is_empty() {
        out.push_str("(none)\n");
    } else {
        out.push_str(&blocks.join("\n\n"));
    }
}

/// Tie report: counters first, then different-text ties, then same-text
/// ties, each partition in key order.
fn render_tie_report(
    stats: &TieStats,
    labels: &Labels,
    blocks_diff: &[String],
    blocks_same: &[String],
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "identical candidates: {} / ties: {}",
        stats.same_text, stats.ties
    );
    let _ = writeln!(out, "merged matches truth: {}", stats.truth_zero_merged);
    let _ = writeln!(out, "{} matches truth: {}", labels.a, stats.truth_zero_a);
    let _ = writeln!(out, "{} matches truth: {}", labels.b, stats.truth_zero_b);
    let _ = writeln!(out, "all three match truth: {}", stats.all_three_zero);
    let _ = writeln!(
        out,
        "all three texts identical: {}",
        stats.all_texts_equal
    );
    out.push('\n');

    out.push_str("=== ties with differing text ===\n\n");
    render_partition(&mut out, blocks_diff);
    out.push_str("\n\n=== ties with identical text ===\n\n");
    render_partition(&mut out, blocks_same);
    out
}

/// Newline-delimited key list, trailing newline included (empty for no keys).
pub fn render_key_list(keys: &[String]) -> String {
    let mut out = String::new();
    for key in keys {
        out.push_str(key);
        out.push('\n');
    }
    out
}

/// Accuracy summary with the confusion table, sorted by predicted label
/// then true label.
pub fn render_accuracy_summary(score: &Scorecard) -> String {
    let mut out = String::new();
    out.push_str("accuracy summary\n");
    out.push_str("================\n");
    let _ = writeln!(
        out,
        "total predictions (unique keys): {}",
        score.total_predicted
    );
    let _ = writeln!(out, "matched to ground truth: {}", score.matched);
    let _ = writeln!(
        out,
        "missing from ground truth: {} (see {})",
        score.missing.len(),
        MISSING_GROUNDTRUTH_FILE
    );
    let _ = writeln!(out, "correct: {}", score.correct);
    let _ = writeln!(
        out,
        "strict accuracy (correct / total predictions): {:.4}",
        score.strict_accuracy()
    );
    let _ = writeln!(
        out,
        "matched accuracy (correct / matched): {:.4}",
        score.matched_accuracy()
    );
    out.push('\n');

    out.push_str("confusion (predicted -> truth):\n");
    for ((predicted, truth), count) in &score.confusion {
        let _ = writeln!(out, "  {} -> {}: {}", predicted, truth, count);
    }
    out.push('\n');

    out.push_str("file counts:\n");
    let _ = writeln!(
        out,
        "  misclassified ({}): {}",
        ERRORS_FILE,
        score.misclassified.len()
    );
    let _ = writeln!(
        out,
        "  missing ({}): {}",
        MISSING_GROUNDTRUTH_FILE,
        score.missing.len()
    );
    let _ = writeln!(
        out,
        "  ambiguous ({}): {}",
        AMBIGUOUS_GROUNDTRUTH_FILE,
        score.ambiguous.len()
    );
    out
}

/// Misclassified keys, one tab-delimited record per line.
pub fn render_misclassified(score: &Scorecard) -> String {
    let mut out = String::new();
    out.push_str("misclassified keys (predicted labels did not match ground truth)\n");
    out.push_str("format: key <TAB> predicted label(s) <TAB> true label(s) <TAB> true path(s)\n\n");
    for record in &score.misclassified {
        let paths: Vec<String> = record
            .truth_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}",
            record.key,
            record.predicted.join(","),
            record.truth.join(","),
            paths.join(";")
        );
    }
    out
}

/// Predicted keys with no ground-truth entry, one per line.
pub fn render_missing_groundtruth(score: &Scorecard) -> String {
    let mut out = String::new();
    out.push_str("predicted keys with no entry in any ground-truth directory\n");
    out.push_str("one key per line\n\n");
    for key in &score.missing {
        out.push_str(key);
        out.push('\n');
    }
    out
}

/// Keys found under more than one ground-truth label.
pub fn render_ambiguous_groundtruth(score: &Scorecard) -> String {
    let mut out = String::new();
    out.push_str("keys found under more than one ground-truth label (manual review)\n");
    out.push_str("format: key <TAB> label|path;label|path;...\n\n");
    for (key, entries) in &score.ambiguous {
        let pairs: Vec<String> = entries
            .iter()
            .map(|(label, path)| format!("{}|{}", label, path.display()))
            .collect();
        let _ = writeln!(out, "{}\t{}", key, pairs.join(";"));
    }
    out
}
