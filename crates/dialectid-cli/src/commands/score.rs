//! Score command - grade the classification lists against ground truth

use anyhow::{Context, Result};
use console::{style, Term};
use dialectid_core::corpus::{build_ground_truth_index, read_prediction_list};
use dialectid_core::report::{
    render_accuracy_summary, render_ambiguous_groundtruth, render_misclassified,
    render_missing_groundtruth, ACCURACY_SUMMARY_FILE, AMBIGUOUS_GROUNDTRUTH_FILE, ERRORS_FILE,
    MISSING_GROUNDTRUTH_FILE,
};
use dialectid_core::{evaluate, merge_predictions, Config};
use std::fs;

pub fn run(config: &Config) -> Result<()> {
    let term = Term::stdout();

    let mut per_label = Vec::new();
    for (label, path) in config.prediction_lists() {
        let predictions = read_prediction_list(&path, &label)?;
        term.write_line(&format!(
            "{}: {} predicted keys",
            label,
            style(predictions.len()).cyan()
        ))?;
        per_label.push(predictions);
    }
    let predictions = merge_predictions(per_label);

    let ground_truth = build_ground_truth_index(&config.ground_truth_dirs());
    term.write_line(&format!(
        "Ground truth: {} keys",
        style(ground_truth.len()).cyan()
    ))?;

    let score = evaluate(&predictions, &ground_truth);

    let scoring_dir = &config.outputs.scoring_dir;
    fs::create_dir_all(scoring_dir)
        .with_context(|| format!("Failed to create {}", scoring_dir.display()))?;
    fs::write(scoring_dir.join(ERRORS_FILE), render_misclassified(&score))?;
    fs::write(
        scoring_dir.join(MISSING_GROUNDTRUTH_FILE),
        render_missing_groundtruth(&score),
    )?;
    fs::write(
        scoring_dir.join(AMBIGUOUS_GROUNDTRUTH_FILE),
        render_ambiguous_groundtruth(&score),
    )?;
    fs::write(
        scoring_dir.join(ACCURACY_SUMMARY_FILE),
        render_accuracy_summary(&score),
    )?;

    term.write_line("")?;
    term.write_line(&format!("{}", style("ACCURACY REPORT").bold()))?;
    term.write_line("")?;
    term.write_line(&format!(
        "Total predictions:    {}",
        style(score.total_predicted).cyan()
    ))?;
    term.write_line(&format!(
        "Matched to truth:     {}",
        style(score.matched).cyan()
    ))?;
    term.write_line(&format!(
        "Missing from truth:   {}",
        style(score.missing.len()).yellow()
    ))?;
    term.write_line(&format!("Correct:              {}", style(score.correct).green()))?;
    term.write_line(&format!(
        "Strict accuracy:      {}",
        style(format!("{:.4}", score.strict_accuracy())).cyan()
    ))?;
    term.write_line(&format!(
        "Matched accuracy:     {}",
        style(format!("{:.4}", score.matched_accuracy())).cyan()
    ))?;
    term.write_line(&format!(
        "Misclassified:        {}",
        style(score.misclassified.len()).yellow()
    ))?;
    if !score.ambiguous.is_empty() {
        term.write_line(&format!(
            "{} {} keys sit under more than one ground-truth label (see {})",
            style("⚠").yellow(),
            score.ambiguous.len(),
            scoring_dir.join(AMBIGUOUS_GROUNDTRUTH_FILE).display()
        ))?;
    }
    term.write_line("")?;
    term.write_line(&format!(
        "{} Scoring reports written to {}",
        style("✓").green(),
        scoring_dir.display()
    ))?;

    Ok(())
}
