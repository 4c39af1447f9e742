//! Classify command - decide each utterance's dialect and organize its audio

use anyhow::{Context, Result};
use console::{style, Term};
use dialectid_core::corpus::{build_audio_index, read_transcript_csv};
use dialectid_core::report::{self, AudioStatus};
use dialectid_core::{
    classify_corpus, Config, DiagnosticsAggregator, ReportBuilder, TranscriptSources, Utterance,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub fn run(config: &Config) -> Result<()> {
    let term = Term::stdout();

    term.write_line(&format!(
        "{} Loading transcript mappings...",
        style("▸").cyan()
    ))?;
    let sources = TranscriptSources {
        merged: read_transcript_csv(&config.inputs.merged_csv)?,
        candidate_a: read_transcript_csv(&config.inputs.candidate_a_csv)?,
        candidate_b: read_transcript_csv(&config.inputs.candidate_b_csv)?,
        truth: read_transcript_csv(&config.inputs.truth_csv)?,
    };
    term.write_line(&format!(
        "Found {} utterances to classify",
        style(sources.keys().len()).cyan()
    ))?;

    let audio_index = build_audio_index(&config.inputs.audio_dir);
    term.write_line(&format!(
        "Found {} audio files",
        style(audio_index.len()).cyan()
    ))?;

    prepare_output_dirs(config)?;

    let utterances = classify_corpus(&sources);

    let pb = ProgressBar::new(utterances.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut aggregator = DiagnosticsAggregator::new();
    let mut builder = ReportBuilder::new(&config.labels);

    for utt in &utterances {
        pb.set_message(utt.key.clone());
        aggregator.observe(utt);
        let status = copy_audio(config, utt, &audio_index);
        builder.record(utt, &status);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let stats = aggregator.finish();
    let reports = builder.into_reports(&stats);

    let result_dir = config.result_dir();
    write_text(
        &config.decision_list_path(&config.labels.a),
        &report::render_key_list(&reports.list_a),
    )?;
    write_text(
        &config.decision_list_path(&config.labels.b),
        &report::render_key_list(&reports.list_b),
    )?;
    write_text(
        &config.decision_list_path(&config.labels.tie),
        &report::render_key_list(&reports.list_tie),
    )?;
    write_text(&result_dir.join(report::SUMMARY_ALL_FILE), &reports.aggregate)?;
    write_text(&result_dir.join(report::TIES_FILE), &reports.tie_report)?;
    if !reports.missing_audio.is_empty() {
        write_text(
            &result_dir.join(report::MISSING_AUDIO_FILE),
            &report::render_key_list(&reports.missing_audio),
        )?;
    }

    // Summary
    term.write_line("")?;
    term.write_line(&format!("{}", style("CLASSIFICATION RESULTS").bold()))?;
    term.write_line("")?;
    term.write_line(&format!(
        "{:12} {}",
        config.labels.a,
        style(reports.list_a.len()).cyan()
    ))?;
    term.write_line(&format!(
        "{:12} {}",
        config.labels.b,
        style(reports.list_b.len()).cyan()
    ))?;
    term.write_line(&format!(
        "{:12} {}",
        "ties",
        style(reports.list_tie.len()).yellow()
    ))?;
    if stats.ties > 0 {
        term.write_line(&format!(
            "  identical candidate text: {}",
            style(stats.same_text).dim()
        ))?;
        term.write_line(&format!(
            "  all three match truth:    {}",
            style(stats.all_three_zero).dim()
        ))?;
    }
    if !reports.missing_audio.is_empty() {
        term.write_line(&format!(
            "{} {} utterances had no audio file (see {})",
            style("⚠").yellow(),
            reports.missing_audio.len(),
            result_dir.join(report::MISSING_AUDIO_FILE).display()
        ))?;
    }
    term.write_line("")?;
    term.write_line(&format!(
        "{} Reports written to {}",
        style("✓").green(),
        result_dir.display()
    ))?;
    term.write_line(&format!(
        "{} Audio copied under {}",
        style("✓").green(),
        config.outputs.classify_dir.display()
    ))?;

    Ok(())
}

fn prepare_output_dirs(config: &Config) -> Result<()> {
    let result_dir = config.result_dir();
    fs::create_dir_all(&result_dir)
        .with_context(|| format!("Failed to create {}", result_dir.display()))?;
    for label in [&config.labels.a, &config.labels.b, &config.labels.tie] {
        let bucket = config.bucket_dir(label);
        fs::create_dir_all(&bucket)
            .with_context(|| format!("Failed to create {}", bucket.display()))?;
    }
    Ok(())
}

/// Copy the utterance's audio into its decision bucket.
///
/// A failed copy is logged and recorded; it never aborts the run.
fn copy_audio(
    config: &Config,
    utt: &Utterance,
    audio_index: &HashMap<String, PathBuf>,
) -> AudioStatus {
    let Some(source) = audio_index.get(&utt.key) else {
        return AudioStatus::Missing;
    };
    let Some(file_name) = source.file_name() else {
        return AudioStatus::CopyFailed;
    };
    let dest = config
        .bucket_dir(utt.decision.label(&config.labels))
        .join(file_name);

    match fs::copy(source, &dest) {
        Ok(_) => AudioStatus::Copied(dest),
        Err(err) => {
            tracing::error!("copy failed for {}: {}", utt.key, err);
            AudioStatus::CopyFailed
        }
    }
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
