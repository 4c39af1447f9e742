//! Loaders for the key→text mappings and key→path indexes
//!
//! Missing sources are recoverable: they warn and yield an empty collection
//! so a run always completes with whatever data exists. Only genuine read
//! failures propagate.

use crate::evaluate::{GroundTruthIndex, LabelSet};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A first CSV row whose first or second cell contains one of these is a
/// header, not data.
const HEADER_KEYWORDS: &[&str] = &["錄音檔檔名", "辨認出之客語漢字", "filename", "text", "檔名", "辨認"];

/// Canonical utterance key: the file stem of a path or bare filename.
pub fn utterance_key(name: &str) -> String {
    Path::new(name.trim())
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn looks_like_header(first_cell: &str, second_cell: &str) -> bool {
    let first = first_cell.to_lowercase();
    let second = second_cell.to_lowercase();
    HEADER_KEYWORDS
        .iter()
        .any(|keyword| first.contains(keyword) || second.contains(keyword))
}

/// Read a two-column `filename,transcript` CSV into a key→text mapping.
///
/// A leading BOM is stripped, a recognized header row is skipped, rows with
/// an empty key are skipped, and a key defined twice keeps the later text
/// (last write wins). Cells beyond the second are folded back into the text
/// with their commas. A missing file warns and yields an empty mapping.
pub fn read_transcript_csv(path: &Path) -> Result<HashMap<String, String>> {
    let mut mapping = HashMap::new();
    if !path.exists() {
        tracing::warn!("transcript csv not found: {}", path.display());
        return Ok(mapping);
    }

    let file =
        File::open(path).with_context(|| format!("Failed to open csv: {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut first_row = true;
    for line in reader.lines() {
        let line = line.with_context(|| format!("Failed to read csv: {}", path.display()))?;
        let line = line.trim_start_matches('\u{feff}');
        if line.trim().is_empty() {
            continue;
        }

        let (raw_key, value) = match line.split_once(',') {
            Some((key, rest)) => (key.trim(), rest.trim()),
            None => (line.trim(), ""),
        };
        if raw_key.is_empty() {
            continue;
        }
        if first_row {
            first_row = false;
            if looks_like_header(raw_key, value) {
                continue;
            }
        }

        mapping.insert(utterance_key(raw_key), value.to_string());
    }

    Ok(mapping)
}

/// Index every file under `root` by utterance key.
///
/// The walk is sorted so the index is reproducible; the first path seen for
/// a key wins, later duplicates are ignored. A missing root warns and
/// yields an empty index.
pub fn build_audio_index(root: &Path) -> HashMap<String, PathBuf> {
    let mut index = HashMap::new();
    if !root.is_dir() {
        tracing::warn!("audio directory not found: {}", root.display());
        return index;
    }

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let key = utterance_key(&entry.file_name().to_string_lossy());
        if key.is_empty() {
            continue;
        }
        index.entry(key).or_insert_with(|| entry.into_path());
    }

    index
}

/// Build the ground-truth index from one directory per label.
///
/// Every file found under a label's directory assigns that label to its key;
/// all (label, path) pairs are kept, so a key present under several labels
/// carries all of them. Missing directories warn and contribute nothing.
pub fn build_ground_truth_index(dirs: &[(String, PathBuf)]) -> GroundTruthIndex {
    let mut index = GroundTruthIndex::default();

    for (label, dir) in dirs {
        if !dir.is_dir() {
            tracing::warn!("ground-truth directory not found: {}", dir.display());
            continue;
        }
        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let key = utterance_key(&entry.file_name().to_string_lossy());
            if key.is_empty() {
                continue;
            }
            index.insert(key, label.clone(), entry.into_path());
        }
    }

    index
}

/// Read one prediction list: newline-delimited filenames, one label for the
/// whole list.
///
/// Keys are derived the same way as everywhere else (path and extension
/// stripped), blank lines are skipped. A missing file warns and yields an
/// empty map.
pub fn read_prediction_list(path: &Path, label: &str) -> Result<BTreeMap<String, LabelSet>> {
    let mut predictions: BTreeMap<String, LabelSet> = BTreeMap::new();
    if !path.exists() {
        tracing::warn!("prediction list not found: {}", path.display());
        return Ok(predictions);
    }

    let file =
        File::open(path).with_context(|| format!("Failed to open list: {}", path.display()))?;
    let reader = BufReader::new(file);

    for line in reader.lines() {
        let line = line.with_context(|| format!("Failed to read list: {}", path.display()))?;
        let line = line.trim_start_matches('\u{feff}').trim();
        if line.is_empty() {
            continue;
        }
        let key = utterance_key(line);
        if key.is_empty() {
            continue;
        }
        predictions.entry(key).or_default().insert(label.to_string());
    }

    Ok(predictions)
}
