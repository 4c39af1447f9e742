//! Configuration: dialect labels, corpus locations and output layout

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration errors that callers may want to match on.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine a configuration directory for this platform")]
    NoConfigDir,
}

/// The two dialect labels under comparison, plus the bucket tied
/// utterances land in.
///
/// Labels double as output file and directory names, so they must be valid
/// path components.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Labels {
    pub a: String,
    pub b: String,
    pub tie: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            a: "大埔腔".to_string(),
            b: "詔安腔".to_string(),
            tie: "合併".to_string(),
        }
    }
}

/// Input locations: one two-column CSV per transcript source, plus the
/// root directory holding the audio being classified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inputs {
    pub merged_csv: PathBuf,
    pub candidate_a_csv: PathBuf,
    pub candidate_b_csv: PathBuf,
    /// Independently supplied reference transcripts; optional per key.
    pub truth_csv: PathBuf,
    pub audio_dir: PathBuf,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            merged_csv: PathBuf::from("data/合併.csv"),
            candidate_a_csv: PathBuf::from("data/大埔腔.csv"),
            candidate_b_csv: PathBuf::from("data/詔安腔.csv"),
            truth_csv: PathBuf::from("data/ALL.csv"),
            audio_dir: PathBuf::from("驗證"),
        }
    }
}

/// Output roots. Both are regenerated wholesale on every run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outputs {
    /// Classification artifacts: per-decision audio buckets plus `result/`.
    pub classify_dir: PathBuf,
    /// Scoring artifacts from the `score` command.
    pub scoring_dir: PathBuf,
}

impl Default for Outputs {
    fn default() -> Self {
        Self {
            classify_dir: PathBuf::from("輸出"),
            scoring_dir: PathBuf::from("對答案"),
        }
    }
}

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub labels: Labels,
    pub inputs: Inputs,
    pub outputs: Outputs,
}

impl Config {
    /// Load configuration from file or use defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<&str>) -> Result<()> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("dev", "dialectid", "dialectid").ok_or(ConfigError::NoConfigDir)?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Directory the plain-text classification artifacts go into.
    pub fn result_dir(&self) -> PathBuf {
        self.outputs.classify_dir.join("result")
    }

    /// Audio bucket directory for one decision label.
    pub fn bucket_dir(&self, label: &str) -> PathBuf {
        self.outputs.classify_dir.join(label)
    }

    /// The decision list written for one label.
    pub fn decision_list_path(&self, label: &str) -> PathBuf {
        self.result_dir().join(format!("{label}.txt"))
    }

    /// Prediction lists the scoring stage reads back, one per dialect label.
    ///
    /// Tied utterances are deliberately not scored.
    pub fn prediction_lists(&self) -> Vec<(String, PathBuf)> {
        vec![
            (
                self.labels.a.clone(),
                self.decision_list_path(&self.labels.a),
            ),
            (
                self.labels.b.clone(),
                self.decision_list_path(&self.labels.b),
            ),
        ]
    }

    /// Ground-truth directories, one per dialect label, under the audio root.
    pub fn ground_truth_dirs(&self) -> Vec<(String, PathBuf)> {
        vec![
            (
                self.labels.a.clone(),
                self.inputs.audio_dir.join(&self.labels.a),
            ),
            (
                self.labels.b.clone(),
                self.inputs.audio_dir.join(&self.labels.b),
            ),
        ]
    }

}
