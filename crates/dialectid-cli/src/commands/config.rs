//! Config command - inspect configuration

use anyhow::Result;
use console::{style, Term};
use dialectid_core::Config;

pub fn show(config: &Config) -> Result<()> {
    let term = Term::stdout();

    term.write_line(&format!("{}", style("dialectid Configuration").bold()))?;
    term.write_line("")?;

    term.write_line(&format!(
        "Label A:          {}",
        style(&config.labels.a).cyan()
    ))?;
    term.write_line(&format!(
        "Label B:          {}",
        style(&config.labels.b).cyan()
    ))?;
    term.write_line(&format!(
        "Tie bucket:       {}",
        style(&config.labels.tie).cyan()
    ))?;

    term.write_line("")?;
    term.write_line(&format!("{}", style("Inputs:").dim()))?;
    term.write_line(&format!(
        "  Merged CSV:     {}",
        config.inputs.merged_csv.display()
    ))?;
    term.write_line(&format!(
        "  Candidate A:    {}",
        config.inputs.candidate_a_csv.display()
    ))?;
    term.write_line(&format!(
        "  Candidate B:    {}",
        config.inputs.candidate_b_csv.display()
    ))?;
    term.write_line(&format!(
        "  Truth CSV:      {}",
        config.inputs.truth_csv.display()
    ))?;
    term.write_line(&format!(
        "  Audio root:     {}",
        config.inputs.audio_dir.display()
    ))?;

    term.write_line("")?;
    term.write_line(&format!("{}", style("Outputs:").dim()))?;
    term.write_line(&format!(
        "  Classification: {}",
        config.outputs.classify_dir.display()
    ))?;
    term.write_line(&format!(
        "  Scoring:        {}",
        config.outputs.scoring_dir.display()
    ))?;

    Ok(())
}

pub fn show_path() -> Result<()> {
    let term = Term::stdout();
    let config_path = Config::default_config_path()?;

    term.write_line(&format!("Config file: {:?}", config_path))?;

    if config_path.exists() {
        term.write_line(&format!("{} File exists", style("✓").green()))?;
    } else {
        term.write_line(&format!(
            "{} File does not exist (using defaults)",
            style("ℹ").blue()
        ))?;
    }

    Ok(())
}
