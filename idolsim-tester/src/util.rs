use anyhow::{Context, Result};
use idolsim_game::WeekConfig;
use std::fs;
use std::path::Path;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Read and validate a tuning config; `None` yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<WeekConfig> {
    let Some(path) = path else {
        return Ok(WeekConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    WeekConfig::from_json(&raw).with_context(|| format!("invalid config {}", path.display()))
}
