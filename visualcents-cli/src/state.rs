use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$VISUALCENTS_HOME`, or `~/.visualcents`.
pub fn visualcents_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("VISUALCENTS_HOME") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".visualcents"))
}

pub fn ensure_visualcents_home() -> Result<PathBuf> {
    let dir = visualcents_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
