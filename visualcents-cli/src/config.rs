use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use visualcents_core::Calendar;
use visualcents_ingest::ocr::{DEFAULT_ENDPOINT, DEFAULT_PATH};
use visualcents_ingest::{OcrCredentials, OcrRequestBuilder};

use crate::state::ensure_visualcents_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calendar: CalendarSection,
    pub ocr: OcrSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSection {
    /// IANA zone name used for every day/week/month boundary
    pub timezone: String,
    pub week_start: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSection {
    pub endpoint: String,
    pub path: String,
    pub access_key_id: String,
    pub access_key_secret: String,
}

impl Default for CalendarSection {
    fn default() -> Self {
        Self {
            timezone: "Asia/Shanghai".to_string(),
            week_start: "monday".to_string(),
        }
    }
}

impl Default for OcrSection {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            path: DEFAULT_PATH.to_string(),
            access_key_id: String::new(),
            access_key_secret: String::new(),
        }
    }
}

impl Config {
    /// Apply `--tz` / `--week-start` for this run.
    pub fn with_overrides(mut self, tz: Option<&str>, week_start: Option<&str>) -> Self {
        if let Some(tz) = tz {
            self.calendar.timezone = tz.to_string();
        }
        if let Some(ws) = week_start {
            self.calendar.week_start = ws.to_string();
        }
        self
    }

    pub fn calendar(&self) -> Result<Calendar> {
        Calendar::from_names(&self.calendar.timezone, &self.calendar.week_start)
            .context("invalid [calendar] settings")
    }

    pub fn ocr_builder(&self) -> OcrRequestBuilder {
        OcrRequestBuilder::new(OcrCredentials::new(
            self.ocr.access_key_id.clone(),
            self.ocr.access_key_secret.clone(),
        ))
        .with_endpoint(self.ocr.endpoint.clone(), self.ocr.path.clone())
    }

    /// Same config with secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mut out = self.clone();
        if !out.ocr.access_key_secret.is_empty() {
            out.ocr.access_key_secret = "********".to_string();
        }
        out
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_visualcents_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Missing file means defaults.
pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Write the default config unless one exists. Returns whether a file was written.
pub fn init_config_at(p: &Path) -> Result<bool> {
    if p.exists() {
        return Ok(false);
    }
    save_config_to(&Config::default(), p)?;
    Ok(true)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if init_config_at(&p)? {
        println!("Wrote {}", p.display());
    } else {
        println!("Config already exists: {}", p.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        let cal = cfg.calendar().unwrap();
        assert_eq!(cal.tz().name(), "Asia/Shanghai");
        assert_eq!(cal.week_start(), Weekday::Mon);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[calendar]\nweek_start = \"sunday\"\n").unwrap();
        let cfg = load_config_from(&p).unwrap();
        assert_eq!(cfg.calendar.timezone, "Asia/Shanghai");
        assert_eq!(cfg.calendar.week_start, "sunday");
        assert_eq!(cfg.ocr.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_init_then_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        assert!(init_config_at(&p).unwrap());
        assert!(!init_config_at(&p).unwrap());
        assert_eq!(load_config_from(&p).unwrap(), Config::default());
    }

    #[test]
    fn test_overrides_and_bad_timezone() {
        let cfg = Config::default().with_overrides(Some("UTC"), Some("sunday"));
        let cal = cfg.calendar().unwrap();
        assert_eq!(cal.week_start(), Weekday::Sun);

        let bad = Config::default().with_overrides(Some("Nowhere/City"), None);
        assert!(bad.calendar().is_err());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[calendar\n").unwrap();
        assert!(load_config_from(&p).is_err());
    }

    #[test]
    fn test_redacted_hides_secret() {
        let mut cfg = Config::default();
        cfg.ocr.access_key_secret = "s3cret".to_string();
        assert_eq!(cfg.redacted().ocr.access_key_secret, "********");
        assert_eq!(Config::default().redacted().ocr.access_key_secret, "");
    }
}
