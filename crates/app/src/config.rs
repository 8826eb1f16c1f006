use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use recon_core::DateRange;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Optional TOML file supplying defaults for a run. Command-line flags
/// override anything set here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    /// IANA zone name, e.g. `Asia/Jakarta`.
    pub timezone: Option<String>,
    pub date_window: Option<u32>,
    pub system: Option<PathBuf>,
    pub banks: Vec<PathBuf>,
}

impl ReconConfig {
    /// No path means an empty configuration. A path that does not exist
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Values given on the command line, before defaults are applied.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub system: Option<PathBuf>,
    pub banks: Vec<PathBuf>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub timezone: Option<String>,
    pub date_window: Option<u32>,
}

/// Fully resolved parameters of one reconciliation run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub system: PathBuf,
    pub banks: Vec<PathBuf>,
    pub range: DateRange,
    pub timezone: Tz,
    pub date_window: u32,
}

impl RunSettings {
    pub fn resolve(overrides: Overrides, config: ReconConfig) -> Result<Self> {
        let system = overrides
            .system
            .or(config.system)
            .ok_or_else(|| anyhow!("missing required --system"))?;
        let banks = if overrides.banks.is_empty() {
            config.banks
        } else {
            overrides.banks
        };
        if banks.is_empty() {
            bail!("missing required --bank (at least one)");
        }

        let start = overrides.start.ok_or_else(|| anyhow!("missing required --start"))?;
        let end = overrides.end.ok_or_else(|| anyhow!("missing required --end"))?;

        let zone_name = overrides
            .timezone
            .or(config.timezone)
            .unwrap_or_else(|| "UTC".to_string());
        let timezone: Tz = zone_name
            .parse()
            .map_err(|e| anyhow!("unknown timezone '{zone_name}': {e}"))?;

        Ok(Self {
            system,
            banks,
            range: DateRange::new(start, end),
            timezone,
            date_window: overrides.date_window.or(config.date_window).unwrap_or(0),
        })
    }
}
