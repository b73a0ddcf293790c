use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_TICKER_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_SNAP_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// URL or file path of the chart snapshot.
    pub chart_source: String,
    /// URL or file path of the ticker snapshot.
    pub ticker_source: String,
    pub ticker_interval_secs: u64,
    /// Maximum horizontal distance, in columns, at which the crosshair snaps.
    pub snap_threshold: f64,
    pub brand: String,
    pub currency: String,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chart_source: "stock-chart-data.json".to_string(),
            ticker_source: "stock-ticker-data.json".to_string(),
            ticker_interval_secs: DEFAULT_TICKER_INTERVAL_SECS,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            brand: "ATOS".to_string(),
            currency: "€".to_string(),
            log_file: PathBuf::from("stockchart.log"),
        }
    }
}

impl AppConfig {
    pub fn sanitized(mut self) -> Self {
        let defaults = AppConfig::default();

        if self.chart_source.trim().is_empty() {
            self.chart_source = defaults.chart_source;
        }

        if self.ticker_source.trim().is_empty() {
            self.ticker_source = defaults.ticker_source;
        }

        self.ticker_interval_secs = self.ticker_interval_secs.max(1);

        if !self.snap_threshold.is_finite() || self.snap_threshold < 0.0 {
            self.snap_threshold = DEFAULT_SNAP_THRESHOLD;
        }

        self
    }
}

pub fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".stockchart.json")
}

pub fn load_config(path: &Path) -> AppConfig {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return AppConfig::default(),
    };

    serde_json::from_str::<AppConfig>(&contents)
        .map(|cfg| cfg.sanitized())
        .unwrap_or_default()
}
