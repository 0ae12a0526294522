// In crates/app-config/src/types.rs

use crate::error::{Error, Result};
use core_types::{GridConfig, RsiThresholds, Symbol};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Settings for the market-data provider.
    #[serde(default)]
    pub provider: ProviderSettings,
    /// Telegram delivery credentials. Absent means log-only mode.
    pub telegram: Option<TelegramSettings>,
    /// Thresholds shared by every pair.
    #[serde(default)]
    pub monitor: MonitorSettings,
    /// The grids to watch, evaluated in this order.
    pub pairs: Vec<PairSettings>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProviderSettings {
    /// The REST API base URL for the price/history provider.
    #[serde(default = "default_rest_base_url")]
    pub rest_base_url: String,
    /// How many daily klines to request per pair.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u16,
    /// How many times a transient fetch failure is retried before the run fails.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Linear backoff base in seconds (delay = base * attempt).
    #[serde(default = "default_backoff_base_secs")]
    pub backoff_base_secs: u64,
    /// Cap on a single backoff delay in seconds.
    #[serde(default = "default_backoff_cap_secs")]
    pub backoff_cap_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            rest_base_url: default_rest_base_url(),
            lookback_days: default_lookback_days(),
            max_retries: default_max_retries(),
            backoff_base_secs: default_backoff_base_secs(),
            backoff_cap_secs: default_backoff_cap_secs(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct TelegramSettings {
    /// The bot token issued by BotFather.
    pub bot_token: String,
    /// The chat the report is delivered to.
    pub chat_id: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MonitorSettings {
    /// Breach percentage below which an outside price only warrants monitoring.
    #[serde(default = "default_soft_outside_pct")]
    pub soft_outside_pct: f64,
    /// RSI level above which momentum reads overbought.
    #[serde(default = "default_rsi_overbought")]
    pub rsi_overbought: f64,
    /// RSI level below which momentum reads oversold.
    #[serde(default = "default_rsi_oversold")]
    pub rsi_oversold: f64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            soft_outside_pct: default_soft_outside_pct(),
            rsi_overbought: default_rsi_overbought(),
            rsi_oversold: default_rsi_oversold(),
        }
    }
}

/// Configuration for a single watched grid.
#[derive(Deserialize, Debug, Clone)]
pub struct PairSettings {
    pub symbol: String,
    pub lower: f64,
    pub upper: f64,
    #[serde(default = "default_near_pct")]
    pub near_pct: f64,
    #[serde(default)]
    pub outside_tol_pct: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Helper functions for serde defaults
fn default_rest_base_url() -> String {
    "https://api.binance.com".to_string()
}
fn default_lookback_days() -> u16 {
    200
}
fn default_max_retries() -> u32 {
    3
}
fn default_backoff_base_secs() -> u64 {
    2
}
fn default_backoff_cap_secs() -> u64 {
    10
}
fn default_soft_outside_pct() -> f64 {
    0.75
}
fn default_rsi_overbought() -> f64 {
    70.0
}
fn default_rsi_oversold() -> f64 {
    30.0
}
fn default_near_pct() -> f64 {
    0.01
}
fn default_enabled() -> bool {
    true
}

/// Replaces an out-of-domain fraction with its default, logging the fallback.
/// Structural problems are errors; a bad numeric value never aborts the run.
fn sanitize_fraction(value: f64, default: f64, field: &'static str, symbol: &str) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        tracing::warn!(
            symbol = %symbol,
            field = %field,
            value = %value,
            default = %default,
            "Invalid fraction in configuration, falling back to default"
        );
        default
    }
}

impl Settings {
    /// Validates and converts the enabled pairs into immutable [`GridConfig`]s,
    /// preserving their configured order.
    ///
    /// `lower >= upper` (or a bound that is not a representable number) is a
    /// configuration error; out-of-domain percentages fall back to their
    /// defaults with a logged warning.
    pub fn grid_configs(&self) -> Result<Vec<GridConfig>> {
        let mut grids = Vec::with_capacity(self.pairs.len());
        for pair in self.pairs.iter().filter(|p| p.enabled) {
            let lower = Decimal::from_f64(pair.lower).ok_or(Error::InvalidNumber {
                field: "lower",
                symbol: pair.symbol.clone(),
            })?;
            let upper = Decimal::from_f64(pair.upper).ok_or(Error::InvalidNumber {
                field: "upper",
                symbol: pair.symbol.clone(),
            })?;

            let near_pct = sanitize_fraction(
                pair.near_pct,
                default_near_pct(),
                "near_pct",
                &pair.symbol,
            );
            let outside_tol_pct =
                sanitize_fraction(pair.outside_tol_pct, 0.0, "outside_tol_pct", &pair.symbol);

            let grid = GridConfig::new(
                Symbol(pair.symbol.clone()),
                lower,
                upper,
                Decimal::from_f64(near_pct).unwrap_or_default(),
                Decimal::from_f64(outside_tol_pct).unwrap_or_default(),
            )?;
            grids.push(grid);
        }
        if grids.is_empty() {
            return Err(Error::NoPairs);
        }
        Ok(grids)
    }

    /// RSI thresholds with the `overbought > oversold` invariant enforced;
    /// a violating pair falls back to the 70/30 defaults with a warning.
    pub fn rsi_thresholds(&self) -> RsiThresholds {
        let ob = self.monitor.rsi_overbought;
        let os = self.monitor.rsi_oversold;
        if ob.is_finite() && os.is_finite() && ob > os {
            RsiThresholds {
                overbought: Decimal::from_f64(ob).unwrap_or(Decimal::from(70)),
                oversold: Decimal::from_f64(os).unwrap_or(Decimal::from(30)),
            }
        } else {
            tracing::warn!(
                overbought = %ob,
                oversold = %os,
                "RSI thresholds must satisfy overbought > oversold, falling back to 70/30"
            );
            RsiThresholds {
                overbought: Decimal::from(70),
                oversold: Decimal::from(30),
            }
        }
    }

    /// The soft-outside threshold as a percentage, defaulted when out of domain.
    pub fn soft_outside_pct(&self) -> Decimal {
        let value = sanitize_fraction(
            self.monitor.soft_outside_pct,
            default_soft_outside_pct(),
            "soft_outside_pct",
            "monitor",
        );
        Decimal::from_f64(value).unwrap_or_default()
    }

    /// Lookback window in days; a zero value falls back to the default.
    pub fn lookback_days(&self) -> u16 {
        if self.provider.lookback_days == 0 {
            tracing::warn!(
                default = default_lookback_days(),
                "lookback_days must be positive, falling back to default"
            );
            default_lookback_days()
        } else {
            self.provider.lookback_days
        }
    }
}
