//! Load and validate runtime configuration.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::agents::AgentPool;
use crate::types::{Property, Stock};

pub const CONFIG_ENV: &str = "SIM_CONFIG";
pub const DEFAULT_CONFIG: &str = "config.yaml";

#[derive(Debug, Deserialize, Clone)]
pub struct SessionCfg {
    pub starting_cash: Decimal,
    /// Fixed seed for reproducible runs; entropy when absent.
    pub seed: Option<u64>,
    /// Probability that an owned property decays on a DECAY tick.
    #[serde(default = "default_decay_chance")]
    pub decay_chance: f64,
    /// Command script to replay when none is given on the command line.
    pub script: Option<String>,
}

fn default_decay_chance() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MarketCfg {
    #[serde(default)]
    pub stocks: Vec<Stock>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub session: SessionCfg,
    #[serde(default)]
    pub market: MarketCfg,
    #[serde(default)]
    pub agents: AgentPool,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let s = fs::read_to_string(path)?;
        Self::from_yaml(&s)
    }

    pub fn from_yaml(s: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.session.starting_cash < Decimal::ZERO {
            anyhow::bail!(
                "starting_cash must not be negative, got {}",
                self.session.starting_cash
            );
        }
        if !(0.0..=1.0).contains(&self.session.decay_chance) {
            anyhow::bail!(
                "decay_chance must be within 0..=1, got {}",
                self.session.decay_chance
            );
        }
        if let Some(s) = self.market.stocks.iter().find(|s| s.price < Decimal::ZERO) {
            anyhow::bail!("stock {} has a negative price", s.symbol);
        }
        if let Some(p) = self.market.properties.iter().find(|p| p.price <= Decimal::ZERO) {
            anyhow::bail!("property {} must have a positive price", p.id);
        }
        Ok(())
    }
}

/// `$SIM_CONFIG`, then `./config.yaml`, then the platform config dir.
pub fn resolve_path() -> PathBuf {
    if let Ok(p) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(p);
    }
    let local = PathBuf::from(DEFAULT_CONFIG);
    if local.exists() {
        return local;
    }
    directories::ProjectDirs::from("", "", "portfolio-sim")
        .map(|dirs| dirs.config_dir().join(DEFAULT_CONFIG))
        .filter(|p| p.exists())
        .unwrap_or(local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"
session:
  starting_cash: 100000
  seed: 42
market:
  stocks:
    - { symbol: ACME, name: Acme Corp, price: "12.50" }
  properties:
    - id: p1
      name: Maple Cottage
      location: Springfield
      price: 250000
      condition: Good
agents:
  names: [Ann, Bob]
"#;

    #[test]
    fn parses_sample() {
        let cfg = AppConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(cfg.session.starting_cash, dec!(100000));
        assert_eq!(cfg.session.seed, Some(42));
        assert_eq!(cfg.session.decay_chance, 1.0);
        assert_eq!(cfg.market.stocks[0].price, dec!(12.50));
        let p = &cfg.market.properties[0];
        assert!(!p.owned);
        assert!(p.trend.is_empty());
        assert_eq!(cfg.agents.names, vec!["Ann", "Bob"]);
        assert!(cfg.agents.notes.is_empty());
    }

    #[test]
    fn agents_default_when_missing() {
        let cfg = AppConfig::from_yaml("session:\n  starting_cash: 10\n").unwrap();
        assert!(!cfg.agents.names.is_empty());
        assert!(cfg.market.stocks.is_empty());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(AppConfig::from_yaml("session:\n  starting_cash: -1\n").is_err());
        assert!(
            AppConfig::from_yaml("session:\n  starting_cash: 1\n  decay_chance: 1.5\n").is_err()
        );
    }
}
