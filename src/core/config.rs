use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Vanguard,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VanguardProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
    pub vanguard: Option<VanguardProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: "https://query1.finance.yahoo.com".to_string(),
            }),
            vanguard: Some(VanguardProviderConfig {
                base_url: "https://api.vanguard.com".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HoldingsConfig {
    /// Dollar value currently held per ticker symbol.
    pub holdings: HashMap<String, f64>,
    /// Desired relative weight per ticker symbol.
    pub target_ratio: HashMap<String, u32>,
    /// Which price provider to use for this run.
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl HoldingsConfig {
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read holdings file: {}", path.as_ref().display())
        })?;

        let config: Self = serde_yaml::from_str(&config_str).with_context(|| {
            format!("Failed to parse holdings file: {}", path.as_ref().display())
        })?;
        debug!("Successfully loaded holdings config");
        Ok(config)
    }

    /// Validates constraints that must hold before any network I/O.
    pub fn validate(&self) -> Result<()> {
        for (symbol, value) in &self.holdings {
            if symbol.is_empty() {
                bail!("Holdings contain an empty ticker symbol");
            }
            if *value < 0.0 {
                bail!("Holding for {symbol} must not be negative, got {value}");
            }
        }
        if self.target_ratio.is_empty() {
            bail!("Target ratio is empty, nothing to allocate");
        }
        for symbol in self.target_ratio.keys() {
            if symbol.is_empty() {
                bail!("Target ratio contains an empty ticker symbol");
            }
        }
        if self.target_ratio.values().all(|weight| *weight == 0) {
            bail!("Target ratio weights sum to zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
holdings:
  VTI: 6000.0
  VXUS: 4000.0
target_ratio:
  VTI: 2
  VXUS: 1
"#;

        let config: HoldingsConfig =
            serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.holdings.len(), 2);
        assert_eq!(config.holdings["VTI"], 6000.0);
        assert_eq!(config.holdings["VXUS"], 4000.0);
        assert_eq!(config.target_ratio["VTI"], 2);
        assert_eq!(config.target_ratio["VXUS"], 1);
        assert_eq!(config.provider, ProviderKind::Yahoo);
        assert_eq!(
            config.providers.yahoo.clone().unwrap().base_url,
            "https://query1.finance.yahoo.com"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_with_provider_selection() {
        let yaml_str = r#"
holdings:
  VBTLX: 10000.0
target_ratio:
  VBTLX: 1
provider: vanguard
providers:
  vanguard:
    base_url: "http://example.com/vanguard"
"#;

        let config: HoldingsConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(config.provider, ProviderKind::Vanguard);
        assert_eq!(
            config.providers.vanguard.unwrap().base_url,
            "http://example.com/vanguard"
        );
        // The yahoo override is absent when providers are given explicitly.
        assert!(config.providers.yahoo.is_none());
    }

    #[test]
    fn test_validate_rejects_empty_target_ratio() {
        let yaml_str = r#"
holdings:
  VTI: 6000.0
target_ratio: {}
"#;
        let config: HoldingsConfig = serde_yaml::from_str(yaml_str).unwrap();
        let error = config.validate().unwrap_err();
        assert_eq!(error.to_string(), "Target ratio is empty, nothing to allocate");
    }

    #[test]
    fn test_validate_rejects_negative_holding() {
        let yaml_str = r#"
holdings:
  VTI: -5.0
target_ratio:
  VTI: 1
"#;
        let config: HoldingsConfig = serde_yaml::from_str(yaml_str).unwrap();
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("Holding for VTI"));
    }

    #[test]
    fn test_validate_rejects_zero_weight_total() {
        let yaml_str = r#"
holdings:
  VTI: 100.0
target_ratio:
  VTI: 0
"#;
        let config: HoldingsConfig = serde_yaml::from_str(yaml_str).unwrap();
        let error = config.validate().unwrap_err();
        assert_eq!(error.to_string(), "Target ratio weights sum to zero");
    }
}
