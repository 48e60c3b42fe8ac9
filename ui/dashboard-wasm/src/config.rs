//! Runtime configuration.
//!
//! Fetched from `config/dashboard.json` at startup, so nothing
//! deployment-specific — contract address, metrics API endpoint and key,
//! poll cadence — is compiled into the binary. A missing or malformed file
//! falls back to defaults; without a key the metrics panel simply degrades
//! to its randomized fallback path.

use serde::Deserialize;

use crate::api;

const CONFIG_URL: &str = "config/dashboard.json";

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_contract_address")]
    pub contract_address: String,
    #[serde(default = "default_metrics_api_url")]
    pub metrics_api_url: String,
    #[serde(default)]
    pub metrics_api_key: String,
    #[serde(default = "default_poll_ms")]
    pub metrics_poll_ms: u32,
    /// When set, sign-out also cancels the metrics poll. Off by default:
    /// the poll keeps firing behind the login view.
    #[serde(default)]
    pub clear_poll_on_signout: bool,
    #[serde(default)]
    pub forecast_base_url: String,
}

fn default_contract_address() -> String {
    "0x1234567890abcdef1234567890abcdef12345678".to_string()
}

fn default_metrics_api_url() -> String {
    "https://api.eia.gov/v2/electricity/retail-sales/data/".to_string()
}

fn default_poll_ms() -> u32 {
    3_000
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            contract_address: default_contract_address(),
            metrics_api_url: default_metrics_api_url(),
            metrics_api_key: String::new(),
            metrics_poll_ms: default_poll_ms(),
            clear_poll_on_signout: false,
            forecast_base_url: String::new(),
        }
    }
}

impl DashboardConfig {
    /// Full metrics request URL: monthly frequency, residential sector,
    /// newest single record.
    pub fn metrics_url(&self) -> String {
        format!(
            "{}?api_key={}&frequency=monthly&data[0]=value&facets[sectorid][]=RES\
             &sort[0][column]=period&sort[0][direction]=desc&offset=0&length=1",
            self.metrics_api_url, self.metrics_api_key
        )
    }

    /// URL of the static per-country forecast document.
    pub fn forecast_url(&self, country: &str) -> String {
        if self.forecast_base_url.is_empty() {
            format!("forecast_{country}.json")
        } else {
            format!(
                "{}/forecast_{country}.json",
                self.forecast_base_url.trim_end_matches('/')
            )
        }
    }
}

/// Fetch and parse the runtime configuration. Never fails the page.
pub async fn load() -> DashboardConfig {
    match api::fetch_text(CONFIG_URL).await {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(cfg) => cfg,
            Err(e) => {
                gloo_console::warn!(format!("config parse failed, using defaults: {e}"));
                DashboardConfig::default()
            }
        },
        Err(e) => {
            gloo_console::warn!(format!("config fetch failed, using defaults: {e}"));
            DashboardConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg: DashboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.metrics_poll_ms, 3_000);
        assert!(!cfg.clear_poll_on_signout);
        assert!(cfg.metrics_api_key.is_empty());
    }

    #[test]
    fn metrics_url_carries_key_and_filters() {
        let cfg = DashboardConfig {
            metrics_api_key: "k123".into(),
            ..DashboardConfig::default()
        };
        let url = cfg.metrics_url();
        assert!(url.starts_with("https://api.eia.gov/"));
        assert!(url.contains("api_key=k123"));
        assert!(url.contains("frequency=monthly"));
        assert!(url.contains("length=1"));
    }

    #[test]
    fn forecast_url_respects_base() {
        let mut cfg = DashboardConfig::default();
        assert_eq!(cfg.forecast_url("india"), "forecast_india.json");
        cfg.forecast_base_url = "https://cdn.example/forecasts/".into();
        assert_eq!(
            cfg.forecast_url("usa"),
            "https://cdn.example/forecasts/forecast_usa.json"
        );
    }
}
