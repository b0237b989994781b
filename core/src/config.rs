use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::game::MarketNoise;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub period_ms: u64,
    pub tes_amplitude: f64,
    pub sentiment_amplitude: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            period_ms: 2_000,
            tes_amplitude: 0.025,
            sentiment_amplitude: 1.0,
        }
    }
}

impl NoiseConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    pub fn market_noise(&self) -> Result<MarketNoise> {
        MarketNoise::new(self.tes_amplitude, self.sentiment_amplitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
    pub api_key_env: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            temperature: 0.7,
            max_output_tokens: 100,
            timeout_secs: 20,
            api_key_env: "ADVISOR_API_KEY".to_string(),
        }
    }
}

impl AdvisorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn api_key_from_env(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub noise: NoiseConfig,
    pub advisor: AdvisorConfig,
}

impl SimulationConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(source).context("no se pudo interpretar la configuración YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(source).context("no se pudo interpretar la configuración JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file, picking the parser from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("no se pudo leer el archivo de configuración: {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_yaml_str(&source)
        };
        parsed.with_context(|| format!("archivo de configuración inválido: {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.noise.period_ms > 0, "noise.period_ms debe ser positivo");
        self.noise.market_noise()?;
        ensure!(
            self.advisor.temperature.is_finite() && self.advisor.temperature >= 0.0,
            "advisor.temperature debe ser un número no negativo"
        );
        ensure!(
            self.advisor.max_output_tokens > 0,
            "advisor.max_output_tokens debe ser positivo"
        );
        ensure!(
            !self.advisor.endpoint.trim().is_empty(),
            "advisor.endpoint no puede estar vacío"
        );
        Ok(())
    }
}
