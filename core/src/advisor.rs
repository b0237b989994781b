//! Strategic advice from an external text-generation service.
//!
//! The service only ever produces a display string. Any failure is folded
//! into a fixed fallback message so the simulation never observes it.

use std::future::Future;

use anyhow::{Context, Result, anyhow, bail};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AdvisorConfig;
use crate::game::EconomicState;

pub const EMPTY_ADVICE_FALLBACK: &str = "La incertidumbre en los mercados impide un análisis claro.";
pub const ADVISOR_OFFLINE_FALLBACK: &str = "Conexión con el asesor perdida. Proceda con cautela.";

pub trait Advisor: Send + Sync + 'static {
    fn advise(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Builds the Spanish briefing sent to the advisor for the given state.
pub fn build_prompt(state: &EconomicState) -> String {
    format!(
        "Actúa como un asesor macroeconómico senior para el Ministro de Hacienda de Colombia en el año 2026.

CONTEXTO DEL JUEGO (Basado en datos reales):
- El país enfrenta un hueco fiscal de 16.3 billones tras caerse la reforma tributaria.
- La caja está en mínimos (1.4 billones).
- Emitir deuda TES es costoso (13.15%) y desplaza al crédito privado (Crowding Out).
- Declarar Emergencia Económica es arriesgado políticamente.
- Recortar gasto afecta el crecimiento y la popularidad.

ESTADO ACTUAL:
- Semana: {week}
- Caja Disponible: ${cash:.1} Billones
- Brecha Fiscal Restante: ${gap:.1} Billones
- Deuda/PIB: {debt:.1}%
- Aprobación Presidencial: {approval:.1}%
- Inflación: {inflation:.1}%
- Tasa TES: {tes:.2}%

INSTRUCCIÓN:
Dame un consejo estratégico MUY BREVE (máximo 2 frases) sobre qué hacer a continuación.
Sé crudo y realista. Advierte sobre los riesgos de los bonos TES si la tasa es alta.
Si la aprobación es baja, advierte sobre estallido social.",
        week = state.week,
        cash = state.cash,
        gap = state.fiscal_gap,
        debt = state.debt_to_gdp,
        approval = state.approval,
        inflation = state.inflation,
        tes = state.tes_rate,
    )
}

/// Asks the advisor and always returns something displayable.
pub async fn consult<A: Advisor + ?Sized>(advisor: &A, prompt: &str) -> String {
    match advisor.advise(prompt).await {
        Ok(text) if text.trim().is_empty() => EMPTY_ADVICE_FALLBACK.to_string(),
        Ok(text) => text.trim().to_string(),
        Err(error) => {
            warn!(error = %error, "advisor request failed");
            ADVISOR_OFFLINE_FALLBACK.to_string()
        }
    }
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiAdvisor {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f64,
    max_output_tokens: u32,
}

impl GeminiAdvisor {
    pub fn new(config: &AdvisorConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("failed to build advisor HTTP client")?;
        Ok(Self {
            client,
            api_key,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    pub fn from_env(config: &AdvisorConfig) -> Result<Self> {
        let api_key = config
            .api_key_from_env()
            .ok_or_else(|| anyhow!("{} is not set", config.api_key_env))?;
        Self::new(config, api_key)
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn request_body(&self, prompt: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        }
    }
}

impl Advisor for GeminiAdvisor {
    async fn advise(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&self.request_body(prompt))
            .send()
            .await
            .context("advisor request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("advisor returned {status}: {body}");
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .context("advisor response was not valid JSON")?;
        Ok(payload.first_text().unwrap_or_default())
    }
}

/// Stand-in used when no API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAdvisor;

impl Advisor for OfflineAdvisor {
    async fn advise(&self, _prompt: &str) -> Result<String> {
        bail!("advisor is not configured")
    }
}

pub enum AdvisorBackend {
    Gemini(GeminiAdvisor),
    Offline(OfflineAdvisor),
}

impl AdvisorBackend {
    /// Uses Gemini when an API key is present in the environment.
    pub fn from_config(config: &AdvisorConfig) -> Self {
        match GeminiAdvisor::from_env(config) {
            Ok(client) => AdvisorBackend::Gemini(client),
            Err(error) => {
                warn!(error = %error, "advisor disabled, using offline fallback");
                AdvisorBackend::Offline(OfflineAdvisor)
            }
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, AdvisorBackend::Gemini(_))
    }
}

impl Advisor for AdvisorBackend {
    async fn advise(&self, prompt: &str) -> Result<String> {
        match self {
            AdvisorBackend::Gemini(client) => client.advise(prompt).await,
            AdvisorBackend::Offline(offline) => offline.advise(prompt).await,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .parts
            .iter()
            .map(|part| part.text.as_str())
            .collect();
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedAdvisor(Result<String, String>);

    impl Advisor for CannedAdvisor {
        async fn advise(&self, _prompt: &str) -> Result<String> {
            self.0.clone().map_err(|message| anyhow!(message))
        }
    }

    #[test]
    fn prompt_embeds_live_figures() {
        let mut state = EconomicState::initial();
        state.week = 7.5;
        state.tes_rate = 14.237;
        let prompt = build_prompt(&state);
        assert!(prompt.contains("Semana: 7.5"));
        assert!(prompt.contains("Caja Disponible: $1.4 Billones"));
        assert!(prompt.contains("Brecha Fiscal Restante: $16.3 Billones"));
        assert!(prompt.contains("Deuda/PIB: 61.3%"));
        assert!(prompt.contains("Aprobación Presidencial: 45.0%"));
        assert!(prompt.contains("Inflación: 5.3%"));
        assert!(prompt.contains("Tasa TES: 14.24%"));
    }

    #[tokio::test]
    async fn consult_trims_successful_advice() {
        let advisor = CannedAdvisor(Ok("  Recorte gasto ya.\n".to_string()));
        assert_eq!(consult(&advisor, "p").await, "Recorte gasto ya.");
    }

    #[tokio::test]
    async fn consult_replaces_empty_advice() {
        let advisor = CannedAdvisor(Ok("   ".to_string()));
        assert_eq!(consult(&advisor, "p").await, EMPTY_ADVICE_FALLBACK);
    }

    #[tokio::test]
    async fn consult_swallows_errors() {
        let advisor = CannedAdvisor(Err("quota exceeded".to_string()));
        assert_eq!(consult(&advisor, "p").await, ADVISOR_OFFLINE_FALLBACK);
        assert_eq!(consult(&OfflineAdvisor, "p").await, ADVISOR_OFFLINE_FALLBACK);
    }

    #[tokio::test]
    async fn unreachable_endpoint_falls_back() {
        let config = AdvisorConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..AdvisorConfig::default()
        };
        let advisor = GeminiAdvisor::new(&config, "test-key".to_string()).unwrap();
        assert_eq!(consult(&advisor, "p").await, ADVISOR_OFFLINE_FALLBACK);
    }

    #[test]
    fn request_uses_generation_config_names() {
        let advisor = GeminiAdvisor::new(&AdvisorConfig::default(), "k".to_string()).unwrap();
        let body = serde_json::to_value(advisor.request_body("hola")).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hola");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 100);
        assert_eq!(body["generationConfig"]["temperature"], 0.7);
        assert!(advisor.url().ends_with("/models/gemini-3-flash-preview:generateContent"));
    }

    #[test]
    fn response_text_joins_parts() {
        let payload: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Venda "},{"text":"activos."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(payload.first_text().as_deref(), Some("Venda activos."));

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.first_text(), None);
    }
}
