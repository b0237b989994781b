use anyhow::{Result, ensure};

use super::engine::{clamp_sentiment, floor_tes_rate};
use super::random::RandomSource;
use super::state::EconomicState;

pub const HEADLINES: [&str; 8] = [
    "Riesgo país sube levemente tras declaraciones del Ministro.",
    "Inversionistas atentos a la decisión de la Corte Constitucional.",
    "Dólar abre al alza en jornada volátil.",
    "Sindicatos anuncian movilizaciones si hay recortes.",
    "JP Morgan advierte sobre la liquidez de Colombia.",
    "Banco de la República mantiene tasas estables.",
    "Ecopetrol reporta caída en producción de barriles.",
    "Fenalco pide medidas de reactivación económica inmediata.",
];

pub fn headline_at(index: usize) -> &'static str {
    HEADLINES[index % HEADLINES.len()]
}

/// Live jitter applied to the TES rate and market sentiment between turns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketNoise {
    tes_amplitude: f64,
    sentiment_amplitude: f64,
}

impl MarketNoise {
    pub fn new(tes_amplitude: f64, sentiment_amplitude: f64) -> Result<Self> {
        ensure!(
            tes_amplitude.is_finite() && tes_amplitude >= 0.0,
            "la amplitud del ruido TES debe ser un número no negativo"
        );
        ensure!(
            sentiment_amplitude.is_finite() && sentiment_amplitude >= 0.0,
            "la amplitud del ruido de sentimiento debe ser un número no negativo"
        );
        Ok(Self {
            tes_amplitude,
            sentiment_amplitude,
        })
    }

    pub fn tes_amplitude(&self) -> f64 {
        self.tes_amplitude
    }

    pub fn sentiment_amplitude(&self) -> f64 {
        self.sentiment_amplitude
    }

    /// Returns a copy of `state` with only the TES rate and sentiment moved.
    /// History is left alone.
    pub fn tick<R: RandomSource + ?Sized>(&self, state: &EconomicState, rng: &mut R) -> EconomicState {
        let tes_step = rng.uniform(-self.tes_amplitude, self.tes_amplitude);
        let sentiment_step = rng.uniform(-self.sentiment_amplitude, self.sentiment_amplitude);

        let mut next = state.clone();
        next.tes_rate = floor_tes_rate(state.tes_rate + tes_step);
        next.market_sentiment = clamp_sentiment(state.market_sentiment + sentiment_step);
        next
    }
}

impl Default for MarketNoise {
    fn default() -> Self {
        Self {
            tes_amplitude: 0.025,
            sentiment_amplitude: 1.0,
        }
    }
}
