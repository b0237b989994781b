use serde::{Deserialize, Serialize};

use super::state::EconomicState;
use super::{
    DEBT_CRISIS_THRESHOLD, DEFAULT_CASH_THRESHOLD, SOCIAL_UNREST_THRESHOLD, VICTORY_MIN_WEEK,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Start,
    Playing,
    Victory,
    GameOver,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::GameOver)
    }

    pub fn label(&self) -> &'static str {
        match self {
            GamePhase::Start => "INICIO",
            GamePhase::Playing => "EN CURSO",
            GamePhase::Victory => "Objetivo Cumplido",
            GamePhase::GameOver => "Fin del Gobierno",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Default,
    DebtCrisis,
    SocialUnrest,
    Stability,
}

impl Verdict {
    pub fn phase(&self) -> GamePhase {
        match self {
            Verdict::Stability => GamePhase::Victory,
            Verdict::Default | Verdict::DebtCrisis | Verdict::SocialUnrest => GamePhase::GameOver,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Default => "DEFAULT: El Estado no tiene liquidez para pagar la nómina.",
            Verdict::DebtCrisis => {
                "CRISIS DE DEUDA: Las calificadoras bajaron la nota a 'Basura'."
            }
            Verdict::SocialUnrest => "ESTALLIDO SOCIAL: Protestas masivas fuerzan su renuncia.",
            Verdict::Stability => {
                "ESTABILIDAD: Logró cerrar el hueco fiscal y calmar los mercados."
            }
        }
    }
}

/// First matching terminal condition, checked in priority order.
pub fn evaluate(state: &EconomicState) -> Option<Verdict> {
    if state.cash <= DEFAULT_CASH_THRESHOLD {
        Some(Verdict::Default)
    } else if state.debt_to_gdp > DEBT_CRISIS_THRESHOLD {
        Some(Verdict::DebtCrisis)
    } else if state.approval < SOCIAL_UNREST_THRESHOLD {
        Some(Verdict::SocialUnrest)
    } else if state.fiscal_gap <= 0.0 && state.week > VICTORY_MIN_WEEK {
        Some(Verdict::Stability)
    } else {
        None
    }
}
