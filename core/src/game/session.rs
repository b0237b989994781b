use anyhow::{Result, bail};
use tracing::{debug, info};

use super::{
    actions::ActionId,
    bootstrap::{SessionBootstrap, SessionBuilder},
    engine,
    market::MarketNoise,
    outcome::{self, GamePhase, Verdict},
    random::RandomSource,
    state::EconomicState,
};
use crate::advisor;

pub const INITIAL_ADVISOR_MESSAGE: &str = "Ministro, el mercado está nervioso. Cada semana cuenta.";
pub const RESET_ADVISOR_MESSAGE: &str =
    "Año Nuevo, Presupuesto Nuevo. Los mercados esperan señales claras.";

#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub action: ActionId,
    pub label: &'static str,
    pub notice: Option<&'static str>,
    pub verdict: Option<Verdict>,
    pub phase: GamePhase,
}

/// The single owner of the economy for one play session.
pub struct GameSession {
    state: EconomicState,
    phase: GamePhase,
    feedback: Option<String>,
    advisor_message: String,
    noise: MarketNoise,
    rng: Box<dyn RandomSource + Send>,
}

impl GameSession {
    pub fn new() -> Self {
        SessionBuilder::new().build()
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub(crate) fn from_bootstrap(bootstrap: SessionBootstrap) -> Self {
        Self {
            state: EconomicState::initial(),
            phase: bootstrap.phase,
            feedback: None,
            advisor_message: INITIAL_ADVISOR_MESSAGE.to_string(),
            noise: bootstrap.noise,
            rng: bootstrap.rng,
        }
    }

    pub fn state(&self) -> &EconomicState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub fn advisor_message(&self) -> &str {
        &self.advisor_message
    }

    pub fn set_advisor_message(&mut self, message: String) {
        self.advisor_message = message;
    }

    pub fn noise(&self) -> MarketNoise {
        self.noise
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn start(&mut self) -> Result<()> {
        if self.phase != GamePhase::Start {
            bail!("la partida ya fue iniciada");
        }
        self.phase = GamePhase::Playing;
        info!(week = self.state.week, "session started");
        Ok(())
    }

    /// Pairs every action with its current availability.
    pub fn available_actions(&self) -> Vec<(ActionId, bool)> {
        ActionId::ALL
            .iter()
            .map(|action| {
                (
                    *action,
                    self.is_playing() && action.is_available(&self.state),
                )
            })
            .collect()
    }

    pub fn apply_action(&mut self, action: ActionId) -> Result<ActionReport> {
        if !self.is_playing() {
            bail!(
                "no se pueden ejecutar acciones en la fase actual: {}",
                self.phase.label()
            );
        }
        if !action.is_available(&self.state) {
            let reason = action.gate_description().unwrap_or("no disponible");
            bail!("la acción {} no está disponible ({})", action, reason);
        }

        let resolved = action.resolve(&mut *self.rng);
        let next = engine::advance(&self.state, resolved.weeks, &resolved.delta, resolved.label)?;
        self.state = next;
        debug!(
            action = %action,
            label = resolved.label,
            week = self.state.week,
            cash = self.state.cash,
            fiscal_gap = self.state.fiscal_gap,
            debt = self.state.debt_to_gdp,
            approval = self.state.approval,
            "action applied"
        );

        if let Some(notice) = resolved.notice {
            self.feedback = Some(notice.to_string());
        }

        let verdict = outcome::evaluate(&self.state);
        if let Some(verdict) = verdict {
            self.phase = verdict.phase();
            self.feedback = Some(verdict.message().to_string());
            info!(?verdict, week = self.state.week, "session finished");
        }

        Ok(ActionReport {
            action,
            label: resolved.label,
            notice: resolved.notice,
            verdict,
            phase: self.phase,
        })
    }

    /// Applies one live market jitter. Returns `false` outside of play.
    pub fn apply_noise(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.state = self.noise.tick(&self.state, &mut *self.rng);
        debug!(
            tes_rate = self.state.tes_rate,
            sentiment = self.state.market_sentiment,
            "market noise"
        );
        true
    }

    pub fn reset(&mut self) {
        self.state = EconomicState::initial();
        self.phase = GamePhase::Playing;
        self.feedback = None;
        self.advisor_message = RESET_ADVISOR_MESSAGE.to_string();
        info!("session reset");
    }

    pub fn advisor_prompt(&self) -> String {
        advisor::build_prompt(&self.state)
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut EconomicState {
        &mut self.state
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
