use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use super::state::{EconomicState, HistoryPoint};
use super::{
    DEBT_PRESSURE_SENTIMENT_PER_WEEK, DEBT_PRESSURE_TES_PER_WEEK, DEBT_PRESSURE_THRESHOLD,
    LIQUIDITY_FEAR_CASH, LIQUIDITY_FEAR_SENTIMENT, MAX_SENTIMENT, MIN_CASH, MIN_FISCAL_GAP,
    MIN_SENTIMENT, MIN_TES_RATE, WEEKLY_CASH_BURN,
};

/// Partial change set applied on top of the weekly burn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDelta {
    pub cash: Option<f64>,
    pub fiscal_gap: Option<f64>,
    pub debt_to_gdp: Option<f64>,
    pub approval: Option<f64>,
    pub tes_rate: Option<f64>,
    pub gdp_growth: Option<f64>,
    pub market_sentiment: Option<f64>,
}

impl StateDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cash(mut self, value: f64) -> Self {
        self.cash = Some(value);
        self
    }

    pub fn fiscal_gap(mut self, value: f64) -> Self {
        self.fiscal_gap = Some(value);
        self
    }

    pub fn debt_to_gdp(mut self, value: f64) -> Self {
        self.debt_to_gdp = Some(value);
        self
    }

    pub fn approval(mut self, value: f64) -> Self {
        self.approval = Some(value);
        self
    }

    pub fn tes_rate(mut self, value: f64) -> Self {
        self.tes_rate = Some(value);
        self
    }

    pub fn gdp_growth(mut self, value: f64) -> Self {
        self.gdp_growth = Some(value);
        self
    }

    pub fn market_sentiment(mut self, value: f64) -> Self {
        self.market_sentiment = Some(value);
        self
    }
}

/// Advances the economy by `weeks` and returns the resulting state.
///
/// The previous state is never touched. Burn, deltas and market reaction are
/// applied in that order, then every bounded field is clamped before the new
/// history point is captured.
pub fn advance(
    state: &EconomicState,
    weeks: f64,
    delta: &StateDelta,
    label: &str,
) -> Result<EconomicState> {
    ensure!(weeks.is_finite(), "las semanas transcurridas deben ser un número finito");
    ensure!(weeks > 0.0, "las semanas transcurridas deben ser positivas: {weeks}");

    let mut next = state.clone();

    next.cash -= WEEKLY_CASH_BURN * weeks;

    apply_delta(&mut next.cash, delta.cash);
    apply_delta(&mut next.fiscal_gap, delta.fiscal_gap);
    apply_delta(&mut next.debt_to_gdp, delta.debt_to_gdp);
    apply_delta(&mut next.approval, delta.approval);
    apply_delta(&mut next.tes_rate, delta.tes_rate);
    apply_delta(&mut next.gdp_growth, delta.gdp_growth);
    apply_delta(&mut next.market_sentiment, delta.market_sentiment);

    if next.debt_to_gdp > DEBT_PRESSURE_THRESHOLD {
        next.tes_rate += DEBT_PRESSURE_TES_PER_WEEK * weeks;
        next.market_sentiment -= DEBT_PRESSURE_SENTIMENT_PER_WEEK * weeks;
    }
    if next.cash < LIQUIDITY_FEAR_CASH {
        next.market_sentiment -= LIQUIDITY_FEAR_SENTIMENT;
    }

    next.cash = next.cash.max(MIN_CASH);
    next.fiscal_gap = next.fiscal_gap.max(MIN_FISCAL_GAP);
    next.market_sentiment = clamp_sentiment(next.market_sentiment);
    next.tes_rate = floor_tes_rate(next.tes_rate);

    next.week += weeks;
    next.date.advance_weeks(weeks);

    let point = HistoryPoint::capture(&next);
    next.history.push(point);
    next.last_action = Some(label.to_string());

    Ok(next)
}

fn apply_delta(field: &mut f64, delta: Option<f64>) {
    if let Some(value) = delta {
        *field += value;
    }
}

pub(crate) fn clamp_sentiment(value: f64) -> f64 {
    value.clamp(MIN_SENTIMENT, MAX_SENTIMENT)
}

pub(crate) fn floor_tes_rate(value: f64) -> f64 {
    value.max(MIN_TES_RATE)
}
