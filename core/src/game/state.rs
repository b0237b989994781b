use serde::{Deserialize, Serialize};

use super::{
    CRITICAL_CASH, ELEVATED_TES_RATE, INITIAL_APPROVAL, INITIAL_CASH, INITIAL_DEBT_TO_GDP,
    INITIAL_FISCAL_GAP, INITIAL_GDP_GROWTH, INITIAL_INFLATION, INITIAL_INTEREST_RATE,
    INITIAL_SENTIMENT, INITIAL_TES_RATE, INITIAL_WEEK, OPTIMISM_SENTIMENT, PANIC_SENTIMENT,
};
use crate::CalendarDate;

/// One point of the weekly time series, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub week: f64,
    pub date_label: String,
    pub cash: f64,
    pub debt: f64,
    pub approval: f64,
    pub tes_rate: f64,
}

impl HistoryPoint {
    pub(crate) fn capture(state: &EconomicState) -> Self {
        Self {
            week: state.week,
            date_label: state.date.week_label(),
            cash: round2(state.cash),
            debt: round2(state.debt_to_gdp),
            approval: round2(state.approval),
            tes_rate: round2(state.tes_rate),
        }
    }
}

/// The country's finances at one instant.
///
/// `inflation` and `interest_rate` are carried for display and for the
/// advisory prompt only; no transition reads or writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicState {
    pub week: f64,
    pub date: CalendarDate,
    pub cash: f64,
    pub fiscal_gap: f64,
    pub debt_to_gdp: f64,
    pub approval: f64,
    pub inflation: f64,
    pub interest_rate: f64,
    pub tes_rate: f64,
    pub gdp_growth: f64,
    pub market_sentiment: f64,
    pub history: Vec<HistoryPoint>,
    pub last_action: Option<String>,
}

impl EconomicState {
    pub fn initial() -> Self {
        let mut state = Self {
            week: INITIAL_WEEK,
            date: CalendarDate::from_start(),
            cash: INITIAL_CASH,
            fiscal_gap: INITIAL_FISCAL_GAP,
            debt_to_gdp: INITIAL_DEBT_TO_GDP,
            approval: INITIAL_APPROVAL,
            inflation: INITIAL_INFLATION,
            interest_rate: INITIAL_INTEREST_RATE,
            tes_rate: INITIAL_TES_RATE,
            gdp_growth: INITIAL_GDP_GROWTH,
            market_sentiment: INITIAL_SENTIMENT,
            history: Vec::new(),
            last_action: None,
        };
        let seed = HistoryPoint::capture(&state);
        state.history.push(seed);
        state
    }

    pub fn date_label(&self) -> String {
        self.date.week_label()
    }

    pub fn cash_is_critical(&self) -> bool {
        self.cash < CRITICAL_CASH
    }

    pub fn tes_is_elevated(&self) -> bool {
        self.tes_rate > ELEVATED_TES_RATE
    }

    pub fn sentiment_band(&self) -> SentimentBand {
        SentimentBand::from_sentiment(self.market_sentiment)
    }

    pub fn latest_history(&self, count: usize) -> &[HistoryPoint] {
        let start = self.history.len().saturating_sub(count);
        &self.history[start..]
    }
}

impl Default for EconomicState {
    fn default() -> Self {
        Self::initial()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentBand {
    Panic,
    Neutral,
    Optimistic,
}

impl SentimentBand {
    pub fn from_sentiment(sentiment: f64) -> Self {
        if sentiment > OPTIMISM_SENTIMENT {
            SentimentBand::Optimistic
        } else if sentiment < PANIC_SENTIMENT {
            SentimentBand::Panic
        } else {
            SentimentBand::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentBand::Panic => "PÁNICO",
            SentimentBand::Neutral => "NEUTRAL",
            SentimentBand::Optimistic => "OPTIMISTA",
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
