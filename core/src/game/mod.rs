mod actions;
mod bootstrap;
mod constants;
pub(crate) use constants::*;
mod engine;
mod market;
mod outcome;
mod random;
mod session;
mod state;

pub use actions::{
    ActionId, ActionInfo, ActionTab, EMERGENCY_FAILURE_LABEL, EMERGENCY_FAILURE_NOTICE,
    EMERGENCY_SUCCESS_LABEL, ResolvedAction,
};
pub use bootstrap::SessionBuilder;
pub use engine::{StateDelta, advance};
pub use market::{HEADLINES, MarketNoise, headline_at};
pub use outcome::{GamePhase, Verdict, evaluate};
pub use random::RandomSource;
#[cfg(test)]
pub(crate) use random::ScriptedRandom;
pub use session::{ActionReport, GameSession, INITIAL_ADVISOR_MESSAGE, RESET_ADVISOR_MESSAGE};
pub use state::{EconomicState, HistoryPoint, SentimentBand};
