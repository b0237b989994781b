mod advisor;
mod config;
mod game;
mod runtime;
mod time;

pub use advisor::{
    ADVISOR_OFFLINE_FALLBACK, Advisor, AdvisorBackend, EMPTY_ADVICE_FALLBACK, GeminiAdvisor,
    OfflineAdvisor, build_prompt, consult,
};
pub use config::{AdvisorConfig, NoiseConfig, SimulationConfig};
pub use game::{
    ActionId, ActionInfo, ActionReport, ActionTab, EMERGENCY_FAILURE_LABEL,
    EMERGENCY_FAILURE_NOTICE, EMERGENCY_SUCCESS_LABEL, EconomicState, GamePhase, GameSession,
    HEADLINES, HistoryPoint, INITIAL_ADVISOR_MESSAGE, MarketNoise, RESET_ADVISOR_MESSAGE,
    RandomSource, ResolvedAction, SentimentBand, SessionBuilder, StateDelta,
    Verdict, advance, evaluate, headline_at,
};
pub use runtime::{SessionController, SessionHandle, SessionView};
pub use time::CalendarDate;
