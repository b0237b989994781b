pub(crate) const INITIAL_WEEK: f64 = 1.0;
pub(crate) const INITIAL_CASH: f64 = 1.4;
pub(crate) const INITIAL_FISCAL_GAP: f64 = 16.3;
pub(crate) const INITIAL_DEBT_TO_GDP: f64 = 61.3;
pub(crate) const INITIAL_APPROVAL: f64 = 45.0;
pub(crate) const INITIAL_INFLATION: f64 = 5.3;
pub(crate) const INITIAL_INTEREST_RATE: f64 = 9.25;
pub(crate) const INITIAL_TES_RATE: f64 = 13.15;
pub(crate) const INITIAL_GDP_GROWTH: f64 = 2.7;
pub(crate) const INITIAL_SENTIMENT: f64 = 50.0;

pub(crate) const WEEKLY_CASH_BURN: f64 = 0.125;
pub(crate) const DEBT_PRESSURE_THRESHOLD: f64 = 65.0;
pub(crate) const DEBT_PRESSURE_TES_PER_WEEK: f64 = 0.1;
pub(crate) const DEBT_PRESSURE_SENTIMENT_PER_WEEK: f64 = 2.0;
pub(crate) const LIQUIDITY_FEAR_CASH: f64 = 2.0;
pub(crate) const LIQUIDITY_FEAR_SENTIMENT: f64 = 5.0;

pub(crate) const MIN_CASH: f64 = 0.0;
pub(crate) const MIN_FISCAL_GAP: f64 = 0.0;
pub(crate) const MIN_SENTIMENT: f64 = 0.0;
pub(crate) const MAX_SENTIMENT: f64 = 100.0;
pub(crate) const MIN_TES_RATE: f64 = 8.0;

pub(crate) const DEFAULT_CASH_THRESHOLD: f64 = 0.1;
pub(crate) const DEBT_CRISIS_THRESHOLD: f64 = 75.0;
pub(crate) const SOCIAL_UNREST_THRESHOLD: f64 = 15.0;
pub(crate) const VICTORY_MIN_WEEK: f64 = 24.0;

pub(crate) const EMERGENCY_FAILURE_CUTOFF: f64 = 0.6;
pub(crate) const EMERGENCY_MIN_APPROVAL: f64 = 25.0;
pub(crate) const PRIVATIZE_MIN_APPROVAL: f64 = 40.0;
pub(crate) const TAX_REFORM_MIN_APPROVAL: f64 = 40.0;
pub(crate) const SOCIAL_INVESTMENT_MAX_APPROVAL: f64 = 80.0;

pub(crate) const CRITICAL_CASH: f64 = 2.0;
pub(crate) const ELEVATED_TES_RATE: f64 = 13.5;
pub(crate) const PANIC_SENTIMENT: f64 = 40.0;
pub(crate) const OPTIMISM_SENTIMENT: f64 = 60.0;
