use std::fmt;
use std::str::FromStr;

use anyhow::{Error, bail};
use serde::{Deserialize, Serialize};

use super::engine::StateDelta;
use super::random::RandomSource;
use super::state::EconomicState;
use super::{
    DEBT_CRISIS_THRESHOLD, EMERGENCY_FAILURE_CUTOFF, EMERGENCY_MIN_APPROVAL,
    PRIVATIZE_MIN_APPROVAL, SOCIAL_INVESTMENT_MAX_APPROVAL, TAX_REFORM_MIN_APPROVAL,
};

pub const EMERGENCY_SUCCESS_LABEL: &str = "Emergencia Exitosa";
pub const EMERGENCY_FAILURE_LABEL: &str = "Emergencia Fallida";
pub const EMERGENCY_FAILURE_NOTICE: &str = "¡La Corte Constitucional tumbó el decreto!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    IssueDebt,
    Austerity,
    Emergency,
    Liquidity,
    Privatize,
    TaxReform,
    SocialInvestment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionTab {
    Fiscal,
    Monetary,
    Political,
}

impl ActionTab {
    pub fn label(&self) -> &'static str {
        match self {
            ActionTab::Fiscal => "Fiscal",
            ActionTab::Monetary => "Monetario",
            ActionTab::Political => "Político",
        }
    }
}

/// Card text shown next to each action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub benefit: Option<&'static str>,
    pub cost: Option<&'static str>,
    pub risk: Option<&'static str>,
    pub duration: &'static str,
    pub tab: ActionTab,
}

/// A catalog entry turned into engine input.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAction {
    pub action: ActionId,
    pub weeks: f64,
    pub delta: StateDelta,
    pub label: &'static str,
    pub notice: Option<&'static str>,
}

impl ActionId {
    pub const ALL: [ActionId; 7] = [
        ActionId::IssueDebt,
        ActionId::Austerity,
        ActionId::Emergency,
        ActionId::Liquidity,
        ActionId::Privatize,
        ActionId::TaxReform,
        ActionId::SocialInvestment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionId::IssueDebt => "issue_debt",
            ActionId::Austerity => "austerity",
            ActionId::Emergency => "emergency",
            ActionId::Liquidity => "liquidity",
            ActionId::Privatize => "privatize",
            ActionId::TaxReform => "tax_reform",
            ActionId::SocialInvestment => "social_investment",
        }
    }

    pub fn weeks(&self) -> f64 {
        match self {
            ActionId::IssueDebt => 1.0,
            ActionId::Austerity => 2.0,
            ActionId::Emergency => 1.0,
            ActionId::Liquidity => 0.5,
            ActionId::Privatize => 4.0,
            ActionId::TaxReform => 8.0,
            ActionId::SocialInvestment => 2.0,
        }
    }

    /// Availability gate. The engine never re-checks it; callers must.
    pub fn is_available(&self, state: &EconomicState) -> bool {
        match self {
            ActionId::IssueDebt => state.debt_to_gdp < DEBT_CRISIS_THRESHOLD,
            ActionId::Emergency => state.approval > EMERGENCY_MIN_APPROVAL,
            ActionId::Privatize => state.approval > PRIVATIZE_MIN_APPROVAL,
            ActionId::TaxReform => state.approval >= TAX_REFORM_MIN_APPROVAL,
            ActionId::SocialInvestment => state.approval <= SOCIAL_INVESTMENT_MAX_APPROVAL,
            ActionId::Austerity | ActionId::Liquidity => true,
        }
    }

    pub fn gate_description(&self) -> Option<&'static str> {
        match self {
            ActionId::IssueDebt => Some("requiere deuda/PIB menor a 75%"),
            ActionId::Emergency => Some("requiere aprobación mayor a 25%"),
            ActionId::Privatize => Some("requiere aprobación mayor a 40%"),
            ActionId::TaxReform => Some("requiere capital político de al menos 40%"),
            ActionId::SocialInvestment => Some("no disponible con aprobación sobre 80%"),
            ActionId::Austerity | ActionId::Liquidity => None,
        }
    }

    /// Turns the action into engine input. `emergency` consumes exactly one
    /// draw from `rng`; every other action consumes none.
    pub fn resolve<R: RandomSource + ?Sized>(&self, rng: &mut R) -> ResolvedAction {
        let (delta, label, notice) = match self {
            ActionId::IssueDebt => (
                StateDelta::new()
                    .cash(3.0)
                    .fiscal_gap(-1.0)
                    .debt_to_gdp(1.8)
                    .tes_rate(0.5)
                    .market_sentiment(-5.0)
                    .approval(-1.0),
                "Emisión TES (1 Sem)",
                None,
            ),
            ActionId::Austerity => (
                StateDelta::new()
                    .cash(1.5)
                    .fiscal_gap(-1.5)
                    .approval(-6.0)
                    .gdp_growth(-0.2)
                    .market_sentiment(10.0),
                "Austeridad (2 Sem)",
                None,
            ),
            ActionId::Emergency => {
                let court_strikes_down = rng.next_unit() > EMERGENCY_FAILURE_CUTOFF;
                if court_strikes_down {
                    (
                        StateDelta::new()
                            .approval(-10.0)
                            .cash(0.0)
                            .market_sentiment(-20.0),
                        EMERGENCY_FAILURE_LABEL,
                        Some(EMERGENCY_FAILURE_NOTICE),
                    )
                } else {
                    (
                        StateDelta::new()
                            .cash(5.0)
                            .fiscal_gap(-5.0)
                            .approval(-8.0)
                            .market_sentiment(-10.0),
                        EMERGENCY_SUCCESS_LABEL,
                        None,
                    )
                }
            }
            ActionId::Liquidity => (
                StateDelta::new()
                    .cash(0.2)
                    .approval(0.5)
                    .market_sentiment(2.0),
                "Gestión Liquidez",
                None,
            ),
            ActionId::Privatize => (
                StateDelta::new()
                    .cash(10.0)
                    .debt_to_gdp(-2.0)
                    .gdp_growth(-1.0)
                    .approval(-15.0)
                    .market_sentiment(20.0),
                "Venta Activos (4 Sem)",
                None,
            ),
            ActionId::TaxReform => (
                StateDelta::new()
                    .fiscal_gap(-8.0)
                    .approval(-12.0)
                    .gdp_growth(-0.5)
                    .market_sentiment(15.0),
                "Reforma Tributaria (8 Sem)",
                None,
            ),
            ActionId::SocialInvestment => (
                StateDelta::new()
                    .cash(-2.0)
                    .approval(12.0)
                    .market_sentiment(-5.0),
                "Inv. Social (2 Sem)",
                None,
            ),
        };

        ResolvedAction {
            action: *self,
            weeks: self.weeks(),
            delta,
            label,
            notice,
        }
    }

    pub fn info(&self) -> ActionInfo {
        match self {
            ActionId::Austerity => ActionInfo {
                title: "Decreto de Austeridad",
                description: "Congelar nómina estatal y recortar inversión en ministerios no esenciales.",
                benefit: Some("+1.5B Ahorro"),
                cost: Some("-3% Crecimiento PIB"),
                risk: Some("-5% Aprobación Social"),
                duration: "2 Semanas",
                tab: ActionTab::Fiscal,
            },
            ActionId::Privatize => ActionInfo {
                title: "Venta de Activos (Ecopetrol/ISA)",
                description: "Privatizar participación estatal en empresas estratégicas.",
                benefit: Some("+10.0B Caja (Instantáneo)"),
                cost: Some("-1.0% PIB (Permanente)"),
                risk: Some("Huelga General y Soberanía"),
                duration: "4 Semanas",
                tab: ActionTab::Fiscal,
            },
            ActionId::TaxReform => ActionInfo {
                title: "Reforma Tributaria Estructural",
                description: "Presentar ley para aumentar base gravable y renta a empresas.",
                benefit: Some("+20.0B (Largo Plazo)"),
                cost: Some("-15% Aprobación Inmediata"),
                risk: Some("Bloqueo en el Congreso"),
                duration: "8 Semanas",
                tab: ActionTab::Fiscal,
            },
            ActionId::IssueDebt => ActionInfo {
                title: "Emitir Bonos TES (Corto Plazo)",
                description: "Endeudamiento interno rápido para cubrir el mes.",
                benefit: Some("+3.0B Caja"),
                cost: Some("+ Deuda, + Tasas"),
                risk: Some("Crowding Out"),
                duration: "1 Semana",
                tab: ActionTab::Monetary,
            },
            ActionId::Liquidity => ActionInfo {
                title: "Gestión de Liquidez",
                description: "Movimientos de tesorería rutinarios (swaps).",
                benefit: Some("Estabilidad Temporal"),
                cost: Some("-0.5% Reservas"),
                risk: None,
                duration: "3 Días",
                tab: ActionTab::Monetary,
            },
            ActionId::Emergency => ActionInfo {
                title: "Emergencia Económica",
                description: "Gobernar por decreto sin el Congreso.",
                benefit: Some("Poder Total Temporal"),
                cost: None,
                risk: Some("Fallo Corte Constitucional (-20 Estabilidad)"),
                duration: "Inmediato",
                tab: ActionTab::Political,
            },
            ActionId::SocialInvestment => ActionInfo {
                title: "Inversión Social de Choque",
                description: "Subsidios directos a poblaciones vulnerables.",
                benefit: Some("+10% Aprobación"),
                cost: Some("-2.0B Caja"),
                risk: Some("Aumenta Hueco Fiscal"),
                duration: "2 Semanas",
                tab: ActionTab::Political,
            },
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        match ActionId::ALL
            .iter()
            .find(|action| action.as_str() == needle)
        {
            Some(action) => Ok(*action),
            None => bail!("decisión desconocida: {value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::random::ScriptedRandom;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn ids_round_trip_through_strings() {
        for action in ActionId::ALL {
            assert_eq!(action.as_str().parse::<ActionId>().unwrap(), action);
        }
        assert_eq!(" Tax_Reform ".parse::<ActionId>().unwrap(), ActionId::TaxReform);
    }

    #[test]
    fn unknown_id_is_reported() {
        let error = "bailout".parse::<ActionId>().unwrap_err();
        assert!(error.to_string().contains("bailout"));
        assert!(error.to_string().starts_with("decisión desconocida"));
    }

    #[test]
    fn deterministic_actions_consume_no_draws() {
        let mut source = ScriptedRandom::constant(0.5);
        for action in ActionId::ALL {
            if action != ActionId::Emergency {
                action.resolve(&mut source);
            }
        }
        assert_eq!(source.draws(), 0);
    }

    #[test]
    fn emergency_draws_exactly_once() {
        let mut source = ScriptedRandom::constant(0.5);
        ActionId::Emergency.resolve(&mut source);
        assert_eq!(source.draws(), 1);
    }

    #[test]
    fn emergency_fails_above_cutoff() {
        let resolved = ActionId::Emergency.resolve(&mut ScriptedRandom::constant(0.61));
        assert_eq!(resolved.label, EMERGENCY_FAILURE_LABEL);
        assert_eq!(resolved.notice, Some(EMERGENCY_FAILURE_NOTICE));
        assert_eq!(resolved.delta.approval, Some(-10.0));
        assert_eq!(resolved.delta.cash, Some(0.0));
        assert_eq!(resolved.delta.market_sentiment, Some(-20.0));
        assert_eq!(resolved.delta.fiscal_gap, None);
    }

    #[test]
    fn emergency_succeeds_at_or_below_cutoff() {
        let resolved = ActionId::Emergency.resolve(&mut ScriptedRandom::constant(0.6));
        assert_eq!(resolved.label, EMERGENCY_SUCCESS_LABEL);
        assert_eq!(resolved.notice, None);
        assert_eq!(resolved.delta.cash, Some(5.0));
        assert_eq!(resolved.delta.fiscal_gap, Some(-5.0));
        assert_eq!(resolved.delta.approval, Some(-8.0));
        assert_eq!(resolved.delta.market_sentiment, Some(-10.0));
    }

    #[test]
    fn emergency_fails_about_forty_percent_of_the_time() {
        let mut rng = StdRng::seed_from_u64(2026);
        let failures = (0..1000)
            .filter(|_| ActionId::Emergency.resolve(&mut rng).label == EMERGENCY_FAILURE_LABEL)
            .count();
        assert!(
            (350..=450).contains(&failures),
            "failures out of range: {failures}"
        );
    }

    #[test]
    fn gates_follow_thresholds() {
        let mut state = EconomicState::initial();
        state.debt_to_gdp = 75.0;
        assert!(!ActionId::IssueDebt.is_available(&state));
        state.debt_to_gdp = 74.9;
        assert!(ActionId::IssueDebt.is_available(&state));

        state.approval = 25.0;
        assert!(!ActionId::Emergency.is_available(&state));
        assert!(!ActionId::Privatize.is_available(&state));
        assert!(!ActionId::TaxReform.is_available(&state));
        assert!(ActionId::Austerity.is_available(&state));
        assert!(ActionId::Liquidity.is_available(&state));

        state.approval = 40.0;
        assert!(ActionId::Emergency.is_available(&state));
        assert!(!ActionId::Privatize.is_available(&state));
        assert!(ActionId::TaxReform.is_available(&state));

        state.approval = 80.5;
        assert!(!ActionId::SocialInvestment.is_available(&state));
    }

    #[test]
    fn every_action_has_card_text() {
        for action in ActionId::ALL {
            let info = action.info();
            assert!(!info.title.is_empty());
            assert!(!info.duration.is_empty());
        }
    }
}
