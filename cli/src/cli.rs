mod commands;

use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result};
use encrucijada_core::{
    ActionId, ActionReport, ActionTab, GamePhase, HistoryPoint, SessionHandle, SessionView,
};
use tokio::runtime::Runtime;

use commands::{CommandRegistry, Context};

pub fn run(runtime: &Runtime, session: &SessionHandle) -> Result<()> {
    let registry = CommandRegistry::default();
    let mut ctx = Context::new(runtime, session);
    print_intro(&ctx.view());
    let stdin = io::stdin();

    loop {
        let view = ctx.view();
        print!("{} {}> ", view.state.date_label(), phase_marker(view.phase));
        io::stdout()
            .flush()
            .context("no se pudo vaciar la salida estándar")?;

        let mut line = String::new();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .context("no se pudo leer la entrada")?;

        if bytes == 0 {
            println!("Fin de la entrada. Cerrando el ministerio.");
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Err(error) = registry.execute_input(&mut ctx, trimmed) {
            println!("Error: {error}");
        }
        if ctx.quit_requested() {
            return Ok(());
        }
    }
}

fn phase_marker(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Start => "[inicio]",
        GamePhase::Playing => "",
        GamePhase::Victory => "[victoria]",
        GamePhase::GameOver => "[fin]",
    }
}

fn print_intro(view: &SessionView) {
    println!("LA ENCRUCIJADA 2026");
    println!("Usted es el nuevo Ministro de Hacienda. El Congreso hundió la reforma tributaria.");
    println!(
        "Caja disponible: ${:.1} Billones. Hueco fiscal: ${:.1} Billones.",
        view.state.cash, view.state.fiscal_gap
    );
    println!("Objetivo: cerrar la brecha fiscal y sobrevivir más allá de la semana 24.");
    println!("Escriba start para juramentar el cargo, help para ver los comandos.");
}

pub(crate) fn print_help() {
    println!("Comandos disponibles:");
    println!("  start                 Juramentar el cargo y abrir los mercados");
    println!("  status | st           Tablero de indicadores");
    println!("  actions               Decisiones disponibles y su efecto");
    println!("  act <id>              Ejecutar una decisión (ej: act issue_debt)");
    println!("  history [n]           Últimos n puntos de la serie (por defecto 20)");
    println!("  advise                Pedir análisis al asesor");
    println!("  advice                Mostrar el último mensaje del asesor");
    println!("  reset                 Reiniciar el año fiscal");
    println!("  quit | exit           Salir");
}

pub(crate) fn print_status(view: &SessionView, headline: &str) {
    let state = &view.state;
    println!("-- {} (semana {:.1}) --", state.date, state.week);
    println!("Fase: {}", view.phase.label());
    println!(
        "Caja disponible:   ${:>6.2} Billones  [{}]",
        state.cash,
        if state.cash_is_critical() {
            "CRÍTICO"
        } else {
            "Estable"
        }
    );
    println!("Brecha fiscal:     ${:>6.2} Billones", state.fiscal_gap);
    println!("Deuda/PIB:          {:>6.2}%", state.debt_to_gdp);
    let tes_alert = if state.tes_is_elevated() {
        "  ALERTA: tasa elevada"
    } else {
        ""
    };
    println!("Tasa TES 10 años:   {:>6.2}%{}", state.tes_rate, tes_alert);
    println!("Aprobación:         {:>6.1}%", state.approval);
    println!(
        "Sentimiento:        {:>6.1}   [{}]",
        state.market_sentiment,
        state.sentiment_band().label()
    );
    println!("Inflación:          {:>6.1}%", state.inflation);
    println!("Tasa BanRep:        {:>6.2}%", state.interest_rate);
    println!("Crecimiento PIB:    {:>6.1}%", state.gdp_growth);
    if let Some(action) = &state.last_action {
        println!("Última decisión: {action}");
    }
    if let Some(feedback) = &view.feedback {
        println!(">> {feedback}");
    }
    println!("Noticias: {headline}");
}

pub(crate) fn print_actions(view: &SessionView) {
    let playing = view.phase == GamePhase::Playing;
    for tab in [ActionTab::Fiscal, ActionTab::Monetary, ActionTab::Political] {
        println!("== {} ==", tab.label());
        for action in ActionId::ALL.iter().filter(|action| action.info().tab == tab) {
            let info = action.info();
            let available = playing && action.is_available(&view.state);
            println!(
                "{} {:<18} {} ({})",
                if available { "*" } else { "-" },
                action.as_str(),
                info.title,
                info.duration
            );
            println!("    {}", info.description);
            let effects: Vec<String> = [
                info.benefit.map(|text| format!("+ {text}")),
                info.cost.map(|text| format!("- {text}")),
                info.risk.map(|text| format!("riesgo: {text}")),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !effects.is_empty() {
                println!("    {}", effects.join("  / "));
            }
            if playing && !available {
                if let Some(gate) = action.gate_description() {
                    println!("    bloqueada: {gate}");
                }
            }
        }
    }
    if !playing {
        println!("(las decisiones sólo se ejecutan durante la partida)");
    }
}

pub(crate) fn print_report(report: &ActionReport, view: &SessionView) {
    println!(
        "{} -> semana {:.1}, caja ${:.2} B, brecha ${:.2} B, aprobación {:.1}%",
        report.label,
        view.state.week,
        view.state.cash,
        view.state.fiscal_gap,
        view.state.approval
    );
    if let Some(notice) = report.notice {
        println!(">> {notice}");
    }
    if let Some(verdict) = report.verdict {
        println!("=== {} ===", report.phase.label());
        println!("{}", verdict.message());
        println!("Escriba reset para intentarlo de nuevo.");
    }
}

pub(crate) fn print_history(points: &[HistoryPoint]) {
    println!(
        "{:<8} | {:>6} | {:>8} | {:>8} | {:>10} | {:>8}",
        "Fecha", "Semana", "Caja", "Deuda", "Aprobación", "TES"
    );
    for point in points {
        println!(
            "{:<8} | {:>6.1} | {:>8.2} | {:>8.2} | {:>10.2} | {:>8.2}",
            point.date_label, point.week, point.cash, point.debt, point.approval, point.tes_rate
        );
    }
}
