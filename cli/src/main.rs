mod cli;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use encrucijada_core::{
    AdvisorBackend, GameSession, SessionController, SessionHandle, SimulationConfig,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::runtime::Runtime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn,encrucijada=info,encrucijada_core=info";

fn main() -> Result<()> {
    init_logging();
    let config = load_config()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("no se pudo iniciar el runtime asíncrono")?;
    let session = spawn_session(&runtime, &config)?;

    let outcome = cli::run(&runtime, &session);
    runtime.block_on(session.shutdown())?;
    outcome
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config() -> Result<SimulationConfig> {
    match resolve_config_path()? {
        Some(path) => {
            let config = SimulationConfig::load(&path)?;
            info!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        None => {
            warn!("config/simulation.yaml not found, using built-in defaults");
            Ok(SimulationConfig::default())
        }
    }
}

fn resolve_config_path() -> Result<Option<PathBuf>> {
    let cwd = std::env::current_dir().context("no se pudo obtener el directorio actual")?;
    let candidates = [
        cwd.join("config").join("simulation.yaml"),
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("config")
            .join("simulation.yaml"),
    ];

    Ok(candidates.into_iter().find(|path| path.exists()))
}

fn spawn_session(runtime: &Runtime, config: &SimulationConfig) -> Result<SessionHandle> {
    let noise = config.noise.market_noise()?;
    let session = GameSession::builder()
        .with_rng(StdRng::from_entropy())
        .with_noise(noise)
        .build();
    let advisor = AdvisorBackend::from_config(&config.advisor);
    info!(online = advisor.is_online(), model = %config.advisor.model, "advisor ready");

    let _guard = runtime.enter();
    SessionController::spawn(session, advisor, config.noise.period())
}
