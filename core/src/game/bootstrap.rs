use rand::{SeedableRng, rngs::StdRng};

use super::{
    market::MarketNoise, outcome::GamePhase, random::RandomSource, session::GameSession,
};

pub struct SessionBuilder {
    rng: Box<dyn RandomSource + Send>,
    noise: MarketNoise,
    phase: GamePhase,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            rng: Box::new(StdRng::from_entropy()),
            noise: MarketNoise::default(),
            phase: GamePhase::Start,
        }
    }

    pub fn with_rng<R>(mut self, rng: R) -> Self
    where
        R: RandomSource + Send + 'static,
    {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_noise(mut self, noise: MarketNoise) -> Self {
        self.noise = noise;
        self
    }

    /// Skips the start screen and opens the session already in play.
    pub fn playing(mut self) -> Self {
        self.phase = GamePhase::Playing;
        self
    }

    pub fn build(self) -> GameSession {
        GameSession::from_bootstrap(self.into_bootstrap())
    }

    pub(crate) fn into_bootstrap(self) -> SessionBootstrap {
        let SessionBuilder { rng, noise, phase } = self;
        SessionBootstrap { rng, noise, phase }
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct SessionBootstrap {
    pub(crate) rng: Box<dyn RandomSource + Send>,
    pub(crate) noise: MarketNoise,
    pub(crate) phase: GamePhase,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_builder_waits_on_start_screen() {
        let session = SessionBuilder::new().build();
        assert_eq!(session.phase(), GamePhase::Start);
        assert_eq!(session.noise(), MarketNoise::default());
    }

    #[test]
    fn seeded_sessions_share_noise_paths() {
        let mut first = SessionBuilder::new().with_seed(8).playing().build();
        let mut second = SessionBuilder::new().with_seed(8).playing().build();
        for _ in 0..10 {
            first.apply_noise();
            second.apply_noise();
        }
        assert_eq!(first.state(), second.state());
    }

    #[test]
    fn custom_noise_is_kept() {
        let noise = MarketNoise::new(0.1, 3.0).unwrap();
        let session = SessionBuilder::new().with_noise(noise).build();
        assert_eq!(session.noise().sentiment_amplitude(), 3.0);
    }
}
