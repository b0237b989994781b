//! Async owner of a [`GameSession`].
//!
//! One controller task serialises every write (player commands, market noise
//! ticks, advisor replies) and publishes the committed result as a
//! [`SessionView`] over a `watch` channel.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, ensure};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::advisor::{self, Advisor};
use crate::game::{ActionId, ActionReport, EconomicState, GamePhase, GameSession};

/// Snapshot of the committed session handed to front-ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub state: EconomicState,
    pub phase: GamePhase,
    pub feedback: Option<String>,
    pub advisor_message: String,
    pub advice_in_flight: bool,
}

impl SessionView {
    fn capture(session: &GameSession, advice_in_flight: bool) -> Self {
        Self {
            state: session.state().clone(),
            phase: session.phase(),
            feedback: session.feedback().map(str::to_string),
            advisor_message: session.advisor_message().to_string(),
            advice_in_flight,
        }
    }
}

type Reply<T> = oneshot::Sender<Result<T>>;

enum SessionEvent {
    Start(Reply<()>),
    Act(ActionId, Reply<ActionReport>),
    Reset(Reply<()>),
    NoiseTick,
    AdviceRequested(Reply<bool>),
    AdviceReady(String),
    Shutdown,
}

pub struct SessionController<A: Advisor> {
    session: GameSession,
    advisor: Arc<A>,
    noise_period: Duration,
    events: mpsc::WeakUnboundedSender<SessionEvent>,
    inbox: mpsc::UnboundedReceiver<SessionEvent>,
    view: watch::Sender<SessionView>,
    noise_task: Option<JoinHandle<()>>,
    advice_in_flight: bool,
}

impl<A: Advisor> SessionController<A> {
    /// Moves `session` onto a new controller task. Must be called inside a
    /// tokio runtime. A zero noise period is rejected.
    pub fn spawn(
        session: GameSession,
        advisor: A,
        noise_period: Duration,
    ) -> Result<SessionHandle> {
        ensure!(!noise_period.is_zero(), "el periodo del ruido de mercado debe ser positivo");
        let (events, inbox) = mpsc::unbounded_channel();
        let (view, view_rx) = watch::channel(SessionView::capture(&session, false));
        let controller = Self {
            session,
            advisor: Arc::new(advisor),
            noise_period,
            events: events.downgrade(),
            inbox,
            view,
            noise_task: None,
            advice_in_flight: false,
        };
        let task = tokio::spawn(controller.run());
        Ok(SessionHandle {
            events,
            view: view_rx,
            task: Some(task),
        })
    }

    async fn run(mut self) {
        self.sync_noise_task();
        while let Some(event) = self.inbox.recv().await {
            if matches!(event, SessionEvent::Shutdown) {
                break;
            }
            self.handle(event);
        }
        self.stop_noise_task();
        debug!("session controller stopped");
    }

    /// Applies one event. Replies are sent only after the resulting view is
    /// published, so a caller that awaited a reply always observes its effect.
    fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Start(reply) => {
                let result = self.session.start();
                self.commit();
                let _ = reply.send(result);
            }
            SessionEvent::Act(action, reply) => {
                let result = self.session.apply_action(action);
                self.commit();
                let _ = reply.send(result);
            }
            SessionEvent::Reset(reply) => {
                self.session.reset();
                self.commit();
                let _ = reply.send(Ok(()));
            }
            SessionEvent::NoiseTick => {
                if self.session.apply_noise() {
                    self.commit();
                } else {
                    debug!(phase = self.session.phase().label(), "stale noise tick dropped");
                }
            }
            SessionEvent::AdviceRequested(reply) => {
                let accepted = self.request_advice();
                self.commit();
                let _ = reply.send(Ok(accepted));
            }
            SessionEvent::AdviceReady(message) => {
                self.advice_in_flight = false;
                self.session.set_advisor_message(message);
                self.commit();
            }
            SessionEvent::Shutdown => {}
        }
    }

    fn request_advice(&mut self) -> bool {
        if self.advice_in_flight {
            debug!("advice already requested");
            return false;
        }
        let Some(events) = self.events.upgrade() else {
            return false;
        };
        self.advice_in_flight = true;
        let advisor = Arc::clone(&self.advisor);
        let prompt = self.session.advisor_prompt();
        tokio::spawn(async move {
            let message = advisor::consult(advisor.as_ref(), &prompt).await;
            let _ = events.send(SessionEvent::AdviceReady(message));
        });
        true
    }

    fn sync_noise_task(&mut self) {
        let playing = self.session.is_playing();
        if playing && self.noise_task.is_none() {
            self.noise_task = Some(self.spawn_noise_task());
            debug!(period_ms = self.noise_period.as_millis() as u64, "noise timer started");
        } else if !playing {
            self.stop_noise_task();
        }
    }

    fn stop_noise_task(&mut self) {
        if let Some(task) = self.noise_task.take() {
            task.abort();
            debug!("noise timer stopped");
        }
    }

    fn spawn_noise_task(&self) -> JoinHandle<()> {
        let events = self.events.clone();
        let period = self.noise_period;
        tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(sender) = events.upgrade() else {
                    break;
                };
                if sender.send(SessionEvent::NoiseTick).is_err() {
                    break;
                }
            }
        })
    }

    fn commit(&mut self) {
        self.sync_noise_task();
        self.view
            .send_replace(SessionView::capture(&self.session, self.advice_in_flight));
    }
}

/// Front-end side of a running [`SessionController`].
pub struct SessionHandle {
    events: mpsc::UnboundedSender<SessionEvent>,
    view: watch::Receiver<SessionView>,
    task: Option<JoinHandle<()>>,
}

impl SessionHandle {
    pub async fn start(&self) -> Result<()> {
        self.request(SessionEvent::Start).await
    }

    pub async fn act(&self, action: ActionId) -> Result<ActionReport> {
        self.request(|reply| SessionEvent::Act(action, reply)).await
    }

    pub async fn reset(&self) -> Result<()> {
        self.request(SessionEvent::Reset).await
    }

    /// Returns `false` when a previous request is still pending.
    pub async fn request_advice(&self) -> Result<bool> {
        self.request(SessionEvent::AdviceRequested).await
    }

    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    pub async fn shutdown(mut self) -> Result<()> {
        let _ = self.events.send(SessionEvent::Shutdown);
        if let Some(task) = self.task.take() {
            task.await.context("session controller panicked")?;
        }
        Ok(())
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> SessionEvent) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.events
            .send(build(reply))
            .map_err(|_| anyhow!("session controller is not running"))?;
        response
            .await
            .context("session controller dropped the request")?
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::{ADVISOR_OFFLINE_FALLBACK, OfflineAdvisor};
    use crate::game::{INITIAL_ADVISOR_MESSAGE, ScriptedRandom, Verdict};

    const PERIOD: Duration = Duration::from_millis(100);

    struct SlowAdvisor;

    impl Advisor for SlowAdvisor {
        async fn advise(&self, _prompt: &str) -> Result<String> {
            time::sleep(Duration::from_secs(5)).await;
            Ok("Venda activos antes de emitir.".to_string())
        }
    }

    fn rising_session() -> GameSession {
        GameSession::builder()
            .with_rng(ScriptedRandom::constant(1.0))
            .build()
    }

    #[tokio::test(start_paused = true)]
    async fn noise_runs_only_while_playing() {
        let handle = SessionController::spawn(rising_session(), OfflineAdvisor, PERIOD).unwrap();
        let initial = handle.view();

        time::sleep(Duration::from_millis(550)).await;
        assert_eq!(handle.view(), initial);

        handle.start().await.unwrap();
        time::sleep(Duration::from_millis(1_050)).await;
        let view = handle.view();
        assert_eq!(view.phase, GamePhase::Playing);
        assert!((view.state.tes_rate - 13.40).abs() < 1e-9, "tes {}", view.state.tes_rate);
        assert!((view.state.market_sentiment - 60.0).abs() < 1e-9);
        assert_eq!(view.state.history.len(), 1);
        assert_eq!(view.state.week, 1.0);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn noise_stops_once_the_game_is_lost() {
        let mut session = rising_session();
        session.start().unwrap();
        session.state_mut().cash = 0.3;
        let handle = SessionController::spawn(session, OfflineAdvisor, PERIOD).unwrap();

        let report = handle.act(ActionId::SocialInvestment).await.unwrap();
        assert_eq!(report.verdict, Some(Verdict::Default));
        let frozen = handle.view();
        assert_eq!(frozen.phase, GamePhase::GameOver);

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(handle.view(), frozen);
        assert!(handle.act(ActionId::Austerity).await.is_err());

        handle.reset().await.unwrap();
        time::sleep(Duration::from_millis(250)).await;
        let view = handle.view();
        assert_eq!(view.phase, GamePhase::Playing);
        assert!(view.state.market_sentiment > 50.0);
        assert_eq!(view.state.history.len(), 1);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_actions_are_applied_one_at_a_time() {
        let session = GameSession::builder().with_seed(21).playing().build();
        let handle = SessionController::spawn(session, OfflineAdvisor, PERIOD).unwrap();

        let (first, second, third) = tokio::join!(
            handle.act(ActionId::Austerity),
            handle.act(ActionId::Liquidity),
            handle.act(ActionId::Austerity),
        );
        first.unwrap();
        second.unwrap();
        third.unwrap();

        let view = handle.view();
        assert_eq!(view.state.history.len(), 4);
        assert_eq!(view.state.week, 5.5);
        let weeks: Vec<f64> = view.state.history.iter().map(|point| point.week).collect();
        assert_eq!(weeks, vec![1.0, 3.0, 3.5, 5.5]);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn offline_advisor_reports_lost_connection() {
        let handle = SessionController::spawn(rising_session(), OfflineAdvisor, PERIOD).unwrap();
        assert_eq!(handle.view().advisor_message, INITIAL_ADVISOR_MESSAGE);

        assert!(handle.request_advice().await.unwrap());
        let mut views = handle.subscribe();
        let view = views
            .wait_for(|view| !view.advice_in_flight)
            .await
            .unwrap()
            .clone();
        assert_eq!(view.advisor_message, ADVISOR_OFFLINE_FALLBACK);
        assert_eq!(view.phase, GamePhase::Start);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_advice_requests_are_ignored() {
        let handle = SessionController::spawn(rising_session(), SlowAdvisor, PERIOD).unwrap();

        assert!(handle.request_advice().await.unwrap());
        assert!(!handle.request_advice().await.unwrap());
        assert!(handle.view().advice_in_flight);

        let mut views = handle.subscribe();
        let view = views
            .wait_for(|view| !view.advice_in_flight)
            .await
            .unwrap()
            .clone();
        assert_eq!(view.advisor_message, "Venda activos antes de emitir.");
        assert!(handle.request_advice().await.unwrap());

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn zero_noise_period_is_refused() {
        let session = GameSession::builder().with_seed(2).playing().build();
        let error = SessionController::spawn(session, OfflineAdvisor, Duration::ZERO)
            .err()
            .unwrap();
        assert!(error.to_string().contains("periodo"));
    }

    #[tokio::test]
    async fn requests_fail_after_shutdown() {
        let handle = SessionController::spawn(rising_session(), OfflineAdvisor, PERIOD).unwrap();
        let sender = handle.events.clone();
        handle.shutdown().await.unwrap();

        let (reply, response) = oneshot::channel();
        assert!(sender.send(SessionEvent::Start(reply)).is_err());
        assert!(response.await.is_err());
    }
}
