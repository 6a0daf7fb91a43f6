//! Session lifecycle
//!
//! `GameLoop` owns the session, the tick scheduler and the drawing surface:
//! `idle -> running -> game over -> running (restart) | idle (stop)`.
//! Each tick steps the simulation and then paints; nothing else touches the
//! model. The asynchronous end of a session (ask for a name, save, refresh the
//! leaderboard) is driven by `ScoreKeeper` once a tick reports game over.

use glam::Vec2;

use crate::config::GameConfig;
use crate::highscores::ScoreEntry;
use crate::input::{InputController, direction_for_key};
use crate::platform::new_seed;
use crate::renderer::{Renderer, Surface};
use crate::score_store::ScoreStore;
use crate::sim::{EndReason, GridModel, Simulation, StepOutcome};

/// Lifecycle state of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    GameOver,
}

/// Fixed-period tick source. The owner calls `GameLoop::tick` on every firing.
pub trait Scheduler {
    /// Begin firing every `period_ms`
    fn arm(&mut self, period_ms: u32);
    /// Stop firing. Safe to call when not armed.
    fn cancel(&mut self);
    fn is_armed(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerEvent {
    Armed(u32),
    Cancelled,
}

/// Scheduler that only records what was asked of it. The caller drives
/// ticks by hand (headless runs and tests).
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    period_ms: Option<u32>,
    events: Vec<SchedulerEvent>,
    /// `arm` calls made while already armed
    pub overlapping_arms: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period_ms(&self) -> Option<u32> {
        self.period_ms
    }

    pub fn events(&self) -> &[SchedulerEvent] {
        &self.events
    }
}

impl Scheduler for ManualScheduler {
    fn arm(&mut self, period_ms: u32) {
        if self.period_ms.is_some() {
            self.overlapping_arms += 1;
        }
        self.period_ms = Some(period_ms);
        self.events.push(SchedulerEvent::Armed(period_ms));
    }

    fn cancel(&mut self) {
        if self.period_ms.take().is_some() {
            self.events.push(SchedulerEvent::Cancelled);
        }
    }

    fn is_armed(&self) -> bool {
        self.period_ms.is_some()
    }
}

/// Shows the running score
pub trait ScoreDisplay {
    fn show_score(&mut self, score: u32);
}

/// Shows the leaderboard; an empty slice means "no scores yet"
pub trait LeaderboardDisplay {
    fn show_leaderboard(&self, entries: &[ScoreEntry]);
}

/// What the player answered at game over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameChoice {
    Provided(String),
    /// Save under the guest label
    Guest,
    /// Do not record this result
    Skip,
}

impl NameChoice {
    /// `None` means the prompt was dismissed
    pub fn from_input(input: Option<&str>) -> Self {
        match input.map(str::trim) {
            None => NameChoice::Skip,
            Some("") => NameChoice::Guest,
            Some(name) => NameChoice::Provided(name.to_string()),
        }
    }
}

/// Asks the player for a name once a session ends
#[allow(async_fn_in_trait)]
pub trait NamePrompt {
    async fn ask_name(&self, score: u32) -> NameChoice;
}

/// Result of one scheduler firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Loop is not running; nothing happened
    Idle,
    Continued { score: u32, scored: bool },
    GameOver { score: u32, reason: EndReason },
}

pub struct GameLoop<K, S, D> {
    config: GameConfig,
    renderer: Renderer,
    input: InputController,
    scheduler: K,
    surface: S,
    score_display: D,
    session: Option<Simulation>,
    state: LoopState,
    sessions_started: u64,
}

impl<K: Scheduler, S: Surface, D: ScoreDisplay> GameLoop<K, S, D> {
    pub fn new(config: GameConfig, scheduler: K, surface: S, score_display: D) -> Self {
        let renderer = Renderer::new(Default::default(), config.image_scale);
        let input = InputController::new(config.min_swipe_distance);
        Self {
            config,
            renderer,
            input,
            scheduler,
            surface,
            score_display,
            session: None,
            state: LoopState::Idle,
            sessions_started: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn model(&self) -> Option<&GridModel> {
        self.session.as_ref().map(Simulation::model)
    }

    pub fn score(&self) -> u32 {
        self.session.as_ref().map_or(0, Simulation::score)
    }

    pub fn scheduler(&self) -> &K {
        &self.scheduler
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn score_display(&self) -> &D {
        &self.score_display
    }

    fn next_seed(&self) -> u64 {
        match self.config.seed {
            // Fixed seed: reproducible, but successive sessions still differ
            Some(seed) => seed.wrapping_add(self.sessions_started),
            None => new_seed(),
        }
    }

    /// Begin a new session. Any previous tick stream is cancelled first.
    pub fn start(&mut self, viewport_width: Option<f64>) {
        self.stop();

        let board = self.config.board_for_viewport(viewport_width);
        let seed = self.next_seed();
        let Some(session) = Simulation::new(board, seed) else {
            log::error!("No room for a target on a {}x{} board", board.cols, board.rows);
            self.session = None;
            return;
        };
        self.sessions_started += 1;
        log::info!(
            "Session {} started: {}x{} board, {} px cells, seed {}",
            self.sessions_started,
            board.cols,
            board.rows,
            board.cell_size,
            seed
        );

        self.score_display.show_score(0);
        self.renderer.prepare(session.model(), &mut self.surface);
        self.renderer.paint(session.model(), &mut self.surface);

        self.scheduler.arm(self.config.tick_ms);
        self.state = LoopState::Running;
        self.session = Some(session);
    }

    /// Cancel the tick stream and go idle. Idempotent.
    pub fn stop(&mut self) {
        self.scheduler.cancel();
        if self.state != LoopState::Idle {
            log::debug!("Loop stopped from {:?}", self.state);
        }
        self.state = LoopState::Idle;
    }

    pub fn restart(&mut self, viewport_width: Option<f64>) {
        self.stop();
        self.start(viewport_width);
    }

    /// One scheduler firing: step, then paint
    pub fn tick(&mut self) -> TickResult {
        if self.state != LoopState::Running {
            return TickResult::Idle;
        }
        let Some(session) = self.session.as_mut() else {
            return TickResult::Idle;
        };

        match session.step() {
            StepOutcome::Continue { scored } => {
                let score = session.score();
                if scored {
                    self.score_display.show_score(score);
                }
                self.renderer.paint(session.model(), &mut self.surface);
                TickResult::Continued { score, scored }
            }
            StepOutcome::GameOver(reason) => {
                self.scheduler.cancel();
                self.state = LoopState::GameOver;
                TickResult::GameOver {
                    score: session.score(),
                    reason,
                }
            }
        }
    }

    /// Keyboard input. Returns true for keys the game consumes.
    pub fn key_down(&mut self, key: &str) -> bool {
        match self.session.as_mut() {
            Some(session) if self.state == LoopState::Running => self.input.key_down(key, session),
            _ => direction_for_key(key).is_some(),
        }
    }

    pub fn touch_start(&mut self, pos: Vec2) {
        self.input.touch_start(pos);
    }

    pub fn touch_end(&mut self, pos: Vec2) {
        if let Some(session) = self.session.as_mut()
            && self.state == LoopState::Running
        {
            self.input.touch_end(pos, session);
        }
    }
}

/// Whether a finished session was recorded
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Saved(Vec<ScoreEntry>),
    Skipped,
}

/// Runs the end-of-session flow against the selected score store.
///
/// Steps are strictly sequential: the prompt resolves before the save
/// starts, and the save completes before the leaderboard is refetched.
pub struct ScoreKeeper<St, P, L> {
    store: St,
    prompt: P,
    leaderboard: L,
}

impl<St: ScoreStore, P: NamePrompt, L: LeaderboardDisplay> ScoreKeeper<St, P, L> {
    pub fn new(store: St, prompt: P, leaderboard: L) -> Self {
        Self {
            store,
            prompt,
            leaderboard,
        }
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn leaderboard(&self) -> &L {
        &self.leaderboard
    }

    pub async fn record(&self, score: u32) -> RecordOutcome {
        let name = match self.prompt.ask_name(score).await {
            NameChoice::Skip => {
                log::info!("Player skipped saving score {}", score);
                return RecordOutcome::Skipped;
            }
            NameChoice::Guest => String::new(),
            NameChoice::Provided(name) => name,
        };

        let saved = self.store.save_score(&name, score).await;
        self.refresh().await;
        RecordOutcome::Saved(saved)
    }

    /// Refetch the leaderboard and show it
    pub async fn refresh(&self) -> Vec<ScoreEntry> {
        let entries = self.store.get_high_scores().await;
        self.leaderboard.show_leaderboard(&entries);
        entries
    }
}
