//! Grid Snake entry point
//!
//! On the web this wires the page up and returns; the browser drives the
//! game from there. Natively it plays one headless session with a simple
//! autopilot and records the result in the configured score store.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Grid Snake starting...");

    if let Err(e) = grid_snake::web::run() {
        log::error!("Could not start Grid Snake: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;
    use grid_snake::game_loop::{
        LeaderboardDisplay, ManualScheduler, NameChoice, NamePrompt, RecordOutcome, ScoreDisplay,
    };
    use grid_snake::highscores::leaderboard_lines;
    use grid_snake::platform::{BlockingTransport, FileStorage};
    use grid_snake::renderer::DisplayList;
    use grid_snake::sim::{Direction, GridModel};
    use grid_snake::{
        GameConfig, GameLoop, LocalScoreStore, RemoteScoreStore, ScoreEntry, ScoreKeeper,
        ScoreStore, StorageBackend, TickResult,
    };

    #[derive(Parser)]
    #[command(name = "grid-snake", about = "Play a headless Grid Snake session")]
    pub struct Args {
        /// Name recorded on the leaderboard (empty saves as guest)
        #[arg(long, default_value = "")]
        name: String,
        /// Seed for a reproducible session
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many ticks
        #[arg(long, default_value_t = 2000)]
        max_ticks: u32,
        /// JSON config file
        #[arg(long, env = "GRID_SNAKE_CONFIG")]
        config: Option<PathBuf>,
        /// Directory for the local leaderboard
        #[arg(long, default_value = ".")]
        storage_dir: PathBuf,
    }

    struct LogScore;

    impl ScoreDisplay for LogScore {
        fn show_score(&mut self, score: u32) {
            log::debug!("Score: {}", score);
        }
    }

    struct LogLeaderboard;

    impl LeaderboardDisplay for LogLeaderboard {
        fn show_leaderboard(&self, entries: &[ScoreEntry]) {
            match leaderboard_lines(entries) {
                Some(lines) => {
                    println!("Leaderboard");
                    for line in lines {
                        println!("  {}", line);
                    }
                }
                None => println!("No scores yet"),
            }
        }
    }

    /// Answers the game-over prompt with the name given on the command line
    struct FixedName(String);

    impl NamePrompt for FixedName {
        async fn ask_name(&self, _score: u32) -> NameChoice {
            NameChoice::from_input(Some(&self.0))
        }
    }

    fn key_for(direction: Direction) -> &'static str {
        match direction {
            Direction::Up => "ArrowUp",
            Direction::Down => "ArrowDown",
            Direction::Left => "ArrowLeft",
            Direction::Right => "ArrowRight",
        }
    }

    /// Greedy step toward the target that avoids walls and the body
    pub(crate) fn autopilot(model: &GridModel) -> Option<Direction> {
        let head = model.actor.head();
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .into_iter()
            .filter(|d| !d.is_opposite(model.direction))
            .filter(|d| {
                let next = head + d.delta();
                model.board.contains(next) && !model.actor.contains(next)
            })
            .min_by_key(|d| {
                let next = head + d.delta();
                (next - model.target).abs().element_sum()
            })
    }

    pub fn run() {
        let args = Args::parse();
        env_logger::init();
        log::info!("Grid Snake (native) starting...");

        let mut config = GameConfig::load_from(args.config.as_deref());
        if args.seed.is_some() {
            config.seed = args.seed;
        }

        match config.storage.clone() {
            StorageBackend::Local { key } => {
                let storage = FileStorage::new(args.storage_dir.clone());
                let store = LocalScoreStore::with_key(storage, &key, &config.guest_name);
                play(config, store, &args);
            }
            StorageBackend::Remote { url } => {
                let store = RemoteScoreStore::with_guest(BlockingTransport::new(), &url, &config.guest_name);
                play(config, store, &args);
            }
        }
    }

    type HeadlessLoop = GameLoop<ManualScheduler, DisplayList, LogScore>;

    /// Drive a started session with the autopilot. `Some(score)` only when
    /// the session reached game over within `max_ticks`.
    pub(crate) fn drive(game: &mut HeadlessLoop, max_ticks: u32) -> Option<u32> {
        let mut ticks = 0;
        loop {
            if ticks >= max_ticks {
                log::info!("Stopped after {} ticks", ticks);
                game.stop();
                return None;
            }
            if let Some(direction) = game.model().and_then(autopilot) {
                game.key_down(key_for(direction));
            }
            ticks += 1;
            match game.tick() {
                TickResult::GameOver { score, reason } => {
                    log::info!("Game over ({:?}) after {} ticks", reason, ticks);
                    return Some(score);
                }
                TickResult::Continued { .. } => {}
                TickResult::Idle => return None,
            }
        }
    }

    fn play<St: ScoreStore>(config: GameConfig, store: St, args: &Args) {
        let mut game = GameLoop::new(config, ManualScheduler::new(), DisplayList::new(), LogScore);
        game.start(None);
        let final_score = drive(&mut game, args.max_ticks);

        let keeper = ScoreKeeper::new(store, FixedName(args.name.clone()), LogLeaderboard);
        let Some(final_score) = final_score else {
            // Unfinished sessions are never recorded
            println!("Session unfinished at score {}", game.score());
            pollster::block_on(keeper.refresh());
            return;
        };
        println!("Final score: {} ({} frames drawn)", final_score, game.surface().frames());
        if let RecordOutcome::Skipped = pollster::block_on(keeper.record(final_score)) {
            log::info!("Score not recorded");
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use grid_snake::LoopState;
        use grid_snake::sim::{Actor, BoardConfig};
        use glam::IVec2;

        fn model_heading(direction: Direction, target: IVec2) -> GridModel {
            let board = BoardConfig::new(8, 8, 10);
            let actor = Actor::from_segments([IVec2::new(2, 4), IVec2::new(3, 4)]).unwrap();
            GridModel::new(board, actor, target, direction).unwrap()
        }

        #[test]
        fn test_autopilot_heads_for_target() {
            let model = model_heading(Direction::Right, IVec2::new(3, 0));
            assert_eq!(autopilot(&model), Some(Direction::Up));
        }

        #[test]
        fn test_autopilot_never_reverses() {
            // Target is straight behind the head
            let model = model_heading(Direction::Right, IVec2::new(0, 4));
            let choice = autopilot(&model).unwrap();
            assert_ne!(choice, Direction::Left);
        }

        fn seeded_game() -> HeadlessLoop {
            let config = GameConfig {
                seed: Some(5),
                ..GameConfig::default()
            };
            let mut game = GameLoop::new(config, ManualScheduler::new(), DisplayList::new(), LogScore);
            game.start(None);
            game
        }

        #[test]
        fn test_unfinished_session_has_no_final_score() {
            let mut game = seeded_game();
            assert_eq!(drive(&mut game, 1), None);
            assert_eq!(game.state(), LoopState::Idle);

            // A stopped loop never reports a score either
            assert_eq!(drive(&mut game, 10), None);
        }

        #[test]
        fn test_score_reported_only_at_game_over() {
            let mut game = seeded_game();
            match drive(&mut game, 5_000) {
                Some(score) => {
                    assert_eq!(game.state(), LoopState::GameOver);
                    assert_eq!(score, game.score());
                }
                None => assert_eq!(game.state(), LoopState::Idle),
            }
        }

        #[test]
        fn test_autopilot_avoids_walls() {
            let board = BoardConfig::new(4, 4, 10);
            let actor = Actor::from_segments([IVec2::new(2, 0), IVec2::new(3, 0)]).unwrap();
            let model = GridModel::new(board, actor, IVec2::new(0, 3), Direction::Right).unwrap();
            assert_eq!(autopilot(&model), Some(Direction::Down));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}
