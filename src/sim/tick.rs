//! Fixed-interval simulation step
//!
//! Advances a `GridModel` by one cell per tick: commit the pending direction,
//! move the head, check walls and self collision, then grow or slide.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Actor, BoardConfig, Direction, EndReason, GamePhase, GridModel, Position};

/// Random samples tried before falling back to enumerating free cells
pub const TARGET_SAMPLE_ATTEMPTS: usize = 64;

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Session keeps running. `scored` is set when the target was consumed.
    Continue { scored: bool },
    /// Session ended on this step (or had already ended)
    GameOver(EndReason),
}

/// One session's simulation: the model plus its seeded RNG and phase
#[derive(Debug, Clone)]
pub struct Simulation {
    model: GridModel,
    phase: GamePhase,
    rng: Pcg32,
    /// Steps taken so far
    pub time_ticks: u64,
}

impl Simulation {
    /// Fresh session: centred two-segment actor heading right, score 0,
    /// target on a random free cell. `None` when the board has no cell to
    /// spare for the target.
    pub fn new(board: BoardConfig, seed: u64) -> Option<Self> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let actor = Actor::centered(&board);
        let target = place_target(&mut rng, &board, &actor)?;
        let model = GridModel::new(board, actor, target, Direction::Right)?;
        Some(Self {
            model,
            phase: GamePhase::Running,
            rng,
            time_ticks: 0,
        })
    }

    /// Resume from an explicit model (used by tests and replays)
    pub fn from_model(model: GridModel, seed: u64) -> Self {
        Self {
            model,
            phase: GamePhase::Running,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
        }
    }

    pub fn model(&self) -> &GridModel {
        &self.model
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn score(&self) -> u32 {
        self.model.score
    }

    /// Forward an input request to the pending slot
    pub fn set_pending_direction(&mut self, direction: Direction) -> bool {
        self.model.set_pending_direction(direction)
    }

    /// Advance the session by one tick
    pub fn step(&mut self) -> StepOutcome {
        if let GamePhase::GameOver(reason) = self.phase {
            return StepOutcome::GameOver(reason);
        }
        self.time_ticks += 1;

        let model = &mut self.model;
        model.direction = model.pending_direction;
        let next_head = model.actor.head() + model.direction.delta();

        if !model.board.contains(next_head) {
            return self.end(EndReason::WallCollision);
        }
        // The tail still occupies its cell during this check
        if model.actor.contains(next_head) {
            return self.end(EndReason::SelfCollision);
        }

        model.actor.push_head(next_head);

        if next_head != model.target {
            model.actor.drop_tail();
            return StepOutcome::Continue { scored: false };
        }

        model.score += 1;
        log::debug!(
            "Target consumed at ({}, {}). Score: {}",
            next_head.x,
            next_head.y,
            model.score
        );
        match place_target(&mut self.rng, &model.board, &model.actor) {
            Some(target) => {
                model.target = target;
                StepOutcome::Continue { scored: true }
            }
            None => self.end(EndReason::BoardFull),
        }
    }

    fn end(&mut self, reason: EndReason) -> StepOutcome {
        self.phase = GamePhase::GameOver(reason);
        log::info!(
            "Session over after {} ticks: {:?}, score {}",
            self.time_ticks,
            reason,
            self.model.score
        );
        StepOutcome::GameOver(reason)
    }
}

/// Pick a uniformly random cell not covered by the actor.
///
/// Rejection sampling first; if that keeps hitting the actor, choose among the
/// enumerated free cells instead. `None` means the board is full.
pub fn place_target(rng: &mut Pcg32, board: &BoardConfig, actor: &Actor) -> Option<Position> {
    if board.cols <= 0 || board.rows <= 0 {
        return None;
    }

    for _ in 0..TARGET_SAMPLE_ATTEMPTS {
        let pos = Position::new(rng.random_range(0..board.cols), rng.random_range(0..board.rows));
        if !actor.contains(pos) {
            return Some(pos);
        }
    }

    let free: Vec<Position> = (0..board.rows)
        .flat_map(|y| (0..board.cols).map(move |x| Position::new(x, y)))
        .filter(|pos| !actor.contains(*pos))
        .collect();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.random_range(0..free.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn board() -> BoardConfig {
        BoardConfig::new(16, 16, 24)
    }

    fn sim_with(segments: &[(i32, i32)], target: (i32, i32), direction: Direction) -> Simulation {
        let actor = Actor::from_segments(segments.iter().map(|&(x, y)| Position::new(x, y))).unwrap();
        let model = GridModel::new(board(), actor, Position::new(target.0, target.1), direction).unwrap();
        Simulation::from_model(model, 7)
    }

    fn body(sim: &Simulation) -> Vec<(i32, i32)> {
        sim.model().actor.segments().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn test_slides_without_scoring() {
        let mut sim = sim_with(&[(6, 8), (7, 8)], (0, 0), Direction::Right);
        for _ in 0..3 {
            assert_eq!(sim.step(), StepOutcome::Continue { scored: false });
        }
        assert_eq!(body(&sim), vec![(9, 8), (10, 8)]);
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.time_ticks, 3);
    }

    #[test]
    fn test_wall_collision() {
        let mut sim = sim_with(&[(1, 8), (0, 8)], (5, 5), Direction::Left);
        assert_eq!(sim.step(), StepOutcome::GameOver(EndReason::WallCollision));
        assert_eq!(sim.phase(), GamePhase::GameOver(EndReason::WallCollision));
        // No mutation on the losing step
        assert_eq!(body(&sim), vec![(1, 8), (0, 8)]);
        // Further steps keep reporting the same end
        assert_eq!(sim.step(), StepOutcome::GameOver(EndReason::WallCollision));
    }

    #[test]
    fn test_self_collision() {
        // Hook shape: head at (5,5) turning down into (5,6)
        let mut sim = sim_with(
            &[(4, 7), (5, 7), (5, 6), (4, 6), (4, 5), (5, 5)],
            (0, 0),
            Direction::Right,
        );
        sim.set_pending_direction(Direction::Down);
        assert_eq!(sim.step(), StepOutcome::GameOver(EndReason::SelfCollision));
    }

    #[test]
    fn test_moving_into_tail_cell_collides() {
        // 2x2 loop: next head is the current tail
        let mut sim = sim_with(&[(5, 6), (5, 5), (6, 5), (6, 6)], (0, 0), Direction::Down);
        sim.set_pending_direction(Direction::Left);
        assert_eq!(sim.step(), StepOutcome::GameOver(EndReason::SelfCollision));
    }

    #[test]
    fn test_consumption_grows_and_replaces_target() {
        let mut sim = sim_with(&[(6, 8), (7, 8)], (8, 8), Direction::Right);
        assert_eq!(sim.step(), StepOutcome::Continue { scored: true });
        assert_eq!(sim.score(), 1);
        assert_eq!(body(&sim), vec![(6, 8), (7, 8), (8, 8)]);
        let model = sim.model();
        assert!(model.board.contains(model.target));
        assert!(!model.actor.contains(model.target));
    }

    #[test]
    fn test_reverse_request_ignored_on_next_step() {
        let mut sim = sim_with(&[(6, 5), (6, 6)], (0, 0), Direction::Down);
        assert!(!sim.set_pending_direction(Direction::Up));
        sim.step();
        assert_eq!(sim.model().direction, Direction::Down);
        assert_eq!(sim.model().actor.head(), Position::new(6, 7));
    }

    #[test]
    fn test_last_write_wins_between_ticks() {
        let mut sim = sim_with(&[(6, 8), (7, 8)], (0, 0), Direction::Right);
        sim.set_pending_direction(Direction::Up);
        sim.set_pending_direction(Direction::Down);
        sim.step();
        assert_eq!(sim.model().direction, Direction::Down);
        assert_eq!(sim.model().actor.head(), Position::new(7, 9));
    }

    #[test]
    fn test_filling_the_board_ends_as_board_full() {
        // 2x1 board: the actor needs one more cell to cover everything
        let board = BoardConfig::new(3, 1, 10);
        let actor = Actor::from_segments([Position::new(0, 0), Position::new(1, 0)]).unwrap();
        let model = GridModel::new(board, actor, Position::new(2, 0), Direction::Right).unwrap();
        let mut sim = Simulation::from_model(model, 1);
        assert_eq!(sim.step(), StepOutcome::GameOver(EndReason::BoardFull));
        assert_eq!(sim.score(), 1);
    }

    #[test]
    fn test_place_target_finds_last_free_cell() {
        let board = BoardConfig::new(4, 4, 10);
        let free = Position::new(2, 3);
        let actor = Actor::from_segments(
            (0..4)
                .flat_map(|y| (0..4).map(move |x| Position::new(x, y)))
                .filter(|p| *p != free),
        )
        .unwrap();
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(place_target(&mut rng, &board, &actor), Some(free));
    }

    #[test]
    fn test_new_session_is_deterministic() {
        let a = Simulation::new(board(), 4242).unwrap();
        let b = Simulation::new(board(), 4242).unwrap();
        assert_eq!(a.model().target, b.model().target);
        assert!(a.is_running());
        assert_eq!(a.score(), 0);
        assert_eq!(a.model().actor.len(), 2);
    }

    #[test]
    fn test_board_without_room_has_no_session() {
        // Two cells, both taken by the starting actor
        assert!(Simulation::new(BoardConfig::new(2, 1, 10), 1).is_none());
        let sim = Simulation::new(BoardConfig::new(2, 2, 10), 1).unwrap();
        assert!(!sim.model().actor.contains(sim.model().target));
    }

    fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn prop_growth_and_no_overlap(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(proptest::option::of(direction_strategy()), 1..200),
        ) {
            let mut sim = Simulation::new(BoardConfig::new(8, 8, 10), seed).unwrap();
            let initial_len = sim.model().actor.len();
            for input in inputs {
                if let Some(direction) = input {
                    sim.set_pending_direction(direction);
                }
                let outcome = sim.step();
                let model = sim.model();
                prop_assert_eq!(model.actor.len(), initial_len + model.score as usize);
                if let StepOutcome::GameOver(_) = outcome {
                    break;
                }
                let mut seen = std::collections::HashSet::new();
                for segment in model.actor.segments() {
                    prop_assert!(seen.insert(segment));
                    prop_assert!(model.board.contains(segment));
                }
                prop_assert!(model.board.contains(model.target));
                prop_assert!(!model.actor.contains(model.target));
            }
        }

        #[test]
        fn prop_reverse_never_applies(seed in any::<u64>(), direction in direction_strategy()) {
            let mut sim = Simulation::new(BoardConfig::new(16, 16, 24), seed).unwrap();
            sim.set_pending_direction(direction);
            sim.step();
            if sim.is_running() {
                let current = sim.model().direction;
                prop_assert!(!sim.set_pending_direction(current.reverse()));
                sim.step();
                prop_assert_eq!(sim.model().direction, current);
            }
        }
    }
}
