//! Deterministic grid simulation
//!
//! All gameplay logic lives here. The module is pure:
//! - One cell per tick
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod state;
pub mod tick;

pub use state::{Actor, BoardConfig, Direction, EndReason, GamePhase, GridModel, Position};
pub use tick::{Simulation, StepOutcome, TARGET_SAMPLE_ATTEMPTS, place_target};
