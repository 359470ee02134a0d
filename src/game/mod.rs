//! Core backgammon rules: board representation, single-move legality,
//! full-turn search, and the turn-orchestration state machine with
//! immutable transitions.

mod board;
mod color;
mod moves;
mod search;
mod session;

pub use board::{BoardState, CHECKERS_PER_COLOR, NUM_POINTS, STANDARD_LAYOUT};
pub use color::Color;
pub use moves::{
    apply_move, distance_to_target, is_legal_target, legal_target, reachable_targets, AppliedMove,
    DiceAllotment, Move, Square, Target, MAX_MOVE_DISTANCE,
};
pub use search::{legal_moves_from, moveable_positions, reachable_final_states, FinalState};
pub use session::{GameSession, SessionPhase, TurnView};
