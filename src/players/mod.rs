//! The player seam: game sessions notify connected channels of applied
//! moves and ask the active color's channel for its next move. Decision
//! logic (human input, AI strategy) lives behind this trait, outside the
//! rules engine.

mod random;

pub use random::RandomPlayer;

use crate::game::{Color, Square, Target, TurnView};

/// Interface between a game session and whatever decides a color's moves.
pub trait PlayerChannel {
    /// Return the channel's display name.
    fn name(&self) -> &str;

    /// Called after every applied move, including moves replayed from a
    /// bulk final-state application and the opponent's moves.
    fn on_move_applied(&mut self, _color: Color, _from: Square, _to: Target) {}

    /// Supply the next move for the active color. The session calls this
    /// only while at least one legal move exists; an illegal answer is
    /// rejected by the session and surfaces as an error to whoever drives
    /// the game, which owns any re-prompt policy.
    fn request_move(&mut self, view: &TurnView) -> (Square, Target);
}
