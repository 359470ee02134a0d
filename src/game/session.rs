use std::collections::BTreeSet;

use tracing::{debug, info};

use super::moves::{self, DiceAllotment, Move, Square, Target};
use super::search::{self, FinalState};
use super::{BoardState, Color};
use crate::dice::DiceSource;
use crate::error::MoveError;
use crate::players::PlayerChannel;

/// Consecutive skip attempts before the session gives up. A legal position
/// cannot leave both colors without moves indefinitely, so exhausting this
/// bound means the board is internally inconsistent.
const MAX_TURN_SKIPS: u32 = 4;

/// Lifecycle of a session. Rolling happens inside the session (it owns the
/// dice source), so a turn goes straight from the previous turn's end to
/// awaiting the next move; the game ends when either color bears off its
/// fifteenth checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingMove,
    GameOver,
}

/// A read-only snapshot of the active turn handed to player channels:
/// the board, whose turn it is, and the dice still to play.
#[derive(Debug, Clone)]
pub struct TurnView {
    board: BoardState,
    color: Color,
    moves_left: DiceAllotment,
}

impl TurnView {
    pub fn new(board: BoardState, color: Color, moves_left: DiceAllotment) -> Self {
        TurnView {
            board,
            color,
            moves_left,
        }
    }

    pub fn board(&self) -> BoardState {
        self.board
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn moves_left(&self) -> &DiceAllotment {
        &self.moves_left
    }

    /// Sources with at least one legal single-step move.
    pub fn moveable_positions(&self) -> BTreeSet<Square> {
        search::moveable_positions(&self.board, self.color, &self.moves_left)
    }

    /// Legal single-step targets from one source.
    pub fn legal_targets(&self, from: Square) -> BTreeSet<Target> {
        moves::reachable_targets(&self.board, self.color, from, &self.moves_left)
    }

    /// Every maximal-dice final state reachable this turn.
    pub fn reachable_final_states(&self) -> Vec<FinalState> {
        search::reachable_final_states(&self.board, self.color, &self.moves_left)
    }
}

/// The game-level state machine: current board, whose turn it is, the dice
/// left to play, and the connected player channels. One session is one
/// game; all mutation happens through [`GameSession::apply_move`] and
/// [`GameSession::apply_final_state`], which keep the turn and termination
/// rules (bar re-entry, forced skips, win detection) enforced.
pub struct GameSession {
    board: BoardState,
    turn_color: Color,
    moves_left: DiceAllotment,
    dice: Box<dyn DiceSource>,
    phase: SessionPhase,
    moves_made: u32,
    white_channel: Option<Box<dyn PlayerChannel>>,
    black_channel: Option<Box<dyn PlayerChannel>>,
}

impl GameSession {
    /// Start a game from an arbitrary validated position. The first
    /// allotment is rolled immediately; if the starting color has no legal
    /// move the turn passes just as it would mid-game.
    pub fn new(board: BoardState, starting_color: Color, dice: Box<dyn DiceSource>) -> Self {
        let mut session = GameSession {
            board,
            turn_color: starting_color,
            moves_left: DiceAllotment::empty(),
            dice,
            phase: SessionPhase::AwaitingMove,
            moves_made: 0,
            white_channel: None,
            black_channel: None,
        };
        session.start_turn();
        session
    }

    /// Start a game from the standard opening position, White to move.
    pub fn new_standard(dice: Box<dyn DiceSource>) -> Self {
        Self::new(BoardState::standard_start(), Color::White, dice)
    }

    /// Register the channel playing `color`. Returns false if one is
    /// already connected.
    pub fn connect_player(&mut self, color: Color, channel: Box<dyn PlayerChannel>) -> bool {
        let slot = self.channel_slot(color);
        if slot.is_some() {
            return false;
        }
        info!(%color, player = channel.name(), "player connected");
        *slot = Some(channel);
        true
    }

    pub fn current_state(&self) -> BoardState {
        self.board
    }

    pub fn turn_color(&self) -> Color {
        self.turn_color
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The die values still to play this turn.
    pub fn moves_remaining(&self) -> &DiceAllotment {
        &self.moves_left
    }

    /// Count of single-step moves applied since the game started.
    pub fn moves_made(&self) -> u32 {
        self.moves_made
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// The color that has borne off all fifteen checkers, once one has.
    pub fn winner(&self) -> Option<Color> {
        [Color::White, Color::Black]
            .into_iter()
            .find(|&color| self.board.borne_off(color) == 15)
    }

    /// Sources from which `color` could legally move under the current
    /// allotment. For the non-active color this is advisory only; its
    /// moves are rejected with `WrongTurn`.
    pub fn moveable_positions(&self, color: Color) -> BTreeSet<Square> {
        search::moveable_positions(&self.board, color, &self.moves_left)
    }

    /// Legal single-step targets for `color` from one source, under the
    /// current allotment.
    pub fn legal_targets(&self, color: Color, from: Square) -> BTreeSet<Target> {
        moves::reachable_targets(&self.board, color, from, &self.moves_left)
    }

    /// Every maximal-dice final state the active color can reach this turn.
    pub fn reachable_final_states(&self) -> Vec<FinalState> {
        search::reachable_final_states(&self.board, self.turn_color, &self.moves_left)
    }

    /// A snapshot of the active turn for player channels.
    pub fn turn_view(&self) -> TurnView {
        TurnView::new(self.board, self.turn_color, self.moves_left.clone())
    }

    /// Apply one single-step move for `color` from `from` to `target`.
    ///
    /// The transition is atomic: on any error nothing changes. On success
    /// the consumed die leaves the allotment, connected channels are
    /// notified, and the turn advances (or the game ends) when the
    /// allotment is exhausted or no legal move remains.
    pub fn apply_move(
        &mut self,
        color: Color,
        from: Square,
        target: Target,
    ) -> Result<(), MoveError> {
        if self.phase == SessionPhase::GameOver {
            return Err(MoveError::GameOver);
        }
        if color != self.turn_color {
            return Err(MoveError::WrongTurn { color });
        }

        let distance = moves::distance_to_target(&self.board, color, from, target, &self.moves_left)
            .ok_or(MoveError::IllegalMove {
                color,
                from,
                target,
            })?;
        let applied = moves::apply_move(&self.board, Move::new(color, from, distance))?;

        self.board = applied.state;
        self.moves_left = self
            .moves_left
            .without(distance)
            .expect("distance came from the allotment");
        self.moves_made += 1;
        debug!(%color, %from, to = %applied.to, hit = applied.hit, "move applied");
        self.notify_move(color, from, applied.to);

        self.finish_move(color);
        Ok(())
    }

    /// Apply one of the final states enumerated by
    /// [`GameSession::reachable_final_states`] in bulk, as an automated
    /// player does after picking a full turn. The representative move
    /// sequence is replayed for channel notification only.
    pub fn apply_final_state(&mut self, color: Color, chosen: &FinalState) -> Result<(), MoveError> {
        if self.phase == SessionPhase::GameOver {
            return Err(MoveError::GameOver);
        }
        if color != self.turn_color {
            return Err(MoveError::WrongTurn { color });
        }

        let witness = search::reachable_final_states(&self.board, color, &self.moves_left)
            .into_iter()
            .find(|candidate| candidate.state == chosen.state)
            .ok_or(MoveError::IllegalFinalState { color })?;

        self.board = witness.state;
        self.moves_left = DiceAllotment::empty();
        self.moves_made += witness.moves.len() as u32;
        for mv in &witness.moves {
            debug!(color = %mv.color, from = %mv.from, to = %mv.target(), "move applied");
            self.notify_move(mv.color, mv.from, mv.target());
        }

        self.finish_move(color);
        Ok(())
    }

    /// Drive the game with the connected channels until it ends or
    /// `max_moves` single-step moves have been applied. Returns the winner,
    /// or `None` if the cap was hit first.
    ///
    /// # Panics
    /// Panics if a color without a connected channel comes to move.
    pub fn run(&mut self, max_moves: u32) -> Result<Option<Color>, MoveError> {
        for _ in 0..max_moves {
            if self.phase == SessionPhase::GameOver {
                break;
            }
            let view = self.turn_view();
            let color = self.turn_color;
            let mut channel = self
                .channel_slot(color)
                .take()
                .expect("a channel is connected for the active color");
            let (from, target) = channel.request_move(&view);
            *self.channel_slot(color) = Some(channel);
            self.apply_move(color, from, target)?;
        }
        Ok(self.winner())
    }

    fn channel_slot(&mut self, color: Color) -> &mut Option<Box<dyn PlayerChannel>> {
        match color {
            Color::White => &mut self.white_channel,
            Color::Black => &mut self.black_channel,
        }
    }

    fn notify_move(&mut self, color: Color, from: Square, to: Target) {
        if let Some(channel) = self.white_channel.as_mut() {
            channel.on_move_applied(color, from, to);
        }
        if let Some(channel) = self.black_channel.as_mut() {
            channel.on_move_applied(color, from, to);
        }
    }

    /// Post-move bookkeeping shared by single-step and bulk application:
    /// detect the win, otherwise hand the turn over once the mover is out
    /// of usable dice.
    fn finish_move(&mut self, color: Color) {
        if self.board.borne_off(color) == 15 {
            self.phase = SessionPhase::GameOver;
            info!(winner = %color, moves_made = self.moves_made, "game over");
            return;
        }

        if self.moves_left.is_empty()
            || search::moveable_positions(&self.board, self.turn_color, &self.moves_left).is_empty()
        {
            self.turn_color = self.turn_color.opponent();
            self.start_turn();
        }
    }

    /// Roll a fresh allotment for the color to move, skipping colors with
    /// no legal move. Bounded: a position blocking both colors across
    /// consecutive rolls is not reachable through legal play.
    fn start_turn(&mut self) {
        for _ in 0..MAX_TURN_SKIPS {
            let (first, second) = self.dice.roll();
            self.moves_left = DiceAllotment::from_roll(first, second);
            if !search::moveable_positions(&self.board, self.turn_color, &self.moves_left)
                .is_empty()
            {
                info!(color = %self.turn_color, dice = ?self.moves_left.values(), "turn started");
                return;
            }
            info!(color = %self.turn_color, dice = ?self.moves_left.values(), "no legal moves, turn skipped");
            self.turn_color = self.turn_color.opponent();
        }
        panic!("internal consistency error: neither color has a legal move");
    }
}
