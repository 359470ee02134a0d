use std::collections::BTreeSet;
use std::fmt;

use super::{BoardState, Color};
use crate::error::MoveError;

/// Largest die value a move can consume.
pub const MAX_MOVE_DISTANCE: u8 = 6;

/// A square a checker can move from: a numbered point or the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Square {
    Bar,
    Point(u8),
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Square::Bar => f.write_str("the bar"),
            Square::Point(p) => write!(f, "point {p}"),
        }
    }
}

/// A square a checker can land on: a numbered point or off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    Point(u8),
    Off,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Point(p) => write!(f, "point {p}"),
            Target::Off => f.write_str("off the board"),
        }
    }
}

/// One single-step checker move: a color, a source square and the die value
/// it consumes. The landing square is a pure function of these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub color: Color,
    pub from: Square,
    pub distance: u8,
}

impl Move {
    pub fn new(color: Color, from: Square, distance: u8) -> Self {
        Move {
            color,
            from,
            distance,
        }
    }

    /// Where this move lands, ignoring legality. White moves toward lower
    /// points and bears off past point 1; Black mirrors. Bar entries land
    /// in the opponent's home board, counted from the mover's far edge.
    pub fn target(&self) -> Target {
        let start = match (self.from, self.color) {
            (Square::Point(p), _) => i32::from(p),
            (Square::Bar, Color::White) => 25,
            (Square::Bar, Color::Black) => 0,
        };
        let step = match self.color {
            Color::White => -1,
            Color::Black => 1,
        };
        let landing = start + step * i32::from(self.distance);
        if (1..=24).contains(&landing) {
            Target::Point(landing as u8)
        } else {
            Target::Off
        }
    }

    /// Whether the move lands exactly on the bear-off edge rather than
    /// overshooting it.
    fn is_exact_bear_off(&self) -> bool {
        match (self.color, self.from) {
            (Color::White, Square::Point(p)) => p == self.distance,
            (Color::Black, Square::Point(p)) => p + self.distance == 25,
            (_, Square::Bar) => false,
        }
    }
}

/// The multiset of die values remaining in the current turn: two distinct
/// values from a regular roll, or four copies from doubles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiceAllotment {
    values: Vec<u8>,
}

impl DiceAllotment {
    /// Build the turn's allotment from a roll. Doubles grant four moves.
    ///
    /// # Panics
    /// Panics if either die is outside 1..=6; the dice supplier contract
    /// guarantees the range.
    pub fn from_roll(first: u8, second: u8) -> Self {
        assert!(
            (1..=MAX_MOVE_DISTANCE).contains(&first) && (1..=MAX_MOVE_DISTANCE).contains(&second),
            "die values must be in 1..=6, got ({first}, {second})"
        );
        let values = if first == second {
            vec![first; 4]
        } else {
            vec![first, second]
        };
        DiceAllotment { values }
    }

    /// An exhausted allotment.
    pub fn empty() -> Self {
        DiceAllotment { values: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn contains(&self, distance: u8) -> bool {
        self.values.contains(&distance)
    }

    /// Remaining die values, in the order they were rolled.
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Distinct remaining die values in ascending order.
    pub fn distinct(&self) -> Vec<u8> {
        let mut distinct: Vec<u8> = self.values.clone();
        distinct.sort_unstable();
        distinct.dedup();
        distinct
    }

    /// A new allotment with one copy of `distance` consumed.
    pub fn without(&self, distance: u8) -> Option<Self> {
        let index = self.values.iter().position(|&v| v == distance)?;
        let mut values = self.values.clone();
        values.remove(index);
        Some(DiceAllotment { values })
    }
}

/// The result of applying a single-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub state: BoardState,
    pub to: Target,
    pub hit: bool,
}

/// Where `color` could land moving one checker from `from` by `distance`,
/// or `None` if the step is illegal on this board.
///
/// Legality, in precedence order: a color with checkers on the bar may only
/// move from the bar; the source must hold one of the mover's checkers; a
/// point held by two or more opposing checkers is blocked; bearing off
/// requires all 15 checkers home, and an overshooting die additionally
/// requires no checker farther from the edge than the source.
pub fn legal_target(state: &BoardState, mv: Move) -> Option<Target> {
    if !(1..=MAX_MOVE_DISTANCE).contains(&mv.distance) {
        return None;
    }

    match mv.from {
        Square::Bar => {
            if state.bar_count(mv.color) == 0 {
                return None;
            }
        }
        Square::Point(p) => {
            if state.bar_count(mv.color) > 0 {
                return None;
            }
            if !(1..=24).contains(&p) || state.checkers_at(mv.color, p) == 0 {
                return None;
            }
        }
    }

    let target = mv.target();
    match target {
        Target::Point(t) => {
            if state.checkers_at(mv.color.opponent(), t) >= 2 {
                return None;
            }
        }
        Target::Off => {
            if state.checkers_in_home_board(mv.color) != 15 {
                return None;
            }
            let Square::Point(p) = mv.from else {
                return None;
            };
            if !mv.is_exact_bear_off() && state.checkers_further_from_home(mv.color, p) > 0 {
                return None;
            }
        }
    }
    Some(target)
}

/// All targets reachable in one step from `from` with any die still in the
/// allotment.
pub fn reachable_targets(
    state: &BoardState,
    color: Color,
    from: Square,
    dice: &DiceAllotment,
) -> BTreeSet<Target> {
    dice.distinct()
        .into_iter()
        .filter_map(|distance| legal_target(state, Move::new(color, from, distance)))
        .collect()
}

/// Whether some die in the allotment legally carries a checker from `from`
/// to `target`.
pub fn is_legal_target(
    state: &BoardState,
    color: Color,
    from: Square,
    target: Target,
    dice: &DiceAllotment,
) -> bool {
    distance_to_target(state, color, from, target, dice).is_some()
}

/// The smallest die in the allotment that legally carries a checker from
/// `from` to `target`. Distinct dice only coincide on a target when both
/// bear off, where the smaller (exact) die is preferred.
pub fn distance_to_target(
    state: &BoardState,
    color: Color,
    from: Square,
    target: Target,
    dice: &DiceAllotment,
) -> Option<u8> {
    dice.distinct()
        .into_iter()
        .find(|&distance| legal_target(state, Move::new(color, from, distance)) == Some(target))
}

/// Apply one single-step move, re-validating board legality defensively.
/// Removing the checker from its source, displacing a hit blot to the bar
/// and landing (or bearing off) happen as one atomic composition; on error
/// nothing changes.
///
/// Dice-membership is the caller's concern: the session checks and consumes
/// the die, and the search controls its own allotment.
pub fn apply_move(state: &BoardState, mv: Move) -> Result<AppliedMove, MoveError> {
    let target = legal_target(state, mv).ok_or(MoveError::IllegalMove {
        color: mv.color,
        from: mv.from,
        target: mv.target(),
    })?;

    let mut next = match mv.from {
        Square::Bar => state.with_checker_removed_from_bar(mv.color),
        Square::Point(p) => state.with_checker_removed(mv.color, p),
    };

    let mut hit = false;
    match target {
        Target::Point(t) => {
            let opponent = mv.color.opponent();
            if next.checkers_at(opponent, t) == 1 {
                next = next
                    .with_checker_removed(opponent, t)
                    .with_checker_added_to_bar(opponent);
                hit = true;
            }
            next = next.with_checker_added(mv.color, t);
        }
        Target::Off => {
            next = next.with_checker_borne_off(mv.color);
        }
    }

    Ok(AppliedMove {
        state: next,
        to: target,
        hit,
    })
}
