use std::collections::{BTreeSet, HashSet};

use super::moves::{self, DiceAllotment, Move, Square, Target};
use super::{BoardState, Color};

/// A board position reachable by playing out the turn's dice as far as the
/// rules permit, together with one move sequence that produces it. Distinct
/// orderings reaching the same board are collapsed to a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalState {
    pub state: BoardState,
    pub moves: Vec<Move>,
}

/// Every distinct final state reachable from `state` by `color` with the
/// given allotment.
///
/// A player must use as many dice as the position permits, so only leaves
/// whose sequences consume the maximal number of dice are kept; ties are
/// all returned so the player layer can choose among them. A position with
/// no legal move at all yields exactly the root state with an empty
/// sequence: the turn is forced to pass.
pub fn reachable_final_states(
    state: &BoardState,
    color: Color,
    dice: &DiceAllotment,
) -> Vec<FinalState> {
    let mut leaves = Vec::new();
    let mut sequence = Vec::new();
    explore(state, color, dice, &mut sequence, &mut leaves);

    let max_moves = leaves.iter().map(|leaf| leaf.moves.len()).max().unwrap_or(0);

    let mut seen = HashSet::new();
    leaves
        .into_iter()
        .filter(|leaf| leaf.moves.len() == max_moves)
        .filter(|leaf| seen.insert(leaf.state))
        .collect()
}

fn explore(
    state: &BoardState,
    color: Color,
    dice: &DiceAllotment,
    sequence: &mut Vec<Move>,
    leaves: &mut Vec<FinalState>,
) {
    let steps = legal_steps(state, color, dice);
    if steps.is_empty() {
        leaves.push(FinalState {
            state: *state,
            moves: sequence.clone(),
        });
        return;
    }

    for mv in steps {
        // Legality was just established, so the application cannot fail.
        let applied = moves::apply_move(state, mv).unwrap();
        let remaining = dice.without(mv.distance).unwrap();
        sequence.push(mv);
        explore(&applied.state, color, &remaining, sequence, leaves);
        sequence.pop();
    }
}

/// All legal single-step moves for `color`, one per (source, die value)
/// pair. With checkers on the bar this is at most one source; doubles
/// contribute one entry per source, not four.
fn legal_steps(state: &BoardState, color: Color, dice: &DiceAllotment) -> Vec<Move> {
    let mut steps = Vec::new();
    for from in candidate_sources(state, color) {
        for distance in dice.distinct() {
            let mv = Move::new(color, from, distance);
            if moves::legal_target(state, mv).is_some() {
                steps.push(mv);
            }
        }
    }
    steps
}

fn candidate_sources(state: &BoardState, color: Color) -> Vec<Square> {
    if state.bar_count(color) > 0 {
        return vec![Square::Bar];
    }
    (1..=24)
        .filter(|&p| state.checkers_at(color, p) > 0)
        .map(Square::Point)
        .collect()
}

/// Sources from which `color` has at least one legal single-step move.
pub fn moveable_positions(
    state: &BoardState,
    color: Color,
    dice: &DiceAllotment,
) -> BTreeSet<Square> {
    legal_steps(state, color, dice)
        .into_iter()
        .map(|mv| mv.from)
        .collect()
}

/// Single-ply targets from one source, for UI highlighting.
pub fn legal_moves_from(
    state: &BoardState,
    color: Color,
    from: Square,
    dice: &DiceAllotment,
) -> BTreeSet<Target> {
    moves::reachable_targets(state, color, from, dice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{NUM_POINTS, STANDARD_LAYOUT};

    fn board(
        points: [i8; NUM_POINTS],
        white_bar: u8,
        white_off: u8,
        black_bar: u8,
        black_off: u8,
    ) -> BoardState {
        BoardState::new(points, white_bar, white_off, black_bar, black_off).unwrap()
    }

    fn checker_total(state: &BoardState, color: Color) -> u32 {
        let on_points: u32 = (1..=24).map(|p| u32::from(state.checkers_at(color, p))).sum();
        on_points + u32::from(state.bar_count(color)) + u32::from(state.borne_off(color))
    }

    #[test]
    fn test_opening_moveable_positions() {
        let start = BoardState::standard_start();
        let dice = DiceAllotment::from_roll(3, 5);
        let moveable = moveable_positions(&start, Color::White, &dice);
        let expected: BTreeSet<Square> = [
            Square::Point(6),
            Square::Point(8),
            Square::Point(13),
            Square::Point(24),
        ]
        .into_iter()
        .collect();
        assert_eq!(moveable, expected);
    }

    #[test]
    fn test_regular_roll_uses_both_dice() {
        let start = BoardState::standard_start();
        let dice = DiceAllotment::from_roll(3, 5);
        let finals = reachable_final_states(&start, Color::White, &dice);
        assert!(!finals.is_empty());
        for leaf in &finals {
            assert_eq!(leaf.moves.len(), 2);
            assert_eq!(checker_total(&leaf.state, Color::White), 15);
            assert_eq!(checker_total(&leaf.state, Color::Black), 15);
        }
    }

    #[test]
    fn test_doubles_use_four_dice() {
        let start = BoardState::standard_start();
        let dice = DiceAllotment::from_roll(4, 4);
        let finals = reachable_final_states(&start, Color::White, &dice);
        assert!(!finals.is_empty());
        for leaf in &finals {
            assert_eq!(leaf.moves.len(), 4);
            assert!(leaf.moves.iter().all(|mv| mv.distance == 4));
        }
    }

    #[test]
    fn test_final_states_are_distinct() {
        let start = BoardState::standard_start();
        let dice = DiceAllotment::from_roll(3, 5);
        let finals = reachable_final_states(&start, Color::White, &dice);
        let unique: HashSet<BoardState> = finals.iter().map(|leaf| leaf.state).collect();
        assert_eq!(unique.len(), finals.len());
    }

    #[test]
    fn test_witness_sequences_replay_to_their_state() {
        let start = BoardState::standard_start();
        let dice = DiceAllotment::from_roll(6, 2);
        for leaf in reachable_final_states(&start, Color::White, &dice) {
            let mut replayed = start;
            for mv in &leaf.moves {
                replayed = moves::apply_move(&replayed, *mv).unwrap().state;
            }
            assert_eq!(replayed, leaf.state);
        }
    }

    #[test]
    fn test_fully_blocked_turn_passes() {
        // White is closed out: one checker on the bar and every entry point
        // held by two or more Black checkers.
        let mut points = [0i8; NUM_POINTS];
        for p in 19..=24 {
            points[p - 1] = -2;
        }
        points[0] = -3;
        points[5] = 14;
        let state = board(points, 1, 0, 0, 0);
        let dice = DiceAllotment::from_roll(3, 5);

        assert!(moveable_positions(&state, Color::White, &dice).is_empty());
        let finals = reachable_final_states(&state, Color::White, &dice);
        assert_eq!(finals.len(), 1);
        assert_eq!(finals[0].state, state);
        assert!(finals[0].moves.is_empty());
    }

    #[test]
    fn test_no_leaf_has_a_playable_die_left_over() {
        // Black anchors leave White only 7 -> 2 with the 5; the 1 is then
        // dead (1, 3 and 6 are all held).
        let mut points = [0i8; NUM_POINTS];
        points[1] = 1;
        points[6] = 14;
        points[0] = -2;
        points[2] = -2;
        points[3] = -2;
        points[4] = -2;
        points[5] = -2;
        points[11] = -2;
        points[16] = -3;
        let state = board(points, 0, 0, 0, 0);
        let dice = DiceAllotment::from_roll(1, 5);

        let finals = reachable_final_states(&state, Color::White, &dice);
        let max_len = finals[0].moves.len();
        assert!(finals.iter().all(|leaf| leaf.moves.len() == max_len));
        for leaf in &finals {
            let mut remaining = dice.clone();
            for mv in &leaf.moves {
                remaining = remaining.without(mv.distance).unwrap();
            }
            assert!(moveable_positions(&leaf.state, Color::White, &remaining).is_empty());
        }
    }

    #[test]
    fn test_short_sequences_are_discarded_when_longer_exist() {
        // Both the 24- and 13-checkers can play the 2, but only the
        // 24 -> 22 -> 17 line also plays the 5; the one-move 13 -> 11 leaf
        // must not survive.
        let mut points = [0i8; NUM_POINTS];
        points[23] = 1; // White on 24
        points[12] = 1; // White on 13
        points[0] = 13; // immobile: bear-off is gated until everyone is home
        points[18] = -2; // Black holds 19 (blocks 24 with the 5)
        points[7] = -2; // Black holds 8 (blocks 13 with the 5)
        points[5] = -2; // Black holds 6 (blocks 11 with the 5)
        points[19] = -9;
        let state = board(points, 0, 0, 0, 0);
        let dice = DiceAllotment::from_roll(2, 5);

        let finals = reachable_final_states(&state, Color::White, &dice);
        assert_eq!(finals.len(), 1);
        assert_eq!(finals[0].moves.len(), 2);
        assert_eq!(
            finals[0].moves,
            vec![
                Move::new(Color::White, Square::Point(24), 2),
                Move::new(Color::White, Square::Point(22), 5),
            ]
        );
    }

    #[test]
    fn test_bar_moves_come_first() {
        let mut points = STANDARD_LAYOUT;
        points[23] = 1;
        let state = board(points, 1, 0, 0, 0);
        let dice = DiceAllotment::from_roll(2, 4);
        let moveable = moveable_positions(&state, Color::White, &dice);
        assert_eq!(moveable.into_iter().collect::<Vec<_>>(), vec![Square::Bar]);

        // Every witness sequence enters from the bar before anything else.
        for leaf in reachable_final_states(&state, Color::White, &dice) {
            assert_eq!(leaf.moves[0].from, Square::Bar);
        }
    }

    #[test]
    fn test_legal_moves_from_matches_single_ply() {
        let start = BoardState::standard_start();
        let dice = DiceAllotment::from_roll(3, 5);
        let targets = legal_moves_from(&start, Color::White, Square::Point(13), &dice);
        let expected: BTreeSet<Target> =
            [Target::Point(10), Target::Point(8)].into_iter().collect();
        assert_eq!(targets, expected);
    }
}
