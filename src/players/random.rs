use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::PlayerChannel;
use crate::game::{Square, Target, TurnView};

/// A player that picks uniformly at random from the legal single-step
/// moves of its turn.
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new() -> Self {
        RandomPlayer {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        RandomPlayer {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerChannel for RandomPlayer {
    fn name(&self) -> &str {
        "Random"
    }

    fn request_move(&mut self, view: &TurnView) -> (Square, Target) {
        let steps: Vec<(Square, Target)> = view
            .moveable_positions()
            .into_iter()
            .flat_map(|from| {
                view.legal_targets(from)
                    .into_iter()
                    .map(move |target| (from, target))
            })
            .collect();
        assert!(!steps.is_empty(), "no legal moves available");
        steps[self.rng.random_range(0..steps.len())]
    }
}
