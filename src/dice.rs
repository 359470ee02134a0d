use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

/// Supplier of dice rolls for a game session. Implementations must return
/// values in 1..=6.
pub trait DiceSource {
    fn roll(&mut self) -> (u8, u8);
}

/// Fair dice backed by a seedable RNG.
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    pub fn new() -> Self {
        RandomDice {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic dice for reproducible games.
    pub fn from_seed(seed: u64) -> Self {
        RandomDice {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDice {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceSource for RandomDice {
    fn roll(&mut self) -> (u8, u8) {
        (self.rng.random_range(1..=6), self.rng.random_range(1..=6))
    }
}

/// Replays a fixed sequence of rolls, then cycles back to the start.
/// Intended for tests and scripted scenarios.
pub struct ScriptedDice {
    rolls: Vec<(u8, u8)>,
    next: usize,
}

impl ScriptedDice {
    /// # Panics
    /// Panics if `rolls` is empty.
    pub fn new(rolls: Vec<(u8, u8)>) -> Self {
        assert!(!rolls.is_empty(), "scripted dice need at least one roll");
        ScriptedDice { rolls, next: 0 }
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> (u8, u8) {
        let roll = self.rolls[self.next % self.rolls.len()];
        self.next += 1;
        roll
    }
}
