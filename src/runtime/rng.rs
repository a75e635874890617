//! Random number generator which survives between turns.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde_support",
    derive(Deserialize, Serialize),
    serde(from = "RngPosition", into = "RngPosition")
)]
#[derive(Clone, Debug)]
/// Random number generator for dice rolls.
///
/// The generator is kept in the session state so that a session draws from a single
/// stream across turns. `ChaCha8Rng` is used since it can be seeded and its word position
/// can be read and restored, which is all that has to be stored to continue the stream.
pub struct StoryRng {
    pub(crate) generator: ChaCha8Rng,
    seed: u64,
}

impl Default for StoryRng {
    fn default() -> Self {
        let seed = ChaCha8Rng::from_entropy().next_u64();
        StoryRng::with_seed(seed)
    }
}

impl StoryRng {
    /// Create a generator from a seed.
    pub fn with_seed(seed: u64) -> Self {
        let mut generator = ChaCha8Rng::seed_from_u64(seed);
        generator.set_word_pos(0);

        StoryRng { generator, seed }
    }

    #[cfg(feature = "serde_support")]
    fn with_seed_and_position(seed: u64, position: u128) -> Self {
        let mut rng = Self::with_seed(seed);
        rng.generator.set_word_pos(position);

        rng
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl PartialEq for StoryRng {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed && self.generator.get_word_pos() == other.generator.get_word_pos()
    }
}

#[cfg(feature = "serde_support")]
#[derive(Clone, Copy, Deserialize, Serialize)]
#[serde(rename = "StoryRng")]
/// Stored form of a generator: the word position is all that changes after seeding.
struct RngPosition {
    seed: u64,
    // Word positions are u128, which not every format supports
    position: u64,
}

#[cfg(feature = "serde_support")]
impl From<StoryRng> for RngPosition {
    fn from(rng: StoryRng) -> Self {
        RngPosition {
            seed: rng.seed,
            position: rng.generator.get_word_pos() as u64,
        }
    }
}

#[cfg(feature = "serde_support")]
impl From<RngPosition> for StoryRng {
    fn from(stored: RngPosition) -> Self {
        StoryRng::with_seed_and_position(stored.seed, stored.position as u128)
    }
}
