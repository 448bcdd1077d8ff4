//! Winner resolution for a single game.

use crate::{BracketError, Game, GameRef, Team};
use rand::Rng;

/// Probability that `team2` wins: `team1.seed / (team1.seed + team2.seed)`.
///
/// The numerator is team1's seed, so the weaker (numerically larger) team1
/// is, the likelier team2 is to win.
pub fn team2_win_probability(team1: &Team, team2: &Team) -> f64 {
    let s1 = f64::from(team1.seed);
    let s2 = f64::from(team2.seed);
    s1 / (s1 + s2)
}

/// Draw a winner for a playable game. Does not touch the game itself.
///
/// `at` is only used to label errors.
pub fn pick_winner<R: Rng>(
    game: &Game,
    at: GameRef,
    rng: &mut R,
) -> Result<Team, BracketError> {
    if game.is_decided() {
        return Err(BracketError::AlreadyDecided(at));
    }
    let (Some(team1), Some(team2)) = (&game.team1, &game.team2) else {
        return Err(BracketError::SlotEmpty(at));
    };

    let draw: f64 = rng.random();
    if draw < team2_win_probability(team1, team2) {
        Ok(team2.clone())
    } else {
        Ok(team1.clone())
    }
}

#[cfg(test)]
pub(crate) mod test_rng {
    use rand::RngCore;

    /// Always yields the same 64 bits, so `random::<f64>()` is constant.
    pub struct FixedRng(pub u64);

    impl FixedRng {
        /// `random::<f64>()` returns exactly 0.0.
        pub fn zero() -> Self {
            Self(0)
        }

        /// `random::<f64>()` returns the largest value below 1.0.
        pub fn just_below_one() -> Self {
            Self(u64::MAX)
        }
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            (self.0 >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for (i, byte) in dst.iter_mut().enumerate() {
                *byte = self.0.to_le_bytes()[i % 8];
            }
        }
    }
}
