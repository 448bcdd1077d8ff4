//! Randomized-order driver. Playable games are queued in shuffled order, so
//! the bracket fills in across both sides in no fixed sequence. The queue is
//! only rescanned once it runs dry.

use crate::engine::pick_winner;
use crate::{Advancement, Bracket, BracketError, GameRef, Team, TeamInfo, TeamKey};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// One resolved game.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub game: GameRef,
    pub winner: Team,
    pub advanced_to: Option<Advancement>,
}

/// What a call to [`Simulation::advance_generation`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// No run in progress; nothing changed.
    Idle,
    /// `resolved` is `None` when the active game was no longer playable.
    Advanced { resolved: Option<Resolution>, next: GameRef },
    /// The run ended on this step.
    Finished { resolved: Option<Resolution> },
}

impl Step {
    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            Step::Advanced { resolved, .. } | Step::Finished { resolved } => resolved.as_ref(),
            Step::Idle => None,
        }
    }
}

/// Owns a bracket and the state of the run being played on it.
///
/// Consumers read state through the accessors; it only changes through
/// `update_team_info`, `generate_bracket`, `advance_generation` and
/// `reset_bracket`.
#[derive(Debug)]
pub struct Simulation<R = StdRng> {
    bracket: Bracket,
    is_generating: bool,
    pending: Vec<GameRef>,
    active: Option<GameRef>,
    rng: R,
}

impl Simulation<StdRng> {
    pub fn new(bracket: Bracket) -> Self {
        Self::with_rng(bracket, StdRng::from_os_rng())
    }

    /// Same seed, same bracket in, same results out.
    pub fn seeded(bracket: Bracket, seed: u64) -> Self {
        Self::with_rng(bracket, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    pub fn with_rng(bracket: Bracket, rng: R) -> Self {
        Self { bracket, is_generating: false, pending: Vec::new(), active: None, rng }
    }

    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    /// The game the next step will resolve.
    pub fn active_game(&self) -> Option<GameRef> {
        self.active
    }

    /// Games queued behind the active one, in no meaningful order.
    pub fn pending_games(&self) -> &[GameRef] {
        &self.pending
    }

    pub fn champion(&self) -> Option<&Team> {
        self.bracket.champion()
    }

    /// Change a team's decoration without disturbing the run.
    pub fn update_team_info(&mut self, key: TeamKey, info: TeamInfo) -> Result<&Team, BracketError> {
        debug!("updating team {key}");
        self.bracket.update_team(key, &info)
    }

    /// Start a run: queue every playable game in shuffled order and activate
    /// one of them. Returns the active game, or `None` if nothing is left to
    /// play.
    pub fn generate_bracket(&mut self) -> Option<GameRef> {
        let queued = self.refill_queue();
        self.is_generating = queued;
        if queued {
            info!("bracket generation started with {} games queued", self.pending.len() + 1);
        } else {
            info!("nothing left to play");
        }
        self.active
    }

    /// Resolve the active game, push its winner forward, and pick the next
    /// active game.
    pub fn advance_generation(&mut self) -> Step {
        if !self.is_generating {
            return Step::Idle;
        }

        let Some(at) = self.active.filter(|at| self.bracket.game(*at).is_some()) else {
            warn!("active game {:?} is outside the bracket, stopping", self.active);
            self.finish();
            return Step::Finished { resolved: None };
        };

        let resolved = self.resolve(at);

        if let Some(next) = self.pending.pop() {
            self.active = Some(next);
            return Step::Advanced { resolved, next };
        }
        if self.refill_queue()
            && let Some(next) = self.active
        {
            return Step::Advanced { resolved, next };
        }

        self.finish();
        if let Some(champion) = self.bracket.champion() {
            info!("bracket complete, champion: {}", champion.display_name());
        }
        Step::Finished { resolved }
    }

    /// Back to the freshly built layout: first-round pairings stay, every
    /// result and the run state are cleared. Decoration is kept.
    pub fn reset_bracket(&mut self) {
        self.bracket.clear_results();
        self.is_generating = false;
        self.pending.clear();
        self.active = None;
        info!("bracket reset");
    }

    /// Generate and step until the run ends. Returns the champion.
    pub fn run_to_completion(&mut self) -> Option<&Team> {
        self.generate_bracket();
        while !matches!(self.advance_generation(), Step::Finished { .. } | Step::Idle) {}
        self.bracket.champion()
    }

    fn resolve(&mut self, at: GameRef) -> Option<Resolution> {
        let game = self.bracket.game(at)?;
        if !game.is_playable() {
            debug!("skipping {at}: no longer playable");
            return None;
        }
        let winner = match pick_winner(game, at, &mut self.rng) {
            Ok(winner) => winner,
            Err(e) => {
                warn!("could not resolve {at}: {e}");
                return None;
            }
        };
        match self.bracket.record_winner(at, winner.clone()) {
            Ok(advanced_to) => {
                debug!(
                    "{} won {} ({})",
                    winner.display_name(),
                    self.bracket.game(at).map(|g| g.id.as_str()).unwrap_or("?"),
                    at
                );
                Some(Resolution { game: at, winner, advanced_to })
            }
            Err(e) => {
                warn!("could not record winner for {at}: {e}");
                None
            }
        }
    }

    /// Rescan for playable games, shuffle them, and activate one. Returns
    /// false when there is nothing to play.
    fn refill_queue(&mut self) -> bool {
        let mut playable = self.bracket.playable_games();
        playable.shuffle(&mut self.rng);
        self.active = playable.pop();
        self.pending = playable;
        self.active.is_some()
    }

    fn finish(&mut self) {
        self.is_generating = false;
        self.active = None;
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_rng::FixedRng;
    use crate::{Region, RoundKind, Side};
    use std::collections::HashSet;

    fn sim(seed: u64) -> Simulation {
        Simulation::seeded(Bracket::standard().unwrap(), seed)
    }

    #[test_log::test]
    fn full_run_resolves_every_game_once() {
        let mut sim = sim(7);
        let first = sim.generate_bracket().expect("first round is playable");
        assert!(sim.is_generating());
        assert_eq!(sim.bracket().round(first.round).unwrap().kind, RoundKind::First);
        assert_eq!(sim.pending_games().len(), 31);

        let mut seen = HashSet::new();
        let mut steps = 0;
        loop {
            let step = sim.advance_generation();
            steps += 1;
            if let Some(res) = step.resolution() {
                assert!(seen.insert(res.game), "{} resolved twice", res.game);
            }
            if let Step::Finished { .. } = step {
                break;
            }
            assert!(steps < 1000, "run did not terminate");
        }

        assert_eq!(seen.len(), 63);
        assert_eq!(steps, 63);
        assert!(!sim.is_generating());
        assert!(sim.active_game().is_none());
        assert!(sim.pending_games().is_empty());
        assert!(sim.champion().is_some());
        assert_eq!(sim.bracket().decided_count(), 63);
        assert!(sim.bracket().playable_games().is_empty());
    }

    #[test_log::test]
    fn winners_always_come_from_their_game() {
        let mut sim = sim(99);
        sim.generate_bracket();
        while let Step::Advanced { resolved, .. } | Step::Finished { resolved } = sim.advance_generation() {
            let Some(res) = resolved else { continue };
            let game = sim.bracket().game(res.game).unwrap();
            assert!(game.involves(&res.winner));
            assert_eq!(game.winner.as_ref(), Some(&res.winner));
            if let Some(edge) = res.advanced_to {
                let target = sim.bracket().game(GameRef::new(edge.round, edge.game)).unwrap();
                assert_eq!(target.team(edge.slot), Some(&res.winner));
            }
            if !sim.is_generating() {
                break;
            }
        }
        assert!(sim.champion().is_some());
    }

    #[test]
    fn idle_until_generated() {
        let mut sim = sim(1);
        let before = sim.bracket().clone();
        assert_eq!(sim.advance_generation(), Step::Idle);
        assert_eq!(sim.bracket(), &before);
        assert!(sim.active_game().is_none());

        sim.run_to_completion();
        let done = sim.bracket().clone();
        assert_eq!(sim.advance_generation(), Step::Idle);
        assert_eq!(sim.bracket(), &done);
    }

    #[test]
    fn queue_drains_before_later_rounds_are_scanned() {
        let mut sim = sim(3);
        sim.generate_bracket();
        for _ in 0..31 {
            let step = sim.advance_generation();
            let res = step.resolution().unwrap();
            assert_eq!(sim.bracket().round(res.game.round).unwrap().kind, RoundKind::First);
        }
        let Step::Advanced { next, .. } = sim.advance_generation() else {
            panic!("second round should be queued");
        };
        assert_eq!(sim.bracket().round(next.round).unwrap().kind, RoundKind::Second);
        // Both sides' second rounds are queued together.
        let mut sides: HashSet<Side> =
            sim.pending_games().iter().map(|r| sim.bracket().round(r.round).unwrap().side).collect();
        sides.insert(sim.bracket().round(next.round).unwrap().side);
        assert_eq!(sides.len(), 2);
    }

    #[test]
    fn same_seed_same_bracket() {
        let mut a = sim(2024);
        let mut b = sim(2024);
        let champ_a = a.run_to_completion().cloned();
        let champ_b = b.run_to_completion().cloned();
        assert_eq!(champ_a, champ_b);
        assert_eq!(a.bracket(), b.bracket());
    }

    #[test]
    fn zero_draw_sends_the_bottom_team_through_every_game() {
        let mut sim = Simulation::with_rng(Bracket::standard().unwrap(), FixedRng::zero());
        let champion = sim.run_to_completion().cloned().unwrap();
        let final_game = sim.bracket().championship().unwrap();
        assert_eq!(final_game.winner.as_ref(), final_game.team2.as_ref());
        // Bottom of the right side is the last region listed.
        assert_eq!(champion.region, Region::Midwest);
    }

    #[test]
    fn reset_restores_fresh_bracket_and_keeps_decoration() {
        let mut sim = sim(5);
        let key = TeamKey::new(Region::Midwest, 11);
        sim.update_team_info(key, TeamInfo::named("Drake")).unwrap();
        let fresh = sim.bracket().clone();

        sim.generate_bracket();
        for _ in 0..40 {
            sim.advance_generation();
        }
        assert!(sim.bracket().decided_count() > 0);

        sim.reset_bracket();
        assert!(!sim.is_generating());
        assert!(sim.active_game().is_none());
        assert!(sim.pending_games().is_empty());
        assert_eq!(sim.bracket(), &fresh);
        assert_eq!(sim.bracket().find_team(key).unwrap().display_name(), "Drake");
        assert_eq!(sim.bracket(), &Bracket::standard().unwrap());
    }

    #[test]
    fn decoration_mid_run_does_not_disturb_progress() {
        let mut sim = sim(11);
        sim.generate_bracket();
        for _ in 0..10 {
            sim.advance_generation();
        }
        let active = sim.active_game();
        let pending = sim.pending_games().to_vec();
        let decided = sim.bracket().decided_count();

        sim.update_team_info(TeamKey::new(Region::South, 1), TeamInfo::named("Auburn")).unwrap();
        assert_eq!(sim.active_game(), active);
        assert_eq!(sim.pending_games(), pending.as_slice());
        assert_eq!(sim.bracket().decided_count(), decided);
        assert!(sim.is_generating());
    }

    #[test]
    fn out_of_range_active_game_ends_the_run() {
        let mut sim = sim(8);
        sim.generate_bracket();
        sim.active = Some(GameRef::new(99, 0));
        assert_eq!(sim.advance_generation(), Step::Finished { resolved: None });
        assert!(!sim.is_generating());
        assert!(sim.active_game().is_none());
        assert_eq!(sim.advance_generation(), Step::Idle);
    }

    #[test]
    fn generating_a_finished_bracket_does_nothing() {
        let mut sim = sim(12);
        sim.run_to_completion();
        assert_eq!(sim.generate_bracket(), None);
        assert!(!sim.is_generating());
    }

    #[test]
    fn regenerating_after_reset_plays_a_new_run() {
        let mut sim = sim(13);
        sim.run_to_completion();
        sim.reset_bracket();
        assert!(sim.champion().is_none());
        assert!(sim.run_to_completion().is_some());
        assert_eq!(sim.bracket().decided_count(), 63);
    }
}
