//! Mutations on a built bracket. Every operation validates first and only
//! then writes, so a failed call leaves the bracket untouched.

use crate::{Advancement, Bracket, BracketError, GameRef, RoundKind, Team, TeamInfo, TeamKey};

impl Bracket {
    /// Record `winner` for the game at `at` and copy it into the slot named by
    /// the game's advancement edge. Returns the edge that was followed.
    pub fn record_winner(
        &mut self,
        at: GameRef,
        winner: Team,
    ) -> Result<Option<Advancement>, BracketError> {
        let game = self.game(at).ok_or(BracketError::UnknownGame(at))?;
        if game.is_decided() {
            return Err(BracketError::AlreadyDecided(at));
        }
        if !game.is_playable() {
            return Err(BracketError::SlotEmpty(at));
        }
        if !game.involves(&winner) {
            return Err(BracketError::NotAParticipant(at));
        }
        let next = game.next;
        if let Some(edge) = next {
            let target = GameRef::new(edge.round, edge.game);
            if self.game(target).is_none() {
                return Err(BracketError::UnknownGame(target));
            }
        }

        // Keep the copy that is already in the slot so decoration stays in step.
        let winner = if game.team1.as_ref() == Some(&winner) {
            game.team1.clone()
        } else {
            game.team2.clone()
        };

        self.rounds[at.round].games[at.game].winner = winner.clone();
        if let Some(edge) = next {
            *self.rounds[edge.round].games[edge.game].slot_mut(edge.slot) = winner;
        }
        Ok(next)
    }

    /// Clear every winner, and every team that got into a game by winning.
    /// First-round pairings are kept.
    pub fn clear_results(&mut self) {
        for round in &mut self.rounds {
            let keep_teams = round.kind == RoundKind::First;
            for game in &mut round.games {
                game.winner = None;
                if !keep_teams {
                    game.team1 = None;
                    game.team2 = None;
                }
            }
        }
    }

    /// Replace a team's decoration in the roster and in every slot or winner
    /// that currently holds it. Identity and everything else are untouched.
    pub fn update_team(&mut self, key: TeamKey, info: &TeamInfo) -> Result<&Team, BracketError> {
        let index = self
            .teams
            .iter()
            .position(|t| t.key() == key)
            .ok_or(BracketError::UnknownTeam(key))?;

        self.teams[index].decorate(info);
        for game in self.rounds.iter_mut().flat_map(|r| r.games.iter_mut()) {
            for team in [&mut game.team1, &mut game.team2, &mut game.winner]
                .into_iter()
                .flatten()
            {
                if team.key() == key {
                    team.decorate(info);
                }
            }
        }
        Ok(&self.teams[index])
    }

    /// Overlay saved decoration. Records for teams not in this bracket are
    /// skipped; returns how many were applied.
    pub fn apply_decorations(&mut self, saved: &[Team]) -> usize {
        saved
            .iter()
            .filter(|s| self.update_team(s.key(), &TeamInfo::from(*s)).is_ok())
            .count()
    }
}
