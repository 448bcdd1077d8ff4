//! Lays out the fixed bracket: regional pairings, the chart reordering, and
//! the advancement edge of every game.

use crate::{
    Advancement, Bracket, BracketError, Game, Region, Round, RoundKind, SEEDS_PER_REGION, Side,
    Slot, Team,
};
use std::collections::HashSet;

/// Games produced by one region in the first round.
const GAMES_PER_REGION: usize = SEEDS_PER_REGION as usize / 2;

impl Bracket {
    /// The 64-team bracket over all four regions.
    pub fn standard() -> Result<Self, BracketError> {
        Self::build(&Region::ALL)
    }

    /// Build a bracket from an ordered region list. The first half of the
    /// list plays on the left side of the draw, the second half on the right.
    pub fn build(regions: &[Region]) -> Result<Self, BracketError> {
        validate_regions(regions)?;

        let teams: Vec<Team> = regions
            .iter()
            .flat_map(|&region| (1..=SEEDS_PER_REGION).map(move |seed| Team::new(region, seed)))
            .collect();

        let (left, right) = regions.split_at(regions.len() / 2);
        let first_round_games = left.len() * GAMES_PER_REGION;
        let side_kinds = side_round_kinds(first_round_games)?;

        let mut rounds = Vec::with_capacity(side_kinds.len() * 2 + 1);
        for (depth, &kind) in side_kinds.iter().enumerate() {
            let count = first_round_games >> depth;
            for (side, side_regions) in [(Side::Left, left), (Side::Right, right)] {
                let games = if depth == 0 {
                    first_round(kind, side, side_regions, &teams)
                } else {
                    empty_games(kind, side, count)
                };
                rounds.push(Round {
                    name: format!("{} ({})", kind.label(), side.label()),
                    kind,
                    side,
                    games,
                });
            }
        }
        rounds.push(Round {
            name: RoundKind::Championship.label().to_string(),
            kind: RoundKind::Championship,
            side: Side::Center,
            games: vec![Game::empty(RoundKind::Championship.slug())],
        });

        wire_advancement(&mut rounds)?;

        Ok(Self { rounds, teams, regions: regions.to_vec() })
    }
}

fn validate_regions(regions: &[Region]) -> Result<(), BracketError> {
    if regions.len() < 2 {
        return Err(BracketError::Configuration(format!(
            "need at least two regions to fill both sides, got {}",
            regions.len()
        )));
    }
    let team_count = regions.len() * SEEDS_PER_REGION as usize;
    if !team_count.is_power_of_two() {
        return Err(BracketError::Configuration(format!(
            "{} regions give {team_count} teams, which is not a power of two",
            regions.len()
        )));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = regions.iter().find(|r| !seen.insert(**r)) {
        return Err(BracketError::Configuration(format!("region {dup} listed twice")));
    }
    Ok(())
}

/// Round kinds for one side, from the first round down to the side final.
fn side_round_kinds(first_round_games: usize) -> Result<Vec<RoundKind>, BracketError> {
    let depth = first_round_games.trailing_zeros() as usize + 1;
    RoundKind::SIDE_ROUNDS
        .get(..depth)
        .map(<[RoundKind]>::to_vec)
        .ok_or_else(|| {
            BracketError::Configuration(format!(
                "{first_round_games} first-round games per side is more than the round names cover"
            ))
        })
}

/// Pair 1v16, 2v15, ... 8v9 in every region of the side, then reorder each
/// region block into bracket-chart order.
fn first_round(kind: RoundKind, side: Side, regions: &[Region], teams: &[Team]) -> Vec<Game> {
    let mut games: Vec<Game> = regions
        .iter()
        .flat_map(|&region| {
            let region_teams: Vec<&Team> = teams.iter().filter(|t| t.region == region).collect();
            (0..GAMES_PER_REGION)
                .map(|i| Game {
                    team1: Some(region_teams[i].clone()),
                    team2: Some(region_teams[SEEDS_PER_REGION as usize - 1 - i].clone()),
                    ..Default::default()
                })
                .collect::<Vec<_>>()
        })
        .collect();

    for block in games.chunks_mut(GAMES_PER_REGION) {
        reorder_block(block);
    }

    for (i, game) in games.iter_mut().enumerate() {
        game.id = game_id(kind, side, i);
    }
    games
}

fn empty_games(kind: RoundKind, side: Side, count: usize) -> Vec<Game> {
    (0..count).map(|i| Game::empty(game_id(kind, side, i))).collect()
}

fn game_id(kind: RoundKind, side: Side, index: usize) -> String {
    let side = match side {
        Side::Left => "left",
        Side::Right => "right",
        Side::Center => "center",
    };
    format!("{}-{side}-{index}", kind.slug())
}

/// Turn one region's raw pairing order (1v16, 2v15, ... 8v9) into chart
/// order (1v16, 8v9, 5v12, 4v13, 6v11, 3v14, 7v10, 2v15).
///
/// Blocks shorter than eight are left alone.
pub fn reorder_block<T>(block: &mut [T]) {
    if block.len() < GAMES_PER_REGION {
        return;
    }
    block.swap(1, 7);
    block.swap(2, 5);
    block.swap(4, 2);
}

/// First later round on the same side; side finals fall through to the
/// first later center round.
pub fn next_round_index(rounds: &[Round], from: usize, side: Side) -> Result<usize, BracketError> {
    let later = || rounds.iter().enumerate().skip(from + 1);
    later()
        .find(|(_, r)| r.side == side)
        .or_else(|| later().find(|(_, r)| r.side == Side::Center))
        .map(|(i, _)| i)
        .ok_or(BracketError::NoForwardRound { round: from })
}

fn wire_advancement(rounds: &mut [Round]) -> Result<(), BracketError> {
    for ri in 0..rounds.len() {
        let side = rounds[ri].side;
        if side == Side::Center {
            continue;
        }
        let target = next_round_index(rounds, ri, side)?;
        let feeds_center = rounds[target].side == Side::Center;
        for (gi, game) in rounds[ri].games.iter_mut().enumerate() {
            game.next = Some(if feeds_center {
                Advancement {
                    round: target,
                    game: 0,
                    slot: if side == Side::Left { Slot::Team1 } else { Slot::Team2 },
                }
            } else {
                Advancement { round: target, game: gi / 2, slot: Slot::for_game_index(gi) }
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameRef;

    fn seeds(game: &Game) -> (u8, u8) {
        (
            game.team1.as_ref().map(|t| t.seed).unwrap_or(0),
            game.team2.as_ref().map(|t| t.seed).unwrap_or(0),
        )
    }

    #[test]
    fn standard_layout_has_eleven_rounds() {
        let bracket = Bracket::standard().unwrap();
        let names: Vec<&str> = bracket.rounds().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "First Round (Left)",
                "First Round (Right)",
                "Second Round (Left)",
                "Second Round (Right)",
                "Sweet 16 (Left)",
                "Sweet 16 (Right)",
                "Elite Eight (Left)",
                "Elite Eight (Right)",
                "Final Four (Left)",
                "Final Four (Right)",
                "Championship",
            ]
        );
        let sizes: Vec<usize> = bracket.rounds().iter().map(Round::len).collect();
        assert_eq!(sizes, vec![16, 16, 8, 8, 4, 4, 2, 2, 1, 1, 1]);
        assert_eq!(bracket.teams().len(), 64);
        assert_eq!(bracket.game_count(), 63);
    }

    #[test]
    fn side_rounds_halve_down_to_one_championship() {
        for regions in [&Region::ALL[..], &Region::ALL[..2]] {
            let bracket = Bracket::build(regions).unwrap();
            for side in [Side::Left, Side::Right] {
                let sizes: Vec<usize> = bracket
                    .rounds()
                    .iter()
                    .filter(|r| r.side == side)
                    .map(Round::len)
                    .collect();
                for pair in sizes.windows(2) {
                    assert_eq!(pair[1] * 2, pair[0], "sizes {sizes:?}");
                }
                assert_eq!(sizes.last(), Some(&1));
            }
            let centers: Vec<&Round> =
                bracket.rounds().iter().filter(|r| r.side == Side::Center).collect();
            assert_eq!(centers.len(), 1);
            assert_eq!(centers[0].len(), 1);
        }
    }

    #[test]
    fn two_region_bracket_stops_at_elite_eight() {
        let bracket = Bracket::build(&[Region::East, Region::West]).unwrap();
        let kinds: Vec<RoundKind> = bracket.rounds().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RoundKind::First,
                RoundKind::First,
                RoundKind::Second,
                RoundKind::Second,
                RoundKind::Sweet16,
                RoundKind::Sweet16,
                RoundKind::Elite8,
                RoundKind::Elite8,
                RoundKind::Championship,
            ]
        );
        assert_eq!(bracket.teams().len(), 32);
    }

    #[test]
    fn every_region_pairs_seed_against_seventeen_minus_seed() {
        let bracket = Bracket::standard().unwrap();
        for round in bracket.rounds().iter().filter(|r| r.kind == RoundKind::First) {
            for game in &round.games {
                let (a, b) = seeds(game);
                assert_eq!(a + b, 17, "{}: {a} vs {b}", game.id);
                assert!(a < b);
                assert_eq!(
                    game.team1.as_ref().map(|t| t.region),
                    game.team2.as_ref().map(|t| t.region)
                );
            }
        }

        for region in Region::ALL {
            let mut top_seeds: Vec<u8> = bracket
                .rounds()
                .iter()
                .filter(|r| r.kind == RoundKind::First)
                .flat_map(|r| r.games.iter())
                .filter_map(|g| g.team1.as_ref())
                .filter(|t| t.region == region)
                .map(|t| t.seed)
                .collect();
            top_seeds.sort();
            assert_eq!(top_seeds, (1..=8).collect::<Vec<u8>>(), "{region}");
        }
    }

    #[test]
    fn first_round_follows_chart_order() {
        let bracket = Bracket::standard().unwrap();
        let left = &bracket.rounds()[0];
        let order: Vec<u8> = left.games.iter().map(|g| seeds(g).0).collect();
        assert_eq!(order, vec![1, 8, 5, 4, 6, 3, 7, 2, 1, 8, 5, 4, 6, 3, 7, 2]);

        let regions: Vec<Region> =
            left.games.iter().filter_map(|g| g.team1.as_ref()).map(|t| t.region).collect();
        assert!(regions[..8].iter().all(|r| *r == Region::South));
        assert!(regions[8..].iter().all(|r| *r == Region::West));

        let right = &bracket.rounds()[1];
        assert!(right.games[..8].iter().all(|g| g.team1.as_ref().unwrap().region == Region::East));
        assert!(right.games[8..].iter().all(|g| g.team1.as_ref().unwrap().region == Region::Midwest));
    }

    #[test]
    fn reorder_block_applies_three_swaps() {
        let mut block: Vec<u8> = (0..8).collect();
        reorder_block(&mut block);
        assert_eq!(block, vec![0, 7, 4, 3, 5, 2, 6, 1]);

        let mut short = vec![1, 2, 3];
        reorder_block(&mut short);
        assert_eq!(short, vec![1, 2, 3]);
    }

    #[test]
    fn later_rounds_start_empty() {
        let bracket = Bracket::standard().unwrap();
        for round in bracket.rounds().iter().filter(|r| r.kind != RoundKind::First) {
            assert!(
                round.games.iter().all(|g| g.team1.is_none() && g.team2.is_none() && g.winner.is_none()),
                "{} should be empty",
                round.name
            );
        }
        assert_eq!(bracket.playable_games().len(), 32);
        assert_eq!(bracket.first_round_refs().len(), 32);
    }

    #[test]
    fn advancement_edges_point_at_parent_game() {
        let bracket = Bracket::standard().unwrap();
        for (ri, round) in bracket.rounds().iter().enumerate() {
            if round.side == Side::Center {
                assert!(round.games[0].next.is_none());
                continue;
            }
            for (gi, game) in round.games.iter().enumerate() {
                let next = game.next.expect("non-final games advance");
                let target = &bracket.rounds()[next.round];
                assert!(next.round > ri);
                if target.side == Side::Center {
                    assert_eq!(next.game, 0);
                } else {
                    assert_eq!(target.side, round.side);
                    assert_eq!(target.kind, round.kind.next().unwrap());
                    assert_eq!(next.game, gi / 2);
                    assert_eq!(next.slot, Slot::for_game_index(gi));
                }
            }
        }
    }

    #[test]
    fn final_four_feeds_championship_by_side() {
        let bracket = Bracket::standard().unwrap();
        let (_, left) = bracket.find_round(RoundKind::FinalFour, Side::Left).unwrap();
        let (_, right) = bracket.find_round(RoundKind::FinalFour, Side::Right).unwrap();
        let left_next = left.games[0].next.unwrap();
        let right_next = right.games[0].next.unwrap();
        assert_eq!(left_next, Advancement { round: 10, game: 0, slot: Slot::Team1 });
        assert_eq!(right_next, Advancement { round: 10, game: 0, slot: Slot::Team2 });
    }

    #[test]
    fn game_ids_are_unique() {
        let bracket = Bracket::standard().unwrap();
        let ids: HashSet<&str> = bracket
            .rounds()
            .iter()
            .flat_map(|r| r.games.iter().map(|g| g.id.as_str()))
            .collect();
        assert_eq!(ids.len(), 63);
        assert!(ids.contains("first-round-left-0"));
        assert!(ids.contains("sweet-16-right-3"));
        assert!(ids.contains("championship"));
        assert_eq!(bracket.game(GameRef::new(0, 15)).unwrap().id, "first-round-left-15");
    }

    #[test]
    fn rejects_layouts_that_are_not_a_power_of_two() {
        assert!(matches!(
            Bracket::build(&[Region::South, Region::West, Region::East]),
            Err(BracketError::Configuration(_))
        ));
        assert!(matches!(Bracket::build(&[Region::South]), Err(BracketError::Configuration(_))));
        assert!(matches!(Bracket::build(&[]), Err(BracketError::Configuration(_))));
    }

    #[test]
    fn rejects_duplicate_regions() {
        let err = Bracket::build(&[Region::South, Region::South]).unwrap_err();
        assert!(err.to_string().contains("South"), "{err}");
    }

    #[test]
    fn forward_scan_falls_back_to_center_then_fails() {
        let bracket = Bracket::standard().unwrap();
        let rounds = bracket.rounds();
        assert_eq!(next_round_index(rounds, 0, Side::Left), Ok(2));
        assert_eq!(next_round_index(rounds, 1, Side::Right), Ok(3));
        assert_eq!(next_round_index(rounds, 8, Side::Left), Ok(10));
        assert_eq!(next_round_index(rounds, 9, Side::Right), Ok(10));
        assert_eq!(
            next_round_index(rounds, 10, Side::Center),
            Err(BracketError::NoForwardRound { round: 10 })
        );
    }
}
