pub mod bracket;
pub mod builder;
pub mod client;
pub mod engine;
pub mod error;
pub mod server;
pub mod simulation;
pub mod store;

pub use error::BracketError;
pub use simulation::{Resolution, Simulation, Step};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Number of seeded teams every region contributes.
pub const SEEDS_PER_REGION: u8 = 16;

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    South,
    West,
    East,
    Midwest,
}

impl Region {
    /// Canonical build order: the first two fill the left side of the draw.
    pub const ALL: [Region; 4] = [Region::South, Region::West, Region::East, Region::Midwest];

    pub fn label(&self) -> &'static str {
        match self {
            Region::South => "South",
            Region::West => "West",
            Region::East => "East",
            Region::Midwest => "Midwest",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of a team. Two teams are the same team iff their keys match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamKey {
    pub region: Region,
    pub seed: u8,
}

impl TeamKey {
    pub fn new(region: Region, seed: u8) -> Self {
        Self { region, seed }
    }
}

impl fmt::Display for TeamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.region, self.seed)
    }
}

/// A seeded team plus optional display decoration.
///
/// Equality and hashing only look at `(region, seed)`, so a decorated copy
/// of a team still compares equal to the plain one sitting in a game slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub region: Region,
    pub seed: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Team {
    pub fn new(region: Region, seed: u8) -> Self {
        Self { region, seed, name: None, image: None }
    }

    pub fn key(&self) -> TeamKey {
        TeamKey::new(self.region, self.seed)
    }

    pub fn is_decorated(&self) -> bool {
        self.name.is_some() || self.image.is_some()
    }

    /// Custom name if one was set, otherwise "<Region> <seed>".
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.key().to_string(),
        }
    }

    /// Seeds outside 1..=16 can't come from a real bracket.
    pub fn validate(&self) -> bool {
        (1..=SEEDS_PER_REGION).contains(&self.seed)
    }

    pub fn decorate(&mut self, info: &TeamInfo) {
        self.name = info.name.clone();
        self.image = info.image.clone();
    }
}

impl PartialEq for Team {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Team {}

impl Hash for Team {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Display decoration for a team. Replaces whatever was there before.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub name: Option<String>,
    pub image: Option<String>,
}

impl TeamInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), image: None }
    }
}

impl From<&Team> for TeamInfo {
    fn from(team: &Team) -> Self {
        Self { name: team.name.clone(), image: team.image.clone() }
    }
}

/// Wire document exchanged with the team metadata endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamData {
    pub teams: Vec<Team>,
}

// ---------------------------------------------------------------------------
// Games and rounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Center,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
            Side::Center => "Center",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Team1,
    Team2,
}

impl Slot {
    /// Even games feed the top slot of their parent, odd games the bottom.
    pub fn for_game_index(index: usize) -> Self {
        if index % 2 == 0 { Slot::Team1 } else { Slot::Team2 }
    }
}

/// Where a game's winner goes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Advancement {
    pub round: usize,
    pub game: usize,
    pub slot: Slot,
}

/// Position of a game inside a bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameRef {
    pub round: usize,
    pub game: usize,
}

impl GameRef {
    pub fn new(round: usize, game: usize) -> Self {
        Self { round, game }
    }
}

impl fmt::Display for GameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round {} game {}", self.round, self.game)
    }
}

/// Ordered from earliest to latest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoundKind {
    #[default]
    First,
    Second,
    Sweet16,
    Elite8,
    FinalFour,
    Championship,
}

impl RoundKind {
    /// Side rounds in play order; the Championship is never a side round.
    pub const SIDE_ROUNDS: [RoundKind; 5] = [
        RoundKind::First,
        RoundKind::Second,
        RoundKind::Sweet16,
        RoundKind::Elite8,
        RoundKind::FinalFour,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RoundKind::First => "First Round",
            RoundKind::Second => "Second Round",
            RoundKind::Sweet16 => "Sweet 16",
            RoundKind::Elite8 => "Elite Eight",
            RoundKind::FinalFour => "Final Four",
            RoundKind::Championship => "Championship",
        }
    }

    /// Used to build game ids.
    pub fn slug(&self) -> &'static str {
        match self {
            RoundKind::First => "first-round",
            RoundKind::Second => "second-round",
            RoundKind::Sweet16 => "sweet-16",
            RoundKind::Elite8 => "elite-eight",
            RoundKind::FinalFour => "final-four",
            RoundKind::Championship => "championship",
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            RoundKind::First => Some(RoundKind::Second),
            RoundKind::Second => Some(RoundKind::Sweet16),
            RoundKind::Sweet16 => Some(RoundKind::Elite8),
            RoundKind::Elite8 => Some(RoundKind::FinalFour),
            RoundKind::FinalFour => Some(RoundKind::Championship),
            RoundKind::Championship => None,
        }
    }

    pub fn prev(self) -> Option<Self> {
        match self {
            RoundKind::First => None,
            RoundKind::Second => Some(RoundKind::First),
            RoundKind::Sweet16 => Some(RoundKind::Second),
            RoundKind::Elite8 => Some(RoundKind::Sweet16),
            RoundKind::FinalFour => Some(RoundKind::Elite8),
            RoundKind::Championship => Some(RoundKind::FinalFour),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Game {
    pub id: String,
    pub team1: Option<Team>,
    pub team2: Option<Team>,
    pub winner: Option<Team>,
    /// `None` only for the Championship.
    pub next: Option<Advancement>,
}

impl Game {
    pub fn empty(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    pub fn team(&self, slot: Slot) -> Option<&Team> {
        match slot {
            Slot::Team1 => self.team1.as_ref(),
            Slot::Team2 => self.team2.as_ref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, slot: Slot) -> &mut Option<Team> {
        match slot {
            Slot::Team1 => &mut self.team1,
            Slot::Team2 => &mut self.team2,
        }
    }

    /// Both slots filled and nobody has won yet.
    pub fn is_playable(&self) -> bool {
        self.team1.is_some() && self.team2.is_some() && self.winner.is_none()
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    pub fn involves(&self, team: &Team) -> bool {
        self.team1.as_ref() == Some(team) || self.team2.as_ref() == Some(team)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub name: String,
    pub kind: RoundKind,
    pub side: Side,
    pub games: Vec<Game>,
}

impl Round {
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Bracket
// ---------------------------------------------------------------------------

/// Rounds plus the full roster. Built once by [`Bracket::build`]; after that
/// only game slots and winners change.
#[derive(Debug, Clone, PartialEq)]
pub struct Bracket {
    pub(crate) rounds: Vec<Round>,
    pub(crate) teams: Vec<Team>,
    pub(crate) regions: Vec<Region>,
}

impl Bracket {
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn round(&self, index: usize) -> Option<&Round> {
        self.rounds.get(index)
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn game(&self, game_ref: GameRef) -> Option<&Game> {
        self.rounds.get(game_ref.round)?.games.get(game_ref.game)
    }

    /// First round with the given kind on the given side.
    pub fn find_round(&self, kind: RoundKind, side: Side) -> Option<(usize, &Round)> {
        self.rounds
            .iter()
            .enumerate()
            .find(|(_, r)| r.kind == kind && r.side == side)
    }

    pub fn championship(&self) -> Option<&Game> {
        self.rounds
            .iter()
            .find(|r| r.side == Side::Center)
            .and_then(|r| r.games.first())
    }

    pub fn champion(&self) -> Option<&Team> {
        self.championship()?.winner.as_ref()
    }

    pub fn find_team(&self, key: TeamKey) -> Option<&Team> {
        self.teams.iter().find(|t| t.key() == key)
    }

    /// Every game with both slots filled and no winner, in round-major order.
    pub fn playable_games(&self) -> Vec<GameRef> {
        self.rounds
            .iter()
            .enumerate()
            .flat_map(|(ri, round)| {
                round
                    .games
                    .iter()
                    .enumerate()
                    .filter(|(_, g)| g.is_playable())
                    .map(move |(gi, _)| GameRef::new(ri, gi))
            })
            .collect()
    }

    /// References to every game of every first round, both sides.
    pub fn first_round_refs(&self) -> Vec<GameRef> {
        self.rounds
            .iter()
            .enumerate()
            .filter(|(_, r)| r.kind == RoundKind::First)
            .flat_map(|(ri, r)| (0..r.games.len()).map(move |gi| GameRef::new(ri, gi)))
            .collect()
    }

    /// Teams carrying a custom name or image; this is what gets persisted.
    pub fn decorated_teams(&self) -> Vec<Team> {
        self.teams.iter().filter(|t| t.is_decorated()).cloned().collect()
    }

    pub fn decided_count(&self) -> usize {
        self.rounds
            .iter()
            .flat_map(|r| r.games.iter())
            .filter(|g| g.is_decided())
            .count()
    }

    pub fn game_count(&self) -> usize {
        self.rounds.iter().map(Round::len).sum()
    }
}
