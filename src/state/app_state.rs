use crate::app::MenuItem;
use bracket_sim::{Bracket, Game, GameRef, Region, Resolution, RoundKind, Side, Simulation, TeamInfo, TeamKey};
use chrono::Local;

/// Round kinds drawn inside a region pane, outermost first.
pub const REGION_ROUNDS: [RoundKind; 4] =
    [RoundKind::First, RoundKind::Second, RoundKind::Sweet16, RoundKind::Elite8];

// ---------------------------------------------------------------------------
// Banner animation state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AnimationState {
    /// Current frame index into the banner frames array, wraps at FRAME_COUNT.
    pub frame: usize,
    /// Monotonic tick counter. Drives the bouncing ball.
    pub tick: u64,
}

impl AnimationState {
    pub fn advance(&mut self, frame_count: usize) {
        self.tick = self.tick.wrapping_add(1);
        self.frame = (self.frame + 1) % frame_count;
    }
}

// ---------------------------------------------------------------------------
// Region slices of the bracket
// ---------------------------------------------------------------------------

/// One region's share of a side round.
#[derive(Debug, Clone, Copy)]
pub struct RegionRound<'a> {
    pub round: usize,
    pub offset: usize,
    pub games: &'a [Game],
}

impl RegionRound<'_> {
    pub fn game_ref(&self, game: usize) -> GameRef {
        GameRef::new(self.round, self.offset + game)
    }

    /// Index within this slice of a bracket-wide reference, if it falls here.
    pub fn local_index(&self, at: GameRef) -> Option<usize> {
        (at.round == self.round && (self.offset..self.offset + self.games.len()).contains(&at.game))
            .then(|| at.game - self.offset)
    }
}

/// Side of the draw a region plays on, and its position within that side.
pub fn region_side(bracket: &Bracket, region: usize) -> Option<(Side, usize)> {
    let half = bracket.regions().len() / 2;
    if region >= bracket.regions().len() || half == 0 {
        return None;
    }
    Some(if region < half { (Side::Left, region) } else { (Side::Right, region - half) })
}

pub fn region_round(bracket: &Bracket, region: usize, kind: RoundKind) -> Option<RegionRound<'_>> {
    let (side, position) = region_side(bracket, region)?;
    let per_side = bracket.regions().len() / 2;
    let (index, round) = bracket.find_round(kind, side)?;
    let count = round.len() / per_side;
    let offset = position * count;
    Some(RegionRound { round: index, offset, games: round.games.get(offset..offset + count)? })
}

/// The Final Four tab's three games: left semi, right semi, Championship.
pub fn final_four_refs(bracket: &Bracket) -> [Option<GameRef>; 3] {
    let semi = |side| bracket.find_round(RoundKind::FinalFour, side).map(|(i, _)| GameRef::new(i, 0));
    let championship = bracket.rounds().len().checked_sub(1).map(|i| GameRef::new(i, 0));
    [semi(Side::Left), semi(Side::Right), championship]
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BracketCursor {
    /// Index into the bracket's region list.
    pub region: usize,
    /// Index into `REGION_ROUNDS`.
    pub depth: usize,
    /// Game within the region's share of that round.
    pub game: usize,
    /// 0 = left semi, 1 = right semi, 2 = Championship.
    pub final_four: usize,
    /// Index into the bracket roster.
    pub team: usize,
}

impl BracketCursor {
    fn games_at_depth(&self) -> usize {
        8 >> self.depth
    }

    pub fn round_next(&mut self) {
        if self.depth + 1 < REGION_ROUNDS.len() {
            self.depth += 1;
            self.game /= 2;
        }
    }

    pub fn round_prev(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
            self.game *= 2;
        }
    }

    pub fn game_down(&mut self) {
        if self.game + 1 < self.games_at_depth() {
            self.game += 1;
        }
    }

    pub fn game_up(&mut self) {
        self.game = self.game.saturating_sub(1);
    }

    pub fn cycle_region(&mut self, region_count: usize) {
        self.region = (self.region + 1) % region_count.max(1);
    }

    pub fn final_four_next(&mut self) {
        self.final_four = (self.final_four + 1).min(2);
    }

    pub fn final_four_prev(&mut self) {
        self.final_four = self.final_four.saturating_sub(1);
    }

    pub fn team_down(&mut self, team_count: usize) {
        if self.team + 1 < team_count {
            self.team += 1;
        }
    }

    pub fn team_up(&mut self) {
        self.team = self.team.saturating_sub(1);
    }

    /// Jump to the same seed in the next region.
    pub fn team_next_region(&mut self, team_count: usize) {
        let seeds = usize::from(bracket_sim::SEEDS_PER_REGION);
        if self.team + seeds < team_count {
            self.team += seeds;
        }
    }

    pub fn team_prev_region(&mut self) {
        let seeds = usize::from(bracket_sim::SEEDS_PER_REGION);
        self.team = self.team.checked_sub(seeds).unwrap_or(self.team);
    }
}

// ---------------------------------------------------------------------------
// Team edit form
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum EditField {
    #[default]
    Name,
    Image,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    pub key: TeamKey,
    pub name: String,
    pub image: String,
    pub field: EditField,
}

impl EditForm {
    pub fn new(key: TeamKey, info: TeamInfo) -> Self {
        Self {
            key,
            name: info.name.unwrap_or_default(),
            image: info.image.unwrap_or_default(),
            field: EditField::Name,
        }
    }

    fn focused(&mut self) -> &mut String {
        match self.field {
            EditField::Name => &mut self.name,
            EditField::Image => &mut self.image,
        }
    }

    pub fn push(&mut self, ch: char) {
        self.focused().push(ch);
    }

    pub fn backspace(&mut self) {
        self.focused().pop();
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            EditField::Name => EditField::Image,
            EditField::Image => EditField::Name,
        };
    }

    /// Blank fields clear the decoration.
    pub fn to_info(&self) -> TeamInfo {
        let field = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
        TeamInfo { name: field(&self.name), image: field(&self.image) }
    }
}

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StatusLine {
    pub timestamp: String,
    pub message: String,
    pub is_error: bool,
}

impl StatusLine {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message.into(), false)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), true)
    }

    fn new(message: String, is_error: bool) -> Self {
        Self { timestamp: Local::now().format("%H:%M:%S").to_string(), message, is_error }
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_intro: bool,
    pub show_logs: bool,
    /// Auto-stepping is suspended; `space` still steps by hand.
    pub paused: bool,
    pub simulation: Simulation,
    pub cursor: BracketCursor,
    pub edit: Option<EditForm>,
    pub status: Option<StatusLine>,
    pub last_resolution: Option<Resolution>,
    pub animation: AnimationState,
}

impl AppState {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            show_intro: true,
            show_logs: false,
            paused: false,
            simulation,
            cursor: BracketCursor::default(),
            edit: None,
            status: None,
            last_resolution: None,
            animation: AnimationState::default(),
        }
    }

    pub fn bracket(&self) -> &Bracket {
        self.simulation.bracket()
    }

    pub fn selected_region(&self) -> Option<Region> {
        self.bracket().regions().get(self.cursor.region).copied()
    }

    /// Game under the cursor on the tab that is showing.
    pub fn selected_game(&self) -> Option<GameRef> {
        match self.active_tab {
            MenuItem::FinalFour => final_four_refs(self.bracket())[self.cursor.final_four.min(2)],
            _ => {
                let kind = REGION_ROUNDS[self.cursor.depth.min(REGION_ROUNDS.len() - 1)];
                let slice = region_round(self.bracket(), self.cursor.region, kind)?;
                (self.cursor.game < slice.games.len()).then(|| slice.game_ref(self.cursor.game))
            }
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(StatusLine::info(message));
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some(StatusLine::error(message));
    }
}
