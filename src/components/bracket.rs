use bracket_sim::{Game, Slot, Team};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

use crate::components::banner_frames::{BannerColor, BannerTheme, resolve};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per game cell: team1 line, status line, team2 line.
pub const GAME_HEIGHT: u16 = 3;

/// Slot heights for each bracket depth (d=0 = First leaf, d=3 = Elite8 root).
/// Formula: SH[0] = GAME_HEIGHT; SH[d] = 2 * SH[d-1] + 1.
const SH: [u16; 4] = [
    GAME_HEIGHT,                                 // First:   3
    2 * GAME_HEIGHT + 1,                         // Second:  7
    2 * (2 * GAME_HEIGHT + 1) + 1,               // Sweet16: 15
    2 * (2 * (2 * GAME_HEIGHT + 1) + 1) + 1,     // Elite8:  31
];

/// Total terminal rows consumed by one regional bracket. Equals SH[3] = 31.
pub const REGION_HEIGHT: u16 = SH[3];

/// Width of the connector zone drawn between adjacent round columns.
pub const CONNECTOR_WIDTH: u16 = 3;

/// Maximum game cell width in wider terminals.
const CELL_W_FULL: u16 = 22;

// ---------------------------------------------------------------------------
// GameCell, the pre-computed position of one game
// ---------------------------------------------------------------------------

/// Pre-computed layout position for one game within a regional bracket grid.
#[derive(Debug, Clone)]
pub struct GameCell {
    /// Row index of the status line (center of the 3-row cell), relative to
    /// the bracket origin. Not scroll-adjusted.
    pub center_row: u16,
    /// Starting x-column for this game cell within the grid (origin-relative).
    pub col: u16,
    pub cell_width: u16,
    /// Bracket depth of this cell: 0 = First .. 3 = Elite8.
    pub depth: usize,
    /// Index of this game within the region's share of the round.
    pub game_idx: usize,
}

// ---------------------------------------------------------------------------
// BracketGrid, the layout engine for one regional bracket
// ---------------------------------------------------------------------------

/// Pre-computed layout for one 4-round regional bracket (First → Elite8).
///
/// Column order left → right: First | conn | Second | conn | Sweet16 | conn | Elite8
#[derive(Debug, Clone)]
pub struct BracketGrid {
    /// All cells in depth-major order: First(8) + Second(4) + Sweet16(2) + Elite8(1) = 15 cells.
    pub cells: Vec<GameCell>,
    /// Starting x-column for each round column. Index: [0=First .. 3=Elite8].
    pub round_cols: [u16; 4],
    pub cell_width: u16,
    /// When true, depth 0 is on the right and depth 3 on the left.
    pub mirrored: bool,
    /// When true, rows are flipped vertically (First at the bottom).
    pub flipped: bool,
}

impl BracketGrid {
    /// Compute the bracket layout for the given pane width.
    ///
    /// Each pane has 4 game columns and 3 connector columns:
    /// `4 * cell_width + 3 * CONNECTOR_WIDTH <= width`.
    ///
    /// Center rows follow the triangle formula
    /// `center[d][i] = SH[d]/2 + i * (SH[d+1] - SH[d])`:
    ///   First   (d=0): [1, 5, 9, 13, 17, 21, 25, 29]
    ///   Second  (d=1): [3, 11, 19, 27]
    ///   Sweet16 (d=2): [7, 23]
    ///   Elite8  (d=3): [15]
    pub fn compute(width: u16) -> Self {
        Self::compute_inner(width, false, false)
    }

    /// Depth 0 on the right, for right-side panes.
    pub fn compute_mirrored(width: u16) -> Self {
        Self::compute_inner(width, true, false)
    }

    /// First round at the bottom, for bottom-left panes.
    pub fn compute_flipped(width: u16) -> Self {
        Self::compute_inner(width, false, true)
    }

    /// Flipped vertically and mirrored horizontally, for bottom-right panes.
    pub fn compute_flipped_mirrored(width: u16) -> Self {
        Self::compute_inner(width, true, true)
    }

    /// Layout for the pane at `position` in the 2x2 region grid
    /// (0 = top-left, 1 = top-right, 2 = bottom-left, 3 = bottom-right).
    pub fn for_pane(position: usize, width: u16) -> Self {
        match position {
            1 => Self::compute_mirrored(width),
            2 => Self::compute_flipped(width),
            3 => Self::compute_flipped_mirrored(width),
            _ => Self::compute(width),
        }
    }

    fn compute_inner(width: u16, mirrored: bool, flipped: bool) -> Self {
        let connector_total = CONNECTOR_WIDTH * 3;
        let per_col = width.saturating_sub(connector_total) / 4;
        let cell_width: u16 = per_col.clamp(1, CELL_W_FULL);
        let stride = cell_width + CONNECTOR_WIDTH;
        let round_cols = if mirrored {
            [stride * 3, stride * 2, stride, 0u16]
        } else {
            [0u16, stride, stride * 2, stride * 3]
        };

        let first_center = [SH[0] / 2, SH[1] / 2, SH[2] / 2, SH[3] / 2]; // [1, 3, 7, 15]
        let spacing: [u16; 4] = [SH[1] - SH[0], SH[2] - SH[1], SH[3] - SH[2], 0];
        let game_counts = [8usize, 4, 2, 1];

        let mut cells = Vec::with_capacity(15);
        for d in 0..4usize {
            for i in 0..game_counts[d] {
                let center_normal = first_center[d] + i as u16 * spacing[d];
                let center_row = if flipped {
                    (REGION_HEIGHT - 1) - center_normal
                } else {
                    center_normal
                };
                cells.push(GameCell { center_row, col: round_cols[d], cell_width, depth: d, game_idx: i });
            }
        }

        Self { cells, round_cols, cell_width, mirrored, flipped }
    }

    /// Cells for a specific depth (0=First, 1=Second, 2=Sweet16, 3=Elite8).
    pub fn cells_for_depth(&self, depth: usize) -> &[GameCell] {
        const OFFSETS: [usize; 5] = [0, 8, 12, 14, 15];
        &self.cells[OFFSETS[depth]..OFFSETS[depth + 1]]
    }
}

// ---------------------------------------------------------------------------
// BracketView widget
// ---------------------------------------------------------------------------

/// How a cell should be highlighted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellMarks {
    pub selected: bool,
    /// The simulation resolves this game next.
    pub active: bool,
}

/// Renders a single-region bracket (First Round → Elite Eight).
pub struct BracketView<'a> {
    /// Game slices per bracket depth: [First(8), Second(4), Sweet16(2), Elite8(1)].
    pub rounds: [&'a [Game]; 4],
    /// Pre-computed layout. Rebuild only on resize.
    pub grid: &'a BracketGrid,
    /// (depth, game) under the cursor, when this region is selected.
    pub selected: Option<(usize, usize)>,
    /// (depth, game) the simulation resolves next, when it is in this region.
    pub active: Option<(usize, usize)>,
    /// Vertical scroll offset in terminal rows (for short terminals).
    pub scroll_offset: u16,
    pub theme: BannerTheme,
}

impl Widget for BracketView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < GAME_HEIGHT {
            return;
        }

        // Pass 1: game cells.
        for cell in &self.grid.cells {
            let game = self.rounds[cell.depth].get(cell.game_idx);
            let at = Some((cell.depth, cell.game_idx));
            let marks = CellMarks { selected: self.selected == at, active: self.active == at };
            draw_game_cell(game, cell, marks, area, self.scroll_offset, self.theme, buf);
        }

        // Pass 2: connectors. Each parent at depth d+1 joins two children at depth d.
        for depth in 0..3usize {
            let child_cells = self.grid.cells_for_depth(depth);
            let parent_cells = self.grid.cells_for_depth(depth + 1);
            let conn_x_base = if self.grid.mirrored {
                area.x + self.grid.round_cols[depth].saturating_sub(CONNECTOR_WIDTH)
            } else {
                area.x + self.grid.round_cols[depth] + self.grid.cell_width
            };

            for (j, parent) in parent_cells.iter().enumerate() {
                // Sort by row so r_top < r_mid < r_bot in both normal and flipped modes.
                let ca = &child_cells[2 * j];
                let cb = &child_cells[2 * j + 1];
                let (child_top, child_bot) = if ca.center_row <= cb.center_row { (ca, cb) } else { (cb, ca) };
                draw_connector(
                    child_top.center_row,
                    parent.center_row,
                    child_bot.center_row,
                    conn_x_base,
                    area,
                    self.scroll_offset,
                    self.theme,
                    self.grid.mirrored,
                    buf,
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// FinalFourView widget
// ---------------------------------------------------------------------------

/// Renders the Final Four and Championship side by side:
///
/// ```text
///              ── FINAL FOUR ──
///
///  1 Auburn       ──  1 Auburn       ──  1 Houston
///    FINAL             NEXT UP             FINAL
///  1 Florida          2 Houston          2 Duke
/// ```
pub struct FinalFourView<'a> {
    pub semi_left: Option<&'a Game>,
    pub semi_right: Option<&'a Game>,
    pub championship: Option<&'a Game>,
    /// 0 = semi_left, 1 = semi_right, 2 = championship.
    pub selected_idx: Option<usize>,
    pub active_idx: Option<usize>,
    pub theme: BannerTheme,
}

impl FinalFourView<'_> {
    fn marks(&self, idx: usize) -> CellMarks {
        CellMarks { selected: self.selected_idx == Some(idx), active: self.active_idx == Some(idx) }
    }
}

impl Widget for FinalFourView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 5 {
            return;
        }

        let accent = resolve(BannerColor::Accent, self.theme);
        let dim = resolve(BannerColor::Dim, self.theme);

        let title = "── FINAL FOUR ──";
        let tx = area.x + area.width.saturating_sub(title.chars().count() as u16) / 2;
        buf.set_string(tx, area.y, title, accent);

        let cell_w: u16 = if area.width >= 72 { 22 } else { 18 };
        let gap: u16 = 4;
        let total_w = cell_w * 3 + gap * 2;

        if total_w + 2 > area.width {
            render_ff_vertical(&self, area, buf);
            return;
        }

        let x0 = area.x + (area.width - total_w) / 2;
        let col_left = x0;
        let col_mid = x0 + cell_w + gap;
        let col_right = x0 + (cell_w + gap) * 2;

        // Row 0 is the title, row 1 blank.
        let center_y = area.y + 3;

        draw_ff_game_at(self.semi_left, col_left, center_y, cell_w, self.marks(0), self.theme, buf, area);
        draw_ff_game_at(self.championship, col_mid, center_y, cell_w, self.marks(2), self.theme, buf, area);
        draw_ff_game_at(self.semi_right, col_right, center_y, cell_w, self.marks(1), self.theme, buf, area);

        // Semis feed the Championship: left into team1, right into team2.
        let limit_x = area.x + area.width;
        let team1_row = center_y - 1;
        let team2_row = center_y + 1;
        for cx in (col_left + cell_w)..col_mid {
            if cx >= limit_x { break; }
            put_char(buf, cx, team1_row, '─', dim);
        }
        for cx in (col_mid + cell_w)..col_right {
            if cx >= limit_x { break; }
            put_char(buf, cx, team2_row, '─', dim);
        }

        if let Some(champion) = self.championship.and_then(|g| g.winner.as_ref()) {
            let line = format!("Champion: {}", champion.display_name());
            let y = center_y + 3;
            if y < area.y + area.height {
                let x = area.x + area.width.saturating_sub(line.chars().count() as u16) / 2;
                buf.set_string(x, y, line, resolve(BannerColor::Winner, self.theme));
            }
        }
    }
}

/// Vertical fallback for FinalFourView when the area is too narrow.
fn render_ff_vertical(view: &FinalFourView, area: Rect, buf: &mut Buffer) {
    let accent = resolve(BannerColor::Accent, view.theme);
    let cell_w = area.width.saturating_sub(2) as usize;

    let mut y = area.y + 1;
    let games = [
        ("── Semi 1 ──", view.semi_left, view.marks(0)),
        ("── Semi 2 ──", view.semi_right, view.marks(1)),
        ("── Championship ──", view.championship, view.marks(2)),
    ];

    for (label, game, marks) in games {
        if y >= area.y + area.height { break; }
        buf.set_string(area.x, y, label, accent);
        y += 1;

        for row in 0u8..3 {
            if y >= area.y + area.height { break; }
            let content = format_game_row(game, row, cell_w, marks.active);
            buf.set_string(area.x + 1, y, &content, row_style(game, row, marks, view.theme));
            y += 1;
        }
        y += 1;
    }
}

/// Draw a 3-row game cell at absolute screen coordinates (no scroll).
#[allow(clippy::too_many_arguments)]
fn draw_ff_game_at(
    game: Option<&Game>,
    x: u16,
    center_y: u16,
    cell_w: u16,
    marks: CellMarks,
    theme: BannerTheme,
    buf: &mut Buffer,
    area: Rect,
) {
    let limit_x = area.x + area.width;
    if x >= limit_x {
        return;
    }
    let avail = limit_x.saturating_sub(x) as usize;

    for (dy, row) in [(0u16, 0u8), (1, 1), (2, 2)] {
        let y = center_y.saturating_sub(1) + dy;
        if y < area.y || y >= area.y + area.height { continue; }

        let content = format_game_row(game, row, cell_w as usize, marks.active);
        let text: String = content.chars().take(avail).collect();
        buf.set_string(x, y, &text, row_style(game, row, marks, theme));
    }
}

// ---------------------------------------------------------------------------
// Shared drawing helpers
// ---------------------------------------------------------------------------

/// Convert a bracket-relative row to an absolute screen y, applying scroll + area bounds.
/// Returns `None` if the row is off-screen.
fn screen_y(bracket_row: u16, scroll: u16, area: Rect) -> Option<u16> {
    if bracket_row < scroll {
        return None;
    }
    let rel = bracket_row - scroll;
    if rel >= area.height {
        return None;
    }
    Some(area.y + rel)
}

/// Team rows: winners in the winner colour, losers dimmed once decided.
/// Status row: highlighted for the active game.
fn row_style(game: Option<&Game>, row: u8, marks: CellMarks, theme: BannerTheme) -> Style {
    let base_style = if marks.selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Gray)
    };

    if row == 1 {
        return if marks.active {
            resolve(BannerColor::Active, theme)
        } else {
            resolve(BannerColor::Dim, theme)
        };
    }

    let Some(game) = game else {
        return base_style;
    };
    let slot = if row == 0 { Slot::Team1 } else { Slot::Team2 };
    match (game.team(slot), game.winner.as_ref()) {
        (Some(team), Some(winner)) if team == winner => {
            let style = resolve(BannerColor::Winner, theme);
            if marks.selected { style.add_modifier(Modifier::REVERSED) } else { style }
        }
        (Some(_), Some(_)) if !marks.selected => resolve(BannerColor::Dim, theme),
        _ => base_style,
    }
}

/// Draw one game cell (3 rows) into the buffer, with scroll + clip handling.
fn draw_game_cell(
    game: Option<&Game>,
    cell: &GameCell,
    marks: CellMarks,
    area: Rect,
    scroll: u16,
    theme: BannerTheme,
    buf: &mut Buffer,
) {
    let x = area.x + cell.col;
    if x >= area.x + area.width {
        return;
    }
    let avail_w = (area.x + area.width).saturating_sub(x) as usize;

    // center_row is at least 1 for every cell, so the top row never underflows.
    let top_row = cell.center_row.saturating_sub(1);
    let mid_row = cell.center_row;
    let bot_row = cell.center_row.saturating_add(1);

    for (bracket_row, row) in [(top_row, 0u8), (mid_row, 1), (bot_row, 2)] {
        let Some(sy) = screen_y(bracket_row, scroll, area) else {
            continue;
        };

        let content = format_game_row(game, row, cell.cell_width as usize, marks.active);
        let text: String = content.chars().take(avail_w).collect();
        buf.set_string(x, sy, &text, row_style(game, row, marks, theme));
    }
}

/// Format a single game cell row.
/// `row`: 0 = team1 line, 1 = status line, 2 = team2 line.
fn format_game_row(game: Option<&Game>, row: u8, width: usize, active: bool) -> String {
    match game {
        None => " ".repeat(width),
        Some(g) => match row {
            0 => format_team_line(g.team1.as_ref(), width),
            2 => format_team_line(g.team2.as_ref(), width),
            _ => format_status_line(g, width, active),
        },
    }
}

/// Format a team line: `"[seed] [name       ] "`, exactly `width` columns.
fn format_team_line(team: Option<&Team>, width: usize) -> String {
    let (seed, name) = match team {
        Some(t) => (format!("{:2}", t.seed), t.display_name()),
        None => ("  ".to_string(), "TBD".to_string()),
    };
    // seed(2) + sp(1) + name + trailing sp(1)
    let name_w = width.saturating_sub(4);
    let name_trunc: String = name.chars().take(name_w).collect();
    let line = format!("{seed} {name_trunc:<name_w$} ");
    line.chars().take(width).collect()
}

/// Format the center status row.
fn format_status_line(game: &Game, width: usize, active: bool) -> String {
    let raw = if active {
        " ▶ NEXT UP"
    } else if game.is_decided() {
        " FINAL"
    } else if game.is_playable() {
        " ready"
    } else {
        ""
    };
    let padded = format!("{raw:<width$}");
    padded.chars().take(width).collect()
}

/// Draw box-drawing connectors between one parent and its two children.
///
/// ```text
///  child_top  ──┐         (col_a='─'  col_b='┐')
///               │         (col_b='│')
///  parent     ──├──       (col_a='─'  col_b='├'  col_c='─')
///               │         (col_b='│')
///  child_bot  ──┘         (col_a='─'  col_b='┘')
/// ```
#[allow(clippy::too_many_arguments)]
fn draw_connector(
    r_top: u16,
    r_mid: u16,
    r_bot: u16,
    conn_base_x: u16, // absolute screen x of connector column 0
    area: Rect,
    scroll: u16,
    theme: BannerTheme,
    mirrored: bool,
    buf: &mut Buffer,
) {
    let style = resolve(BannerColor::Dim, theme);
    let col_a = conn_base_x;
    let col_b = conn_base_x + 1;
    let col_c = conn_base_x + 2;
    let limit_x = area.x + area.width;

    macro_rules! put {
        ($x:expr, $row:expr, $ch:expr) => {
            if $x < limit_x {
                if let Some(sy) = screen_y($row, scroll, area) {
                    put_char(buf, $x, sy, $ch, style);
                }
            }
        };
    }

    if mirrored {
        // Children on the right, parent on the left.
        put!(col_b, r_top, '┌');
        put!(col_c, r_top, '─');
        for row in (r_top + 1)..r_mid {
            put!(col_b, row, '│');
        }
        put!(col_a, r_mid, '─');
        put!(col_b, r_mid, '┤');
        for row in (r_mid + 1)..r_bot {
            put!(col_b, row, '│');
        }
        put!(col_b, r_bot, '└');
        put!(col_c, r_bot, '─');
    } else {
        put!(col_a, r_top, '─');
        put!(col_b, r_top, '┐');
        for row in (r_top + 1)..r_mid {
            put!(col_b, row, '│');
        }
        put!(col_a, r_mid, '─');
        put!(col_b, r_mid, '├');
        put!(col_c, r_mid, '─');
        for row in (r_mid + 1)..r_bot {
            put!(col_b, row, '│');
        }
        put!(col_a, r_bot, '─');
        put!(col_b, r_bot, '┘');
    }
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_sim::{Bracket, GameRef, Region};

    fn row_text(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.x + buf.area.width).map(|x| buf[(x, y)].symbol().to_string()).collect()
    }

    #[test]
    fn test_region_height_is_31() {
        assert_eq!(REGION_HEIGHT, 31);
    }

    #[test]
    fn test_slot_heights() {
        assert_eq!(SH, [3, 7, 15, 31]);
    }

    #[test]
    fn test_bracket_grid_cell_count() {
        let grid = BracketGrid::compute(80);
        assert_eq!(grid.cells.len(), 15);
    }

    #[test]
    fn test_round_centers() {
        let grid = BracketGrid::compute(80);
        let centers = |d: usize| grid.cells_for_depth(d).iter().map(|c| c.center_row).collect::<Vec<_>>();
        assert_eq!(centers(0), vec![1, 5, 9, 13, 17, 21, 25, 29]);
        assert_eq!(centers(1), vec![3, 11, 19, 27]);
        assert_eq!(centers(2), vec![7, 23]);
        assert_eq!(centers(3), vec![15]);
    }

    #[test]
    fn test_flipped_grid_puts_first_round_at_bottom() {
        let grid = BracketGrid::for_pane(2, 80);
        assert!(grid.flipped && !grid.mirrored);
        assert_eq!(grid.cells_for_depth(0)[0].center_row, 29);
        assert_eq!(grid.cells_for_depth(3)[0].center_row, 15);

        let grid = BracketGrid::for_pane(3, 80);
        assert!(grid.flipped && grid.mirrored);
        assert_eq!(grid.round_cols[3], 0);
    }

    #[test]
    fn test_parent_center_is_midpoint_of_children() {
        let grid = BracketGrid::compute(80);
        for depth in 0..3usize {
            let children = grid.cells_for_depth(depth);
            let parents = grid.cells_for_depth(depth + 1);
            for (j, parent) in parents.iter().enumerate() {
                let c_top = children[2 * j].center_row;
                let c_bot = children[2 * j + 1].center_row;
                assert_eq!(parent.center_row, (c_top + c_bot) / 2, "depth={depth} parent={j}");
            }
        }
    }

    #[test]
    fn test_cell_width_is_computed_from_available_width() {
        let width: u16 = 99;
        let expected = width.saturating_sub(CONNECTOR_WIDTH * 3) / 4;
        let grid = BracketGrid::compute(width);
        assert_eq!(grid.cell_width, expected.min(CELL_W_FULL));
        assert!(grid.cells.iter().all(|c| c.cell_width == grid.cell_width));
        assert_eq!(BracketGrid::compute(200).cell_width, CELL_W_FULL);
    }

    #[test]
    fn test_format_team_line_width() {
        let mut team = Team::new(Region::South, 16);
        team.name = Some("Alabama State Hornets".into());
        for width in [14, 22] {
            let line = format_team_line(Some(&team), width);
            assert_eq!(line.chars().count(), width, "line: {line:?}");
            assert!(line.starts_with("16 Alabama"));
        }
        assert_eq!(format_team_line(None, 10), "   TBD    ");
        assert_eq!(format_team_line(Some(&Team::new(Region::West, 3)), 14), " 3 West 3     ");
    }

    #[test]
    fn test_status_line_reflects_game_state() {
        let bracket = Bracket::standard().unwrap();
        let opener = bracket.game(GameRef::new(0, 0)).unwrap();
        assert_eq!(format_status_line(opener, 8, false), " ready  ");
        assert_eq!(format_status_line(opener, 12, true).trim(), "▶ NEXT UP");
        let empty = bracket.game(GameRef::new(2, 0)).unwrap();
        assert_eq!(format_status_line(empty, 4, false), "    ");

        let mut decided = opener.clone();
        decided.winner = decided.team1.clone();
        assert_eq!(format_status_line(&decided, 8, false), " FINAL  ");
    }

    #[test]
    fn test_bracket_view_renders_first_round_names() {
        let bracket = Bracket::standard().unwrap();
        let first = &bracket.round(0).unwrap().games[0..8];
        let grid = BracketGrid::compute(100);
        let area = Rect::new(0, 0, 100, REGION_HEIGHT);
        let mut buf = Buffer::empty(area);
        BracketView {
            rounds: [first, &[], &[], &[]],
            grid: &grid,
            selected: Some((0, 0)),
            active: None,
            scroll_offset: 0,
            theme: BannerTheme::Dark,
        }
        .render(area, &mut buf);

        assert!(row_text(&buf, 0).starts_with(" 1 South 1"));
        assert!(row_text(&buf, 2).starts_with("16 South 16"));
        assert!(row_text(&buf, 4).starts_with(" 8 South 8"));
        assert!(row_text(&buf, 1).contains('├') || row_text(&buf, 3).contains('├'));
    }

    #[test]
    fn test_final_four_view_shows_champion() {
        let mut final_game = Game::empty("championship");
        let mut champ = Team::new(Region::Midwest, 1);
        champ.name = Some("Houston".into());
        final_game.team1 = Some(Team::new(Region::South, 1));
        final_game.team2 = Some(champ.clone());
        final_game.winner = Some(champ);

        let area = Rect::new(0, 0, 90, 8);
        let mut buf = Buffer::empty(area);
        FinalFourView {
            semi_left: None,
            semi_right: None,
            championship: Some(&final_game),
            selected_idx: Some(2),
            active_idx: None,
            theme: BannerTheme::Dark,
        }
        .render(area, &mut buf);

        assert!(row_text(&buf, 0).contains("FINAL FOUR"));
        assert!(row_text(&buf, 6).contains("Champion: Houston"));
    }
}
