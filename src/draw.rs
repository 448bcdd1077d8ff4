use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use bracket_sim::{Bracket, Side, Team};

use crate::app::{App, MenuItem};
use crate::components::banner::AnimatedBanner;
use crate::components::banner_frames::{BannerTheme, round_label};
use crate::components::bracket::{BracketGrid, BracketView, FinalFourView, REGION_HEIGHT};
use crate::state::app_state::{EditField, EditForm, REGION_ROUNDS, final_four_refs, region_round, region_side};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;

static TABS: &[&str; 3] = &["Bracket", "Final Four", "Teams"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        if app.state.show_intro {
            draw_intro(f, f.area(), app);
            return;
        }

        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
            draw_status(f, layout.status, app);
        }

        match app.state.active_tab {
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::FinalFour => draw_final_four(f, layout.main, app),
            MenuItem::Teams => draw_teams(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        if let Some(form) = &app.state.edit {
            draw_edit_form(f, f.area(), form);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        error!("failed to draw frame: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn banner_for(app: &App) -> AnimatedBanner {
    let bracket = app.state.bracket();
    AnimatedBanner {
        frame: app.state.animation.frame,
        tick: app.state.animation.tick,
        theme: BannerTheme::Dark,
        next_round: app
            .state
            .simulation
            .active_game()
            .and_then(|at| bracket.round(at.round))
            .map(|round| round.kind),
        decided: bracket.decided_count(),
        total: bracket.game_count(),
    }
}

fn draw_intro(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Bracket Simulator ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_top_pad, banner_area, prompt_area, _bottom_pad] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);
    f.render_widget(banner_for(app), banner_area);
    f.render_widget(
        Paragraph::new("Press Enter to view bracket")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        prompt_area,
    );
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Bracket => 0,
        MenuItem::FinalFour => 1,
        MenuItem::Teams => 2,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// One line of run state: what the simulation is doing and how far it got.
fn run_summary(app: &App) -> String {
    let bracket = app.state.bracket();
    let progress = format!("{}/{} decided", bracket.decided_count(), bracket.game_count());
    let phase = if let Some(champion) = app.state.simulation.champion() {
        format!("Champion: {}", champion.display_name())
    } else if !app.state.simulation.is_generating() {
        "Idle".to_string()
    } else if app.state.paused {
        "Paused".to_string()
    } else {
        "Running".to_string()
    };
    format!("{phase} | {progress}")
}

// ---------------------------------------------------------------------------
// Bracket tab: four regional panes
// ---------------------------------------------------------------------------

fn draw_bracket(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Bracket ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [header, key_legend, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)]).areas(inner);

    let region_label = app
        .state
        .selected_region()
        .map(|r| r.label())
        .unwrap_or("Region");
    let round = REGION_ROUNDS[app.state.cursor.depth.min(REGION_ROUNDS.len() - 1)];
    f.render_widget(
        Paragraph::new(format!("{} | {} | {}", round_label(round), region_label, run_summary(app))),
        header,
    );
    f.render_widget(
        Paragraph::new("Keys: g=generate  p=pause  space=step  x=reset  h/l=round  j/k=move  r=region  e/E=edit")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    draw_all_regions(f, content, app);
}

/// Pane slot for a region: left-side regions fill the left column, top first.
fn pane_position(bracket: &Bracket, region: usize) -> Option<usize> {
    let (side, position) = region_side(bracket, region)?;
    let column = if side == Side::Left { 0 } else { 1 };
    Some(position * 2 + column)
}

fn draw_all_regions(f: &mut Frame, area: Rect, app: &App) {
    let [top_row, _middle_gap, bottom_row] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1), Constraint::Fill(1)]).areas(area);
    let [top_left, _top_mid, top_right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(3), Constraint::Fill(1)]).areas(top_row);
    let [bottom_left, _bottom_mid, bottom_right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(3), Constraint::Fill(1)]).areas(bottom_row);
    let panes: [Rect; 4] = [top_left, top_right, bottom_left, bottom_right];

    let bracket = app.state.bracket();
    let active = app.state.simulation.active_game();

    for (idx, region) in bracket.regions().iter().enumerate() {
        let Some((position, pane)) = pane_position(bracket, idx).and_then(|p| panes.get(p).map(|r| (p, *r)))
        else {
            continue;
        };
        let is_selected = idx == app.state.cursor.region;

        let pane_block = default_border(if is_selected { Color::Yellow } else { Color::DarkGray })
            .title(format!(" {region} "));
        let pane_inner = pane_block.inner(pane);
        f.render_widget(pane_block, pane);

        let slices = REGION_ROUNDS.map(|kind| region_round(bracket, idx, kind));
        let rounds = slices.map(|s| s.map(|s| s.games).unwrap_or(&[]));
        let active_at = active.and_then(|at| {
            slices
                .iter()
                .enumerate()
                .find_map(|(depth, s)| s.and_then(|s| s.local_index(at)).map(|game| (depth, game)))
        });

        let grid = BracketGrid::for_pane(position, pane_inner.width);
        let selected = is_selected.then_some((app.state.cursor.depth, app.state.cursor.game));
        let focus = selected.or(active_at);
        let scroll_offset = focus
            .and_then(|(depth, game)| grid.cells_for_depth(depth).get(game))
            .map(|cell| scroll_for(cell.center_row, pane_inner.height))
            .unwrap_or(0);

        f.render_widget(
            BracketView {
                rounds,
                grid: &grid,
                selected,
                active: active_at,
                scroll_offset,
                theme: BannerTheme::Dark,
            },
            pane_inner,
        );
    }
}

/// Scroll so `row` sits mid-pane when the pane is shorter than a region.
fn scroll_for(row: u16, height: u16) -> u16 {
    if height >= REGION_HEIGHT {
        return 0;
    }
    row.saturating_sub(height / 2).min(REGION_HEIGHT - height)
}

// ---------------------------------------------------------------------------
// Final Four tab
// ---------------------------------------------------------------------------

fn draw_final_four(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Final Four ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [header, content] = Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);
    f.render_widget(Paragraph::new(run_summary(app)), header);

    let bracket = app.state.bracket();
    let refs = final_four_refs(bracket);
    let game = |i: usize| refs[i].and_then(|at| bracket.game(at));
    let active = app.state.simulation.active_game();
    let active_idx = active.and_then(|at| refs.iter().position(|r| *r == Some(at)));

    f.render_widget(
        FinalFourView {
            semi_left: game(0),
            semi_right: game(1),
            championship: game(2),
            selected_idx: Some(app.state.cursor.final_four),
            active_idx,
            theme: BannerTheme::Dark,
        },
        content,
    );
}

// ---------------------------------------------------------------------------
// Teams tab: the roster, one column per region
// ---------------------------------------------------------------------------

/// Whether `team` lost a decided game.
fn is_eliminated(bracket: &Bracket, team: &Team) -> bool {
    bracket
        .rounds()
        .iter()
        .flat_map(|r| r.games.iter())
        .any(|g| g.involves(team) && g.winner.as_ref().is_some_and(|w| w != team))
}

fn draw_teams(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Teams ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [key_legend, content] = Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Paragraph::new("Keys: j/k=seed  h/l=region  e=edit name/image")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    let bracket = app.state.bracket();
    let regions = bracket.regions();
    if regions.is_empty() {
        return;
    }
    let columns = Layout::horizontal(regions.iter().map(|_| Constraint::Fill(1))).split(content);
    let champion = app.state.simulation.champion();

    for (col, region) in regions.iter().enumerate() {
        let mut lines = vec![Line::from(Span::styled(
            region.label(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))];

        for (idx, team) in bracket.teams().iter().enumerate().filter(|(_, t)| t.region == *region) {
            let selected = idx == app.state.cursor.team;
            let marker = if selected { '>' } else { ' ' };
            let image = if team.image.is_some() { " *" } else { "" };
            let style = if selected {
                Style::default().fg(Color::White).add_modifier(Modifier::REVERSED)
            } else if champion == Some(team) {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if is_eliminated(bracket, team) {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Gray)
            };
            lines.push(Line::from(Span::styled(
                format!("{marker}{:>2} {}{image}", team.seed, team.display_name()),
                style,
            )));
        }

        f.render_widget(Paragraph::new(lines), columns[col]);
    }
}

// ---------------------------------------------------------------------------
// Help, logs, status and overlays
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = [
        ("1 / 2 / 3", "Bracket / Final Four / Teams"),
        ("g", "generate: play out every remaining game"),
        ("p", "pause or resume a run"),
        ("space", "resolve one game while paused"),
        ("x", "reset all results"),
        ("h j k l / arrows", "move the cursor"),
        ("r", "next region (Bracket tab)"),
        ("e / E", "edit the top / bottom team of the selected game"),
        ("f", "toggle full screen"),
        ("\"", "toggle the log pane"),
        ("Esc", "close help"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{key:>18}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(logs, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }
    let mut spans = Vec::new();
    if let Some(status) = &app.state.status {
        let style = if status.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("[{}] ", status.timestamp), Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(status.message.clone(), style));
    }
    if let Some(last) = &app.state.last_resolution {
        let round = app
            .state
            .bracket()
            .round(last.game.round)
            .map(|r| r.name.as_str())
            .unwrap_or("");
        spans.push(Span::styled(
            format!("  |  {round}: {} advances", last.winner.display_name()),
            Style::default().fg(Color::Green),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_edit_form(f: &mut Frame, area: Rect, form: &EditForm) {
    let popup = centered(area, 56, 7);
    f.render_widget(Clear, popup);
    let block = default_border(Color::Yellow).title(format!(" Edit {} ", form.key));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let field_line = |label: &str, value: &str, focused: bool| {
        let (style, cursor) = if focused {
            (Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD), "_")
        } else {
            (Style::default().fg(Color::Gray), "")
        };
        Line::from(vec![
            Span::styled(format!("{label:<7}"), Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{value}{cursor}"), style),
        ])
    };

    let lines = vec![
        field_line("Name:", &form.name, form.field == EditField::Name),
        field_line("Image:", &form.image, form.field == EditField::Image),
        Line::from(""),
        Line::from(Span::styled(
            "Enter=save  Tab=next field  Esc=cancel  (blank clears)",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use bracket_sim::GameRef;
    use bracket_sim::store::MemoryStore;
    use tui::backend::TestBackend;

    fn app() -> App {
        let settings = AppSettings { seed: Some(3), ..AppSettings::default() };
        App::with_store(settings, Box::new(MemoryStore::new())).unwrap()
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| (0..buf.area.width).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn panes_follow_the_sides_of_the_draw() {
        let bracket = Bracket::standard().unwrap();
        let positions: Vec<_> = (0..4).map(|r| pane_position(&bracket, r)).collect();
        assert_eq!(positions, vec![Some(0), Some(2), Some(1), Some(3)]);
    }

    #[test]
    fn scroll_keeps_focus_in_short_panes() {
        assert_eq!(scroll_for(29, 40), 0);
        assert_eq!(scroll_for(1, 10), 0);
        assert_eq!(scroll_for(15, 10), 10);
        assert_eq!(scroll_for(29, 10), REGION_HEIGHT - 10);
    }

    #[test]
    fn bracket_tab_shows_every_region() {
        let mut app = app();
        app.dismiss_intro();
        let mut terminal = Terminal::new(TestBackend::new(200, 80)).unwrap();
        draw(&mut terminal, &mut app, LoadingState::default());
        let text = screen(&terminal);
        for region in ["South", "West", "East", "Midwest"] {
            assert!(text.contains(&format!(" {region} ")), "missing {region}");
        }
        assert!(text.contains("Idle | 0/63 decided"));
    }

    #[test]
    fn teams_tab_and_edit_form_render() {
        let mut app = app();
        app.dismiss_intro();
        app.update_tab(MenuItem::Teams);
        app.begin_edit(bracket_sim::Slot::Team1);
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        draw(&mut terminal, &mut app, LoadingState::default());
        let text = screen(&terminal);
        assert!(text.contains("Edit South 1"));
        assert!(text.contains("Midwest 16"));
    }

    #[test]
    fn final_four_marks_active_game() {
        let mut app = app();
        app.dismiss_intro();
        app.generate();
        while app.state.simulation.active_game().is_some_and(|at: GameRef| at.round < 8) {
            app.on_step_tick();
        }
        app.update_tab(MenuItem::FinalFour);
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        draw(&mut terminal, &mut app, LoadingState::default());
        assert!(screen(&terminal).contains("NEXT UP"));
    }
}
