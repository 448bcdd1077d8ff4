use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, EditForm};
use bracket_sim::store::{JsonFileStore, TeamStore};
use bracket_sim::{Bracket, BracketError, Simulation, Slot, Step, Team, TeamInfo};
use log::{info, warn};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Bracket,
    FinalFour,
    Teams,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    store: Box<dyn TeamStore>,
}

impl App {
    pub fn new(settings: AppSettings) -> Result<Self, BracketError> {
        let store = JsonFileStore::new(&settings.teams_file);
        Self::with_store(settings, Box::new(store))
    }

    /// Build the bracket and overlay whatever decoration `store` holds. A
    /// store that cannot be read leaves every team undecorated.
    pub fn with_store(settings: AppSettings, store: Box<dyn TeamStore>) -> Result<Self, BracketError> {
        let mut bracket = Bracket::standard()?;
        match store.load_all() {
            Ok(saved) => {
                let applied = bracket.apply_decorations(&saved);
                info!("applied {applied} saved team records");
            }
            Err(e) => warn!("could not load team decoration: {e}"),
        }

        let simulation = match settings.seed {
            Some(seed) => Simulation::seeded(bracket, seed),
            None => Simulation::new(bracket),
        };

        Ok(Self { state: AppState::new(simulation), settings, store })
    }

    pub fn remote_enabled(&self) -> bool {
        self.settings.teams_url.is_some()
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_teams_loaded(&mut self, teams: Vec<Team>) {
        let applied = teams
            .iter()
            .filter(|t| {
                self.state
                    .simulation
                    .update_team_info(t.key(), TeamInfo::from(*t))
                    .is_ok()
            })
            .count();
        self.state.set_status(format!("Loaded {applied} team records from server"));
    }

    pub fn on_teams_saved(&mut self, count: usize) {
        self.state.set_status(format!("Saved {count} team records to server"));
    }

    pub fn on_error(&mut self, message: String) {
        self.state.set_error(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn dismiss_intro(&mut self) {
        self.state.show_intro = false;
    }

    // -----------------------------------------------------------------------
    // Simulation control
    // -----------------------------------------------------------------------

    pub fn generate(&mut self) {
        if self.state.simulation.is_generating() {
            self.state.set_status("Already generating");
            return;
        }
        match self.state.simulation.generate_bracket() {
            Some(_) => {
                self.state.paused = false;
                self.state.last_resolution = None;
                let queued = self.state.simulation.pending_games().len() + 1;
                self.state.set_status(format!("Generating: {queued} games ready"));
            }
            None => self.state.set_status("Nothing left to play. Press x to reset"),
        }
    }

    /// Auto-step from the ticker. Returns true when something changed.
    pub fn on_step_tick(&mut self) -> bool {
        if self.state.paused || !self.state.simulation.is_generating() {
            return false;
        }
        self.advance();
        true
    }

    /// Manual single step, only while paused.
    pub fn step(&mut self) {
        if !self.state.simulation.is_generating() {
            self.state.set_status("Press g to generate");
        } else if !self.state.paused {
            self.state.set_status("Press p to pause before stepping");
        } else {
            self.advance();
        }
    }

    pub fn toggle_pause(&mut self) {
        if !self.state.simulation.is_generating() {
            return;
        }
        self.state.paused = !self.state.paused;
        self.state.set_status(if self.state.paused { "Paused" } else { "Resumed" });
    }

    pub fn reset(&mut self) {
        self.state.simulation.reset_bracket();
        self.state.paused = false;
        self.state.last_resolution = None;
        self.state.set_status("Bracket reset");
    }

    fn advance(&mut self) {
        let step = self.state.simulation.advance_generation();
        if let Some(resolution) = step.resolution() {
            self.state.last_resolution = Some(resolution.clone());
        }
        if let Step::Finished { .. } = step {
            self.state.paused = false;
            let message = match self.state.simulation.champion() {
                Some(champion) => format!("Champion: {}", champion.display_name()),
                None => "Generation stopped".to_string(),
            };
            self.state.set_status(message);
        }
    }

    // -----------------------------------------------------------------------
    // Navigation, dispatched on the active tab
    // -----------------------------------------------------------------------

    pub fn move_right(&mut self) {
        match self.state.active_tab {
            MenuItem::Bracket => self.state.cursor.round_next(),
            MenuItem::FinalFour => self.state.cursor.final_four_next(),
            MenuItem::Teams => {
                let count = self.state.bracket().teams().len();
                self.state.cursor.team_next_region(count);
            }
            MenuItem::Help => {}
        }
    }

    pub fn move_left(&mut self) {
        match self.state.active_tab {
            MenuItem::Bracket => self.state.cursor.round_prev(),
            MenuItem::FinalFour => self.state.cursor.final_four_prev(),
            MenuItem::Teams => self.state.cursor.team_prev_region(),
            MenuItem::Help => {}
        }
    }

    pub fn move_down(&mut self) {
        match self.state.active_tab {
            MenuItem::Bracket => self.state.cursor.game_down(),
            MenuItem::FinalFour => self.state.cursor.final_four_next(),
            MenuItem::Teams => {
                let count = self.state.bracket().teams().len();
                self.state.cursor.team_down(count);
            }
            MenuItem::Help => {}
        }
    }

    pub fn move_up(&mut self) {
        match self.state.active_tab {
            MenuItem::Bracket => self.state.cursor.game_up(),
            MenuItem::FinalFour => self.state.cursor.final_four_prev(),
            MenuItem::Teams => self.state.cursor.team_up(),
            MenuItem::Help => {}
        }
    }

    pub fn cycle_region(&mut self) {
        let count = self.state.bracket().regions().len();
        self.state.cursor.cycle_region(count);
    }

    // -----------------------------------------------------------------------
    // Team editing
    // -----------------------------------------------------------------------

    /// Open the edit form for the team in `slot` of the selected game, or for
    /// the selected roster entry on the Teams tab.
    pub fn begin_edit(&mut self, slot: Slot) {
        let team = match self.state.active_tab {
            MenuItem::Teams => self.state.bracket().teams().get(self.state.cursor.team).cloned(),
            MenuItem::Help => return,
            _ => self
                .state
                .selected_game()
                .and_then(|at| self.state.bracket().game(at))
                .and_then(|game| game.team(slot).cloned()),
        };
        match team {
            Some(team) => self.state.edit = Some(EditForm::new(team.key(), TeamInfo::from(&team))),
            None => self.state.set_error("No team in that slot yet"),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.state.edit.is_some()
    }

    pub fn edit_input(&mut self, ch: char) {
        if let Some(form) = &mut self.state.edit {
            form.push(ch);
        }
    }

    pub fn edit_backspace(&mut self) {
        if let Some(form) = &mut self.state.edit {
            form.backspace();
        }
    }

    pub fn edit_toggle_field(&mut self) {
        if let Some(form) = &mut self.state.edit {
            form.toggle_field();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.state.edit = None;
    }

    /// Apply the edit form to the simulation and persist it to the local
    /// store. Returns the records to mirror to the server, if one is set.
    pub fn commit_edit(&mut self) -> Option<Vec<Team>> {
        let form = self.state.edit.take()?;
        let updated = match self.state.simulation.update_team_info(form.key, form.to_info()) {
            Ok(team) => team.display_name(),
            Err(e) => {
                self.state.set_error(e.to_string());
                return None;
            }
        };

        let decorated = self.state.bracket().decorated_teams();
        match self.store.save_all(&decorated) {
            Ok(()) => self.state.set_status(format!("Updated {} ({updated})", form.key)),
            Err(e) => {
                warn!("could not persist team decoration: {e}");
                self.state.set_error(format!("Updated {updated} but saving failed: {e}"));
            }
        }

        self.remote_enabled().then_some(decorated)
    }

    // -----------------------------------------------------------------------
    // Animation tick, every 80ms
    // -----------------------------------------------------------------------

    pub fn advance_animation(&mut self, frame_count: usize) {
        self.state.animation.advance(frame_count);
    }
}
