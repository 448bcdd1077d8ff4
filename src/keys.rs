use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use bracket_sim::Slot;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    if let (Char('c'), KeyModifiers::CONTROL) = (key_event.code, key_event.modifiers) {
        crate::cleanup_terminal();
        std::process::exit(0);
    }

    if guard.state.show_intro {
        match key_event.code {
            KeyCode::Enter => guard.dismiss_intro(),
            Char('q') => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            _ => {}
        }
        return;
    }

    // The edit form swallows everything until it is committed or cancelled.
    if guard.is_editing() {
        match key_event.code {
            KeyCode::Enter => {
                if let Some(teams) = guard.commit_edit() {
                    drop(guard);
                    let _ = network_requests.send(NetworkRequest::SaveTeams(teams)).await;
                }
            }
            KeyCode::Esc => guard.cancel_edit(),
            KeyCode::Tab => guard.edit_toggle_field(),
            KeyCode::Backspace => guard.edit_backspace(),
            Char(ch) => guard.edit_input(ch),
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Bracket),
        (_, Char('2'), _) => guard.update_tab(MenuItem::FinalFour),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Teams),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Simulation control
        (_, Char('g'), _) => guard.generate(),
        (_, Char(' '), _) => guard.step(),
        (_, Char('p'), _) => guard.toggle_pause(),
        (_, Char('x'), _) => guard.reset(),

        // Navigation
        (_, Char('l') | KeyCode::Right, _) => guard.move_right(),
        (_, Char('h') | KeyCode::Left, _) => guard.move_left(),
        (_, Char('j') | KeyCode::Down, _) => guard.move_down(),
        (_, Char('k') | KeyCode::Up, _) => guard.move_up(),
        (MenuItem::Bracket, Char('r'), _) => guard.cycle_region(),

        // Team editing
        (_, Char('e'), _) => guard.begin_edit(Slot::Team1),
        (_, Char('E'), _) => guard.begin_edit(Slot::Team2),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
