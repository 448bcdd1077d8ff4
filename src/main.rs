mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::ticker::StepTicker;
use bracket_sim::client::TeamsApi;
use bracket_sim::store::{JsonFileStore, TeamStore};
use bracket_sim::{Bracket, Simulation};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, info, warn};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

enum Mode {
    Interactive,
    Headless,
    Exit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match handle_cli_args() {
        Mode::Exit => return Ok(()),
        Mode::Headless => return run_headless().await,
        Mode::Interactive => {}
    }

    better_panic::install();

    let settings = AppSettings::load();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(settings.log_level)?;
    tui_logger::set_default_level(settings.log_level);

    let teams_url = settings.teams_url.clone();
    let step_interval = settings.step_interval;
    let app = Arc::new(Mutex::new(App::new(settings)?));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread, only when a team-server is configured
    let network_task = teams_url.map(|url| {
        let worker = NetworkWorker::new(TeamsApi::new(url), network_req_rx, network_resp_tx);
        tokio::spawn(worker.run())
    });

    // Simulation pacing thread
    let step_task = tokio::spawn(StepTicker::new(ui_event_tx.clone(), step_interval).run());

    // Animation tick thread, 80ms ≈ 12.5 FPS
    let anim_tx = ui_event_tx.clone();
    let animation_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(80));
        loop {
            interval.tick().await;
            if anim_tx.send(UiEvent::AnimationTick).await.is_err() {
                break;
            }
        }
    });

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    if let Some(task) = network_task {
        task.abort();
    }
    step_task.abort();
    animation_task.abort();

    Ok(())
}

fn handle_cli_args() -> Mode {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return Mode::Interactive;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            Mode::Exit
        }
        "-V" | "--version" => {
            println!("bracket-viz {}", env!("CARGO_PKG_VERSION"));
            Mode::Exit
        }
        "-s" | "--simulate" => Mode::Headless,
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "bracket-viz - seeded single-elimination bracket simulator

Usage:
  bracket-viz
  bracket-viz --simulate
  bracket-viz --help
  bracket-viz --version

Environment:
  BRACKET_TEAMS_FILE   Local team name/image file (default bracket-teams.json)
  BRACKET_TEAMS_URL    team-server base URL, e.g. http://127.0.0.1:8788
  BRACKET_STEP_MS      Delay between simulated games in ms (default 250)
  BRACKET_SEED         Fixed RNG seed for reproducible runs
  BRACKET_LOG          Log level: off, error, warn, info, debug, trace"
}

/// Play a whole tournament without a terminal UI and print the results.
async fn run_headless() -> anyhow::Result<()> {
    let settings = AppSettings::load();
    env_logger::Builder::new()
        .filter_level(settings.log_level)
        .parse_default_env()
        .init();

    let mut bracket = Bracket::standard()?;

    match JsonFileStore::new(&settings.teams_file).load_all() {
        Ok(saved) => {
            bracket.apply_decorations(&saved);
        }
        Err(e) => warn!("could not load team decoration: {e}"),
    }
    if let Some(url) = &settings.teams_url {
        match TeamsApi::new(url.as_str()).fetch_teams().await {
            Ok(remote) => {
                let applied = bracket.apply_decorations(&remote);
                info!("applied {applied} team records from {url}");
            }
            Err(e) => warn!("could not load team decoration from {url}: {e}"),
        }
    }

    let mut simulation = match settings.seed {
        Some(seed) => Simulation::seeded(bracket, seed),
        None => Simulation::new(bracket),
    };
    simulation.run_to_completion();

    let bracket = simulation.bracket();
    for round in bracket.rounds() {
        let winners: Vec<String> = round
            .games
            .iter()
            .filter_map(|g| g.winner.as_ref())
            .map(|t| format!("({}) {}", t.seed, t.display_name()))
            .collect();
        println!("{}: {}", round.name, winners.join(", "));
    }
    match simulation.champion() {
        Some(champion) => println!("\nChampion: ({}) {}", champion.seed, champion.display_name()),
        None => println!("\nNo champion"),
    }
    Ok(())
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let remote = app.lock().await.remote_enabled();
            if remote {
                let _ = network_requests.send(NetworkRequest::LoadTeams).await;
            }
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::AnimationTick => {
            let mut guard = app.lock().await;
            guard.advance_animation(crate::components::banner::FRAME_COUNT);
            guard.state.show_intro
        }
        UiEvent::StepTick => app.lock().await.on_step_tick(),
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::TeamsLoaded { teams } => {
            app.lock().await.on_teams_loaded(teams);
        }
        NetworkResponse::TeamsSaved { count } => {
            app.lock().await.on_teams_saved(count);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            app.lock().await.on_error(message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
