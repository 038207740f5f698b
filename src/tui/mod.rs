// File: ./src/tui/mod.rs
// Entry point and main loop for the TUI application.
pub mod action;
pub mod handlers;
pub mod loader;
pub mod state;
pub mod view;

use crate::config::Config;
use crate::context::SharedContext;
use crate::source::LocalBackend;
use crate::tui::action::Action;
use crate::tui::state::AppState;
use crate::tui::view::draw;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, time::Duration};
use tokio::sync::mpsc;

pub async fn run(ctx: SharedContext, cfg: Config) -> Result<()> {
    // Panic Hook: restore the terminal so the message is readable
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log::error!("PANIC: {}", info);
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        default_hook(info);
    }));

    // --- 1. TERMINAL SETUP ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // --- 2. STATE INIT ---
    let mut app_state = AppState::new(&cfg);

    let (action_tx, action_rx) = mpsc::channel(10);
    let (event_tx, mut event_rx) = mpsc::channel(10);

    // --- 3. LOADER TASK ---
    tokio::spawn(loader::run_loader_actor(
        LocalBackend::new(ctx),
        action_rx,
        event_tx,
    ));

    // --- 4. UI LOOP ---
    let result: Result<()> = async {
        loop {
            terminal.draw(|f| draw(f, &mut app_state))?;

            if let Ok(event) = event_rx.try_recv() {
                handlers::handle_app_event(&mut app_state, event);
            }

            if crossterm::event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Mouse(mouse) => match mouse.kind {
                        MouseEventKind::ScrollDown => app_state.next(),
                        MouseEventKind::ScrollUp => app_state.previous(),
                        _ => {}
                    },
                    Event::Key(key) => {
                        // Filter out KeyRelease events to prevent double input on Windows
                        if key.kind == event::KeyEventKind::Release {
                            continue;
                        }
                        if let Some(action) = handlers::handle_key_event(key, &mut app_state) {
                            let quit = matches!(action, Action::Quit);
                            let _ = action_tx.send(action).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
    .await;

    // --- 5. CLEANUP ---
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}
