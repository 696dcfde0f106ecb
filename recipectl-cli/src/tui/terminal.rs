//! Terminal management and main run loop

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use recipectl_core::RecipeCreate;

use super::app::App;
use super::event::{handle_key, poll_event, HandleResult};
use super::ui;

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Run the form until the user saves or cancels.
///
/// Returns the request to send, or `None` when cancelled. The form keeps
/// its contents, so it can be shown again after a rejected save.
pub fn run(app: &mut App) -> Result<Option<RecipeCreate>> {
    let mut terminal = init_terminal()?;

    let result = run_loop(&mut terminal, app);

    // Restore terminal (even if loop failed)
    restore_terminal(&mut terminal)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<Option<RecipeCreate>> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Some(Event::Key(key)) = poll_event(Duration::from_millis(100))? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match handle_key(app, key) {
                HandleResult::Continue => {}
                HandleResult::Cancel => return Ok(None),
                HandleResult::Submit(request) => return Ok(Some(request)),
            }
        }
    }
}
