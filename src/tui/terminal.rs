//! Terminal setup and teardown.

use std::io::{self, IsTerminal, Stdout};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{Result, TickerboardError};

/// Terminal backed by crossterm on stdout.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Whether stdout is attached to a terminal.
pub fn is_interactive() -> bool {
    io::stdout().is_terminal()
}

/// Enters raw mode and the alternate screen.
///
/// Also installs a panic hook that leaves the alternate screen first, so a
/// panic message is readable instead of lost in raw mode.
///
/// # Errors
///
/// Returns [`TickerboardError::Io`] if stdout is not a TTY or the terminal
/// cannot be switched.
pub fn setup_terminal() -> Result<Tui> {
    if !is_interactive() {
        return Err(TickerboardError::Io(
            "TUI requires an interactive terminal (TTY); use --headless instead".to_string(),
        ));
    }

    enable_raw_mode().map_err(|e| terminal_error("enable raw mode", e))?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(terminal_error("enter alternate screen", e));
    }

    let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(e) => {
            leave_screen();
            return Err(terminal_error("create terminal", e));
        }
    };

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        leave_screen();
        default_hook(info);
    }));

    Ok(terminal)
}

/// Leaves raw mode and the alternate screen and shows the cursor again.
///
/// # Errors
///
/// Returns [`TickerboardError::Io`] if any restore step fails.
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().map_err(|e| terminal_error("disable raw mode", e))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| terminal_error("leave alternate screen", e))?;
    terminal
        .show_cursor()
        .map_err(|e| terminal_error("show cursor", e))?;
    Ok(())
}

fn leave_screen() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

fn terminal_error(step: &str, e: io::Error) -> TickerboardError {
    TickerboardError::Io(format!("failed to {step}: {e}"))
}
