use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

use anyhow::Result;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use tracing::{debug, warn};

use crate::config::AppEntry;
use crate::terminal::Surface;

pub const RETURN_PROMPT: &str = "\nPress Enter to return to Aero...";
pub const CONTINUE_PROMPT: &str = "Press Enter to continue...";

/// Runs command strings for the launcher.
pub trait Shell {
    /// Runs `command` to completion and reports its exit code, if any.
    fn execute(&mut self, command: &str) -> io::Result<Option<i32>>;
    /// Prints `prompt` and blocks until the user confirms.
    fn acknowledge(&mut self, prompt: &str) -> io::Result<()>;
}

/// `sh -c` on the real terminal.
#[derive(Debug, Default)]
pub struct SystemShell;

impl Shell for SystemShell {
    fn execute(&mut self, command: &str) -> io::Result<Option<i32>> {
        let mut stdout = io::stdout();
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        let status = Command::new("sh").arg("-c").arg(command).status()?;
        Ok(status.code())
    }

    fn acknowledge(&mut self, prompt: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;
        io::stdin().read_line(&mut String::new())?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingCommand {
    pub command: String,
    pub pause: bool,
    pub prompt: &'static str,
}

impl PendingCommand {
    pub fn launch(entry: &AppEntry) -> Self {
        Self {
            command: entry.alias.clone(),
            pause: entry.enter_to_return,
            prompt: RETURN_PROMPT,
        }
    }

    pub fn maintenance(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            pause: true,
            prompt: CONTINUE_PROMPT,
        }
    }
}

/// `editor 'path'`, quoting the path for `sh`.
pub fn editor_command(editor: &str, path: &Path) -> String {
    let path = path.to_string_lossy().replace('\'', r"'\''");
    format!("{editor} '{path}'")
}

/// Releases the surface around `f` and reacquires it whatever `f` returned.
pub fn with_suspension<S, F, T>(surface: &mut S, f: F) -> Result<T>
where
    S: Surface + ?Sized,
    F: FnOnce() -> Result<T>,
{
    surface.suspend()?;
    let result = f();
    surface.resume()?;
    result
}

/// Hands the terminal to `pending.command`. The exit status is only logged.
pub fn run_command<S, H>(surface: &mut S, shell: &mut H, pending: &PendingCommand) -> Result<()>
where
    S: Surface + ?Sized,
    H: Shell + ?Sized,
{
    with_suspension(surface, || {
        let acknowledged = match shell.execute(&pending.command) {
            Ok(code) => {
                debug!(command = %pending.command, ?code, "command finished");
                if pending.pause {
                    shell.acknowledge(pending.prompt)
                } else {
                    Ok(())
                }
            }
            Err(err) => {
                warn!(command = %pending.command, error = %err, "failed to run command");
                shell.acknowledge(&format!("Failed to run command: {err}\n{CONTINUE_PROMPT}"))
            }
        };
        if let Err(err) = acknowledged {
            warn!(command = %pending.command, error = %err, "acknowledgment not read");
        }
        Ok(())
    })
}
