mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use aero::app::{self, App, Options, DEFAULT_EDITOR, DEFAULT_UPDATE_COMMAND};
use aero::battery;
use aero::config::{Limits, DEFAULT_MAX_ENTRIES};
use aero::launcher::SystemShell;
use aero::paths::{self, SYSTEM_CONFIG};
use aero::terminal::TerminalSurface;
use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "aero", version, about = "Terminal app launcher driven by app-list.txt")]
struct Cli {
    /// App list to use instead of the standard locations
    #[arg(long, env = "AERO_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum number of apps read from the list
    #[arg(long, default_value_t = DEFAULT_MAX_ENTRIES)]
    max_apps: usize,

    /// Shell command run by "Update Aero"
    #[arg(long, default_value = DEFAULT_UPDATE_COMMAND)]
    update_command: String,

    /// Editor for "Edit App List" (defaults to $VISUAL, then $EDITOR, then nano)
    #[arg(long)]
    editor: Option<String>,
}

impl Cli {
    fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("VISUAL").ok().filter(|v| !v.trim().is_empty()))
            .or_else(|| std::env::var("EDITOR").ok().filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let logging_guard = logging::init();

    let limits = Limits {
        max_entries: cli.max_apps,
        ..Limits::default()
    };
    let candidates = paths::candidate_paths(cli.config.as_deref());
    let (config_path, loaded) = match paths::load_first(&candidates, &limits) {
        Ok(found) => found,
        Err(err) => {
            error!(error = %err, "no readable app list");
            print_setup_help(cli.config.is_some(), &err.to_string());
            if let Some(guard) = &logging_guard {
                println!("Log: {}", guard.log_dir().display());
            }
            return ExitCode::FAILURE;
        }
    };

    let options = Options {
        limits,
        update_command: cli.update_command.clone(),
        editor: cli.editor(),
        battery: battery::read_percent,
    };
    let mut app = App::new(config_path, loaded, options);

    match run_app(&mut app) {
        Ok(()) => {
            info!("quit");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "session aborted");
            eprintln!("aero: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_app(app: &mut App) -> Result<()> {
    let mut surface = TerminalSurface::enter()?;
    let result = app::run(app, &mut surface, &mut SystemShell);
    surface.restore()?;
    result
}

fn print_setup_help(explicit: bool, reason: &str) {
    if explicit {
        println!("Could not read the app list: {reason}\n");
    } else {
        println!("No {SYSTEM_CONFIG} found!\n");
    }
    println!("Please run the installer script to set up Aero.");
    println!("To add apps, edit {SYSTEM_CONFIG} and add entries like:");
    println!("  [\n    {{\"name\": \"Text Editor\", \"alias\": \"nano\" }}\n  ]");
    println!("You can use any text editor, e.g. 'nano {SYSTEM_CONFIG}'");
}
