mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use log::{error, info};
use overlay_atlas::config::{init_runtime_paths, load_config};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let paths = init_runtime_paths();

    let headless = args.headless || args.json || !is_terminal();
    if args.debug || headless {
        colog::init();
    }

    let config = match load_config(&paths.config_path).await {
        Ok(config) => config,
        Err(e) => {
            error!(
                "Failed to load config {}: {e}",
                paths.config_path.display()
            );
            eprintln!("{}", CliArgs::help_text());
            return Err(e.into());
        }
    };
    info!(
        "config {} lists {} overlay files",
        paths.config_path.display(),
        config.overlay_files.len()
    );

    if headless {
        return event::run_headless(&config, &paths, args.center, args.json).await;
    }

    let loader = event::spawn_loader(&config, &paths);
    let mut app = App::new(config);

    // Setup terminal
    let mut terminal = terminal::setup_terminal()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app, loader).await;

    // Restore terminal
    terminal::cleanup_terminal_state(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
