// Entrypoint for the CLI application.
// - Keeps `main` small: resolve config, log in, hand the session to the
//   menu loop.
// - Returns `anyhow::Result`; a failed first login ends the process.

use anyhow::Context;
use arty_cli::api::{ApiClient, Credentials};
use arty_cli::cli::Cli;
use arty_cli::config::Config;
use arty_cli::session::Session;
use arty_cli::ui::{main_menu, Prompt, TerminalPrompt};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // Logs go to stderr so they never mix with menu output.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    let mut prompt = TerminalPrompt;
    let password = prompt.secret(&format!("Password for {}", cli.username))?;

    let api = ApiClient::new(&config.base_url)?;
    let mut session = Session::open(Credentials::new(&cli.username, password), &config.group, api)
        .with_context(|| format!("could not log in to {}", config.base_url))?;

    // Blocks until the operator picks Exit.
    let stdout = std::io::stdout();
    main_menu(&mut session, &mut prompt, &mut stdout.lock())?;
    Ok(())
}
