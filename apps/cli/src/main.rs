mod cli;
mod commands;
mod config;
mod db;
mod demo;
mod error;
mod preview;
mod terminal;

use clap::Parser;
use cli::{CliArgs, Command};
use color_eyre::Result;
use db::SplitStore;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    init_logging(args.debug);

    let Some(command) = args.command else {
        print!("{}", CliArgs::help_text());
        return Ok(());
    };

    match command {
        Command::Demo(demo) => commands::demo(demo.weeks, demo.seed),
        Command::Preview(demo) => run_preview(demo.weeks, demo.seed),
        command => {
            let store = open_store().await?;
            let result = run_store_command(&store, command).await;
            store.close().await;
            result
        }
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();
}

async fn open_store() -> Result<SplitStore> {
    let config = config::init_app_config()?;
    let (local, remote) = db::open_stores(&config).await?;
    Ok(SplitStore::new(local, remote))
}

async fn run_store_command(store: &SplitStore, command: Command) -> Result<()> {
    match command {
        Command::Init => commands::init(store),
        Command::Add(add) => commands::add(store, add).await,
        Command::List(output) => commands::list(store, output).await,
        Command::Show { uuid, output } => commands::show(store, &uuid, output).await,
        Command::Contact { uuid, output } => commands::contact(store, &uuid, output).await,
        Command::Edit { uuid, age, height } => commands::edit(store, &uuid, &age, &height).await,
        Command::Delete { uuid } => commands::delete(store, &uuid).await,
        Command::Export => commands::export(store).await,
        Command::Verify(output) => commands::verify(store, output).await,
        Command::Demo(demo) => commands::demo(demo.weeks, demo.seed),
        Command::Preview(demo) => run_preview(demo.weeks, demo.seed),
    }
}

fn run_preview(weeks: usize, seed: Option<u64>) -> Result<()> {
    // Without a terminal there is nothing to draw on; print the charts instead.
    if !is_terminal() {
        return commands::demo(weeks, seed);
    }

    let mut state = preview::PreviewState::new(weeks, seed)?;
    let mut tui = terminal::setup_terminal()?;
    let result = preview::run(&mut tui, &mut state);
    terminal::cleanup_terminal_state(true, true);
    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
