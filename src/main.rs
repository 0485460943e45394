use anyhow::Result;

use leetcode_leaderboard::cli::{Cli, Command};
use leetcode_leaderboard::store::SortOrder;
use leetcode_leaderboard::{
    handle_add, handle_completions, handle_details, handle_list, handle_remove, handle_serve, handle_show,
    handle_update, interpret, load_config,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let cli = interpret();
    execute_command(&cli)
}

fn execute_command(cli: &Cli) -> Result<()> {
    let config = load_config(cli);
    match &cli.command {
        Command::Serve { port } => handle_serve(config, *port),
        Command::Add { username } => handle_add(&config, username),
        Command::Remove { username } => handle_remove(&config, username),
        Command::Update { username } => handle_update(&config, username.as_deref()),
        Command::Show { sort_by, asc, desc } => handle_show(&config, sort_by, sort_order(*asc, *desc)),
        Command::Details { username } => handle_details(&config, username),
        Command::List => handle_list(&config),
        Command::Completions { shell } => handle_completions(*shell),
    }
}

fn sort_order(asc: bool, desc: bool) -> Option<SortOrder> {
    match (asc, desc) {
        (true, _) => Some(SortOrder::Asc),
        (_, true) => Some(SortOrder::Desc),
        _ => None,
    }
}
