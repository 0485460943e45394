pub mod api;
pub mod cli;
pub mod config;
pub mod display;
pub mod domain;
pub mod errors;
pub mod http;
pub mod scoring;
pub mod services;
pub mod store;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use colored::*;
use std::io;

use crate::api::LeetCodeClient;
use crate::config::AppConfig;
use crate::errors::LeaderboardError;
use crate::services::leaderboard::LeaderboardService;
use crate::services::server::ServerService;
use crate::store::{SortKey, SortOrder};

pub fn interpret() -> Cli {
    Cli::parse()
}

/// Environment settings with command-line flags layered on top
pub fn load_config(cli: &Cli) -> AppConfig {
    AppConfig::from_env()
        .with_data_file(cli.data_file.clone())
        .with_weekly_breakdown(cli.weekly_breakdown)
}

fn open_service(config: &AppConfig) -> Result<LeaderboardService<LeetCodeClient>> {
    let client = LeetCodeClient::new(&config.fetcher, config.scoring.weekly_breakdown)?;
    Ok(LeaderboardService::open(config, client))
}

pub fn handle_serve(config: AppConfig, port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_add(config: &AppConfig, username: &str) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = open_service(config)?;
        let record = service.add_or_refresh(username).await?;
        println!(
            "{} {} (score {}, weekly {})",
            "Added".green(),
            record.username.bold(),
            record.base_score,
            record.weekly_base_score
        );
        Ok(())
    })
}

pub fn handle_remove(config: &AppConfig, username: &str) -> Result<()> {
    let service = open_service(config)?;
    if service.remove(username)? {
        println!("{} {}", "Removed".green(), username);
    } else {
        println!("{}", format!("{username} is not on the leaderboard").yellow());
    }
    Ok(())
}

pub fn handle_update(config: &AppConfig, username: Option<&str>) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = open_service(config)?;
        match username {
            Some(username) => {
                let record = service.refresh_user(username).await?;
                println!(
                    "{} {} (score {}, weekly {})",
                    "Updated".green(),
                    record.username.bold(),
                    record.base_score,
                    record.weekly_base_score
                );
            }
            None => {
                let report = service.refresh_all().await;
                display::print_refresh_report(&report);
                if let Some(error) = report.persistence_error {
                    return Err(LeaderboardError::from(error).into());
                }
            }
        }
        Ok(())
    })
}

pub fn handle_show(config: &AppConfig, sort_by: &str, order: Option<SortOrder>) -> Result<()> {
    let key: SortKey = sort_by.parse()?;
    let service = open_service(config)?;
    let ranked = service.list(sort_by, order)?;
    display::print_leaderboard(&ranked, key, &service.summary());
    Ok(())
}

pub fn handle_details(config: &AppConfig, username: &str) -> Result<()> {
    let service = open_service(config)?;
    let record = service
        .get(username)
        .ok_or_else(|| LeaderboardError::RecordNotFound(username.to_string()))?;
    display::print_details(&record);
    Ok(())
}

pub fn handle_list(config: &AppConfig) -> Result<()> {
    let service = open_service(config)?;
    display::print_usernames(&service.usernames());
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}
