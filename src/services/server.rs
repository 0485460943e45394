use anyhow::Result;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use super::leaderboard::LeaderboardService;
use crate::api::LeetCodeClient;
use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::config::AppConfig;

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        let client = LeetCodeClient::new(&self.config.fetcher, self.config.scoring.weekly_breakdown)?;
        let service = LeaderboardService::open(&self.config, client);
        info!(
            "Serving {} users from {}",
            service.usernames().len(),
            self.config.store.data_file.display()
        );

        let state = Arc::new(AppState::new(service));
        let app = create_router(state).layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
