// src/main.rs

use std::sync::Arc;

use quill::application::{build_router, AppState};
use quill::config::AppConfig;
use quill::db::{create_connection_pool, get_connection, initialize_database};
use quill::logging::init_logging;
use quill::theme::select_view_resolver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. CONFIGURATION + LOGGING
    let config = AppConfig::from_env()?;
    let _logger = init_logging(&config.log_level)?;

    // 2. DATABASE
    let pool = Arc::new(create_connection_pool(&config.database_path, config.pool_size)?);
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
    }

    // 3. VIEW RESOLUTION (chosen once for the process)
    let views = select_view_resolver(config.themes_enabled, &config.web_root);

    // 4. APPLICATION STATE + ROUTES
    let state = AppState::new(pool, config.conflict_policy, views);
    let app = build_router(state, &config.web_root);

    // 5. SERVE
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
