use tracing::{error, info, warn};

use teamhive::{
    auth::session::SessionKeys, create_db_pool, create_router, init_tracing, AppState, Config,
};

#[tokio::main]
async fn main() {
    let config = Config::from_env();
    init_tracing(&config);

    let issues = config.validate_for_production();
    if !issues.is_empty() {
        for issue in &issues {
            warn!(issue = %issue, "Production configuration issue");
        }
        if config.server.environment.is_production() {
            error!("Refusing to start with invalid production configuration");
            std::process::exit(1);
        }
    }

    let db_pool = create_db_pool(&config);
    let session_keys = SessionKeys::from_env(config.session.expiry_secs, config.session.issuer.clone());
    let state = AppState::new(db_pool, session_keys, &config);
    let router = create_router(state, &config);

    let addr = config.server_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, addr = %addr, "Failed to bind server address");
            std::process::exit(1);
        }
    };

    info!(addr = %addr, "Server listening");

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }

    info!("Server shut down");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
