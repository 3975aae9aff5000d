use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use engine::Engine;

use crate::{maintenance, tags, transactions, transfers, wallets};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

pub fn router(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route("/wallets", get(wallets::list).post(wallets::create))
        .route(
            "/wallets/{id}",
            get(wallets::get_one)
                .patch(wallets::update)
                .delete(wallets::delete),
        )
        .route("/overview", get(wallets::overview))
        .route("/tags", get(tags::list).post(tags::create))
        .route(
            "/tags/{id}",
            axum::routing::patch(tags::update).delete(tags::delete),
        )
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get_one)
                .patch(transactions::update)
                .delete(transactions::delete),
        )
        .route("/transfers", post(transfers::create))
        .route("/transfers/{id}", axum::routing::delete(transfers::delete))
        .route(
            "/snapshot",
            get(maintenance::export).post(maintenance::import),
        )
        .route("/maintenance/recompute", post(maintenance::recompute))
        .route("/maintenance/clear", post(maintenance::clear))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
