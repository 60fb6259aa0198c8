//! HTTP Server
//!
//! Exposes the dynamic schema on `POST /graphql` with a health probe and,
//! in debug builds, the GraphQL playground.

use async_graphql::dynamic::Schema;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use scriptgate_core::Result;
use std::future::Future;
use tracing::info;

/// Build the gateway router around an executable schema.
pub fn router(schema: Schema) -> Router {
    #[cfg(debug_assertions)]
    let graphql_routes = post(graphql_handler).get(graphql_playground);
    #[cfg(not(debug_assertions))]
    let graphql_routes = post(graphql_handler);

    Router::new()
        .route("/graphql", graphql_routes)
        .route("/healthz", get(healthz))
        .with_state(schema)
}

/// Bind and serve until the shutdown future resolves.
///
/// Inbound requests are interleaved cooperatively; each one spawns its own
/// subprocess and there is no shared mutable state between them. No
/// admission control or concurrency cap is applied.
pub async fn serve(
    schema: Schema,
    addr: &str,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "GraphQL gateway listening");

    axum::serve(listener, router(schema))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn graphql_handler(State(schema): State<Schema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn healthz() -> &'static str {
    "ok"
}

/// GraphQL playground (development builds only)
#[cfg(debug_assertions)]
async fn graphql_playground() -> axum::response::Html<String> {
    axum::response::Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
    ))
}
