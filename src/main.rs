#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use std::net::SocketAddr;

use anyhow::Result;
use axum::Extension;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::router;
use crate::bookmarks::BookmarkStore;
use crate::persistence::Backend;
use crate::persistence::Config as PersistenceConfig;
use crate::persistence::KeyValuePersistence;
use crate::store::NoteStore;
use crate::utils::env_var_optional;
use crate::utils::env_var_or_else;

mod api;
mod bookmarks;
mod collation;
mod document;
mod graceful_shutdown;
mod notes;
mod persistence;
mod store;
#[cfg(test)]
mod tests;
mod utils;

const DEFAULT_RUST_LOG: &str = "notekeeper=debug,tower_http=debug";
const DEFAULT_ADDRESS: &str = "127.0.0.1:6000";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let app = setup_app(PersistenceConfig::from_env()).await?;

    let address = setup_address()?;
    let listener = TcpListener::bind(address).await?;
    tracing::info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
///
/// # Errors
///
/// Will return `Err` when the persistence backend can not be set up
pub async fn setup_app(config: PersistenceConfig) -> Result<Router> {
    let router = match persistence::setup(config).await? {
        Backend::Memory(memory) => create_router(memory).await,
        Backend::Sqlite(sqlite) => create_router(sqlite).await,
    };

    Ok(router)
}

/// Create the router for Notekeeper
///
/// Unreadable collections do not stop the app. They start empty, refuse
/// writes and can be reloaded once fixed
async fn create_router<P: KeyValuePersistence>(persistence: P) -> Router {
    let notes = match NoteStore::open(persistence.clone()).await {
        Ok(notes) => notes,
        Err(err) => {
            tracing::warn!("Failed to load notes, starting empty: {err}");

            NoteStore::new(persistence.clone())
        }
    };

    let mut bookmarks = BookmarkStore::new(persistence);
    if let Err(err) = bookmarks.load().await {
        tracing::warn!("Failed to load bookmarks, starting empty: {err}");
    }

    Router::new()
        .nest("/api", router::<P>())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(notes.shared()))
        .layer(Extension(bookmarks.shared()))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(env_var_or_else("RUST_LOG", || {
            String::from(DEFAULT_RUST_LOG)
        })))
        .with(fmt::layer())
        .init();
}

fn setup_address() -> Result<SocketAddr> {
    let mut address =
        env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS)).parse::<SocketAddr>()?;

    // optional override of just the port
    if let Some(port) = env_var_optional("PORT") {
        address.set_port(port.parse::<u16>()?);
    }

    Ok(address)
}
