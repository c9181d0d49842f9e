//! Filter options API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/filters", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/options", get(handler::options))
}
