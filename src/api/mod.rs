//! HTTP API for spots, photo uploads and coordinate parsing

pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
