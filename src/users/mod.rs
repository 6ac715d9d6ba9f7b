use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod service;
pub mod store;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
