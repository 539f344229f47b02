pub mod dto;
pub mod handlers;
pub mod repo;
pub mod service;
pub mod slots;
pub mod upstream;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::router()
}
