use axum::Router;

use crate::state::AppState;

pub mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod password;
pub mod service;
pub mod store;
pub mod token;
pub mod validate;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
