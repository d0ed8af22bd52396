use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

pub fn lateness_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_cases).post(post::create_case))
        .route("/archive", post(post::trigger_archive))
        .route("/archive/{year}", get(get::archived_by_year))
        .route(
            "/{case_id}",
            get(get::get_case)
                .put(put::update_case)
                .delete(delete::delete_case),
        )
}
