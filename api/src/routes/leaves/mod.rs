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

pub fn leaves_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::leave_history).post(post::create_leave))
        .route("/pending", get(get::pending_leave))
        .route("/all-pending", get(get::all_pending))
        .route("/all-history", get(get::all_history))
        .route("/archive", post(post::trigger_archive))
        .route("/archive/{year}", get(get::archived_by_year))
        .route(
            "/{leave_id}",
            get(get::get_leave)
                .put(put::update_leave)
                .delete(delete::delete_leave),
        )
        .route("/{leave_id}/return", post(post::record_return))
}
