use axum::{
    Router,
    routing::get,
};
use util::state::AppState;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_users).post(post::create_user))
        .route(
            "/{user_id}",
            get(get::get_user)
                .put(put::update_user)
                .delete(delete::delete_user),
        )
}
