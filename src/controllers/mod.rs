pub mod movies;
pub mod sessions;
pub mod shows;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(movies::routes())
        .merge(shows::routes())
        .merge(sessions::routes())
}
