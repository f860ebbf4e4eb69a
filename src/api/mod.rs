//! All API endpoint setup

use axum::Router;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;

pub use request::Form;
pub use request::PathParameters;
pub use request::QueryParameters;
pub use response::Error;
pub use response::Success;

use crate::persistence::KeyValuePersistence;

mod bookmarks;
mod notes;
mod request;
mod response;

/// Get the Axum router for all API routes
pub fn router<P: KeyValuePersistence>() -> Router {
    let notes = Router::new()
        .route(
            "/",
            get(notes::list::<P>)
                .post(notes::create::<P>)
                .delete(notes::clear::<P>),
        )
        .route(
            "/{note}",
            get(notes::single::<P>)
                .patch(notes::update::<P>)
                .delete(notes::delete::<P>),
        )
        .route("/{note}/category", put(notes::move_category::<P>));

    let bookmarks = Router::new()
        .route("/", get(bookmarks::list::<P>).post(bookmarks::create::<P>))
        .route("/{bookmark}", delete(bookmarks::delete::<P>));

    Router::new()
        .route("/categories", get(notes::categories))
        // outside of /notes, every path below it can be a note ID
        .route("/reload", post(notes::reload::<P>))
        .nest("/notes", notes)
        .nest("/bookmarks", bookmarks)
}
