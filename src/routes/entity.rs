//! Entity CRUD routes: JSON endpoints plus the form-driven paths used by the HTML views.

use crate::handlers::entity::{create, delete as delete_handler, delete_view, home, list, read, update};
use crate::model::{Agence, Resource, Vehicule};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

/// Routes for one resource under `/<path_segment>`.
fn resource_routes<R: Resource>() -> Router<AppState> {
    let base = format!("/{}", R::def().path_segment);
    Router::new()
        .route(&base, get(list::<R>).post(create::<R>))
        .route(&format!("{}/add", base), post(create::<R>))
        .route(
            &format!("{}/:id", base),
            get(read::<R>)
                .put(update::<R>)
                .post(update::<R>)
                .delete(delete_handler::<R>),
        )
        .route(&format!("{}/update/:id", base), post(update::<R>))
        .route(&format!("{}/delete/:id", base), post(delete_view::<R>))
}

pub fn entity_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .merge(resource_routes::<Agence>())
        .merge(resource_routes::<Vehicule>())
        .with_state(state)
}
