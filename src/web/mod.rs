pub mod middleware;
pub mod routes;
pub mod session;

use axum::{
    middleware as axum_middleware,
    routing::{get, get_service, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::state::AppState;
use middleware::auth as auth_middleware;
use routes::{auth, favorites, home, places};

pub fn build_router(state: AppState) -> Router {
    // Pages that need a session; everything else decides for itself.
    let protected_routes = Router::new()
        .route("/home", get(home::home_handler))
        .route("/dashboard", get(home::home_handler))
        .route_layer(axum_middleware::from_fn(auth_middleware::require_auth));

    Router::new()
        .route("/", get(auth::login_page).post(auth::login_handler))
        .route("/login", get(auth::login_page).post(auth::login_handler))
        .route("/signup", get(auth::signup_page).post(auth::signup_handler))
        .route(
            "/logout",
            get(auth::logout_handler).post(auth::logout_handler),
        )
        .route("/get_places", get(places::get_places_handler))
        .route("/favorites", get(favorites::list_favorites_handler))
        .route("/favorite", post(favorites::toggle_favorite_handler))
        .merge(protected_routes)
        .nest_service(
            "/assets",
            get_service(ServeDir::new("assets")).layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            )),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::load_session,
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
