pub mod actor_handler;
pub mod error;
pub mod health;
pub mod movie_handler;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use casting_auth::{require_permission, PermissionGate};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::infrastructure::config::CorsConfig;
use crate::usecase::*;

#[derive(Clone)]
pub struct AppState {
    pub list_movies_uc: Arc<ListMoviesUseCase>,
    pub create_movie_uc: Arc<CreateMovieUseCase>,
    pub update_movie_uc: Arc<UpdateMovieUseCase>,
    pub delete_movie_uc: Arc<DeleteMovieUseCase>,
    pub list_actors_uc: Arc<ListActorsUseCase>,
    pub create_actor_uc: Arc<CreateActorUseCase>,
    pub update_actor_uc: Arc<UpdateActorUseCase>,
    pub delete_actor_uc: Arc<DeleteActorUseCase>,
    pub gate: Arc<PermissionGate>,
}

/// ルーティングを組み立てる。
///
/// 保護されたルートはそれぞれ必要なパーミッションを route_layer で持つため、
/// 認証はパスやボディの解析より先に行われる。メソッド違いは認証せず 405 を返す。
pub fn router(state: AppState, cors: &CorsConfig) -> Router {
    let gate = state.gate.clone();

    let movies = Router::new()
        .route(
            "/movies",
            get(movie_handler::list_movies).route_layer(middleware::from_fn(
                require_permission(gate.clone(), "view:movies"),
            )),
        )
        .route(
            "/movies/new",
            post(movie_handler::create_movie).route_layer(middleware::from_fn(
                require_permission(gate.clone(), "create:movie"),
            )),
        )
        .route(
            "/movies/delete/{id}",
            delete(movie_handler::delete_movie).route_layer(middleware::from_fn(
                require_permission(gate.clone(), "delete:movie"),
            )),
        )
        .route(
            "/movies/update/{id}",
            patch(movie_handler::update_movie).route_layer(middleware::from_fn(
                require_permission(gate.clone(), "edit:movie"),
            )),
        );

    let actors = Router::new()
        .route(
            "/actors",
            get(actor_handler::list_actors).route_layer(middleware::from_fn(
                require_permission(gate.clone(), "view:actors"),
            )),
        )
        .route(
            "/actors/new",
            post(actor_handler::create_actor).route_layer(middleware::from_fn(
                require_permission(gate.clone(), "create:actor"),
            )),
        )
        .route(
            "/actors/delete/{id}",
            delete(actor_handler::delete_actor).route_layer(middleware::from_fn(
                require_permission(gate.clone(), "delete:actor"),
            )),
        )
        .route(
            "/actors/update/{id}",
            patch(actor_handler::update_actor).route_layer(middleware::from_fn(
                require_permission(gate, "edit:actor"),
            )),
        );

    Router::new()
        .route("/", get(health::check_app))
        .merge(movies)
        .merge(actors)
        .fallback(error::not_found)
        .method_not_allowed_fallback(error::method_not_allowed)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors))
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if cors.allows_any() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
