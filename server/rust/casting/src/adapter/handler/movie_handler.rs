use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use casting_auth::ClaimSet;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::domain::entity::MoviePatch;
use crate::usecase::create_movie::{CreateMovieError, CreateMovieInput};
use crate::usecase::delete_movie::DeleteMovieError;
use crate::usecase::list_movies::ListMoviesError;
use crate::usecase::update_movie::UpdateMovieError;

use super::error::ApiError;
use super::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MovieRequest {
    pub title: Option<String>,
    pub release_year: Option<u32>,
}

/// GET /movies
pub async fn list_movies(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let movies = state.list_movies_uc.execute().await.map_err(|e| match e {
        ListMoviesError::Internal(msg) => ApiError::Internal(msg),
    })?;

    Ok(Json(json!({
        "success": true,
        "movies": movies,
    })))
}

/// POST /movies/new
pub async fn create_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
    body: Result<Json<MovieRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body?;
    debug!(subject = claims.subject().unwrap_or("-"), "create movie requested");

    let input = CreateMovieInput {
        title: body.title,
        release_year: body.release_year,
    };
    let movie = state
        .create_movie_uc
        .execute(input)
        .await
        .map_err(|e| match e {
            CreateMovieError::Validation(msg) => ApiError::Unprocessable(msg),
            CreateMovieError::Internal(msg) => ApiError::Internal(msg),
        })?;

    Ok(Json(json!({
        "success": true,
        "movie_id": movie.id,
    })))
}

/// PATCH /movies/update/{id}
pub async fn update_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<MovieRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    debug!(subject = claims.subject().unwrap_or("-"), movie_id = id, "update movie requested");

    let patch = MoviePatch {
        title: body.title,
        release_year: body.release_year,
    };
    let movie = state
        .update_movie_uc
        .execute(id, patch)
        .await
        .map_err(|e| match e {
            UpdateMovieError::NotFound(_) => ApiError::NotFound,
            UpdateMovieError::Internal(msg) => ApiError::Internal(msg),
        })?;

    Ok(Json(json!({
        "success": true,
        "movie_id": movie.id,
    })))
}

/// DELETE /movies/delete/{id}
pub async fn delete_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    debug!(subject = claims.subject().unwrap_or("-"), movie_id = id, "delete movie requested");

    state
        .delete_movie_uc
        .execute(id)
        .await
        .map_err(|e| match e {
            DeleteMovieError::NotFound(_) => ApiError::NotFound,
            DeleteMovieError::Internal(msg) => ApiError::Internal(msg),
        })?;

    Ok(Json(json!({
        "success": true,
        "deleted": id,
    })))
}
