use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use casting_auth::ClaimSet;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::domain::entity::ActorPatch;
use crate::usecase::create_actor::{CreateActorError, CreateActorInput};
use crate::usecase::delete_actor::DeleteActorError;
use crate::usecase::list_actors::ListActorsError;
use crate::usecase::update_actor::UpdateActorError;

use super::error::ApiError;
use super::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ActorRequest {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub movie_id: Option<u64>,
}

/// GET /actors
pub async fn list_actors(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let actors = state.list_actors_uc.execute().await.map_err(|e| match e {
        ListActorsError::Internal(msg) => ApiError::Internal(msg),
    })?;

    Ok(Json(json!({
        "success": true,
        "actors": actors,
    })))
}

/// POST /actors/new
pub async fn create_actor(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
    body: Result<Json<ActorRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body?;
    debug!(subject = claims.subject().unwrap_or("-"), "create actor requested");

    let input = CreateActorInput {
        name: body.name,
        age: body.age,
        gender: body.gender,
        movie_id: body.movie_id,
    };
    let actor = state
        .create_actor_uc
        .execute(input)
        .await
        .map_err(|e| match e {
            CreateActorError::Validation(msg) => ApiError::Unprocessable(msg),
            CreateActorError::Internal(msg) => ApiError::Internal(msg),
        })?;

    Ok(Json(json!({
        "success": true,
        "actor_id": actor.id,
    })))
}

/// PATCH /actors/update/{id}
pub async fn update_actor(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<ActorRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    debug!(subject = claims.subject().unwrap_or("-"), actor_id = id, "update actor requested");

    let patch = ActorPatch {
        name: body.name,
        age: body.age,
        gender: body.gender,
        movie_id: body.movie_id,
    };
    let actor = state
        .update_actor_uc
        .execute(id, patch)
        .await
        .map_err(|e| match e {
            UpdateActorError::NotFound(_) => ApiError::NotFound,
            UpdateActorError::Validation(msg) => ApiError::Unprocessable(msg),
            UpdateActorError::Internal(msg) => ApiError::Internal(msg),
        })?;

    Ok(Json(json!({
        "success": true,
        "actor_id": actor.id,
    })))
}

/// DELETE /actors/delete/{id}
pub async fn delete_actor(
    State(state): State<AppState>,
    Extension(claims): Extension<ClaimSet>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    debug!(subject = claims.subject().unwrap_or("-"), actor_id = id, "delete actor requested");

    state
        .delete_actor_uc
        .execute(id)
        .await
        .map_err(|e| match e {
            DeleteActorError::NotFound(_) => ApiError::NotFound,
            DeleteActorError::Internal(msg) => ApiError::Internal(msg),
        })?;

    Ok(Json(json!({
        "success": true,
        "deleted": id,
    })))
}
