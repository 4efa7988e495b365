use std::sync::Arc;

use tracing::info;

use crate::domain::entity::{Actor, ActorPatch};
use crate::domain::repository::{ActorRepository, MovieRepository};

#[derive(Debug, thiserror::Error)]
pub enum UpdateActorError {
    #[error("actor not found: {0}")]
    NotFound(u64),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub struct UpdateActorUseCase {
    actor_repo: Arc<dyn ActorRepository>,
    movie_repo: Arc<dyn MovieRepository>,
}

impl UpdateActorUseCase {
    pub fn new(actor_repo: Arc<dyn ActorRepository>, movie_repo: Arc<dyn MovieRepository>) -> Self {
        Self {
            actor_repo,
            movie_repo,
        }
    }

    pub async fn execute(&self, id: u64, patch: ActorPatch) -> Result<Actor, UpdateActorError> {
        let mut actor = self
            .actor_repo
            .find_by_id(id)
            .await
            .map_err(|e| UpdateActorError::Internal(e.to_string()))?
            .ok_or(UpdateActorError::NotFound(id))?;

        if let Some(movie_id) = patch.target_movie() {
            let movie = self
                .movie_repo
                .find_by_id(movie_id)
                .await
                .map_err(|e| UpdateActorError::Internal(e.to_string()))?;
            if movie.is_none() {
                return Err(UpdateActorError::Validation(format!(
                    "movie {movie_id} does not exist"
                )));
            }
        }

        patch.apply(&mut actor);

        self.actor_repo
            .update(&actor)
            .await
            .map_err(|e| UpdateActorError::Internal(e.to_string()))?;

        info!(actor_id = id, "actor updated");
        Ok(actor)
    }
}
