use std::sync::Arc;

use tracing::info;

use crate::domain::entity::{Actor, NewActor};
use crate::domain::repository::{ActorRepository, MovieRepository};

#[derive(Debug, Clone, Default)]
pub struct CreateActorInput {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub movie_id: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateActorError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub struct CreateActorUseCase {
    actor_repo: Arc<dyn ActorRepository>,
    movie_repo: Arc<dyn MovieRepository>,
}

impl CreateActorUseCase {
    pub fn new(actor_repo: Arc<dyn ActorRepository>, movie_repo: Arc<dyn MovieRepository>) -> Self {
        Self {
            actor_repo,
            movie_repo,
        }
    }

    pub async fn execute(&self, input: CreateActorInput) -> Result<Actor, CreateActorError> {
        let new_actor = validate(input)?;

        let movie = self
            .movie_repo
            .find_by_id(new_actor.movie_id)
            .await
            .map_err(|e| CreateActorError::Internal(e.to_string()))?;
        if movie.is_none() {
            return Err(CreateActorError::Validation(format!(
                "movie {} does not exist",
                new_actor.movie_id
            )));
        }

        let actor = self
            .actor_repo
            .create(new_actor)
            .await
            .map_err(|e| CreateActorError::Internal(e.to_string()))?;

        info!(actor_id = actor.id, movie_id = actor.movie_id, "actor created");
        Ok(actor)
    }
}

fn validate(input: CreateActorInput) -> Result<NewActor, CreateActorError> {
    let missing = |field: &str| CreateActorError::Validation(format!("{field} is required"));

    Ok(NewActor {
        name: input
            .name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| missing("name"))?,
        age: input.age.filter(|a| *a != 0).ok_or_else(|| missing("age"))?,
        gender: input
            .gender
            .filter(|g| !g.is_empty())
            .ok_or_else(|| missing("gender"))?,
        movie_id: input
            .movie_id
            .filter(|id| *id != 0)
            .ok_or_else(|| missing("movie_id"))?,
    })
}
