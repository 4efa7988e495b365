use std::sync::Arc;

use tracing::info;

use crate::domain::entity::{Movie, MoviePatch};
use crate::domain::repository::MovieRepository;

#[derive(Debug, thiserror::Error)]
pub enum UpdateMovieError {
    #[error("movie not found: {0}")]
    NotFound(u64),
    #[error("internal error: {0}")]
    Internal(String),
}

pub struct UpdateMovieUseCase {
    repo: Arc<dyn MovieRepository>,
}

impl UpdateMovieUseCase {
    pub fn new(repo: Arc<dyn MovieRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: u64, patch: MoviePatch) -> Result<Movie, UpdateMovieError> {
        let mut movie = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| UpdateMovieError::Internal(e.to_string()))?
            .ok_or(UpdateMovieError::NotFound(id))?;

        patch.apply(&mut movie);

        self.repo
            .update(&movie)
            .await
            .map_err(|e| UpdateMovieError::Internal(e.to_string()))?;

        info!(movie_id = id, "movie updated");
        Ok(movie)
    }
}
