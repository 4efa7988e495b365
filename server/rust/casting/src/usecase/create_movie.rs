use std::sync::Arc;

use tracing::info;

use crate::domain::entity::{Movie, NewMovie};
use crate::domain::repository::MovieRepository;

#[derive(Debug, Clone, Default)]
pub struct CreateMovieInput {
    pub title: Option<String>,
    pub release_year: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateMovieError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub struct CreateMovieUseCase {
    repo: Arc<dyn MovieRepository>,
}

impl CreateMovieUseCase {
    pub fn new(repo: Arc<dyn MovieRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: CreateMovieInput) -> Result<Movie, CreateMovieError> {
        let title = input
            .title
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CreateMovieError::Validation("title is required".to_string()))?;
        let release_year = input
            .release_year
            .filter(|y| *y != 0)
            .ok_or_else(|| {
                CreateMovieError::Validation("release_year is required".to_string())
            })?;

        let movie = self
            .repo
            .create(NewMovie {
                title,
                release_year,
            })
            .await
            .map_err(|e| CreateMovieError::Internal(e.to_string()))?;

        info!(movie_id = movie.id, "movie created");
        Ok(movie)
    }
}
