use std::sync::Arc;

use crate::domain::entity::Movie;
use crate::domain::repository::MovieRepository;

#[derive(Debug, thiserror::Error)]
pub enum ListMoviesError {
    #[error("internal error: {0}")]
    Internal(String),
}

pub struct ListMoviesUseCase {
    repo: Arc<dyn MovieRepository>,
}

impl ListMoviesUseCase {
    pub fn new(repo: Arc<dyn MovieRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> Result<Vec<Movie>, ListMoviesError> {
        self.repo
            .find_all()
            .await
            .map_err(|e| ListMoviesError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockMovieRepository;

    #[tokio::test]
    async fn success() {
        let mut mock = MockMovieRepository::new();
        mock.expect_find_all().returning(|| {
            Ok(vec![Movie {
                id: 1,
                title: "Casablanca".to_string(),
                release_year: 1942,
            }])
        });

        let uc = ListMoviesUseCase::new(Arc::new(mock));
        let movies = uc.execute().await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Casablanca");
    }

    #[tokio::test]
    async fn empty_is_not_an_error() {
        let mut mock = MockMovieRepository::new();
        mock.expect_find_all().returning(|| Ok(vec![]));

        let uc = ListMoviesUseCase::new(Arc::new(mock));
        assert!(uc.execute().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn error() {
        let mut mock = MockMovieRepository::new();
        mock.expect_find_all()
            .returning(|| Err(anyhow::anyhow!("storage error")));

        let uc = ListMoviesUseCase::new(Arc::new(mock));
        match uc.execute().await.unwrap_err() {
            ListMoviesError::Internal(msg) => assert!(msg.contains("storage error")),
        }
    }
}
