use std::sync::Arc;

use tracing::info;

use crate::domain::repository::MovieRepository;

#[derive(Debug, thiserror::Error)]
pub enum DeleteMovieError {
    #[error("movie not found: {0}")]
    NotFound(u64),
    #[error("internal error: {0}")]
    Internal(String),
}

pub struct DeleteMovieUseCase {
    repo: Arc<dyn MovieRepository>,
}

impl DeleteMovieUseCase {
    pub fn new(repo: Arc<dyn MovieRepository>) -> Self {
        Self { repo }
    }

    /// 映画を削除する。出演俳優も削除される。
    pub async fn execute(&self, id: u64) -> Result<(), DeleteMovieError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DeleteMovieError::Internal(e.to_string()))?;

        if !deleted {
            return Err(DeleteMovieError::NotFound(id));
        }

        info!(movie_id = id, "movie deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockMovieRepository;

    #[tokio::test]
    async fn success() {
        let mut mock = MockMovieRepository::new();
        mock.expect_delete()
            .withf(|id| *id == 1)
            .returning(|_| Ok(true));

        let uc = DeleteMovieUseCase::new(Arc::new(mock));
        assert!(uc.execute(1).await.is_ok());
    }

    #[tokio::test]
    async fn not_found() {
        let mut mock = MockMovieRepository::new();
        mock.expect_delete().returning(|_| Ok(false));

        let uc = DeleteMovieUseCase::new(Arc::new(mock));
        assert!(matches!(
            uc.execute(1).await,
            Err(DeleteMovieError::NotFound(1))
        ));
    }

    #[tokio::test]
    async fn error() {
        let mut mock = MockMovieRepository::new();
        mock.expect_delete()
            .returning(|_| Err(anyhow::anyhow!("storage error")));

        let uc = DeleteMovieUseCase::new(Arc::new(mock));
        assert!(matches!(
            uc.execute(1).await,
            Err(DeleteMovieError::Internal(_))
        ));
    }
}
