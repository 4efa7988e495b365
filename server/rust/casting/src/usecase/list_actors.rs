use std::sync::Arc;

use crate::domain::entity::Actor;
use crate::domain::repository::ActorRepository;

#[derive(Debug, thiserror::Error)]
pub enum ListActorsError {
    #[error("internal error: {0}")]
    Internal(String),
}

pub struct ListActorsUseCase {
    repo: Arc<dyn ActorRepository>,
}

impl ListActorsUseCase {
    pub fn new(repo: Arc<dyn ActorRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> Result<Vec<Actor>, ListActorsError> {
        self.repo
            .find_all()
            .await
            .map_err(|e| ListActorsError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockActorRepository;

    #[tokio::test]
    async fn success() {
        let mut mock = MockActorRepository::new();
        mock.expect_find_all().returning(|| {
            Ok(vec![Actor {
                id: 1,
                name: "Ingrid Bergman".to_string(),
                age: 27,
                gender: "female".to_string(),
                movie_id: 1,
            }])
        });

        let uc = ListActorsUseCase::new(Arc::new(mock));
        let actors = uc.execute().await.unwrap();
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].movie_id, 1);
    }

    #[tokio::test]
    async fn error() {
        let mut mock = MockActorRepository::new();
        mock.expect_find_all()
            .returning(|| Err(anyhow::anyhow!("storage error")));

        let uc = ListActorsUseCase::new(Arc::new(mock));
        assert!(matches!(
            uc.execute().await,
            Err(ListActorsError::Internal(_))
        ));
    }
}
