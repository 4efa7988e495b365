use std::sync::Arc;

use tracing::info;

use crate::domain::repository::ActorRepository;

#[derive(Debug, thiserror::Error)]
pub enum DeleteActorError {
    #[error("actor not found: {0}")]
    NotFound(u64),
    #[error("internal error: {0}")]
    Internal(String),
}

pub struct DeleteActorUseCase {
    repo: Arc<dyn ActorRepository>,
}

impl DeleteActorUseCase {
    pub fn new(repo: Arc<dyn ActorRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: u64) -> Result<(), DeleteActorError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DeleteActorError::Internal(e.to_string()))?;

        if !deleted {
            return Err(DeleteActorError::NotFound(id));
        }

        info!(actor_id = id, "actor deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockActorRepository;

    #[tokio::test]
    async fn success() {
        let mut mock = MockActorRepository::new();
        mock.expect_delete().returning(|_| Ok(true));

        let uc = DeleteActorUseCase::new(Arc::new(mock));
        assert!(uc.execute(3).await.is_ok());
    }

    #[tokio::test]
    async fn not_found() {
        let mut mock = MockActorRepository::new();
        mock.expect_delete().returning(|_| Ok(false));

        let uc = DeleteActorUseCase::new(Arc::new(mock));
        assert!(matches!(
            uc.execute(3).await,
            Err(DeleteActorError::NotFound(3))
        ));
    }
}
