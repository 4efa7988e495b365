use async_trait::async_trait;

use crate::domain::entity::{Actor, NewActor};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActorRepository: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<Actor>>;
    async fn find_by_id(&self, id: u64) -> anyhow::Result<Option<Actor>>;
    /// 参照先の映画が存在しない場合はエラーを返す。
    async fn create(&self, actor: NewActor) -> anyhow::Result<Actor>;
    async fn update(&self, actor: &Actor) -> anyhow::Result<()>;
    async fn delete(&self, id: u64) -> anyhow::Result<bool>;
}
