use async_trait::async_trait;

use crate::domain::entity::{Movie, NewMovie};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<Movie>>;
    async fn find_by_id(&self, id: u64) -> anyhow::Result<Option<Movie>>;
    async fn create(&self, movie: NewMovie) -> anyhow::Result<Movie>;
    async fn update(&self, movie: &Movie) -> anyhow::Result<()>;
    /// 映画と、その映画に出演する俳優をまとめて削除する。存在しなければ false。
    async fn delete(&self, id: u64) -> anyhow::Result<bool>;
}
