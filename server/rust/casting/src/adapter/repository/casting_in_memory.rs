use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entity::{Actor, Movie, NewActor, NewMovie};
use crate::domain::repository::{ActorRepository, MovieRepository};

#[derive(Default)]
struct Tables {
    movies: BTreeMap<u64, Movie>,
    actors: BTreeMap<u64, Actor>,
    last_movie_id: u64,
    last_actor_id: u64,
}

/// InMemoryCastingStore は映画と俳優を保持するインメモリストア。
///
/// 両テーブルを一つのロックで守るため、映画削除時の俳優の連鎖削除と
/// 俳優登録時の参照チェックは他の書き込みと競合しない。ID は 1 から順に採番する。
#[derive(Default)]
pub struct InMemoryCastingStore {
    tables: RwLock<Tables>,
}

impl InMemoryCastingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieRepository for InMemoryCastingStore {
    async fn find_all(&self) -> anyhow::Result<Vec<Movie>> {
        let tables = self.tables.read().await;
        Ok(tables.movies.values().cloned().collect())
    }

    async fn find_by_id(&self, id: u64) -> anyhow::Result<Option<Movie>> {
        let tables = self.tables.read().await;
        Ok(tables.movies.get(&id).cloned())
    }

    async fn create(&self, movie: NewMovie) -> anyhow::Result<Movie> {
        let mut tables = self.tables.write().await;
        tables.last_movie_id += 1;
        let movie = movie.into_movie(tables.last_movie_id);
        tables.movies.insert(movie.id, movie.clone());
        Ok(movie)
    }

    async fn update(&self, movie: &Movie) -> anyhow::Result<()> {
        let mut tables = self.tables.write().await;
        match tables.movies.get_mut(&movie.id) {
            Some(stored) => {
                *stored = movie.clone();
                Ok(())
            }
            None => anyhow::bail!("movie {} does not exist", movie.id),
        }
    }

    async fn delete(&self, id: u64) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.movies.remove(&id).is_none() {
            return Ok(false);
        }
        tables.actors.retain(|_, actor| actor.movie_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ActorRepository for InMemoryCastingStore {
    async fn find_all(&self) -> anyhow::Result<Vec<Actor>> {
        let tables = self.tables.read().await;
        Ok(tables.actors.values().cloned().collect())
    }

    async fn find_by_id(&self, id: u64) -> anyhow::Result<Option<Actor>> {
        let tables = self.tables.read().await;
        Ok(tables.actors.get(&id).cloned())
    }

    async fn create(&self, actor: NewActor) -> anyhow::Result<Actor> {
        let mut tables = self.tables.write().await;
        if !tables.movies.contains_key(&actor.movie_id) {
            anyhow::bail!("movie {} does not exist", actor.movie_id);
        }
        tables.last_actor_id += 1;
        let actor = actor.into_actor(tables.last_actor_id);
        tables.actors.insert(actor.id, actor.clone());
        Ok(actor)
    }

    async fn update(&self, actor: &Actor) -> anyhow::Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.movies.contains_key(&actor.movie_id) {
            anyhow::bail!("movie {} does not exist", actor.movie_id);
        }
        match tables.actors.get_mut(&actor.id) {
            Some(stored) => {
                *stored = actor.clone();
                Ok(())
            }
            None => anyhow::bail!("actor {} does not exist", actor.id),
        }
    }

    async fn delete(&self, id: u64) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.actors.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_movie(title: &str) -> NewMovie {
        NewMovie {
            title: title.to_string(),
            release_year: 1942,
        }
    }

    fn new_actor(name: &str, movie_id: u64) -> NewActor {
        NewActor {
            name: name.to_string(),
            age: 40,
            gender: "male".to_string(),
            movie_id,
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_from_one() {
        let store = InMemoryCastingStore::new();
        let first = MovieRepository::create(&store, new_movie("Casablanca")).await.unwrap();
        let second = MovieRepository::create(&store, new_movie("Notorious")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let actor = ActorRepository::create(&store, new_actor("Humphrey Bogart", first.id))
            .await
            .unwrap();
        assert_eq!(actor.id, 1);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = InMemoryCastingStore::new();
        let first = MovieRepository::create(&store, new_movie("Casablanca")).await.unwrap();
        assert!(MovieRepository::delete(&store, first.id).await.unwrap());

        let second = MovieRepository::create(&store, new_movie("Notorious")).await.unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_delete_movie_cascades_to_actors() {
        let store = InMemoryCastingStore::new();
        let casablanca = MovieRepository::create(&store, new_movie("Casablanca")).await.unwrap();
        let notorious = MovieRepository::create(&store, new_movie("Notorious")).await.unwrap();
        ActorRepository::create(&store, new_actor("Humphrey Bogart", casablanca.id))
            .await
            .unwrap();
        let grant = ActorRepository::create(&store, new_actor("Cary Grant", notorious.id))
            .await
            .unwrap();

        assert!(MovieRepository::delete(&store, casablanca.id).await.unwrap());

        let actors = ActorRepository::find_all(&store).await.unwrap();
        assert_eq!(actors, vec![grant]);
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let store = InMemoryCastingStore::new();
        assert!(!MovieRepository::delete(&store, 42).await.unwrap());
        assert!(!ActorRepository::delete(&store, 42).await.unwrap());
    }

    #[tokio::test]
    async fn test_actor_requires_existing_movie() {
        let store = InMemoryCastingStore::new();
        let result = ActorRepository::create(&store, new_actor("Nobody", 9)).await;
        assert!(result.is_err());
        assert!(ActorRepository::find_all(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_stored_values() {
        let store = InMemoryCastingStore::new();
        let mut movie = MovieRepository::create(&store, new_movie("Casablanca")).await.unwrap();
        movie.release_year = 1943;
        MovieRepository::update(&store, &movie).await.unwrap();

        let stored = MovieRepository::find_by_id(&store, movie.id).await.unwrap();
        assert_eq!(stored, Some(movie));
    }

    #[tokio::test]
    async fn test_update_actor_to_missing_movie_fails() {
        let store = InMemoryCastingStore::new();
        let movie = MovieRepository::create(&store, new_movie("Casablanca")).await.unwrap();
        let mut actor = ActorRepository::create(&store, new_actor("Humphrey Bogart", movie.id))
            .await
            .unwrap();

        actor.movie_id = 99;
        assert!(ActorRepository::update(&store, &actor).await.is_err());
    }
}
