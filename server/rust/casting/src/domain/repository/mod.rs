pub mod actor_repository;
pub mod movie_repository;

pub use actor_repository::ActorRepository;
pub use movie_repository::MovieRepository;

#[cfg(test)]
pub use actor_repository::MockActorRepository;
#[cfg(test)]
pub use movie_repository::MockMovieRepository;
