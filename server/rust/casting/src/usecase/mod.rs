pub mod create_actor;
pub mod create_movie;
pub mod delete_actor;
pub mod delete_movie;
pub mod list_actors;
pub mod list_movies;
pub mod update_actor;
pub mod update_movie;

pub use create_actor::CreateActorUseCase;
pub use create_movie::CreateMovieUseCase;
pub use delete_actor::DeleteActorUseCase;
pub use delete_movie::DeleteMovieUseCase;
pub use list_actors::ListActorsUseCase;
pub use list_movies::ListMoviesUseCase;
pub use update_actor::UpdateActorUseCase;
pub use update_movie::UpdateMovieUseCase;
