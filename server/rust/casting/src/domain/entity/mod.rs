pub mod actor;
pub mod movie;

pub use actor::{Actor, ActorPatch, NewActor};
pub use movie::{Movie, MoviePatch, NewMovie};
