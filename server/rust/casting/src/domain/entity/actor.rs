use serde::{Deserialize, Serialize};

/// Actor は俳優エンティティ。movie_id は既存の映画を参照する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub movie_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActor {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub movie_id: u64,
}

impl NewActor {
    pub fn into_actor(self, id: u64) -> Actor {
        Actor {
            id,
            name: self.name,
            age: self.age,
            gender: self.gender,
            movie_id: self.movie_id,
        }
    }
}

/// ActorPatch は部分更新。空文字列と 0 は未指定として扱う。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorPatch {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub movie_id: Option<u64>,
}

impl ActorPatch {
    /// 参照先の映画を差し替える場合のみ Some を返す。
    pub fn target_movie(&self) -> Option<u64> {
        self.movie_id.filter(|id| *id != 0)
    }

    pub fn apply(self, actor: &mut Actor) {
        if let Some(movie_id) = self.target_movie() {
            actor.movie_id = movie_id;
        }
        if let Some(name) = self.name.filter(|n| !n.is_empty()) {
            actor.name = name;
        }
        if let Some(age) = self.age.filter(|a| *a != 0) {
            actor.age = age;
        }
        if let Some(gender) = self.gender.filter(|g| !g.is_empty()) {
            actor.gender = gender;
        }
    }
}
