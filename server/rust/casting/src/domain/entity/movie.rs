use serde::{Deserialize, Serialize};

/// Movie は映画エンティティ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub release_year: u32,
}

/// NewMovie は採番前の映画。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub release_year: u32,
}

impl NewMovie {
    pub fn into_movie(self, id: u64) -> Movie {
        Movie {
            id,
            title: self.title,
            release_year: self.release_year,
        }
    }
}

/// MoviePatch は部分更新。空文字列と 0 は未指定として扱う。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub release_year: Option<u32>,
}

impl MoviePatch {
    pub fn apply(self, movie: &mut Movie) {
        if let Some(title) = self.title.filter(|t| !t.is_empty()) {
            movie.title = title;
        }
        if let Some(year) = self.release_year.filter(|y| *y != 0) {
            movie.release_year = year;
        }
    }
}
