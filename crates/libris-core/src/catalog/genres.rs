use crate::catalog::Upserted;
use crate::models::{Genre, GenreKind};

/// At most one record per [`GenreKind`], in the order first added.
#[derive(Debug, Default)]
pub struct GenreRegistry {
    genres: Vec<Genre>,
}

impl GenreRegistry {
    /// Create-or-get by kind. For an existing kind the stored record is
    /// returned and the description argument is discarded.
    pub fn add(&mut self, kind: GenreKind, description: &str) -> Upserted<&Genre> {
        let (genre, created) = self.get_or_add(kind, description);
        if created {
            Upserted::Created(genre)
        } else {
            Upserted::Existing(genre)
        }
    }

    /// Like [`GenreRegistry::add`], but hands back a mutable record for
    /// category filing.
    pub fn get_or_add(&mut self, kind: GenreKind, description: &str) -> (&mut Genre, bool) {
        match self.genres.iter().position(|genre| genre.kind == kind) {
            Some(pos) => (&mut self.genres[pos], false),
            None => {
                self.genres.push(Genre::new(kind, description));
                let pos = self.genres.len() - 1;
                (&mut self.genres[pos], true)
            }
        }
    }

    pub fn find(&self, kind: GenreKind) -> Option<&Genre> {
        self.genres.iter().find(|genre| genre.kind == kind)
    }

    pub fn find_mut(&mut self, kind: GenreKind) -> Option<&mut Genre> {
        self.genres.iter_mut().find(|genre| genre.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Genre> {
        self.genres.iter()
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }
}
