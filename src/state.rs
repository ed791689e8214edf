use crate::error::LookupError;
use crate::models::{Bucket, ItemId, Library, LibraryItem, Review, Section, User, ANONYMOUS_AUTHOR};

/// Local mirror of the backend collections
///
/// Handlers mutate this first and persist afterwards. Nothing is rolled back
/// when persistence fails, so the mirror may run ahead of the server until
/// the next full fetch.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    reviews: Vec<Review>,
    library: Library,
    current_user: Option<User>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn set_current_user(&mut self, user: Option<User>) {
        self.current_user = user;
    }

    /// Display name new reviews are signed with
    pub fn author_name(&self) -> String {
        self.current_user
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string())
    }

    pub fn replace_reviews(&mut self, reviews: Vec<Review>) {
        self.reviews = reviews;
    }

    pub fn push_review(&mut self, review: Review) {
        self.reviews.push(review);
    }

    pub fn find_review(&self, id: &str) -> Result<&Review, LookupError> {
        self.reviews
            .iter()
            .find(|r| r.has_id(id))
            .ok_or_else(|| LookupError::ReviewNotFound(id.to_string()))
    }

    /// Drop every cached review carrying this server id
    pub fn remove_review(&mut self, id: &str) -> usize {
        let before = self.reviews.len();
        self.reviews.retain(|r| !r.has_id(id));
        before - self.reviews.len()
    }

    pub fn reviews_in_section(&self, section: Section) -> Vec<&Review> {
        self.reviews.iter().filter(|r| r.section == section).collect()
    }

    pub fn reviews_for_title(&self, title: &str) -> Vec<&Review> {
        self.reviews.iter().filter(|r| r.matches_title(title)).collect()
    }

    pub fn replace_library(&mut self, library: Library) {
        self.library = library;
    }

    /// Called once the backend holds every id in the cached library
    pub fn mark_library_stored(&mut self) {
        self.library.mark_ids_stored();
    }

    pub fn add_item(&mut self, bucket: Bucket, item: LibraryItem) -> ItemId {
        let id = item.id;
        self.library.push(bucket, item);
        id
    }

    pub fn item_mut(&mut self, bucket: Bucket, id: ItemId) -> Result<&mut LibraryItem, LookupError> {
        self.library
            .find_mut(bucket, id)
            .ok_or(LookupError::ItemNotFound { bucket, id })
    }

    pub fn remove_item(&mut self, bucket: Bucket, id: ItemId) -> Result<LibraryItem, LookupError> {
        self.library
            .remove(bucket, id)
            .ok_or(LookupError::ItemNotFound { bucket, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemStatus, Score, PLACEHOLDER_IMAGE};

    fn review(id: Option<&str>, name: &str, section: Section) -> Review {
        Review {
            id: id.map(str::to_string),
            name: name.to_string(),
            category: "RPG".to_string(),
            section,
            score: Score::new(4).unwrap(),
            body: "texto".to_string(),
            image_url: PLACEHOLDER_IMAGE.to_string(),
            date: "1/1/2024".to_string(),
            author: ANONYMOUS_AUTHOR.to_string(),
            likes: 0,
        }
    }

    #[test]
    fn test_author_defaults_to_anonymous() {
        let mut state = AppState::new();
        assert_eq!(state.author_name(), "Anónimo");

        state.set_current_user(Some(User {
            name: "Agustín".to_string(),
        }));
        assert_eq!(state.author_name(), "Agustín");
    }

    #[test]
    fn test_filters() {
        let mut state = AppState::new();
        state.push_review(review(Some("1"), "Zelda", Section::Videojuegos));
        state.push_review(review(Some("2"), "Frieren", Section::Anime));
        state.push_review(review(None, "ZELDA", Section::Videojuegos));

        assert_eq!(state.reviews_in_section(Section::Videojuegos).len(), 2);
        assert_eq!(state.reviews_in_section(Section::Series).len(), 0);
        assert_eq!(state.reviews_for_title("zelda").len(), 2);
    }

    #[test]
    fn test_find_and_remove_review() {
        let mut state = AppState::new();
        state.push_review(review(Some("1"), "Zelda", Section::Videojuegos));

        assert!(state.find_review("1").is_ok());
        assert_eq!(
            state.find_review("2").unwrap_err(),
            LookupError::ReviewNotFound("2".to_string())
        );
        assert_eq!(state.remove_review("1"), 1);
        assert!(state.reviews().is_empty());
    }

    #[test]
    fn test_stale_item_id() {
        let mut state = AppState::new();
        let id = state.add_item(
            Bucket::Anime,
            LibraryItem::new("Frieren", ItemStatus::Jugando, "1/1/2024"),
        );

        state.remove_item(Bucket::Anime, id).unwrap();
        assert!(matches!(
            state.item_mut(Bucket::Anime, id),
            Err(LookupError::ItemNotFound { .. })
        ));
        assert!(state.remove_item(Bucket::Anime, id).is_err());
    }
}
