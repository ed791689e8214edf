use crate::error::ValidationError;
use crate::models::{Bucket, ItemStatus, LibraryItem, Review, Score, Section, PLACEHOLDER_IMAGE};

/// Raw input of a review form
#[derive(Debug, Clone, Default)]
pub struct ReviewForm {
    pub name: String,
    pub image_url: String,
    pub category: Option<String>,
    /// Value of the checked rating radio, if any
    pub rating: Option<u8>,
    pub body: String,
}

impl ReviewForm {
    /// Validate in form order, stopping at the first missing field
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.category.as_deref().map_or(true, str::is_empty) {
            return Err(ValidationError::MissingCategory);
        }
        if self.rating.and_then(|r| Score::new(r).ok()).is_none() {
            return Err(ValidationError::MissingRating);
        }
        if self.body.trim().is_empty() {
            return Err(ValidationError::MissingBody);
        }
        Ok(())
    }

    /// Build an unsaved review published under `section`
    pub fn into_review(
        self,
        section: Section,
        author: String,
        date: String,
    ) -> Result<Review, ValidationError> {
        self.validate()?;

        let score = self
            .rating
            .and_then(|r| Score::new(r).ok())
            .ok_or(ValidationError::MissingRating)?;
        let image = self.image_url.trim();

        Ok(Review {
            id: None,
            name: self.name.trim().to_string(),
            category: self.category.unwrap_or_default(),
            section,
            score,
            body: self.body.trim().to_string(),
            image_url: if image.is_empty() {
                PLACEHOLDER_IMAGE.to_string()
            } else {
                image.to_string()
            },
            date,
            author,
            likes: 0,
        })
    }

    /// Clear every field after a submission
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Input of the add-to-library form
#[derive(Debug, Clone)]
pub struct LibraryForm {
    pub bucket: Bucket,
    pub name: String,
    pub status: ItemStatus,
    pub hours: Option<u32>,
}

impl LibraryForm {
    pub fn into_item(self, date_added: String) -> Result<LibraryItem, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingItemName);
        }

        let mut item = LibraryItem::new(name, self.status, date_added);
        if self.bucket.tracks_hours() {
            item.hours_played = self.hours;
        }
        Ok(item)
    }
}

/// Input of the edit-item form
#[derive(Debug, Clone)]
pub struct EditForm {
    pub name: String,
    pub status: ItemStatus,
    pub hours: Option<u32>,
}

impl EditForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingItemName);
        }
        Ok(())
    }

    /// Overwrite name and status; hours change only for videogames and only when given
    pub fn apply_to(&self, bucket: Bucket, item: &mut LibraryItem) {
        item.name = self.name.trim().to_string();
        item.status = self.status;
        if bucket.tracks_hours() {
            if let Some(hours) = self.hours {
                item.hours_played = Some(hours);
            }
        }
    }
}
