use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ParseError;

/// Image shown when a review has no cover of its own
pub const PLACEHOLDER_IMAGE: &str =
    "https://via.placeholder.com/400x250/0f3460/e94560?text=Sin+Imagen";

/// Author label used when nobody is signed in
pub const ANONYMOUS_AUTHOR: &str = "Anónimo";

/// Page section a review is published under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Section {
    Videojuegos,
    Anime,
    Peliculas,
    Series,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Videojuegos,
        Section::Anime,
        Section::Peliculas,
        Section::Series,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Videojuegos => "Videojuegos",
            Section::Anime => "Anime",
            Section::Peliculas => "Peliculas",
            Section::Series => "Series",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownSection(s.to_string()))
    }
}

impl TryFrom<String> for Section {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Star rating between 1 and 5 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, ParseError> {
        Self::try_from(value)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ParseError::ScoreOutOfRange(value))
        }
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

/// A community review as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Assigned by the server; absent on the optimistic local copy
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "nombreJuego")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "tipo")]
    pub section: Section,
    #[serde(rename = "puntuacion")]
    pub score: Score,
    #[serde(rename = "texto")]
    pub body: String,
    #[serde(rename = "imagenUrl", default = "default_image_url")]
    pub image_url: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "autor", default = "default_author")]
    pub author: String,
    #[serde(default)]
    pub likes: u32,
}

fn default_image_url() -> String {
    PLACEHOLDER_IMAGE.to_string()
}

fn default_author() -> String {
    ANONYMOUS_AUTHOR.to_string()
}

impl Review {
    /// Case-insensitive title comparison used by the per-title view
    pub fn matches_title(&self, title: &str) -> bool {
        self.name.to_lowercase() == title.to_lowercase()
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

/// Signed-in user; no login flow populates this yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
}

/// Watch or play progress of a library item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Completado,
    Jugando,
    Pendiente,
    Abandonado,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 4] = [
        ItemStatus::Completado,
        ItemStatus::Jugando,
        ItemStatus::Pendiente,
        ItemStatus::Abandonado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Completado => "completado",
            ItemStatus::Jugando => "jugando",
            ItemStatus::Pendiente => "pendiente",
            ItemStatus::Abandonado => "abandonado",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Completado => "Completado",
            ItemStatus::Jugando => "Jugando/Viendo",
            ItemStatus::Pendiente => "Pendiente",
            ItemStatus::Abandonado => "Abandonado",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            ItemStatus::Completado => "✅",
            ItemStatus::Jugando => "▶️",
            ItemStatus::Pendiente => "⏳",
            ItemStatus::Abandonado => "❌",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completado" | "completed" => Ok(ItemStatus::Completado),
            "jugando" | "viendo" | "in-progress" => Ok(ItemStatus::Jugando),
            "pendiente" | "pending" => Ok(ItemStatus::Pendiente),
            "abandonado" | "abandoned" => Ok(ItemStatus::Abandonado),
            _ => Err(ParseError::UnknownStatus(s.to_string())),
        }
    }
}

/// One of the four fixed library categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Videojuegos,
    Anime,
    Peliculas,
    Series,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [
        Bucket::Videojuegos,
        Bucket::Anime,
        Bucket::Peliculas,
        Bucket::Series,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Bucket::Videojuegos => "videojuegos",
            Bucket::Anime => "anime",
            Bucket::Peliculas => "peliculas",
            Bucket::Series => "series",
        }
    }

    /// Heading used in the library listing
    pub fn title(&self) -> &'static str {
        match self {
            Bucket::Videojuegos => "Videojuegos",
            Bucket::Anime => "Anime",
            Bucket::Peliculas => "Peliculas",
            Bucket::Series => "Series",
        }
    }

    /// Singular label used in the add form
    pub fn singular(&self) -> &'static str {
        match self {
            Bucket::Videojuegos => "Videojuego",
            Bucket::Anime => "Anime",
            Bucket::Peliculas => "Película",
            Bucket::Series => "Serie",
        }
    }

    /// Only videogames record hours played
    pub fn tracks_hours(&self) -> bool {
        matches!(self, Bucket::Videojuegos)
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Bucket {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bucket::ALL
            .into_iter()
            .find(|bucket| bucket.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownBucket(s.to_string()))
    }
}

/// Stable identifier of a library item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ItemId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ParseError::InvalidItemId(s.to_string()))
    }
}

/// An entry in the personal library
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StoredItem")]
pub struct LibraryItem {
    pub id: ItemId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "estado")]
    pub status: ItemStatus,
    #[serde(rename = "fechaAgregado")]
    pub date_added: String,
    #[serde(rename = "horasJugadas", skip_serializing_if = "Option::is_none")]
    pub hours_played: Option<u32>,
    /// Set when the stored copy had no id and one was generated on load
    #[serde(skip_serializing)]
    unstored_id: bool,
}

/// Library item as the backend may hold it; records written before ids
/// existed lack one
#[derive(Deserialize)]
struct StoredItem {
    #[serde(default)]
    id: Option<ItemId>,
    #[serde(rename = "nombre")]
    name: String,
    #[serde(rename = "estado")]
    status: ItemStatus,
    #[serde(rename = "fechaAgregado")]
    date_added: String,
    #[serde(rename = "horasJugadas", default)]
    hours_played: Option<u32>,
}

impl From<StoredItem> for LibraryItem {
    fn from(stored: StoredItem) -> Self {
        Self {
            id: stored.id.unwrap_or_default(),
            name: stored.name,
            status: stored.status,
            date_added: stored.date_added,
            hours_played: stored.hours_played,
            unstored_id: stored.id.is_none(),
        }
    }
}

impl PartialEq for LibraryItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.status == other.status
            && self.date_added == other.date_added
            && self.hours_played == other.hours_played
    }
}

impl LibraryItem {
    pub fn new(name: impl Into<String>, status: ItemStatus, date_added: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            status,
            date_added: date_added.into(),
            hours_played: None,
            unstored_id: false,
        }
    }

    /// Whether the id was generated on load and is not yet on the backend
    pub fn has_unstored_id(&self) -> bool {
        self.unstored_id
    }
}

/// The four library buckets, each in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub videojuegos: Vec<LibraryItem>,
    #[serde(default)]
    pub anime: Vec<LibraryItem>,
    #[serde(default)]
    pub peliculas: Vec<LibraryItem>,
    #[serde(default)]
    pub series: Vec<LibraryItem>,
}

impl Library {
    pub fn bucket(&self, bucket: Bucket) -> &[LibraryItem] {
        match bucket {
            Bucket::Videojuegos => &self.videojuegos,
            Bucket::Anime => &self.anime,
            Bucket::Peliculas => &self.peliculas,
            Bucket::Series => &self.series,
        }
    }

    pub fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<LibraryItem> {
        match bucket {
            Bucket::Videojuegos => &mut self.videojuegos,
            Bucket::Anime => &mut self.anime,
            Bucket::Peliculas => &mut self.peliculas,
            Bucket::Series => &mut self.series,
        }
    }

    pub fn push(&mut self, bucket: Bucket, item: LibraryItem) {
        self.bucket_mut(bucket).push(item);
    }

    pub fn find(&self, bucket: Bucket, id: ItemId) -> Option<&LibraryItem> {
        self.bucket(bucket).iter().find(|item| item.id == id)
    }

    pub fn find_mut(&mut self, bucket: Bucket, id: ItemId) -> Option<&mut LibraryItem> {
        self.bucket_mut(bucket).iter_mut().find(|item| item.id == id)
    }

    pub fn position_of(&self, bucket: Bucket, id: ItemId) -> Option<usize> {
        self.bucket(bucket).iter().position(|item| item.id == id)
    }

    pub fn item_at(&self, bucket: Bucket, index: usize) -> Option<&LibraryItem> {
        self.bucket(bucket).get(index)
    }

    /// Remove an item, shifting later items in the bucket down by one
    pub fn remove(&mut self, bucket: Bucket, id: ItemId) -> Option<LibraryItem> {
        let index = self.position_of(bucket, id)?;
        Some(self.bucket_mut(bucket).remove(index))
    }

    /// Item count per bucket, in fixed bucket order
    pub fn counts(&self) -> [(Bucket, usize); 4] {
        Bucket::ALL.map(|bucket| (bucket, self.bucket(bucket).len()))
    }

    pub fn total(&self) -> usize {
        self.counts().iter().map(|(_, count)| count).sum()
    }

    /// Whether any item got its id on load and the backend copy still lacks it
    pub fn has_unstored_ids(&self) -> bool {
        Bucket::ALL
            .into_iter()
            .any(|bucket| self.bucket(bucket).iter().any(LibraryItem::has_unstored_id))
    }

    /// Record that the backend now holds every item id
    pub fn mark_ids_stored(&mut self) {
        for bucket in Bucket::ALL {
            for item in self.bucket_mut(bucket) {
                item.unstored_id = false;
            }
        }
    }
}

/// Short date label in the site's `d/m/yyyy` form
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

pub fn today_label() -> String {
    format_date(Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert!(Score::new(0).is_err());
        assert!(Score::new(6).is_err());
        assert_eq!(Score::new(1).unwrap().get(), 1);
        assert_eq!(Score::new(5).unwrap().get(), 5);
    }

    #[test]
    fn test_review_wire_format() {
        let json = r#"{
            "_id": "65f0c1",
            "nombreJuego": "Zelda",
            "categoria": "Aventura",
            "tipo": "Videojuegos",
            "puntuacion": 4,
            "texto": "Muy bueno",
            "fecha": "3/2/2024",
            "autor": "Ana",
            "likes": 2
        }"#;

        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.id.as_deref(), Some("65f0c1"));
        assert_eq!(review.section, Section::Videojuegos);
        assert_eq!(review.score.get(), 4);
        assert_eq!(review.image_url, PLACEHOLDER_IMAGE);

        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["nombreJuego"], "Zelda");
        assert_eq!(value["tipo"], "Videojuegos");
        assert_eq!(value["_id"], "65f0c1");
    }

    #[test]
    fn test_section_label_any_case() {
        let json = r#"{"nombreJuego":"Frieren","categoria":"Fantasía","tipo":"anime","puntuacion":5,"texto":"t","fecha":"1/1/2024"}"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.section, Section::Anime);
    }

    #[test]
    fn test_review_rejects_out_of_range_score() {
        let json = r#"{"nombreJuego":"X","categoria":"RPG","tipo":"Anime","puntuacion":9,"texto":"t","fecha":"1/1/2024"}"#;
        assert!(serde_json::from_str::<Review>(json).is_err());
    }

    #[test]
    fn test_unsaved_review_omits_id() {
        let review = Review {
            id: None,
            name: "Dune".to_string(),
            category: "Ciencia ficción".to_string(),
            section: Section::Peliculas,
            score: Score::new(5).unwrap(),
            body: "Épica".to_string(),
            image_url: PLACEHOLDER_IMAGE.to_string(),
            date: "1/1/2024".to_string(),
            author: ANONYMOUS_AUTHOR.to_string(),
            likes: 0,
        };

        let value = serde_json::to_value(&review).unwrap();
        assert!(value.get("_id").is_none());
        assert_eq!(value["tipo"], "Peliculas");
    }

    #[test]
    fn test_library_missing_buckets_default_empty() {
        let library: Library =
            serde_json::from_str(r#"{"anime":[{"nombre":"Frieren","estado":"jugando","fechaAgregado":"1/1/2024"}]}"#)
                .unwrap();

        assert!(library.videojuegos.is_empty());
        assert!(library.series.is_empty());
        assert_eq!(library.anime.len(), 1);
        assert_eq!(library.anime[0].status, ItemStatus::Jugando);
        assert_eq!(library.anime[0].hours_played, None);
    }

    #[test]
    fn test_items_without_stored_id() {
        let json = r#"{"anime":[
            {"nombre":"Frieren","estado":"jugando","fechaAgregado":"1/1/2024"},
            {"id":"6c4f2f1e-8d0a-4c3b-9a57-0f2d7c1e9b11","nombre":"Mushishi","estado":"pendiente","fechaAgregado":"2/1/2024"}
        ]}"#;

        let mut library: Library = serde_json::from_str(json).unwrap();
        assert!(library.anime[0].has_unstored_id());
        assert!(!library.anime[1].has_unstored_id());
        assert_eq!(
            library.anime[1].id.to_string(),
            "6c4f2f1e-8d0a-4c3b-9a57-0f2d7c1e9b11"
        );
        assert!(library.has_unstored_ids());

        // The generated id is written out and survives the next decode
        let written = serde_json::to_string(&library).unwrap();
        assert!(!written.contains("unstored"));
        let reread: Library = serde_json::from_str(&written).unwrap();
        assert_eq!(reread.anime[0].id, library.anime[0].id);
        assert!(!reread.has_unstored_ids());

        library.mark_ids_stored();
        assert!(!library.has_unstored_ids());
    }

    #[test]
    fn test_item_without_hours_omits_field() {
        let item = LibraryItem::new("Hades", ItemStatus::Pendiente, "1/1/2024");
        let value = serde_json::to_value(&item).unwrap();
        assert!(value.get("horasJugadas").is_none());
        assert_eq!(value["estado"], "pendiente");
    }

    #[test]
    fn test_remove_shifts_positions() {
        let mut library = Library::default();
        let a = LibraryItem::new("A", ItemStatus::Pendiente, "1/1/2024");
        let b = LibraryItem::new("B", ItemStatus::Pendiente, "1/1/2024");
        let c = LibraryItem::new("C", ItemStatus::Pendiente, "1/1/2024");
        let (a_id, c_id) = (a.id, c.id);
        library.push(Bucket::Series, a);
        library.push(Bucket::Series, b);
        library.push(Bucket::Series, c);

        // A position captured before the removal now points at a different item
        let stale_index = library.position_of(Bucket::Series, c_id).unwrap();
        assert_eq!(stale_index, 2);

        let removed = library.remove(Bucket::Series, a_id).unwrap();
        assert_eq!(removed.name, "A");
        assert_eq!(library.series.len(), 2);
        assert_eq!(library.position_of(Bucket::Series, c_id), Some(1));
        assert!(library.item_at(Bucket::Series, stale_index).is_none());
        assert_eq!(library.item_at(Bucket::Series, 0).unwrap().name, "B");
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("videojuegos".parse::<Section>().unwrap(), Section::Videojuegos);
        assert_eq!("Series".parse::<Bucket>().unwrap(), Bucket::Series);
        assert_eq!("in-progress".parse::<ItemStatus>().unwrap(), ItemStatus::Jugando);
        assert!("manga".parse::<Bucket>().is_err());
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(date), "7/3/2024");
    }
}
