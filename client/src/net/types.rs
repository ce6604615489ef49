//! Wire DTOs for the storefront REST API.
//!
//! DESIGN
//! ======
//! The backend speaks camelCase JSON. Fields the backend may omit default
//! instead of failing the whole decode, so a sparse listing still renders.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Identity returned by `GET /api/auth/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeResponse {
    pub username: String,
    /// Role name as the backend spells it (e.g. `"Admin"`, `"Standard"`).
    #[serde(default)]
    pub role: String,
}

/// A game listing as served by `/api/games`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub game_id: i64,
    pub name: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub detailed_description: Option<String>,
    /// Price in store currency units; `0` means free to play.
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    /// Comma-separated category list.
    #[serde(default)]
    pub categories: Option<String>,
    /// Comma-separated tag list.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub trailer_url: Option<String>,
    /// ISO date (`YYYY-MM-DD`), possibly with a time suffix.
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_published: bool,
    /// Backend-relative path of the header image.
    #[serde(default)]
    pub header_image_url: Option<String>,
    #[serde(default)]
    pub background_image_url: Option<String>,
    /// Backend-relative paths of carousel screenshots.
    #[serde(default)]
    pub game_images: Vec<String>,
}

/// Editable subset of a listing. Sent as JSON on create and update, or as
/// multipart text fields when image files accompany it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInput {
    pub name: String,
    pub short_description: String,
    pub detailed_description: String,
    pub price: f64,
    pub developer: String,
    pub publisher: String,
    pub categories: String,
    pub tags: String,
    pub trailer_url: String,
    pub release_date: Option<String>,
    pub is_featured: bool,
    pub is_published: bool,
}

impl From<&Game> for GameInput {
    fn from(game: &Game) -> Self {
        Self {
            name: game.name.clone(),
            short_description: game.short_description.clone().unwrap_or_default(),
            detailed_description: game.detailed_description.clone().unwrap_or_default(),
            price: game.price,
            developer: game.developer.clone().unwrap_or_default(),
            publisher: game.publisher.clone().unwrap_or_default(),
            categories: game.categories.clone().unwrap_or_default(),
            tags: game.tags.clone().unwrap_or_default(),
            trailer_url: game.trailer_url.clone().unwrap_or_default(),
            release_date: game.release_date.as_deref().map(|d| d.chars().take(10).collect()),
            is_featured: game.is_featured,
            is_published: game.is_published,
        }
    }
}

impl GameInput {
    /// Text parts of the multipart create/update body, keyed by wire name.
    /// Booleans are sent as `true`/`false` and an unset release date is
    /// omitted.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("shortDescription", self.short_description.clone()),
            ("detailedDescription", self.detailed_description.clone()),
            ("price", self.price.to_string()),
            ("developer", self.developer.clone()),
            ("publisher", self.publisher.clone()),
            ("categories", self.categories.clone()),
            ("tags", self.tags.clone()),
            ("trailerUrl", self.trailer_url.clone()),
        ];
        if let Some(date) = &self.release_date {
            fields.push(("releaseDate", date.clone()));
        }
        fields.push(("isFeatured", self.is_featured.to_string()));
        fields.push(("isPublished", self.is_published.to_string()));
        fields
    }
}

/// Entry in `GET /api/users/me/games`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedGame {
    pub game_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub header_image_url: Option<String>,
}

/// Body of `POST /api/profile/add`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToLibraryRequest {
    pub game_id: i64,
}

/// An accepted friend from `GET /api/friends`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub username: String,
    #[serde(default)]
    pub since: Option<String>,
}

/// Incoming request from `GET /api/friends/pending`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingFriendRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub from: String,
    #[serde(default)]
    pub sent_at: Option<String>,
}

/// Outgoing request from `GET /api/friends/sent`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingFriendRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub to: String,
    #[serde(default)]
    pub sent_at: Option<String>,
}

/// A friend request normalized for display, regardless of direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FriendRequest {
    pub id: i64,
    /// The other party: sender for incoming, recipient for outgoing.
    pub username: String,
    pub sent_at: Option<String>,
}

impl IncomingFriendRequest {
    /// Requests the backend returned without an id cannot be acted on.
    #[must_use]
    pub fn normalize(self) -> Option<FriendRequest> {
        Some(FriendRequest { id: self.id?, username: self.from, sent_at: self.sent_at })
    }
}

impl OutgoingFriendRequest {
    #[must_use]
    pub fn normalize(self) -> Option<FriendRequest> {
        Some(FriendRequest { id: self.id?, username: self.to, sent_at: self.sent_at })
    }
}

/// Generic `{ "message": ... }` / `{ "error": ... }` reply body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
