//! Account, history and shared-itinerary records returned by the backend.

use crate::itinerary::ItineraryDocument;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Result of a successful login or registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: UserProfile,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPage {
    pub total: u64,
    #[serde(default)]
    pub items: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub destination: String,
    pub days: u32,
    #[serde(default)]
    pub budget: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub preview: HistoryPreview,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPreview {
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub travelers: Option<u32>,
    #[serde(default)]
    pub total_budget: Option<f64>,
}

/// A saved itinerary as returned by `GET /api/history/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedItinerary {
    pub id: i64,
    pub destination: String,
    pub days: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    pub itinerary: ItineraryDocument,
}

/// Favorited itineraries; entries share the history listing shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FavoritesPage {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub items: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteStatus {
    #[serde(alias = "is_favorited", alias = "favorited")]
    pub is_favorite: bool,
}

/// Itinerary published behind a share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedItinerary {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub itinerary_data: ItineraryDocument,
}
