use serde::{Deserialize, Serialize};

/// Property as returned by the listings API. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendProperty {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub price: f64,
    pub location: PropertyLocation,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    pub bedrooms: u32,
    pub bathrooms: u32,
    /// Square feet.
    pub area: f64,
    pub property_type: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Ids of the users who favorited the listing.
    #[serde(default)]
    pub favorites: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyLocation {
    #[serde(default)]
    pub address: Option<String>,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Display-ready property consumed by listing and detail screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendProperty {
    pub id: String,
    pub title: String,
    pub price: String,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: String,
    pub image: String,
    pub is_favorite: bool,
    #[serde(rename = "type")]
    pub property_type: String,
}
