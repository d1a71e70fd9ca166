//! Wire models for the Spotify Web API responses this crate reads.
//!
//! Only the fields the shaper needs are declared. Everything that Spotify may
//! omit or null out is either an `Option` or falls back to its default, so an
//! episode in a playlist or a partially populated record still decodes.

use serde::{Deserialize, Deserializer};

// Local files in playlists carry explicit nulls where a string is expected
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawImage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RawCopyright {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawArtist {
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uri: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<RawImage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawAlbum {
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uri: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub album_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<RawImage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date_precision: String,
    // Only present on full album objects
    pub label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub copyrights: Vec<RawCopyright>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawTrack {
    pub id: Option<String>,
    pub uri: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration_ms: u64,
    pub album: Option<RawAlbum>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artists: Vec<RawArtist>,
}

/// One entry of a playlist; `track` is null for items removed upstream
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawPlaylistItem {
    pub track: Option<RawTrack>,
}

#[derive(Deserialize, Debug, Default)]
pub struct RawPlaylistPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<RawPlaylistItem>,
    pub next: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u32,
}

#[derive(Deserialize, Debug)]
pub struct RawTracks {
    pub tracks: Vec<Option<RawTrack>>,
}

#[derive(Deserialize, Debug)]
pub struct RawArtists {
    pub artists: Vec<Option<RawArtist>>,
}

#[derive(Deserialize, Debug)]
pub struct RawAlbums {
    pub albums: Vec<Option<RawAlbum>>,
}
