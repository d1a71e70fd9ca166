//! Flattened records returned by the MCP tools.

use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Copyright {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ArtistSummary {
    pub uri: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AlbumSummary {
    pub uri: String,
    pub name: String,
    pub album_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_art_url: Option<String>,
    pub release_date: String,
    pub release_date_precision: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyrights: Option<Vec<Copyright>>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TrackSummary {
    pub uri: String,
    pub name: String,
    pub duration_ms: u64,
    // Playlist episodes have no album
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<AlbumSummary>,
    pub artists: Vec<ArtistSummary>,
}

/// Output of `fetch_playlist`
#[derive(Serialize, Debug)]
pub struct PlaylistTracks {
    pub track_uris: Vec<String>,
}

/// Output of `get_track_details`
#[derive(Serialize, Debug)]
pub struct TrackDetails {
    pub tracks: Vec<TrackSummary>,
}

/// Output of `get_artist_details`
#[derive(Serialize, Debug)]
pub struct ArtistDetails {
    pub artists: Vec<ArtistSummary>,
}

/// Output of `get_album_details`
#[derive(Serialize, Debug)]
pub struct AlbumDetails {
    pub albums: Vec<AlbumSummary>,
}
