use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FetchPlaylistParams {
    #[schemars(
        description = "Spotify playlist URL (https://open.spotify.com/playlist/...), URI (spotify:playlist:...) or raw 22 character ID"
    )]
    pub playlist_url_or_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TrackDetailsParams {
    #[schemars(description = "List of Spotify track IDs")]
    pub track_ids: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ArtistDetailsParams {
    #[schemars(description = "List of Spotify artist IDs")]
    pub artist_ids: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AlbumDetailsParams {
    #[schemars(description = "List of Spotify album IDs")]
    pub album_ids: Vec<String>,
}
