use std::sync::Arc;

use log::{error, info};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

mod params;

use params::*;

use crate::clients::catalog::Catalog;
use crate::clients::entities::{AlbumDetails, ArtistDetails, PlaylistTracks, TrackDetails};
use crate::clients::errors::{Error, Result};
use crate::playlist_id::extract_playlist_id;
use crate::shaper;

/// Trim every ID, rejecting an empty list or a blank entry by index
fn validate_ids(field: &str, ids: &[String]) -> Result<Vec<String>> {
    if ids.is_empty() {
        return Err(Error::Validation(format!("{field} cannot be empty")));
    }
    ids.iter()
        .enumerate()
        .map(|(i, id)| {
            let id = id.trim();
            if id.is_empty() {
                Err(Error::Validation(format!("{field}[{i}] cannot be empty")))
            } else {
                Ok(id.to_string())
            }
        })
        .collect()
}

// Every failure reaches the caller the same way: an error result carrying the message
fn respond<T: Serialize>(tool: &str, result: Result<T>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => {
            let json = serde_json::to_string_pretty(&value)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(CallToolResult::success(vec![Content::text(json)]))
        }
        Err(e) => {
            if e.is_upstream() {
                error!("{tool} failed upstream: {e}");
            } else {
                error!("{tool} failed: {e}");
            }
            Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
        }
    }
}

/// MCP server exposing the catalog tools.
///
/// Holds the catalog only when the Spotify session came up live; without one
/// every tool answers with a not-initialized error.
#[derive(Clone)]
pub struct LibrarianServer {
    catalog: Option<Arc<dyn Catalog>>,
    tool_router: ToolRouter<Self>,
}

impl LibrarianServer {
    fn catalog(&self) -> Result<&dyn Catalog> {
        self.catalog.as_deref().ok_or(Error::NotInitialized)
    }

    async fn playlist_track_uris(&self, playlist_url_or_id: &str) -> Result<PlaylistTracks> {
        let catalog = self.catalog()?;
        let playlist_id = extract_playlist_id(playlist_url_or_id)?;
        info!("Extracted playlist ID: {playlist_id}");
        let items = catalog.playlist_items(&playlist_id).await?;
        Ok(PlaylistTracks {
            track_uris: shaper::extract_playlist_track_uris(&items),
        })
    }

    async fn track_details(&self, track_ids: &[String]) -> Result<TrackDetails> {
        let catalog = self.catalog()?;
        let ids = validate_ids("track_ids", track_ids)?;
        let raw = catalog.tracks(&ids).await?;
        let tracks = shaper::shape_track_list(catalog, raw, true).await?;
        Ok(TrackDetails { tracks })
    }

    async fn artist_details(&self, artist_ids: &[String]) -> Result<ArtistDetails> {
        let catalog = self.catalog()?;
        let ids = validate_ids("artist_ids", artist_ids)?;
        let raw = catalog.artists(&ids).await?;
        Ok(ArtistDetails {
            artists: shaper::shape_artists(raw),
        })
    }

    async fn album_details(&self, album_ids: &[String]) -> Result<AlbumDetails> {
        let catalog = self.catalog()?;
        let ids = validate_ids("album_ids", album_ids)?;
        let raw = catalog.albums(&ids).await?;
        Ok(AlbumDetails {
            albums: shaper::shape_albums(raw),
        })
    }
}

#[tool_router]
impl LibrarianServer {
    pub fn new(catalog: Option<Arc<dyn Catalog>>) -> Self {
        Self {
            catalog,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Fetch track URIs from a Spotify playlist")]
    async fn fetch_playlist(
        &self,
        params: Parameters<FetchPlaylistParams>,
    ) -> Result<CallToolResult, McpError> {
        let input = &params.0.playlist_url_or_id;
        info!("Fetching playlist: {input}");
        respond("fetch_playlist", self.playlist_track_uris(input).await)
    }

    #[tool(
        description = "Get detailed metadata for specific tracks: duration, album (cover art, release date, label, copyrights) and artists (image, genres)"
    )]
    async fn get_track_details(
        &self,
        params: Parameters<TrackDetailsParams>,
    ) -> Result<CallToolResult, McpError> {
        let ids = &params.0.track_ids;
        info!("Getting track details for {} tracks: {ids:?}", ids.len());
        respond("get_track_details", self.track_details(ids).await)
    }

    #[tool(description = "Get detailed metadata for specific artists: image and genres")]
    async fn get_artist_details(
        &self,
        params: Parameters<ArtistDetailsParams>,
    ) -> Result<CallToolResult, McpError> {
        let ids = &params.0.artist_ids;
        info!("Getting artist details for {} artists: {ids:?}", ids.len());
        respond("get_artist_details", self.artist_details(ids).await)
    }

    #[tool(
        description = "Get detailed metadata for specific albums: cover art, release date, label and copyrights"
    )]
    async fn get_album_details(
        &self,
        params: Parameters<AlbumDetailsParams>,
    ) -> Result<CallToolResult, McpError> {
        let ids = &params.0.album_ids;
        info!("Getting album details for {} albums: {ids:?}", ids.len());
        respond("get_album_details", self.album_details(ids).await)
    }
}

#[tool_handler]
impl ServerHandler for LibrarianServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Spotify catalog lookup server. Fetch the track URIs of a playlist, \
                 then get track, artist and album metadata by ID."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
