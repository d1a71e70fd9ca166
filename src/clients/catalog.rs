//! The read operations the tools need from the catalog service.
//!
//! `SpotifyCatalog` is the live implementation; tests substitute a canned one.

use async_trait::async_trait;

use crate::clients::errors::Result;
use crate::clients::raw::{RawAlbum, RawArtist, RawPlaylistItem, RawTrack};
use crate::playlist_id::CatalogId;

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Items of the first page of a playlist, in playlist order
    async fn playlist_items(&self, playlist_id: &CatalogId) -> Result<Vec<RawPlaylistItem>>;

    /// One entry per requested ID, `None` where the catalog has no such track
    async fn tracks(&self, ids: &[String]) -> Result<Vec<Option<RawTrack>>>;

    async fn artists(&self, ids: &[String]) -> Result<Vec<Option<RawArtist>>>;

    async fn albums(&self, ids: &[String]) -> Result<Vec<Option<RawAlbum>>>;
}
