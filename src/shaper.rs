//! Turns nested catalog records into the flat summaries the tools return.
//!
//! Null entries in upstream lists stand for items that were deleted or are
//! unavailable; they are dropped silently. Image lists are ordered largest
//! first by Spotify, so the first image is taken as the cover or portrait.

use std::collections::HashMap;

use indexmap::IndexSet;
use log::debug;

use crate::clients::{
    catalog::Catalog,
    entities::{AlbumSummary, ArtistSummary, Copyright, TrackSummary},
    errors::Result,
    raw::{RawAlbum, RawArtist, RawCopyright, RawImage, RawPlaylistItem, RawTrack},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ArtistExtras {
    image_url: Option<String>,
    genres: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct AlbumExtras {
    label: Option<String>,
    copyrights: Vec<Copyright>,
}

/// Artist and album details looked up for the records a track list refers to
#[derive(Debug, Default)]
pub struct Enrichment {
    artists: HashMap<String, ArtistExtras>,
    albums: HashMap<String, AlbumExtras>,
}

impl Enrichment {
    /// Index full artist and album records by ID. Null entries are ignored.
    pub fn from_records(
        artists: impl IntoIterator<Item = Option<RawArtist>>,
        albums: impl IntoIterator<Item = Option<RawAlbum>>,
    ) -> Self {
        let artists = artists
            .into_iter()
            .flatten()
            .filter_map(|artist| {
                let extras = ArtistExtras {
                    image_url: first_image(&artist.images),
                    genres: artist.genres,
                };
                artist.id.map(|id| (id, extras))
            })
            .collect();
        let albums = albums
            .into_iter()
            .flatten()
            .filter_map(|album| {
                let extras = AlbumExtras {
                    label: album.label,
                    copyrights: album.copyrights.into_iter().map(copyright).collect(),
                };
                album.id.map(|id| (id, extras))
            })
            .collect();
        Enrichment { artists, albums }
    }

    fn artist(&self, id: Option<&str>) -> Option<&ArtistExtras> {
        id.and_then(|id| self.artists.get(id))
    }

    fn album(&self, id: Option<&str>) -> Option<&AlbumExtras> {
        id.and_then(|id| self.albums.get(id))
    }
}

fn first_image(images: &[RawImage]) -> Option<String> {
    images.first().map(|image| image.url.clone())
}

fn copyright(raw: RawCopyright) -> Copyright {
    Copyright {
        text: raw.text,
        kind: raw.kind,
    }
}

/// Distinct artist and album IDs referenced by `tracks`, in first-seen order
pub fn referenced_ids<'a>(
    tracks: impl IntoIterator<Item = &'a RawTrack>,
) -> (Vec<String>, Vec<String>) {
    let mut artist_ids = IndexSet::new();
    let mut album_ids = IndexSet::new();
    for track in tracks {
        artist_ids.extend(track.artists.iter().filter_map(|a| a.id.clone()));
        if let Some(id) = track.album.as_ref().and_then(|a| a.id.clone()) {
            album_ids.insert(id);
        }
    }
    (
        artist_ids.into_iter().collect(),
        album_ids.into_iter().collect(),
    )
}

/// Look up the full artist and album records behind `tracks`.
///
/// Both lookups run concurrently and are skipped when there is nothing to ask for.
pub async fn fetch_enrichment<'a, C>(
    catalog: &C,
    tracks: impl IntoIterator<Item = &'a RawTrack>,
) -> Result<Enrichment>
where
    C: Catalog + ?Sized,
{
    let (artist_ids, album_ids) = referenced_ids(tracks);
    debug!(
        "Enriching with {} artists and {} albums",
        artist_ids.len(),
        album_ids.len()
    );
    let artists = async {
        if artist_ids.is_empty() {
            Ok(Vec::new())
        } else {
            catalog.artists(&artist_ids).await
        }
    };
    let albums = async {
        if album_ids.is_empty() {
            Ok(Vec::new())
        } else {
            catalog.albums(&album_ids).await
        }
    };
    let (artists, albums) = futures::try_join!(artists, albums)?;
    Ok(Enrichment::from_records(artists, albums))
}

fn shape_track_artist(artist: &RawArtist, enrichment: &Enrichment) -> ArtistSummary {
    let extras = enrichment.artist(artist.id.as_deref());
    ArtistSummary {
        uri: artist.uri.clone(),
        name: artist.name.clone(),
        image_url: extras.and_then(|e| e.image_url.clone()),
        genres: extras.map(|e| e.genres.clone()),
    }
}

fn shape_track_album(album: &RawAlbum, enrichment: &Enrichment) -> AlbumSummary {
    let extras = enrichment.album(album.id.as_deref());
    AlbumSummary {
        uri: album.uri.clone(),
        name: album.name.clone(),
        album_type: album.album_type.clone(),
        cover_art_url: first_image(&album.images),
        release_date: album.release_date.clone(),
        release_date_precision: album.release_date_precision.clone(),
        label: extras.map(|e| e.label.clone().unwrap_or_default()),
        copyrights: extras.map(|e| e.copyrights.clone()),
    }
}

/// Shape tracks with whatever `enrichment` knows about their artists and albums.
///
/// A track without a URI (such as an unplayable local file) is still shaped, with
/// `uri: ""`, whereas [`extract_playlist_track_uris`] skips it.
pub fn shape_tracks(
    raw_tracks: impl IntoIterator<Item = Option<RawTrack>>,
    enrichment: &Enrichment,
) -> Vec<TrackSummary> {
    raw_tracks
        .into_iter()
        .flatten()
        .map(|track| TrackSummary {
            album: track
                .album
                .as_ref()
                .map(|album| shape_track_album(album, enrichment)),
            artists: track
                .artists
                .iter()
                .map(|artist| shape_track_artist(artist, enrichment))
                .collect(),
            uri: track.uri.unwrap_or_default(),
            name: track.name,
            duration_ms: track.duration_ms,
        })
        .collect()
}

/// Shape a raw track list, optionally looking up artist and album details first
pub async fn shape_track_list<C>(
    catalog: &C,
    raw_tracks: Vec<Option<RawTrack>>,
    enrich: bool,
) -> Result<Vec<TrackSummary>>
where
    C: Catalog + ?Sized,
{
    let enrichment = if enrich {
        fetch_enrichment(catalog, raw_tracks.iter().flatten()).await?
    } else {
        Enrichment::default()
    };
    Ok(shape_tracks(raw_tracks, &enrichment))
}

/// Full artist records as summaries with portrait and genres
pub fn shape_artists(raw: impl IntoIterator<Item = Option<RawArtist>>) -> Vec<ArtistSummary> {
    raw.into_iter()
        .flatten()
        .map(|artist| ArtistSummary {
            image_url: first_image(&artist.images),
            uri: artist.uri,
            name: artist.name,
            genres: Some(artist.genres),
        })
        .collect()
}

/// Full album records as summaries with label and copyrights
pub fn shape_albums(raw: impl IntoIterator<Item = Option<RawAlbum>>) -> Vec<AlbumSummary> {
    raw.into_iter()
        .flatten()
        .map(|album| AlbumSummary {
            cover_art_url: first_image(&album.images),
            uri: album.uri,
            name: album.name,
            album_type: album.album_type,
            release_date: album.release_date,
            release_date_precision: album.release_date_precision,
            label: Some(album.label.unwrap_or_default()),
            copyrights: Some(album.copyrights.into_iter().map(copyright).collect()),
        })
        .collect()
}

/// URIs of the playable items of a playlist, in playlist order
pub fn extract_playlist_track_uris(items: &[RawPlaylistItem]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.track.as_ref())
        .filter_map(|track| track.uri.as_deref())
        .filter(|uri| !uri.is_empty())
        .map(str::to_string)
        .collect()
}
