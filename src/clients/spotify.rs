use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use log::{debug, error, info};
use rspotify::{
    ClientCredsSpotify, ClientError, Config, Credentials as SpotifyCredentials,
    http::HttpError, prelude::*,
};
use serde::de::DeserializeOwned;

use crate::clients::{
    catalog::Catalog,
    errors::{Error, Result},
    raw::{
        RawAlbum, RawAlbums, RawArtist, RawArtists, RawPlaylistItem, RawPlaylistPage, RawTrack,
        RawTracks,
    },
};
use crate::playlist_id::CatalogId;

// Batch limits of the several-items endpoints
const TRACKS_BATCH: usize = 50;
const ARTISTS_BATCH: usize = 50;
const ALBUMS_BATCH: usize = 20;
const PLAYLIST_PAGE_LIMIT: &str = "100";

/// Client ID and secret of a Spotify application. Both are non-empty.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.trim().is_empty() {
            return Err(Error::InvalidCredentials(
                "client_id must be a non-empty string".into(),
            ));
        }
        if client_secret.trim().is_empty() {
            return Err(Error::InvalidCredentials(
                "client_secret must be a non-empty string".into(),
            ));
        }
        Ok(Self {
            client_id,
            client_secret,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

// Keep the secret out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Base URL overrides for the Spotify API and accounts service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base_url: Option<String>,
    pub auth_base_url: Option<String>,
}

impl Endpoints {
    fn to_config(&self) -> Config {
        let mut config = Config::default();
        if let Some(url) = &self.api_base_url {
            config.api_base_url.clone_from(url);
        }
        if let Some(url) = &self.auth_base_url {
            config.auth_base_url.clone_from(url);
        }
        config
    }
}

/// Why a client-credentials token could not be obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// The accounts service answered with an error status, usually bad credentials
    Rejected { status: u16 },
    /// No answer from the accounts service
    Transport(String),
    Other(String),
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFailure::Rejected { status } => {
                write!(f, "credentials rejected with status {status}")
            }
            AuthFailure::Transport(msg) => write!(f, "transport failure: {msg}"),
            AuthFailure::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<ClientError> for AuthFailure {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(http) => match *http {
                HttpError::StatusCode(response) => AuthFailure::Rejected {
                    status: response.status().as_u16(),
                },
                HttpError::Client(e) => AuthFailure::Transport(e.to_string()),
            },
            other => AuthFailure::Other(other.to_string()),
        }
    }
}

enum Session {
    Uninitialized,
    Live(ClientCredsSpotify),
    Failed(AuthFailure),
}

/// Owns the application credentials and the session obtained with them.
///
/// A session goes from uninitialized to either live or failed through
/// [`authenticate`](Self::authenticate). Nothing refreshes a failed session;
/// the process has to be restarted with working credentials.
pub struct SpotifyClientManager {
    credentials: Credentials,
    endpoints: Endpoints,
    session: Session,
}

impl SpotifyClientManager {
    pub fn new(credentials: Credentials, endpoints: Endpoints) -> Self {
        SpotifyClientManager {
            credentials,
            endpoints,
            session: Session::Uninitialized,
        }
    }

    /// Request a token with the client-credentials flow.
    ///
    /// Failures are logged and reported as `false`; the cause stays available
    /// through [`last_failure`](Self::last_failure).
    pub async fn authenticate(&mut self) -> bool {
        match self.try_authenticate().await {
            Ok(spotify) => {
                info!("Successfully authenticated with Spotify");
                self.session = Session::Live(spotify);
                true
            }
            Err(failure) => {
                error!("Spotify authentication failed: {failure}");
                self.session = Session::Failed(failure);
                false
            }
        }
    }

    async fn try_authenticate(&self) -> std::result::Result<ClientCredsSpotify, AuthFailure> {
        debug!(
            "Requesting client credentials token for client {}",
            self.credentials.client_id()
        );
        let creds = SpotifyCredentials::new(
            &self.credentials.client_id,
            &self.credentials.client_secret,
        );
        let spotify = ClientCredsSpotify::with_config(creds, self.endpoints.to_config());
        spotify.request_token().await?;
        Ok(spotify)
    }

    pub fn is_live(&self) -> bool {
        matches!(self.session, Session::Live(_))
    }

    pub fn last_failure(&self) -> Option<&AuthFailure> {
        match &self.session {
            Session::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Catalog facade over the live session
    pub fn get_client(&self) -> Result<SpotifyCatalog> {
        match &self.session {
            Session::Live(spotify) => Ok(SpotifyCatalog::new(spotify.clone())),
            Session::Uninitialized | Session::Failed(_) => Err(Error::NotAuthenticated),
        }
    }

    /// Issue a one-result search to check the session actually works
    pub async fn test_connection(&self) -> Result<bool> {
        let catalog = self.get_client()?;
        match catalog.probe().await {
            Ok(()) => {
                info!("Spotify connection test successful");
                Ok(true)
            }
            Err(e) => {
                error!("Spotify connection test failed: {e}");
                Ok(false)
            }
        }
    }
}

/// Read-only catalog access through an authenticated `rspotify` client
#[derive(Clone)]
pub struct SpotifyCatalog {
    spotify: ClientCredsSpotify,
}

impl SpotifyCatalog {
    pub fn new(spotify: ClientCredsSpotify) -> Self {
        SpotifyCatalog { spotify }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        debug!("GET {endpoint} {query:?}");
        let query: HashMap<&str, &str> = query.iter().copied().collect();
        let body = self.spotify.api_get(endpoint, &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn probe(&self) -> Result<()> {
        self.get::<serde_json::Value>("search", &[("q", "test"), ("type", "track"), ("limit", "1")])
            .await
            .map(|_| ())
    }

    async fn several<T, R>(
        &self,
        endpoint: &str,
        ids: &[String],
        batch: usize,
        unwrap: impl Fn(R) -> Vec<Option<T>>,
    ) -> Result<Vec<Option<T>>>
    where
        R: DeserializeOwned,
    {
        let unwrap = &unwrap;
        let found = fetch_in_batches(ids, batch, |joined| async move {
            let response: R = self.get(endpoint, &[("ids", joined.as_str())]).await?;
            Ok(unwrap(response))
        })
        .await?;
        debug!("Fetched {} {endpoint} for {} IDs", found.len(), ids.len());
        Ok(found)
    }
}

/// Request `ids` in comma-joined batches of at most `batch`, concatenating the
/// answers in request order
async fn fetch_in_batches<T, F, Fut>(
    ids: &[String],
    batch: usize,
    fetch: F,
) -> Result<Vec<Option<T>>>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Vec<Option<T>>>>,
{
    let mut found = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(batch) {
        found.extend(fetch(chunk.join(",")).await?);
    }
    Ok(found)
}

#[async_trait]
impl Catalog for SpotifyCatalog {
    async fn playlist_items(&self, playlist_id: &CatalogId) -> Result<Vec<RawPlaylistItem>> {
        let endpoint = format!("playlists/{playlist_id}/tracks");
        let page: RawPlaylistPage = self
            .get(&endpoint, &[("limit", PLAYLIST_PAGE_LIMIT)])
            .await?;
        if page.next.is_some() {
            debug!(
                "Playlist {playlist_id} has {} items, returning the first {}",
                page.total,
                page.items.len()
            );
        }
        Ok(page.items)
    }

    async fn tracks(&self, ids: &[String]) -> Result<Vec<Option<RawTrack>>> {
        self.several("tracks", ids, TRACKS_BATCH, |r: RawTracks| r.tracks)
            .await
    }

    async fn artists(&self, ids: &[String]) -> Result<Vec<Option<RawArtist>>> {
        self.several("artists", ids, ARTISTS_BATCH, |r: RawArtists| r.artists)
            .await
    }

    async fn albums(&self, ids: &[String]) -> Result<Vec<Option<RawAlbum>>> {
        self.several("albums", ids, ALBUMS_BATCH, |r: RawAlbums| r.albums)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn unreachable_endpoints() -> Endpoints {
        // Nothing listens on the discard port locally, so the token request fails fast
        Endpoints {
            api_base_url: Some("http://127.0.0.1:9/v1/".into()),
            auth_base_url: Some("http://127.0.0.1:9/".into()),
        }
    }

    #[test]
    fn credentials_require_both_values() {
        let err = Credentials::new("", "secret").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials(ref m) if m.contains("client_id")));
        let err = Credentials::new("id", "  ").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials(ref m) if m.contains("client_secret")));
        assert!(Credentials::new("id", "secret").is_ok());
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let creds = Credentials::new("id", "hunter2").unwrap();
        let printed = format!("{creds:?}");
        assert!(printed.contains("id"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn uninitialized_manager_has_no_client() {
        let manager = SpotifyClientManager::new(
            Credentials::new("id", "secret").unwrap(),
            Endpoints::default(),
        );
        assert!(!manager.is_live());
        assert!(matches!(manager.get_client(), Err(Error::NotAuthenticated)));
        assert!(manager.last_failure().is_none());
    }

    #[tokio::test]
    async fn test_connection_requires_session() {
        let manager = SpotifyClientManager::new(
            Credentials::new("id", "secret").unwrap(),
            Endpoints::default(),
        );
        assert!(matches!(
            manager.test_connection().await,
            Err(Error::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn failed_authentication_stays_failed() {
        let mut manager = SpotifyClientManager::new(
            Credentials::new("id", "secret").unwrap(),
            unreachable_endpoints(),
        );
        assert!(!manager.authenticate().await);
        assert!(matches!(manager.get_client(), Err(Error::NotAuthenticated)));
        assert!(!manager.authenticate().await);
        assert!(matches!(manager.get_client(), Err(Error::NotAuthenticated)));
        assert!(manager.last_failure().is_some());
    }

    #[tokio::test]
    async fn long_id_lists_are_split_into_ordered_batches() {
        let ids: Vec<String> = (0..51).map(|i| format!("id{i}")).collect();
        let requests = Mutex::new(Vec::new());
        let found = fetch_in_batches(&ids, TRACKS_BATCH, |joined| {
            requests.lock().unwrap().push(joined.clone());
            async move { Ok(joined.split(',').map(|id| Some(id.to_string())).collect()) }
        })
        .await
        .unwrap();

        let requests = requests.into_inner().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].split(',').count(), 50);
        assert_eq!(requests[1], "id50");
        let found: Vec<String> = found.into_iter().flatten().collect();
        assert_eq!(found, ids);
    }

    #[tokio::test]
    async fn batch_failure_stops_the_lookup() {
        let ids: Vec<String> = (0..45).map(|i| format!("al{i}")).collect();
        let calls = Mutex::new(0);
        let result = fetch_in_batches::<String, _, _>(&ids, ALBUMS_BATCH, |_| {
            *calls.lock().unwrap() += 1;
            async { Err(Error::NotAuthenticated) }
        })
        .await;
        assert!(matches!(result, Err(Error::NotAuthenticated)));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn short_id_lists_are_one_request() {
        let ids: Vec<String> = (0..20).map(|i| format!("al{i}")).collect();
        let calls = Mutex::new(0);
        let found = fetch_in_batches(&ids, ALBUMS_BATCH, |joined| {
            *calls.lock().unwrap() += 1;
            async move { Ok(joined.split(',').map(|_| None::<()>).collect()) }
        })
        .await
        .unwrap();
        assert_eq!(found.len(), 20);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn endpoints_override_config() {
        let config = unreachable_endpoints().to_config();
        assert_eq!(config.auth_base_url, "http://127.0.0.1:9/");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9/v1/");
        let defaults = Endpoints::default().to_config();
        assert_eq!(defaults.api_base_url, Config::default().api_base_url);
    }
}
