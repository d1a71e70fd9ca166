//! Playlist identifier parsing.
//!
//! Accepts the three ways a user usually hands over a playlist:
//! - `https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=...`
//! - `spotify:playlist:37i9dQZF1DXcBWIGoYBM5M`
//! - `37i9dQZF1DXcBWIGoYBM5M`

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::clients::errors::{Error, Result};

/// Length of every Spotify base-62 ID
pub const ID_LEN: usize = 22;

static RAW_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{22}$").expect("valid regex"));

static WEB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://open\.spotify\.com/(?:intl-[A-Za-z-]+/)?playlist/([A-Za-z0-9]{22})(?:[?#/]|$)")
        .expect("valid regex")
});

static URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"spotify:playlist:([A-Za-z0-9]{22})(?:\?|$)").expect("valid regex")
});

/// A validated 22 character alphanumeric catalog ID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogId(String);

impl CatalogId {
    pub fn parse(value: &str) -> Result<Self> {
        if value.len() == ID_LEN && value.chars().all(|c| c.is_ascii_alphanumeric()) {
            Ok(CatalogId(value.to_string()))
        } else {
            Err(Error::InvalidFormat(format!(
                "'{value}' is not a {ID_LEN} character alphanumeric Spotify ID"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CatalogId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CatalogId::parse(s)
    }
}

/// Extract the playlist ID from a raw ID, an open.spotify.com URL or a `spotify:` URI
pub fn extract_playlist_id(playlist_url_or_id: &str) -> Result<CatalogId> {
    let url_or_id = playlist_url_or_id.trim();
    if url_or_id.is_empty() {
        return Err(Error::InvalidFormat(
            "playlist_url_or_id must be a non-empty string".into(),
        ));
    }

    if RAW_ID.is_match(url_or_id) {
        return Ok(CatalogId(url_or_id.to_string()));
    }

    let captured = WEB_URL
        .captures(url_or_id)
        .or_else(|| URI.captures(url_or_id))
        .and_then(|caps| caps.get(1));
    match captured {
        Some(id) => Ok(CatalogId(id.as_str().to_string())),
        None => Err(Error::InvalidFormat(format!(
            "Invalid Spotify playlist URL or ID format: '{playlist_url_or_id}'. \
             Supported formats: HTTPS URL, Spotify URI, or raw playlist ID."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ID: &str = "37i9dQZF1DXcBWIGoYBM5M";

    fn catalog_id() -> impl Strategy<Value = String> {
        prop::string::string_regex("[A-Za-z0-9]{22}").unwrap()
    }

    #[test]
    fn accepts_all_supported_forms() {
        let inputs = [
            ID.to_string(),
            format!("  {ID}\n"),
            format!("https://open.spotify.com/playlist/{ID}"),
            format!("https://open.spotify.com/playlist/{ID}?si=abc123&pt=x"),
            format!("https://open.spotify.com/intl-de/playlist/{ID}"),
            format!("spotify:playlist:{ID}"),
        ];
        for input in inputs {
            assert_eq!(extract_playlist_id(&input).unwrap().as_str(), ID, "{input}");
        }
    }

    #[test]
    fn rejects_unsupported_forms() {
        let inputs = [
            "not-a-playlist",
            "",
            "   ",
            "37i9dQZF1DXcBWIGoYBM5",
            "https://open.spotify.com/album/37i9dQZF1DXcBWIGoYBM5M",
            "https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5MX",
            "spotify:track:37i9dQZF1DXcBWIGoYBM5M",
        ];
        for input in inputs {
            assert!(
                matches!(extract_playlist_id(input), Err(Error::InvalidFormat(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn error_echoes_untrimmed_input_and_formats() {
        let err = extract_playlist_id(" nope ").unwrap_err().to_string();
        assert!(err.contains("' nope '"), "{err}");
        assert!(err.contains("HTTPS URL, Spotify URI, or raw playlist ID"), "{err}");
    }

    #[test]
    fn catalog_id_parse_validates() {
        assert_eq!(ID.parse::<CatalogId>().unwrap().to_string(), ID);
        assert!(CatalogId::parse("short").is_err());
        assert!(CatalogId::parse("37i9dQZF1DXcBWIGoYBM5-").is_err());
    }

    proptest! {
        /// Raw IDs come back unchanged
        #[test]
        fn raw_id_is_returned_as_is(id in catalog_id()) {
            let got = extract_playlist_id(&id).unwrap();
            prop_assert_eq!(got.as_str(), id.as_str());
        }

        /// Web URLs yield the ID whatever the query string
        #[test]
        fn web_url_yields_id(id in catalog_id(), query in "(\\?[a-z]{1,5}=[A-Za-z0-9]{0,16})?") {
            let url = format!("https://open.spotify.com/playlist/{id}{query}");
            let got = extract_playlist_id(&url).unwrap();
            prop_assert_eq!(got.as_str(), id.as_str());
        }

        /// URIs yield the ID
        #[test]
        fn uri_yields_id(id in catalog_id()) {
            let uri = format!("spotify:playlist:{id}");
            let got = extract_playlist_id(&uri).unwrap();
            prop_assert_eq!(got.as_str(), id.as_str());
        }

        /// IDs one character short never pass
        #[test]
        fn short_ids_are_rejected(id in prop::string::string_regex("[A-Za-z0-9]{21}").unwrap()) {
            prop_assert!(extract_playlist_id(&id).is_err());
        }
    }
}
