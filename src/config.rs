use std::path::{Path, PathBuf};

use log::debug;

use crate::clients::errors::{Error, Result};
use crate::clients::spotify::{Credentials, Endpoints};

pub const CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";
pub const API_BASE_URL_VAR: &str = "SPOTIFY_API_BASE_URL";
pub const AUTH_BASE_URL_VAR: &str = "SPOTIFY_AUTH_BASE_URL";

// Configuration for the Spotify session
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub endpoints: Endpoints,
}

pub struct ConfigBuilder {
    env_file: Option<PathBuf>,
    credentials: Option<Credentials>,
    endpoints: Option<Endpoints>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            env_file: None,
            credentials: None,
            endpoints: None,
        }
    }

    /// Read variables from this file instead of `./.env`
    #[must_use]
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    #[must_use]
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    pub fn build(self) -> Result<Config> {
        if self.credentials.is_none() || self.endpoints.is_none() {
            load_env_file(self.env_file.as_deref())?;
        }
        let lookup = |key: &str| std::env::var(key).ok();
        let credentials = match self.credentials {
            Some(c) => c,
            None => credentials_from(lookup)?,
        };
        let endpoints = match self.endpoints {
            Some(e) => e,
            None => endpoints_from(lookup),
        };
        Ok(Config {
            credentials,
            endpoints,
        })
    }
}

// An explicit file must exist; the default `.env` is optional
fn load_env_file(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)?;
            debug!("Loaded environment from {path:?}");
        }
        None => match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {path:?}"),
            Err(e) if e.not_found() => debug!("No .env file found, using process environment"),
            Err(e) => return Err(e.into()),
        },
    }
    Ok(())
}

fn non_empty(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read the client credentials, naming every missing variable at once
pub fn credentials_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Credentials> {
    let client_id = non_empty(&lookup, CLIENT_ID_VAR);
    let client_secret = non_empty(&lookup, CLIENT_SECRET_VAR);
    match (client_id, client_secret) {
        (Some(id), Some(secret)) => Credentials::new(id, secret),
        (id, secret) => {
            let missing: Vec<&str> = [
                (id.is_none(), CLIENT_ID_VAR),
                (secret.is_none(), CLIENT_SECRET_VAR),
            ]
            .into_iter()
            .filter_map(|(absent, var)| absent.then_some(var))
            .collect();
            Err(Error::ConfigurationError(format!(
                "Missing required environment variables: {}. \
                 Please set these variables in your environment or .env file.",
                missing.join(", ")
            )))
        }
    }
}

pub fn endpoints_from(lookup: impl Fn(&str) -> Option<String>) -> Endpoints {
    Endpoints {
        api_base_url: non_empty(&lookup, API_BASE_URL_VAR),
        auth_base_url: non_empty(&lookup, AUTH_BASE_URL_VAR),
    }
}
