/// Catalog access trait shared by the live client and test doubles
pub mod catalog;
/// Flattened track, artist and album records returned to callers
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Spotify Web API response models
pub mod raw;
/// Spotify API client and credential management
pub mod spotify;

pub use catalog::Catalog;
pub use spotify::{SpotifyCatalog, SpotifyClientManager};
