//! Playlist Librarian - Spotify catalog lookups for MCP clients
//!
//! This library exposes Spotify playlist, track, artist and album metadata as
//! Model Context Protocol tools. It parses playlist identifiers, talks to the
//! Spotify Web API with the client-credentials flow and flattens the nested
//! API responses into compact summaries.

/// Client modules for interacting with the Spotify Web API
pub mod clients;
/// Configuration loading from the environment and dotenv files
pub mod config;
/// Playlist identifier parsing
pub mod playlist_id;
/// Response shaping and enrichment
pub mod shaper;
/// MCP tool server
pub mod tools;

pub use tools::LibrarianServer;
