//! Live TV addon for Xtream Codes providers
//!
//! Serves the provider's live channels as an addon catalog, resolves
//! playback URLs, and annotates channel metadata with the programme currently
//! airing according to an XMLTV feed.

pub mod config;
pub mod epg;
pub mod errors;
pub mod ingestor;
pub mod models;
pub mod services;
pub mod sources;
pub mod utils;
pub mod web;
