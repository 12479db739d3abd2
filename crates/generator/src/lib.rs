//! HTTP backend for the deck generation endpoint.
//!
//! Sends a prompt to the configured endpoint and hands the JSON body back
//! for normalization by `deck-core`.

pub mod client;
pub mod config;

pub use client::{DeckGenerator, GenerationClient};
pub use config::{GeneratorConfig, API_KEY_VAR, API_URL_VAR, MODEL_ID};
