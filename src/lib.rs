//! Travel recommendation gateway.
//!
//! The `routes` tree serves a single endpoint that relays a traveller's
//! profile, destination and photos to Gemini and returns three suggestions.
//! The `composer` module is the client half: it gathers input, encodes
//! images and tracks the outcome of a submission.

pub mod composer;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
