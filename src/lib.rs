//! Notizbuch: a single-user notes service backed by one JSON file, plus
//! an editor client for it.

pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod persistence;
pub mod routes;
pub mod services;
pub mod state;
