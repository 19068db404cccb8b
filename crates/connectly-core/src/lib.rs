//! Core Connectly client library (config, session, auth, routing, feed).

pub mod auth;
pub mod config;
pub mod feed;
pub mod interactions;
pub mod profile;
pub mod routes;
pub mod session;
