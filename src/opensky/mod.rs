//! Everything that talks to the OpenSky Network: authentication, the data
//! endpoints and their wire types.

pub mod auth;
pub mod client;
pub mod models;

pub use auth::{AccessToken, Authenticator, TokenCache};
pub use client::OpenSkyClient;
