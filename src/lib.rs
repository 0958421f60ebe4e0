//! # tubefetch
//!
//! A small web application for fetching YouTube playlist metadata and
//! streaming video downloads back to the browser. Playlist-level info comes
//! from the Data API v3; per-video quality variants come from the public
//! watch page's embedded player response.
//!
//! The interesting pieces live in two modules: [`aggregate`] assembles a
//! playlist overview (title plus every member's progressive MP4 variants),
//! and [`download`] materializes one chosen variant into a scoped temporary
//! directory and returns the bytes. [`server`] is a thin axum layer over the
//! two:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tubefetch::{config::AppContext, server, util};
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = AppContext::from_env();
//!     let client = util::HttpClient::new().unwrap();
//!
//!     let app = server::router(server::AppState {
//!         ctx: Arc::new(ctx),
//!         http: Arc::new(client),
//!     });
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```
//!
//! Nothing is persisted between requests: every playlist and every download
//! is resolved fresh and discarded once the response is written.

#[forbid(unsafe_code)]
#[macro_use]
extern crate log;

pub mod aggregate;
pub mod config;
pub mod data_api;
pub mod download;
pub mod error;
pub mod player_response;
pub mod server;
pub mod util;
