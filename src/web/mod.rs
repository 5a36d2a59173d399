//! HTTP/JSON front end for FitQuest.
//!
//! Every endpoint answers `{success, message, ...}`. All routes except
//! register and login need an `Authorization: Bearer <token>` header.
//!
//! ## Usage
//!
//! ```sh
//! cargo run -- serve                       # 127.0.0.1:3000
//! cargo run -- serve --config fitquest.toml
//! ```

#[cfg(feature = "web")]
mod routes;

#[cfg(feature = "web")]
mod server;

#[cfg(feature = "web")]
pub use server::{router, serve, AppState};
