//! HTTP gateway of the keylink URL shortener.
//!
//! Translates HTTP requests into [`UrlManager`](keylink_core::UrlManager)
//! calls and their outcomes into redirects and JSON responses.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
