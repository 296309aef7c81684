//! BlogSpace client library
//!
//! Session guard, API clients, post composer and detail view state behind the
//! `blogspace` terminal client.

pub mod api;
pub mod app;
pub mod attachment;
pub mod browse;
pub mod cli;
pub mod composer;
pub mod config;
pub mod detail;
pub mod forms;
pub mod notify;
pub mod render;
pub mod routes;
pub mod session;
pub mod telemetry;

pub use app::App;
pub use config::Config;
pub use notify::{Notice, NoticeLevel, Notifier};
pub use routes::Route;
pub use session::{FileTokenStore, MemoryTokenStore, SessionGuard, TokenStore};
