//! supersets - Personal workout rotation tracker
//!
//! Recommends the longest rested main muscle group and two superset
//! partners, and keeps the history in a local SQLite file.

pub mod bot;
pub mod db;
pub mod format;
pub mod history;
pub mod muscles;
pub mod rotation;
pub mod session;
pub mod tracker;
pub mod tui;

pub use db::Database;
pub use tracker::Tracker;
