// Crate root library declaration and module exports.
pub mod admin;
pub mod chat;
pub mod cli;
pub mod config;
pub mod context;
pub mod directory;
pub mod error;
pub mod logging;
pub mod model;
pub mod profile;
pub mod session;
pub mod source;
pub mod storage;
pub mod store;
pub mod timeline;

#[cfg(feature = "tui")]
pub mod tui;
