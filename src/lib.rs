//! dirserve - browse, download and upload files in a folder over HTTP.
//!
//! A single served root is exposed through a small JSON API. Every client
//! path is resolved beneath that root; nothing outside it can be read or
//! written.

pub mod config;
pub mod datetime;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use error::{FileBrowserError, Result};
pub use file::{FileBrowser, ServedRoot};
