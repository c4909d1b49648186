//! Leaflens CLI - identify a book from a sentence or a page photo.
//!
//! This library exposes the core modules for testing and reuse.

pub mod app;
pub mod capture;
pub mod config;
pub mod conversation;
pub mod input;
pub mod logging;
pub mod reveal;
pub mod search;
pub mod ui;
