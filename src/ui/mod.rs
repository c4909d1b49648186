//! UI module for leaflens.
//!
//! This module contains all UI rendering logic including:
//! - Main layout and conversation rendering
//! - Toast notifications
//! - Gradient utilities
//! - Text processing

mod gradient;
mod render;
pub mod text;
pub mod toast;

pub use render::{ui, FAILURE_LINE, GREETING, PLACEHOLDER};
pub use toast::{render_toasts, ToastLevel, ToastState};
