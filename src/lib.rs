//! Keymux library exports for testing and embedding.

pub mod core;
pub mod tui;
