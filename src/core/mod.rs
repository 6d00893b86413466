//! # Core Input Multiplexing
//!
//! The UI-agnostic heart of keymux: given raw key events, decide who handles
//! them. It knows nothing about terminals or rendering — hosts inject
//! callbacks and own the screen.
//!
//! ```text
//!                 raw key event
//!                       │
//!            ┌──────────▼──────────┐
//!            │   MenuStateMachine  │  F10 / Alt+* claims the key,
//!            │      (menu.rs)      │  owns input until commit/cancel
//!            └──────────┬──────────┘
//!                       │ not claimed
//!            ┌──────────▼──────────┐
//!            │     InputRouter     │  priority keys → CommandLine
//!            │     (router.rs)     │  else Modal / InlineEdit /
//!            └──────────┬──────────┘  GridNavigation / CommandLine
//!                       │
//!              RouterHooks callbacks
//!          (execute, commit, render, …)
//! ```
//!
//! ## Modules
//!
//! - [`key`]: shared key classification over crossterm key codes
//! - [`session`]: `SessionState` — all mutable per-session input state
//! - [`router`]: `InputRouter` — four-context key dispatch
//! - [`menu`]: `MenuStateMachine` — menu bar and dropdown navigation
//! - [`config`]: TOML settings and the configurable menu bar

pub mod config;
pub mod key;
pub mod menu;
pub mod router;
pub mod session;
