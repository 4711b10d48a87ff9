//! # Core Reading Logic
//!
//! This module contains the reader's business logic.
//! It knows nothing about any specific UI technology or platform.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • App (state owner)    │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No UI. Ports only.     │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    CLI     │      │  Desktop   │      │   Tests    │
//!     │  (clap)    │      │  (future)  │      │  (doubles) │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`]: `Hadith`, `Language`, and the bundled file format
//! - [`catalog`]: static book list and sunnah reference numbering
//! - [`store`]: loading, caching, and the active book's list
//! - [`chapters`]: chapter groups derived from the list
//! - [`search`]: the filtered view
//! - [`cursor`]: index-safe navigation over the filtered view
//! - [`export`]: plain / markdown / structured rendering
//! - [`favorites`], [`settings`]: persisted user state
//! - [`config`]: config file and override resolution
//! - [`state`]: the `App` struct that owns all of the above
//! - [`action`]: the `Action` enum and `update()`

pub mod action;
pub mod catalog;
pub mod chapters;
pub mod config;
pub mod cursor;
pub mod export;
pub mod favorites;
pub mod search;
pub mod settings;
pub mod state;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use action::{Action, Effect, update};
pub use state::App;
pub use types::{Hadith, Language};
