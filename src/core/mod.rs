//! # Core Application Logic
//!
//! This module contains roomchat's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │    API     │
//!           │  Adapter   │              │ REST + ws  │
//!           │ (ratatui)  │              │            │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`store`]: Ordered, id-unique message store
//! - [`feed`]: Store + loading flag + fetch sequencing
//! - [`composer`]: Pending text and edit target
//! - [`scroll`]: Jump-to-latest threshold check
//! - [`config`]: Layered configuration

pub mod action;
pub mod composer;
pub mod config;
pub mod feed;
pub mod scroll;
pub mod state;
pub mod store;
