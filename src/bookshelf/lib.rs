//! # Bookshelf Architecture
//!
//! Bookshelf is a **UI-agnostic book catalogue library** with soft delete. The
//! binary is one client of it; nothing from `api.rs` inward knows about a
//! terminal.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments and REPL lines, prints tables           │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API + Screens (api.rs, screens/)                           │
//! │  - Current tab, selection, form validation                  │
//! │  - Each screen: collection → search → table                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Actions (actions.rs)                                       │
//! │  - Latency boundary, busy flag, notifications               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (store/)                                             │
//! │  - Active + archived collections, one snapshot per change   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`table`] engine sits to the side: it is generic over any
//! [`table::TableRow`] and is only told about books by the screens.
//!
//! ## Reactivity
//!
//! The store publishes snapshots on a `tokio::sync::watch` channel. Readers
//! always see the latest value and may skip intermediate ones. A
//! [`view::FilteredView`] is recomputed from the newest collection and the
//! newest search term, never from a stale pairing.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade a UI talks to
//! - [`screens`]: Books and archived screens, the book form, tabs
//! - [`actions`]: Mutation runner, busy flag, notifications
//! - [`view`]: Search term and filtered collection views
//! - [`table`]: Sorting, paging and projection of any item type
//! - [`store`]: The two-collection book store
//! - [`model`]: `Book` and `Collection`
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod actions;
pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod screens;
pub mod store;
pub mod table;
pub mod view;
