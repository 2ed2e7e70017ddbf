//! # Museum TUI
//!
//! A terminal client for a small museum site.
//!
//! ## Features
//! - Showcase: featured exhibits, virtual tours, about page
//! - Decorative login dialog (nothing is submitted)
//! - Admin panel: list, create, edit and delete exhibits and tours
//!   against their collection endpoints
//! - Toast notifications for every request outcome
//! - YAML config with environment overrides
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod messages;
pub mod models;
pub mod network;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use config::{Config, RefreshPolicy};
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{Draft, Exhibit, ExhibitDraft, Resource, TourDraft, VirtualTour};
pub use network::{ApiClient, ApiError, NetworkActor};
