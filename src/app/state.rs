//! App state - pure data structure with no I/O logic

use std::collections::{HashMap, VecDeque};

use crate::app::dialog::DialogState;
use crate::config::{ttl_from_secs, RefreshPolicy};
use crate::constants::DEFAULT_TOAST_TTL_SECS;
use crate::messages::ui_events::{AppTab, LoginField, ShowcaseSection};
use crate::messages::RenderState;
use crate::models::{ApiAction, Exhibit, Resource, Toast, VirtualTour};

/// Most toasts kept on screen at once
pub const MAX_TOASTS: usize = 5;

/// Decorative login dialog. Input is kept locally and never sent.
#[derive(Clone, Debug, Default)]
pub struct LoginState {
    pub open: bool,
    pub email: String,
    pub password: String,
    pub field: LoginField,
}

/// Delete awaiting the user's confirmation
#[derive(Clone, Debug, PartialEq)]
pub struct PendingDelete {
    pub resource: Resource,
    pub record_id: i64,
    pub title: String,
}

/// What an in-flight request was for, keyed by request id
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InFlight {
    pub resource: Resource,
    pub action: ApiAction,
}

/// Local mirror of both remote collections
#[derive(Clone, Debug, Default)]
pub struct AdminState {
    pub resource: Resource,
    pub exhibits: Vec<Exhibit>,
    pub tours: Vec<VirtualTour>,
    pub selected_exhibit: usize,
    pub selected_tour: usize,
    pub dialog: DialogState,
    pub confirm: Option<PendingDelete>,
    /// Newest fetch id per collection; older list responses are dropped
    pub latest_fetch: HashMap<Resource, u64>,
}

/// Main application state - pure data, no I/O
pub struct AppState {
    // Tab navigation
    pub active_tab: AppTab,

    // Showcase
    pub section: ShowcaseSection,
    pub login: LoginState,

    // Admin
    pub admin: AdminState,
    pub refresh_policy: RefreshPolicy,

    // Requests
    pub next_request_id: u64,
    pub in_flight: HashMap<u64, InFlight>,

    // Notifications
    pub toasts: VecDeque<Toast>,
    pub toast_ttl: chrono::Duration,

    // Popups
    pub show_help: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            RefreshPolicy::default(),
            ttl_from_secs(DEFAULT_TOAST_TTL_SECS).unwrap_or_else(chrono::Duration::zero),
        )
    }
}

impl AppState {
    pub fn new(refresh_policy: RefreshPolicy, toast_ttl: chrono::Duration) -> Self {
        AppState {
            active_tab: AppTab::Showcase,
            section: ShowcaseSection::Home,
            login: LoginState::default(),
            admin: AdminState::default(),
            refresh_policy,
            next_request_id: 1,
            in_flight: HashMap::new(),
            toasts: VecDeque::with_capacity(MAX_TOASTS),
            toast_ttl,
            show_help: false,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn is_fetching(&self, resource: Resource) -> bool {
        self.in_flight
            .values()
            .any(|f| f.resource == resource && f.action == ApiAction::Fetch)
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            active_tab: self.active_tab,
            section: self.section,
            show_login: self.login.open,
            login_email: self.login.email.clone(),
            login_password_len: self.login.password.chars().count(),
            login_field: self.login.field,
            resource: self.admin.resource,
            exhibits: self.admin.exhibits.clone(),
            tours: self.admin.tours.clone(),
            selected_exhibit: self.admin.selected_exhibit,
            selected_tour: self.admin.selected_tour,
            loading_exhibits: self.is_fetching(Resource::Exhibits),
            loading_tours: self.is_fetching(Resource::Tours),
            dialog: self.admin.dialog.clone(),
            confirm: self.admin.confirm.clone(),
            toasts: self.toasts.iter().cloned().collect(),
            show_help: self.show_help,
        }
    }
}
