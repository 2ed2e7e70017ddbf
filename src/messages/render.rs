//! Render state - data structure sent from App layer to UI for rendering

use crate::app::dialog::DialogState;
use crate::app::state::PendingDelete;
use crate::messages::ui_events::{AppTab, KeyContext, LoginField, ShowcaseSection};
use crate::models::{Exhibit, Resource, Toast, VirtualTour};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Tab
    pub active_tab: AppTab,

    // Showcase
    pub section: ShowcaseSection,
    pub show_login: bool,
    pub login_email: String,
    /// Only the length leaves the app layer; the UI draws it masked
    pub login_password_len: usize,
    pub login_field: LoginField,

    // Admin
    pub resource: Resource,
    pub exhibits: Vec<Exhibit>,
    pub tours: Vec<VirtualTour>,
    pub selected_exhibit: usize,
    pub selected_tour: usize,
    pub loading_exhibits: bool,
    pub loading_tours: bool,
    pub dialog: DialogState,
    pub confirm: Option<PendingDelete>,

    // Notifications
    pub toasts: Vec<Toast>,

    // Popups
    pub show_help: bool,
}

impl RenderState {
    pub fn key_context(&self) -> KeyContext {
        KeyContext {
            active_tab: self.active_tab,
            show_help: self.show_help,
            show_login: self.show_login,
            dialog_open: self.dialog.is_open(),
            confirm_open: self.confirm.is_some(),
        }
    }

    /// Whether a list fetch is in flight for the visible collection
    pub fn is_loading(&self) -> bool {
        match self.resource {
            Resource::Exhibits => self.loading_exhibits,
            Resource::Tours => self.loading_tours,
        }
    }
}
