//! Command handlers - business logic for processing UI events and responses

use crate::app::dialog::{DialogMode, DialogState};
use crate::app::form::EntityForm;
use crate::app::state::{AppState, InFlight, PendingDelete, MAX_TOASTS};
use crate::config::RefreshPolicy;
use crate::messages::ui_events::{AppTab, LoginField};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{ApiAction, MutationOutcome, Record, Resource, Toast};

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn switch_tab(&mut self, tab: AppTab) {
        self.active_tab = tab;
    }

    pub fn next_section(&mut self) {
        self.section = self.section.next();
    }

    pub fn prev_section(&mut self) {
        self.section = self.section.prev();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Login dialog (decorative)
    // ========================

    pub fn open_login(&mut self) {
        self.login.open = true;
        self.login.field = LoginField::Email;
    }

    /// Closing keeps nothing; there is no submit path.
    pub fn close_login(&mut self) {
        self.login = Default::default();
    }

    pub fn login_next_field(&mut self) {
        self.login.field = match self.login.field {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn login_char(&mut self, c: char) {
        match self.login.field {
            LoginField::Email => self.login.email.push(c),
            LoginField::Password => self.login.password.push(c),
        }
    }

    pub fn login_backspace(&mut self) {
        match self.login.field {
            LoginField::Email => self.login.email.pop(),
            LoginField::Password => self.login.password.pop(),
        };
    }

    // ========================
    // Fetching
    // ========================

    /// The two independent start-up fetches
    pub fn initial_fetch(&mut self) -> Vec<NetworkCommand> {
        vec![self.fetch(Resource::Exhibits), self.fetch(Resource::Tours)]
    }

    /// GET `resource`; supersedes any older fetch for it
    pub fn fetch(&mut self, resource: Resource) -> NetworkCommand {
        let id = self.track(resource, ApiAction::Fetch);
        self.admin.latest_fetch.insert(resource, id);
        NetworkCommand::Fetch { id, resource }
    }

    /// Manual refresh of the visible collection
    pub fn refresh(&mut self) -> NetworkCommand {
        self.fetch(self.admin.resource)
    }

    fn track(&mut self, resource: Resource, action: ApiAction) -> u64 {
        let id = self.next_id();
        self.in_flight.insert(id, InFlight { resource, action });
        id
    }

    // ========================
    // List selection
    // ========================

    pub fn switch_resource(&mut self) {
        self.admin.resource = self.admin.resource.toggle();
    }

    fn list_len(&self, resource: Resource) -> usize {
        match resource {
            Resource::Exhibits => self.admin.exhibits.len(),
            Resource::Tours => self.admin.tours.len(),
        }
    }

    fn selection_mut(&mut self, resource: Resource) -> &mut usize {
        match resource {
            Resource::Exhibits => &mut self.admin.selected_exhibit,
            Resource::Tours => &mut self.admin.selected_tour,
        }
    }

    pub fn select_next(&mut self) {
        let resource = self.admin.resource;
        let len = self.list_len(resource);
        if len > 0 {
            let selected = self.selection_mut(resource);
            *selected = (*selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let resource = self.admin.resource;
        let len = self.list_len(resource);
        if len > 0 {
            let selected = self.selection_mut(resource);
            *selected = selected.checked_sub(1).unwrap_or(len - 1);
        }
    }

    fn clamp_selection(&mut self, resource: Resource) {
        let len = self.list_len(resource);
        let selected = self.selection_mut(resource);
        if *selected >= len {
            *selected = len.saturating_sub(1);
        }
    }

    /// Id and title of the highlighted row in the visible collection
    pub fn selected_record(&self) -> Option<(i64, String)> {
        match self.admin.resource {
            Resource::Exhibits => self
                .admin
                .exhibits
                .get(self.admin.selected_exhibit)
                .map(|e| (e.id, e.title.clone())),
            Resource::Tours => self
                .admin
                .tours
                .get(self.admin.selected_tour)
                .map(|t| (t.id, t.title.clone())),
        }
    }

    // ========================
    // Edit dialog
    // ========================

    pub fn open_create(&mut self) {
        self.admin.dialog = DialogState::create(self.admin.resource);
    }

    pub fn open_edit(&mut self) {
        let form = match self.admin.resource {
            Resource::Exhibits => self
                .admin
                .exhibits
                .get(self.admin.selected_exhibit)
                .map(|e| (e.id, EntityForm::from_exhibit(e))),
            Resource::Tours => self
                .admin
                .tours
                .get(self.admin.selected_tour)
                .map(|t| (t.id, EntityForm::from_tour(t))),
        };
        if let Some((id, form)) = form {
            self.admin.dialog = DialogState::edit(id, form);
        }
    }

    pub fn cancel_dialog(&mut self) {
        self.admin.dialog.cancel();
    }

    pub fn dialog_next_field(&mut self) {
        if let Some(form) = self.admin.dialog.form_mut() {
            form.next_field();
        }
    }

    pub fn dialog_prev_field(&mut self) {
        if let Some(form) = self.admin.dialog.form_mut() {
            form.prev_field();
        }
    }

    pub fn dialog_char(&mut self, c: char) {
        if let Some(form) = self.admin.dialog.form_mut() {
            form.enter_char(c);
        }
    }

    pub fn dialog_backspace(&mut self) {
        if let Some(form) = self.admin.dialog.form_mut() {
            form.delete_char();
        }
    }

    pub fn dialog_cursor_left(&mut self) {
        if let Some(form) = self.admin.dialog.form_mut() {
            form.move_cursor_left();
        }
    }

    pub fn dialog_cursor_right(&mut self) {
        if let Some(form) = self.admin.dialog.form_mut() {
            form.move_cursor_right();
        }
    }

    /// Validate the form and emit POST or PUT
    pub fn submit_dialog(&mut self) -> Option<NetworkCommand> {
        let id = self.next_request_id;
        let submission = self.admin.dialog.submit(id)?;
        self.next_request_id += 1;

        let resource = submission.draft.resource();
        match submission.mode {
            DialogMode::Creating => {
                self.in_flight.insert(id, InFlight { resource, action: ApiAction::Create });
                Some(NetworkCommand::Create { id, draft: submission.draft })
            }
            DialogMode::Editing(record_id) => {
                self.in_flight.insert(id, InFlight { resource, action: ApiAction::Update });
                Some(NetworkCommand::Update {
                    id,
                    record_id,
                    draft: submission.draft,
                })
            }
        }
    }

    // ========================
    // Delete prompt
    // ========================

    pub fn request_delete(&mut self) {
        if let Some((record_id, title)) = self.selected_record() {
            self.admin.confirm = Some(PendingDelete {
                resource: self.admin.resource,
                record_id,
                title,
            });
        }
    }

    pub fn confirm_delete(&mut self) -> Option<NetworkCommand> {
        let pending = self.admin.confirm.take()?;
        let id = self.track(pending.resource, ApiAction::Delete);
        Some(NetworkCommand::Delete {
            id,
            resource: pending.resource,
            record_id: pending.record_id,
        })
    }

    pub fn decline_delete(&mut self) {
        self.admin.confirm = None;
    }

    // ========================
    // Response handling
    // ========================

    /// Apply a response. Returns follow-up commands (re-fetches).
    pub fn handle_response(&mut self, response: NetworkResponse) -> Vec<NetworkCommand> {
        self.in_flight.remove(&response.id());

        match response {
            NetworkResponse::ExhibitsLoaded { id, exhibits } => {
                if self.is_latest_fetch(Resource::Exhibits, id) {
                    self.admin.exhibits = exhibits;
                    self.clamp_selection(Resource::Exhibits);
                }
                Vec::new()
            }
            NetworkResponse::ToursLoaded { id, tours } => {
                if self.is_latest_fetch(Resource::Tours, id) {
                    self.admin.tours = tours;
                    self.clamp_selection(Resource::Tours);
                }
                Vec::new()
            }
            NetworkResponse::Mutated { id, outcome } => {
                self.admin.dialog.resolve(id, Ok(()));
                let resource = outcome.resource();
                self.push_toast(Toast::success(format!(
                    "{} {}",
                    resource.label(),
                    past_tense(outcome.action())
                )));

                match self.refresh_policy {
                    RefreshPolicy::Refetch => vec![self.fetch(resource)],
                    RefreshPolicy::Merge => {
                        if self.merge(outcome) {
                            // A list already in flight predates this change
                            self.admin.latest_fetch.remove(&resource);
                            Vec::new()
                        } else {
                            vec![self.fetch(resource)]
                        }
                    }
                }
            }
            NetworkResponse::Failed { id, resource, action, message } => {
                self.admin.dialog.resolve(id, Err(message.clone()));
                self.push_toast(Toast::error(format!(
                    "{} {} failed: {}",
                    action.as_str(),
                    match action {
                        ApiAction::Fetch => resource.as_str(),
                        _ => resource.singular(),
                    },
                    message
                )));
                Vec::new()
            }
        }
    }

    fn is_latest_fetch(&self, resource: Resource, id: u64) -> bool {
        let latest = self.admin.latest_fetch.get(&resource).copied();
        if latest != Some(id) {
            tracing::debug!(id, ?latest, resource = resource.as_str(), "Dropping stale list response");
            return false;
        }
        true
    }

    /// Apply a mutation locally. Returns false when a re-fetch is needed instead.
    fn merge(&mut self, outcome: MutationOutcome) -> bool {
        match outcome {
            MutationOutcome::Created { record: Some(record), .. } => {
                let resource = match record {
                    // Server lists newest first
                    Record::Exhibit(e) => {
                        self.admin.exhibits.insert(0, e);
                        Resource::Exhibits
                    }
                    Record::Tour(t) => {
                        self.admin.tours.insert(0, t);
                        Resource::Tours
                    }
                };
                // Keep the highlight on the same record
                if self.list_len(resource) > 1 {
                    *self.selection_mut(resource) += 1;
                }
                true
            }
            MutationOutcome::Updated { record: Some(record), .. } => match record {
                Record::Exhibit(e) => match self.admin.exhibits.iter_mut().find(|x| x.id == e.id) {
                    Some(slot) => {
                        *slot = e;
                        true
                    }
                    None => false,
                },
                Record::Tour(t) => match self.admin.tours.iter_mut().find(|x| x.id == t.id) {
                    Some(slot) => {
                        *slot = t;
                        true
                    }
                    None => false,
                },
            },
            MutationOutcome::Deleted { resource, record_id } => {
                match resource {
                    Resource::Exhibits => self.admin.exhibits.retain(|e| e.id != record_id),
                    Resource::Tours => self.admin.tours.retain(|t| t.id != record_id),
                }
                self.clamp_selection(resource);
                true
            }
            MutationOutcome::Created { record: None, .. }
            | MutationOutcome::Updated { record: None, .. } => false,
        }
    }

    // ========================
    // Toasts
    // ========================

    pub fn push_toast(&mut self, toast: Toast) {
        if self.toasts.len() >= MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(toast);
    }

    /// Drop expired toasts. Returns true if anything changed.
    pub fn prune_toasts(&mut self, now: chrono::DateTime<chrono::Utc>) -> bool {
        let before = self.toasts.len();
        let ttl = self.toast_ttl;
        self.toasts.retain(|t| !t.is_expired(now, ttl));
        self.toasts.len() != before
    }
}

fn past_tense(action: ApiAction) -> &'static str {
    match action {
        ApiAction::Fetch => "loaded",
        ApiAction::Create => "created",
        ApiAction::Update => "updated",
        ApiAction::Delete => "deleted",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::dialog::DialogPhase;
    use crate::models::{Draft, Exhibit, ToastKind, VirtualTour};

    fn exhibit(id: i64, title: &str) -> Exhibit {
        Exhibit {
            id,
            title: title.into(),
            period: String::new(),
            description: String::new(),
            image_url: String::new(),
            category: String::new(),
            location: String::new(),
        }
    }

    fn tour(id: i64, title: &str) -> VirtualTour {
        VirtualTour {
            id,
            title: title.into(),
            description: String::new(),
            duration_minutes: 25,
            video_url: String::new(),
            thumbnail_url: String::new(),
            category: String::new(),
            viewers_count: 10,
        }
    }

    /// State with exhibits [1 Mask, 2 Armour] loaded
    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.switch_tab(AppTab::Admin);
        let cmd = state.fetch(Resource::Exhibits);
        state.handle_response(NetworkResponse::ExhibitsLoaded {
            id: cmd.id().unwrap(),
            exhibits: vec![exhibit(1, "Mask"), exhibit(2, "Armour")],
        });
        state
    }

    fn fetch_of(cmds: &[NetworkCommand]) -> Option<Resource> {
        match cmds {
            [NetworkCommand::Fetch { resource, .. }] => Some(*resource),
            _ => None,
        }
    }

    #[test]
    fn test_initial_fetch_is_two_independent_requests() {
        let mut state = AppState::default();
        let cmds = state.initial_fetch();
        assert_eq!(cmds.len(), 2);
        assert!(matches!(cmds[0], NetworkCommand::Fetch { resource: Resource::Exhibits, .. }));
        assert!(matches!(cmds[1], NetworkCommand::Fetch { resource: Resource::Tours, .. }));
        assert!(state.is_fetching(Resource::Exhibits));
        assert!(state.is_fetching(Resource::Tours));

        // Tours may answer first
        let tours_id = cmds[1].id().unwrap();
        state.handle_response(NetworkResponse::ToursLoaded { id: tours_id, tours: vec![tour(5, "Egypt")] });
        assert_eq!(state.admin.tours.len(), 1);
        assert!(state.is_fetching(Resource::Exhibits));
        assert!(!state.is_fetching(Resource::Tours));
    }

    #[test]
    fn test_fetch_failure_keeps_stale_list() {
        let mut state = loaded_state();
        let cmd = state.refresh();
        state.handle_response(NetworkResponse::Failed {
            id: cmd.id().unwrap(),
            resource: Resource::Exhibits,
            action: ApiAction::Fetch,
            message: "connection failed".into(),
        });

        assert_eq!(state.admin.exhibits.len(), 2);
        let toast = state.toasts.back().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Loading exhibits failed: connection failed");
    }

    #[test]
    fn test_create_success_closes_dialog_and_refetches() {
        let mut state = loaded_state();
        state.open_create();
        for c in "Vase".chars() {
            state.dialog_char(c);
        }
        let cmd = state.submit_dialog().unwrap();
        let NetworkCommand::Create { id, draft } = cmd else {
            panic!("expected create");
        };
        assert!(matches!(draft, Draft::Exhibit(ref d) if d.title == "Vase"));

        let follow_up = state.handle_response(NetworkResponse::Mutated {
            id,
            outcome: MutationOutcome::Created { resource: Resource::Exhibits, record: None },
        });
        assert_eq!(state.admin.dialog, DialogState::Closed);
        assert_eq!(fetch_of(&follow_up), Some(Resource::Exhibits));
        assert_eq!(state.toasts.back().unwrap().message, "Exhibit created");
    }

    #[test]
    fn test_create_failure_keeps_dialog_and_list() {
        let mut state = loaded_state();
        state.open_create();
        for c in "Vase".chars() {
            state.dialog_char(c);
        }
        let id = state.submit_dialog().unwrap().id().unwrap();

        let follow_up = state.handle_response(NetworkResponse::Failed {
            id,
            resource: Resource::Exhibits,
            action: ApiAction::Create,
            message: "HTTP 500: boom".into(),
        });
        assert!(follow_up.is_empty());
        assert_eq!(state.admin.exhibits, vec![exhibit(1, "Mask"), exhibit(2, "Armour")]);
        match &state.admin.dialog {
            DialogState::Open { form, phase, .. } => {
                assert_eq!(form.get("title"), "Vase");
                assert!(matches!(phase, DialogPhase::Failed(_)));
            }
            DialogState::Closed => panic!("dialog should stay open"),
        }
        assert_eq!(state.toasts.back().unwrap().message, "Creating exhibit failed: HTTP 500: boom");
    }

    #[test]
    fn test_update_targets_selected_id() {
        let mut state = loaded_state();
        state.select_next();
        state.open_edit();
        state.dialog_char('!');

        match state.submit_dialog() {
            Some(NetworkCommand::Update { record_id, draft: Draft::Exhibit(d), .. }) => {
                assert_eq!(record_id, 2);
                assert_eq!(d.title, "Armour!");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_delete_declined_sends_nothing() {
        let mut state = loaded_state();
        state.request_delete();
        assert_eq!(state.admin.confirm.as_ref().map(|p| p.record_id), Some(1));

        state.decline_delete();
        assert!(state.confirm_delete().is_none());
        assert_eq!(state.admin.exhibits.len(), 2);
    }

    #[test]
    fn test_delete_confirmed_then_refetch() {
        let mut state = loaded_state();
        state.request_delete();
        let cmd = state.confirm_delete().unwrap();
        let NetworkCommand::Delete { id, resource, record_id } = cmd else {
            panic!("expected delete");
        };
        assert_eq!((resource, record_id), (Resource::Exhibits, 1));
        assert!(state.admin.confirm.is_none());

        let follow_up = state.handle_response(NetworkResponse::Mutated {
            id,
            outcome: MutationOutcome::Deleted { resource, record_id },
        });
        assert_eq!(fetch_of(&follow_up), Some(Resource::Exhibits));
    }

    #[test]
    fn test_stale_list_response_dropped() {
        let mut state = loaded_state();
        let older = state.refresh().id().unwrap();
        let newer = state.refresh().id().unwrap();

        state.handle_response(NetworkResponse::ExhibitsLoaded { id: newer, exhibits: vec![exhibit(3, "Vase")] });
        state.handle_response(NetworkResponse::ExhibitsLoaded { id: older, exhibits: vec![] });
        assert_eq!(state.admin.exhibits, vec![exhibit(3, "Vase")]);
    }

    #[test]
    fn test_selection_clamped_when_list_shrinks() {
        let mut state = loaded_state();
        state.select_next();
        assert_eq!(state.admin.selected_exhibit, 1);

        let id = state.refresh().id().unwrap();
        state.handle_response(NetworkResponse::ExhibitsLoaded { id, exhibits: vec![exhibit(1, "Mask")] });
        assert_eq!(state.admin.selected_exhibit, 0);
    }

    #[test]
    fn test_merge_policy_applies_server_record() {
        let mut state = loaded_state();
        state.refresh_policy = RefreshPolicy::Merge;

        let follow_up = state.handle_response(NetworkResponse::Mutated {
            id: 99,
            outcome: MutationOutcome::Created {
                resource: Resource::Exhibits,
                record: Some(Record::Exhibit(exhibit(3, "Vase"))),
            },
        });
        assert!(follow_up.is_empty());
        assert_eq!(state.admin.exhibits[0], exhibit(3, "Vase"));

        state.handle_response(NetworkResponse::Mutated {
            id: 100,
            outcome: MutationOutcome::Updated {
                resource: Resource::Exhibits,
                record_id: 2,
                record: Some(Record::Exhibit(exhibit(2, "Plate armour"))),
            },
        });
        assert_eq!(state.admin.exhibits[2].title, "Plate armour");
        assert_eq!(state.admin.exhibits[1], exhibit(1, "Mask"));

        state.handle_response(NetworkResponse::Mutated {
            id: 101,
            outcome: MutationOutcome::Deleted { resource: Resource::Exhibits, record_id: 1 },
        });
        assert!(state.admin.exhibits.iter().all(|e| e.id != 1));
    }

    #[test]
    fn test_merge_not_undone_by_older_list() {
        let mut state = loaded_state();
        state.refresh_policy = RefreshPolicy::Merge;
        let older = state.refresh().id().unwrap();

        let follow_up = state.handle_response(NetworkResponse::Mutated {
            id: 50,
            outcome: MutationOutcome::Deleted { resource: Resource::Exhibits, record_id: 1 },
        });
        assert!(follow_up.is_empty());

        state.handle_response(NetworkResponse::ExhibitsLoaded {
            id: older,
            exhibits: vec![exhibit(1, "Mask"), exhibit(2, "Armour")],
        });
        let ids: Vec<i64> = state.admin.exhibits.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2]);
        assert!(!state.is_fetching(Resource::Exhibits));

        // A fetch issued after the merge still applies
        let newer = state.refresh().id().unwrap();
        state.handle_response(NetworkResponse::ExhibitsLoaded { id: newer, exhibits: vec![exhibit(4, "Vase")] });
        assert_eq!(state.admin.exhibits, vec![exhibit(4, "Vase")]);
    }

    #[test]
    fn test_merged_create_keeps_highlighted_record() {
        let mut state = loaded_state();
        state.refresh_policy = RefreshPolicy::Merge;
        state.select_next();
        assert_eq!(state.selected_record(), Some((2, "Armour".to_string())));

        state.handle_response(NetworkResponse::Mutated {
            id: 60,
            outcome: MutationOutcome::Created {
                resource: Resource::Exhibits,
                record: Some(Record::Exhibit(exhibit(3, "Vase"))),
            },
        });
        assert_eq!(state.admin.exhibits[0].id, 3);
        assert_eq!(state.selected_record(), Some((2, "Armour".to_string())));

        // Into an empty list the new record is selected
        state.switch_resource();
        state.handle_response(NetworkResponse::Mutated {
            id: 61,
            outcome: MutationOutcome::Created {
                resource: Resource::Tours,
                record: Some(Record::Tour(tour(9, "Egypt"))),
            },
        });
        assert_eq!(state.admin.selected_tour, 0);
        assert_eq!(state.selected_record(), Some((9, "Egypt".to_string())));
    }

    #[test]
    fn test_merge_policy_falls_back_to_refetch() {
        let mut state = loaded_state();
        state.refresh_policy = RefreshPolicy::Merge;
        let follow_up = state.handle_response(NetworkResponse::Mutated {
            id: 7,
            outcome: MutationOutcome::Updated { resource: Resource::Tours, record_id: 4, record: None },
        });
        assert_eq!(fetch_of(&follow_up), Some(Resource::Tours));
    }

    #[test]
    fn test_login_is_never_submitted() {
        let mut state = AppState::default();
        state.open_login();
        for c in "me@museum.ru".chars() {
            state.login_char(c);
        }
        state.login_next_field();
        state.login_char('x');
        assert_eq!(state.login.email, "me@museum.ru");
        assert_eq!(state.to_render_state().login_password_len, 1);

        state.close_login();
        assert!(!state.login.open);
        assert!(state.login.password.is_empty());
        assert!(state.in_flight.is_empty());
    }

    #[test]
    fn test_toasts_capped_and_pruned() {
        let mut state = AppState::default();
        for i in 0..(MAX_TOASTS + 2) {
            state.push_toast(Toast::success(format!("t{}", i)));
        }
        assert_eq!(state.toasts.len(), MAX_TOASTS);
        assert_eq!(state.toasts.front().unwrap().message, "t2");

        let later = chrono::Utc::now() + chrono::Duration::seconds(60);
        assert!(state.prune_toasts(later));
        assert!(state.toasts.is_empty());
    }
}
