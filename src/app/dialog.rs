//! Admin edit dialog state machine
//!
//! ```text
//! Closed -> Open(Creating)    -> Submitting -> Closed | Failed
//! Closed -> Open(Editing(id)) -> Submitting -> Closed | Failed
//! ```
//!
//! `Failed` keeps the form so the user can fix it and submit again.

use crate::app::form::EntityForm;
use crate::models::{Draft, Resource};

/// What the open dialog will do on submit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogMode {
    Creating,
    Editing(i64),
}

/// Progress of the open dialog
#[derive(Clone, Debug, PartialEq)]
pub enum DialogPhase {
    Editing,
    Submitting(u64),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Open {
        mode: DialogMode,
        form: EntityForm,
        phase: DialogPhase,
    },
}

/// A submit the caller should send over the network
#[derive(Debug, PartialEq)]
pub struct Submission {
    pub mode: DialogMode,
    pub draft: Draft,
}

impl DialogState {
    pub fn create(resource: Resource) -> Self {
        DialogState::Open {
            mode: DialogMode::Creating,
            form: EntityForm::empty(resource),
            phase: DialogPhase::Editing,
        }
    }

    pub fn edit(id: i64, form: EntityForm) -> Self {
        DialogState::Open {
            mode: DialogMode::Editing(id),
            form,
            phase: DialogPhase::Editing,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DialogState::Open { .. })
    }

    /// Form access for typing; locked while a submit is in flight
    pub fn form_mut(&mut self) -> Option<&mut EntityForm> {
        match self {
            DialogState::Open { form, phase, .. } if !matches!(phase, DialogPhase::Submitting(_)) => {
                Some(form)
            }
            _ => None,
        }
    }

    pub fn pending_request(&self) -> Option<u64> {
        match self {
            DialogState::Open {
                phase: DialogPhase::Submitting(id),
                ..
            } => Some(*id),
            _ => None,
        }
    }

    /// Validate the form and move to `Submitting(request_id)`.
    ///
    /// Returns `None` when closed, already submitting, or when validation
    /// fails (the dialog is then `Failed` with the reason).
    pub fn submit(&mut self, request_id: u64) -> Option<Submission> {
        let DialogState::Open { mode, form, phase } = self else {
            return None;
        };
        if matches!(phase, DialogPhase::Submitting(_)) {
            return None;
        }

        match form.to_draft() {
            Ok(draft) => {
                *phase = DialogPhase::Submitting(request_id);
                Some(Submission { mode: *mode, draft })
            }
            Err(e) => {
                *phase = DialogPhase::Failed(e.to_string());
                None
            }
        }
    }

    /// Resolve the in-flight submit `request_id`. Returns true if it was ours.
    pub fn resolve(&mut self, request_id: u64, result: Result<(), String>) -> bool {
        if self.pending_request() != Some(request_id) {
            return false;
        }
        match result {
            Ok(()) => *self = DialogState::Closed,
            Err(message) => {
                if let DialogState::Open { phase, .. } = self {
                    *phase = DialogPhase::Failed(message);
                }
            }
        }
        true
    }

    /// Close and drop the form. An in-flight submit still completes remotely.
    pub fn cancel(&mut self) {
        *self = DialogState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vase_dialog() -> DialogState {
        let mut dialog = DialogState::create(Resource::Exhibits);
        if let DialogState::Open { form, .. } = &mut dialog {
            form.set("title", "Vase");
        }
        dialog
    }

    #[test]
    fn test_create_submit_success_closes() {
        let mut dialog = vase_dialog();
        let submission = dialog.submit(7).unwrap();
        assert_eq!(submission.mode, DialogMode::Creating);
        assert_eq!(dialog.pending_request(), Some(7));

        assert!(dialog.resolve(7, Ok(())));
        assert_eq!(dialog, DialogState::Closed);
    }

    #[test]
    fn test_double_submit_ignored() {
        let mut dialog = vase_dialog();
        assert!(dialog.submit(1).is_some());
        assert!(dialog.submit(2).is_none());
        assert!(dialog.form_mut().is_none());
        assert_eq!(dialog.pending_request(), Some(1));
    }

    #[test]
    fn test_failure_keeps_input_for_retry() {
        let mut dialog = vase_dialog();
        dialog.submit(3);
        assert!(dialog.resolve(3, Err("HTTP 500".into())));

        match &dialog {
            DialogState::Open { form, phase, .. } => {
                assert_eq!(form.get("title"), "Vase");
                assert_eq!(phase, &DialogPhase::Failed("HTTP 500".into()));
            }
            DialogState::Closed => panic!("dialog closed on failure"),
        }
        assert!(dialog.submit(4).is_some());
    }

    #[test]
    fn test_validation_failure_sends_nothing() {
        let mut dialog = DialogState::create(Resource::Tours);
        assert!(dialog.submit(1).is_none());
        assert!(matches!(
            dialog,
            DialogState::Open { phase: DialogPhase::Failed(_), .. }
        ));
    }

    #[test]
    fn test_foreign_response_ignored() {
        let mut dialog = vase_dialog();
        dialog.submit(5);
        assert!(!dialog.resolve(6, Ok(())));
        assert!(dialog.is_open());
    }

    #[test]
    fn test_edit_mode_carries_id() {
        let mut form = EntityForm::empty(Resource::Exhibits);
        form.set("title", "Mask");
        let mut dialog = DialogState::edit(12, form);
        assert_eq!(dialog.submit(1).unwrap().mode, DialogMode::Editing(12));
    }
}
