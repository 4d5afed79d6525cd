//! User management message handlers

use log::{debug, info, warn};
use roster_model::prelude::{Role, UserId, UserRecord};

use super::cache::DirectorySnapshot;
use super::form::{FormField, FormMode, FormState, SubmitPayload};
use super::messages::Message;
use crate::domains::ui::feedback::{error_message, text};
use crate::errors::{ClientResult, ValidationError};
use crate::orchestrator::Orchestrator;
use crate::state::Ticket;

/// Parse a salary input: a finite, non-negative number
pub fn parse_salary(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ValidationError::InvalidSalary(trimmed.to_string())),
    }
}

fn success_message(mode: FormMode) -> &'static str {
    match mode {
        FormMode::Create => text::USER_CREATED,
        FormMode::Edit(_) => text::USER_UPDATED,
        FormMode::Role(_) => text::ROLE_UPDATED,
    }
}

impl Orchestrator {
    pub(crate) async fn handle_user_management(&self, message: Message) {
        match message {
            Message::LoadUsers => {
                self.refresh_directory().await;
            }
            Message::CreateUser => {
                self.open_create_form();
            }
            Message::EditUser(id) => {
                self.open_edit_form(id);
            }
            Message::EditUserRole(id) => {
                self.open_role_form(id);
            }
            Message::UpdateFormField(field, value) => {
                self.update_form_field(field, value);
            }
            Message::UpdateFormRole(role) => {
                self.update_form_role(role);
            }
            Message::SubmitForm => {
                self.submit_form().await;
            }
            Message::CancelForm => self.cancel_form(),
            Message::DeleteUser(id) => {
                self.request_delete(id);
            }
            Message::DeleteUserConfirm => {
                self.confirm_delete().await;
            }
            Message::DeleteUserCancel => self.cancel_delete(),
            Message::SetSalary(id, raw) => {
                self.set_salary(id, &raw).await;
            }
        }
    }

    /// Apply a mutation-then-refresh result under `ticket`
    fn complete_directory_operation(
        &self,
        ticket: Ticket,
        result: ClientResult<DirectorySnapshot>,
        success: Option<&'static str>,
        default_error: &'static str,
        on_success: impl FnOnce(&mut FormState),
    ) -> bool {
        match result {
            Ok(snapshot) => self.finish(ticket, |state| {
                state.directory.apply_snapshot(snapshot);
                on_success(&mut state.form);
                if let Some(message) = success {
                    state.feedback.set_success(message);
                }
            }),
            Err(err) => {
                warn!("[UserManagement] Operation failed: {}", err);
                self.finish(ticket, |state| {
                    state.feedback.set_error(error_message(&err, default_error));
                });
                false
            }
        }
    }

    /// Reload the directory on demand
    pub async fn refresh_directory(&self) -> bool {
        if !self.require_session("refresh") {
            return false;
        }
        let ticket = self.begin();
        let result = self.directory.refresh().await;
        self.complete_directory_operation(
            ticket,
            result,
            None,
            text::LIST_FAILED,
            |_| {},
        )
    }

    pub fn open_create_form(&self) -> bool {
        if !self.require_session("open create form") {
            return false;
        }
        self.update(|state| {
            state.form.open_create();
            state.feedback.clear();
        });
        true
    }

    pub fn open_edit_form(&self, id: UserId) -> bool {
        self.open_record_form(id, FormState::open_edit)
    }

    pub fn open_role_form(&self, id: UserId) -> bool {
        self.open_record_form(id, FormState::open_role)
    }

    fn open_record_form(
        &self,
        id: UserId,
        open: fn(&mut FormState, &UserRecord),
    ) -> bool {
        if !self.require_session("open form") {
            return false;
        }
        let mut opened = false;
        self.update(|state| {
            let Some(record) = state.directory.find(id).cloned() else {
                warn!("[UserManagement] No cached record with id {}", id);
                return;
            };
            open(&mut state.form, &record);
            state.feedback.clear();
            opened = true;
        });
        opened
    }

    pub fn update_form_field(&self, field: FormField, value: String) -> bool {
        let mut changed = false;
        self.update(|state| changed = state.form.set_field(field, value));
        changed
    }

    pub fn update_form_role(&self, role: Role) -> bool {
        let mut changed = false;
        self.update(|state| changed = state.form.set_role(role));
        changed
    }

    pub fn cancel_form(&self) {
        self.update(|state| state.form.close());
    }

    /// Submit the open form. A failed submit leaves the form open and
    /// unchanged.
    pub async fn submit_form(&self) -> bool {
        if !self.require_session("submit") {
            return false;
        }
        let (mode, payload) =
            self.read(|state| (state.form.mode(), state.form.submit_payload()));
        let Some(mode) = mode else {
            debug!("[UserManagement] Submit with no open form");
            return false;
        };
        let payload = match payload {
            Ok(Some(payload)) => payload,
            Ok(None) => return false,
            Err(validation) => {
                info!("[UserManagement] Form rejected: {}", validation);
                self.update(|state| state.feedback.set_error(validation.to_string()));
                return false;
            }
        };

        let ticket = self.begin();
        let result = match &payload {
            SubmitPayload::Create(request) => self.directory.create(request).await,
            SubmitPayload::Update(id, request) => {
                self.directory.update(*id, request).await
            }
        };
        self.complete_directory_operation(
            ticket,
            result,
            Some(success_message(mode)),
            text::SAVE_FAILED,
            FormState::close,
        )
    }

    /// First step of a delete; nothing is sent until confirmed
    pub fn request_delete(&self, id: UserId) -> bool {
        if !self.require_session("delete") {
            return false;
        }
        self.update(|state| state.pending_delete = Some(id));
        true
    }

    pub fn cancel_delete(&self) {
        self.update(|state| state.pending_delete = None);
    }

    pub async fn confirm_delete(&self) -> bool {
        let Some(id) = self.read(|state| state.pending_delete) else {
            debug!("[UserManagement] Delete confirmed with nothing pending");
            return false;
        };
        self.update(|state| state.pending_delete = None);
        if !self.require_session("delete") {
            return false;
        }

        let ticket = self.begin();
        let result = self.directory.delete(id).await;
        self.complete_directory_operation(
            ticket,
            result,
            Some(text::USER_DELETED),
            text::DELETE_FAILED,
            |_| {},
        )
    }

    pub async fn set_salary(&self, id: UserId, raw: &str) -> bool {
        if !self.require_session("set salary") {
            return false;
        }
        let salary = match parse_salary(raw) {
            Ok(salary) => salary,
            Err(validation) => {
                self.update(|state| state.feedback.set_error(validation.to_string()));
                return false;
            }
        };

        let ticket = self.begin();
        let result = self.directory.set_salary(id, salary).await;
        self.complete_directory_operation(
            ticket,
            result,
            Some(text::SALARY_UPDATED),
            text::SALARY_FAILED,
            |_| {},
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salary_must_be_finite_and_non_negative() {
        assert_eq!(parse_salary(" 4500.50 "), Ok(4500.5));
        assert_eq!(parse_salary("0"), Ok(0.0));
        assert!(parse_salary("-1").is_err());
        assert!(parse_salary("NaN").is_err());
        assert!(parse_salary("inf").is_err());
        assert_eq!(
            parse_salary("lots"),
            Err(ValidationError::InvalidSalary("lots".into()))
        );
    }
}
